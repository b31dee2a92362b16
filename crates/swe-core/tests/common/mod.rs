#![allow(dead_code)]

use ndarray::{Array2, Array3, Array4};
use swe_core::calibration::{ColourScale, StripRect};
use swe_core::frame::{ImageSequence, ScanHeader, UltrasoundRegion};

/// Number of entries in the synthetic colour ramp.
pub const RAMP_LEN: usize = 101;

/// Grey used for everything outside the overlay.
pub const BACKGROUND: [u8; 3] = [100, 100, 100];

/// Frame size of synthetic scans.
pub const FRAME_HEIGHT: usize = 110;
pub const FRAME_WIDTH: usize = 60;

/// Ramp colour `i`: red fading into blue. Every entry is strongly chromatic.
pub fn ramp_colour(i: usize) -> [u8; 3] {
    let i = i as u8;
    [255 - 2 * i, 0, 2 * i]
}

/// (RAMP_LEN, 3) synthetic colour ramp.
pub fn synthetic_ramp() -> Array2<u8> {
    Array2::from_shape_fn((RAMP_LEN, 3), |(i, c)| ramp_colour(i)[c])
}

/// Colour scale of the synthetic ramp: entry `i` maps to `max_scale * (1 - i / 100)`.
pub fn synthetic_scale(max_scale: f64) -> ColourScale {
    ColourScale::new(synthetic_ramp(), max_scale).unwrap()
}

/// Strip holding the synthetic ramp in every synthetic frame.
pub fn ramp_strip() -> StripRect {
    StripRect {
        x0: 0,
        y0: 0,
        x1: 2,
        y1: RAMP_LEN as u32,
    }
}

/// Header region of the SWE box; a 5 pixel offset shrinks it to (15, 15)-(45, 45).
pub fn swe_region() -> UltrasoundRegion {
    UltrasoundRegion {
        min_x0: 10,
        min_y0: 10,
        max_x1: 50,
        max_y1: 50,
    }
}

pub fn make_header(frame_rate: f64, regions: Vec<UltrasoundRegion>) -> ScanHeader {
    ScanHeader {
        frame_rate,
        lossy_compression: false,
        patient_name: Some("Test^Patient".into()),
        acquisition_datetime: Some("20240131093005".into()),
        regions,
    }
}

/// Header with top FOV, SWE box and bottom FOV.
pub fn three_region_header(frame_rate: f64) -> ScanHeader {
    let top = UltrasoundRegion {
        min_x0: 5,
        min_y0: 0,
        max_x1: 55,
        max_y1: 8,
    };
    let bottom = UltrasoundRegion {
        min_x0: 5,
        min_y0: 55,
        max_x1: 55,
        max_y1: 105,
    };
    make_header(frame_rate, vec![top, swe_region(), bottom])
}

/// Grey frame with the synthetic ramp drawn in the calibration strip.
pub fn blank_frame() -> Array3<u8> {
    let mut frame = Array3::from_shape_fn((FRAME_HEIGHT, FRAME_WIDTH, 3), |(_, _, c)| BACKGROUND[c]);
    let strip = ramp_strip();
    for y in strip.y0 as usize..strip.y1 as usize {
        for x in strip.x0 as usize..strip.x1 as usize {
            for c in 0..3 {
                frame[[y, x, c]] = ramp_colour(y)[c];
            }
        }
    }
    frame
}

/// Fill the half-open box `[x0, x1) x [y0, y1)` of `frame` with `colour`.
pub fn fill_box(frame: &mut Array3<u8>, (x0, y0, x1, y1): (usize, usize, usize, usize), colour: [u8; 3]) {
    for y in y0..y1 {
        for x in x0..x1 {
            for c in 0..3 {
                frame[[y, x, c]] = colour[c];
            }
        }
    }
}

/// Frame whose SWE box is painted in one ramp colour.
pub fn overlay_frame(ramp_index: usize) -> Array3<u8> {
    let mut frame = blank_frame();
    fill_box(&mut frame, (15, 15, 45, 45), ramp_colour(ramp_index));
    frame
}

/// Frame whose SWE box is painted in a flat grey level.
pub fn grey_overlay_frame(level: u8) -> Array3<u8> {
    let mut frame = blank_frame();
    fill_box(&mut frame, (15, 15, 45, 45), [level; 3]);
    frame
}

pub fn sequence_of(frames: &[Array3<u8>]) -> ImageSequence {
    ImageSequence::from_frames(frames).unwrap()
}

/// Sequence of `n` tiny frames filled with a uniform colour.
pub fn uniform_sequence(n: usize, h: usize, w: usize, colour: [u8; 3]) -> ImageSequence {
    let data = Array4::from_shape_fn((n, h, w, 3), |(_, _, _, c)| colour[c]);
    ImageSequence::new(data).unwrap()
}
