use std::path::PathBuf;

use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::consts::{COLOR_CHANNEL_COUNT, DEFAULT_CALIBRATION_STRIP};
use crate::error::{Result, SweError};
use crate::frame::ImageSequence;
use crate::io::palette::load_palette;

/// Colour-to-value lookup table.
///
/// Row `i` of the colour ramp and entry `i` of the value ramp describe the
/// same calibration point. Index 0 holds the highest physical value. Both
/// ramps are only reachable through accessors so they cannot drift apart.
#[derive(Clone, Debug, PartialEq)]
pub struct ColourScale {
    colours: Array2<u8>,
    values: Array1<f64>,
}

impl ColourScale {
    /// Pair an (N, 3) colour ramp with N values spaced linearly from
    /// `max_scale` down to 0.
    pub fn new(colours: Array2<u8>, max_scale: f64) -> Result<Self> {
        let (n, c) = colours.dim();
        if c != COLOR_CHANNEL_COUNT {
            return Err(SweError::ShapeMismatch(format!(
                "colour ramp must be (N, {COLOR_CHANNEL_COUNT}), got (N, {c})"
            )));
        }
        if n == 0 {
            return Err(SweError::ShapeMismatch("colour ramp is empty".into()));
        }
        let values = Array1::linspace(max_scale, 0.0, n);
        Ok(Self { colours, values })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn colours(&self) -> ArrayView2<'_, u8> {
        self.colours.view()
    }

    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Highest value of the scale (the value at index 0).
    pub fn max_scale(&self) -> f64 {
        self.values[0]
    }

    /// `(colour, value)` pair at `index`.
    pub fn entry(&self, index: usize) -> Option<([u8; 3], f64)> {
        let value = *self.values.get(index)?;
        let row = self.colours.row(index);
        Some(([row[0], row[1], row[2]], value))
    }
}

/// Where the colour ramp comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalibrationSource {
    /// Colour bar printed by the device in the first frame.
    #[default]
    Local,
    /// Bundled reference palette.
    External,
}

impl std::fmt::Display for CalibrationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::External => write!(f, "external"),
        }
    }
}

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)` of the device colour bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Default for StripRect {
    fn default() -> Self {
        let (x0, y0, x1, y1) = DEFAULT_CALIBRATION_STRIP;
        Self { x0, y0, x1, y1 }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    #[serde(default)]
    pub source: CalibrationSource,
    #[serde(default)]
    pub strip: StripRect,
    /// External palette file; falls back to the bundled palette when unset.
    #[serde(default)]
    pub palette: Option<PathBuf>,
    /// Interpolate the calibrated ramp to this many colours.
    #[serde(default)]
    pub stretch: Option<usize>,
}

/// Collapse the device colour bar of `frame` to a one-pixel-wide ramp.
///
/// Channels are averaged across the strip width and truncated to integers.
pub fn local_ramp(frame: ndarray::ArrayView3<u8>, strip: &StripRect) -> Result<Array2<u8>> {
    let (h, w, _) = frame.dim();
    if strip.x0 >= strip.x1 || strip.y0 >= strip.y1 {
        return Err(SweError::ShapeMismatch(format!(
            "calibration strip {strip:?} is empty"
        )));
    }
    if strip.x1 as usize > w || strip.y1 as usize > h {
        return Err(SweError::ShapeMismatch(format!(
            "calibration strip {strip:?} exceeds frame dimensions ({w}x{h})"
        )));
    }

    let bar = frame.slice(s![
        strip.y0 as usize..strip.y1 as usize,
        strip.x0 as usize..strip.x1 as usize,
        ..
    ]);
    let width = bar.len_of(Axis(1)) as u32;
    let sums = bar.mapv(u32::from).sum_axis(Axis(1));
    Ok(sums.mapv(|s| (s / width) as u8))
}

/// Build the colour scale for one analysis.
///
/// `default_palette` is used in external mode when the config names no palette.
pub fn calibrate(
    sequence: &ImageSequence,
    config: &CalibrationConfig,
    max_scale: f64,
    default_palette: Option<&std::path::Path>,
) -> Result<ColourScale> {
    let colours = match config.source {
        CalibrationSource::Local => local_ramp(sequence.frame(0), &config.strip)?,
        CalibrationSource::External => {
            let path = config
                .palette
                .as_deref()
                .or(default_palette)
                .ok_or_else(|| {
                    SweError::CalibrationUnavailable("no external palette configured".into())
                })?;
            external_ramp(&load_palette(path)?)
        }
    };
    let colours = match config.stretch {
        Some(n) => stretch_palette(colours.view(), n),
        None => colours,
    };
    let scale = ColourScale::new(colours, max_scale)?;
    info!(
        source = %config.source,
        entries = scale.len(),
        max_scale,
        "Colour scale calibrated"
    );
    Ok(scale)
}

/// Rescale a [0, 1] float palette to 8-bit and flip it so index 0 is the
/// highest value.
pub fn external_ramp(palette: &Array2<f64>) -> Array2<u8> {
    let mut ramp = palette.mapv(|v| (v * 255.0).clamp(0.0, 255.0) as u8);
    ramp.invert_axis(Axis(0));
    ramp
}

/// Linearly interpolate an 8-bit palette to `n` colours.
pub fn stretch_palette(palette: ArrayView2<u8>, n: usize) -> Array2<u8> {
    let len = palette.nrows();
    let mut out = Array2::<u8>::zeros((n, palette.ncols()));
    if len == 0 || n == 0 {
        return out;
    }
    for i in 0..n {
        let pos = if n == 1 {
            0.0
        } else {
            i as f64 * (len - 1) as f64 / (n - 1) as f64
        };
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(len - 1);
        let t = pos - lo as f64;
        for ch in 0..palette.ncols() {
            let a = palette[[lo, ch]] as f64;
            let b = palette[[hi, ch]] as f64;
            out[[i, ch]] = (a + t * (b - a)) as u8;
        }
    }
    out
}
