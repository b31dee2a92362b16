use ndarray::{Array1, Array2, ArrayView2, ArrayView3, Axis, Zip};

use crate::consts::MAX_CHANNEL_DIVERGENCE;

/// Sum of absolute pairwise channel differences, `|R-G| + |R-B| + |G-B|`,
/// per pixel of a (frames, pixels, 3) array.
pub fn channel_divergence(pixels: ArrayView3<u8>) -> Array2<f32> {
    let (n, p, _) = pixels.dim();
    let mut out = Array2::<f32>::zeros((n, p));
    Zip::from(&mut out)
        .and(pixels.lanes(Axis(2)))
        .for_each(|d, rgb| {
            let r = rgb[0] as f32;
            let g = rgb[1] as f32;
            let b = rgb[2] as f32;
            *d = (r - g).abs() + (r - b).abs() + (g - b).abs();
        });
    out
}

/// Mask of pixels carrying a colour-coded measurement.
///
/// A pixel is kept when its channel divergence is strictly above
/// `threshold`; near-grey pixels (void tissue, background) are not.
/// `None` uses the maximum divergence, which keeps nothing.
pub fn chromatic_mask(pixels: ArrayView3<u8>, threshold: Option<u16>) -> Array2<bool> {
    let threshold = threshold.unwrap_or(MAX_CHANNEL_DIVERGENCE) as f32;
    channel_divergence(pixels).mapv(|d| d > threshold)
}

/// Replace values outside `keep` with NaN.
pub fn apply_mask(values: &Array2<f64>, keep: &Array2<bool>) -> Array2<f64> {
    let mut out = values.clone();
    Zip::from(&mut out).and(keep).for_each(|v, &k| {
        if !k {
            *v = f64::NAN;
        }
    });
    out
}

/// Mask of values above `saturation_percent` of `max_scale`. NaN is never saturated.
pub fn saturation_mask(values: &Array2<f64>, max_scale: f64, saturation_percent: f64) -> Array2<bool> {
    let limit = max_scale * saturation_percent / 100.0;
    values.mapv(|v| v > limit)
}

/// Mask of NaN entries.
pub fn void_mask(values: &Array2<f64>) -> Array2<bool> {
    values.mapv(f64::is_nan)
}

/// Per-frame percentage of `true` entries along the pixel axis.
pub fn pixel_percent(mask: ArrayView2<bool>) -> Array1<f64> {
    let total = mask.ncols() as f64;
    mask.outer_iter()
        .map(|row| 100.0 * row.iter().filter(|&&m| m).count() as f64 / total)
        .collect()
}
