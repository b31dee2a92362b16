use ndarray::{Array2, ArrayD, ArrayView2, ArrayViewD, Axis, IxDyn};
use rayon::prelude::*;

use crate::calibration::ColourScale;
use crate::consts::{COLOR_CHANNEL_COUNT, MATCH_BLOCK_PIXELS, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{Result, SweError};

/// Index of the nearest ramp colour for every pixel.
///
/// `pixels` is either (pixels, 3) or (frames, pixels, 3); the result drops
/// the channel axis. Distances are Euclidean in RGB, compared squared in
/// exact integer arithmetic. On ties the lowest ramp index wins.
pub fn closest_colour_indices(pixels: ArrayViewD<u8>, ramp: ArrayView2<u8>) -> Result<ArrayD<usize>> {
    let shape = pixels.shape().to_vec();
    if !(2..=3).contains(&shape.len()) || shape[shape.len() - 1] != COLOR_CHANNEL_COUNT {
        return Err(SweError::ShapeMismatch(format!(
            "ROI shape {shape:?}: must be (pixels, 3) or (frames, pixels, 3)"
        )));
    }
    if ramp.ncols() != COLOR_CHANNEL_COUNT || ramp.nrows() == 0 {
        return Err(SweError::ShapeMismatch(format!(
            "colour ramp shape {:?}: must be (N, 3) with N > 0",
            ramp.shape()
        )));
    }

    let lead = &shape[..shape.len() - 1];
    let count: usize = lead.iter().product();
    let flat = pixels
        .to_shape((count, COLOR_CHANNEL_COUNT))
        .map_err(|e| SweError::ShapeMismatch(e.to_string()))?;

    let ramp = ramp.mapv(i32::from).insert_axis(Axis(0));
    let blocks: Vec<ArrayView2<u8>> = flat.axis_chunks_iter(Axis(0), MATCH_BLOCK_PIXELS).collect();

    let matched: Vec<Vec<usize>> = if count >= PARALLEL_PIXEL_THRESHOLD {
        blocks
            .par_iter()
            .map(|block| match_block(block, &ramp))
            .collect()
    } else {
        blocks.iter().map(|block| match_block(block, &ramp)).collect()
    };

    let indices: Vec<usize> = matched.into_iter().flatten().collect();
    ArrayD::from_shape_vec(IxDyn(lead), indices).map_err(|e| SweError::ShapeMismatch(e.to_string()))
}

/// Broadcast a (B, 3) block against the (1, N, 3) ramp and take the row-wise
/// first minimum of the (B, N) squared-distance matrix.
fn match_block(block: &ArrayView2<u8>, ramp: &ndarray::Array3<i32>) -> Vec<usize> {
    let px = block.mapv(i32::from).insert_axis(Axis(1));
    let diff = &px - ramp;
    let distances: Array2<i32> = (&diff * &diff).sum_axis(Axis(2));
    distances.outer_iter().map(|row| first_argmin(row.iter().copied())).collect()
}

fn first_argmin(values: impl Iterator<Item = i32>) -> usize {
    let mut best = (0usize, i32::MAX);
    for (i, d) in values.enumerate() {
        if d < best.1 {
            best = (i, d);
        }
    }
    best.0
}

/// Map (frames, pixels, 3) RGB values to the scale's physical values.
///
/// Returns a (frames, pixels) array in the scale's native variable.
pub fn map_to_values(pixels: ndarray::ArrayView3<u8>, scale: &ColourScale) -> Result<Array2<f64>> {
    let indices = closest_colour_indices(pixels.into_dyn(), scale.colours())?
        .into_dimensionality::<ndarray::Ix2>()
        .map_err(|e| SweError::ShapeMismatch(e.to_string()))?;
    let values = scale.values();
    Ok(indices.mapv(|i| values[i]))
}
