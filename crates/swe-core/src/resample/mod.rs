pub mod peaks;

use ndarray::Array1;
use tracing::{debug, info, warn};

use crate::error::{Result, SweError};
use crate::frame::{FrameIndexSet, ImageSequence};
use crate::region::{extract_region, mean_intensity, RegionSpec};

use self::peaks::detect_peaks;

/// Number of source frames per SWE refresh: `source / target`, rounded up
/// when it does not divide evenly.
pub fn frame_step(source_fhz: f64, target_fhz: f64) -> Result<usize> {
    if !target_fhz.is_finite() || target_fhz <= 0.0 {
        return Err(SweError::InvalidFrequency(format!(
            "target SWE frequency must be > 0, got {target_fhz}"
        )));
    }
    if !source_fhz.is_finite() || source_fhz <= 0.0 {
        return Err(SweError::InvalidFrequency(format!(
            "source frame rate must be > 0, got {source_fhz}"
        )));
    }
    let ratio = source_fhz / target_fhz;
    let step = if source_fhz % target_fhz == 0.0 {
        ratio
    } else {
        ratio.floor() + 1.0
    };
    // Extreme ratios saturate instead of wrapping.
    Ok((step.min(usize::MAX as f64) as usize).max(1))
}

/// Absolute frame-to-frame change of the overlay's mean intensity.
///
/// Entry `i` is the change between frames `i` and `i + 1`.
pub fn overlay_changes(sequence: &ImageSequence, swe_box: &RegionSpec) -> Result<Array1<f64>> {
    let region = extract_region(sequence.view(), swe_box)?;
    let means = mean_intensity(&region);
    Ok(means
        .windows(2)
        .into_iter()
        .map(|w| (w[1] - w[0]).abs())
        .collect())
}

/// Candidate indices where the SWE overlay visibly changed.
pub fn detect_overlay_updates(sequence: &ImageSequence, swe_box: &RegionSpec) -> Result<Vec<usize>> {
    let changes = overlay_changes(sequence, swe_box)?;
    let peaks = detect_peaks(changes.view());
    debug!(candidates = peaks.len(), "Detected overlay updates");
    Ok(peaks)
}

/// Arithmetic frame sequence anchored on the first overlay update.
///
/// The anchor is the first peak when it falls before `step`, otherwise
/// `step + 1`. An anchor past the end of the clip is pulled back to the
/// last frame so the result is never empty.
pub fn select_indices(frame_count: usize, peaks: &[usize], step: usize) -> Result<FrameIndexSet> {
    if frame_count == 0 {
        return Err(SweError::EmptySequence);
    }
    let step = step.max(1);
    let anchor = match peaks.first() {
        Some(&first) if first < step => first,
        _ => {
            warn!(step, "No early overlay update detected, using fallback anchor");
            step.saturating_add(1)
        }
    };
    let anchor = anchor.min(frame_count - 1);
    let indices: Vec<usize> = (anchor..frame_count).step_by(step).collect();
    FrameIndexSet::new(indices, frame_count)
}

/// Pick the frames that carry fresh SWE data.
pub fn resample(
    sequence: &ImageSequence,
    swe_box: &RegionSpec,
    source_fhz: f64,
    target_fhz: f64,
) -> Result<FrameIndexSet> {
    let step = frame_step(source_fhz, target_fhz)?;
    let peaks = detect_overlay_updates(sequence, swe_box)?;
    let indices = select_indices(sequence.frame_count(), &peaks, step)?;
    info!(
        step,
        anchor = indices.as_slice()[0],
        kept = indices.len(),
        total = sequence.frame_count(),
        "Resampled SWE frames"
    );
    Ok(indices)
}
