use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::analysis::{quantify, AnalysisResult, FileIdentity};
use crate::calibration::calibrate;
use crate::error::Result;
use crate::frame::{FrameIndexSet, ImageSequence, ScanHeader};
use crate::io::scan::Scan;
use crate::metadata::{extract_geometry, ScanGeometry};
use crate::region::extract_region;
use crate::resample::resample;

use super::config::AnalysisConfig;
use super::types::{AnalysisStage, NoOpReporter, ProgressReporter};

/// Frames of a scan selected for analysis.
#[derive(Clone, Debug)]
pub struct ResampledScan {
    pub geometry: ScanGeometry,
    pub indices: FrameIndexSet,
    pub frames: ImageSequence,
}

/// Read geometry and keep only the frames carrying fresh SWE data.
pub fn resample_scan(
    sequence: &ImageSequence,
    header: &ScanHeader,
    config: &AnalysisConfig,
) -> Result<ResampledScan> {
    let geometry = extract_geometry(header, config.roi_offset)?;
    let indices = resample(sequence, &geometry.swe_box, geometry.frame_rate, config.swe_fhz)?;
    let frames = sequence.select(&indices);
    Ok(ResampledScan {
        geometry,
        indices,
        frames,
    })
}

/// Run one analysis with a thread-safe progress reporter.
///
/// `default_palette` backs external calibration when the config names no
/// palette file.
pub fn run_analysis_reported(
    scan: &Scan,
    config: &AnalysisConfig,
    default_palette: Option<&Path>,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<AnalysisResult> {
    config.validate()?;

    reporter.begin_stage(AnalysisStage::ReadingGeometry);
    let geometry = extract_geometry(&scan.header, config.roi_offset)?;
    reporter.finish_stage();

    reporter.begin_stage(AnalysisStage::Resampling);
    let indices = resample(
        &scan.sequence,
        &geometry.swe_box,
        geometry.frame_rate,
        config.swe_fhz,
    )?;
    let frames = scan.sequence.select(&indices);
    reporter.finish_stage();

    reporter.begin_stage(AnalysisStage::ExtractingRegion);
    let roi = config.roi.clone().unwrap_or_else(|| geometry.swe_box.clone());
    let pixels = extract_region(frames.view(), &roi)?;
    reporter.finish_stage();

    // The device colour bar is read from the first frame of the full clip.
    reporter.begin_stage(AnalysisStage::Calibrating);
    let scale = calibrate(
        &scan.sequence,
        &config.calibration,
        config.max_scale,
        default_palette,
    )?;
    reporter.finish_stage();

    reporter.begin_stage(AnalysisStage::Quantifying);
    let measurements = quantify(pixels.view(), &scale, &config.quantify_params())?;
    reporter.finish_stage();

    let result = AnalysisResult::new(FileIdentity::from_path(&scan.path), roi, measurements);
    info!(
        file = %result.file.name,
        frames = result.frame_count(),
        shape = %result.roi_shape,
        "Analysis complete"
    );
    Ok(result)
}

/// Run one analysis without progress reporting.
pub fn run_analysis(
    scan: &Scan,
    config: &AnalysisConfig,
    default_palette: Option<&Path>,
) -> Result<AnalysisResult> {
    run_analysis_reported(scan, config, default_palette, Arc::new(NoOpReporter))
}

/// Analyse scans one after another. The region used for the first scan is
/// the starting region of every following scan.
///
/// `on_result` runs after each scan, before the next one starts, so callers
/// can persist results in order. The first error stops the batch.
pub fn run_batch<F>(
    scans: impl IntoIterator<Item = Result<Scan>>,
    config: &AnalysisConfig,
    default_palette: Option<&Path>,
    mut on_result: F,
) -> Result<usize>
where
    F: FnMut(&Scan, &AnalysisResult) -> Result<()>,
{
    let mut config = config.clone();
    let mut done = 0;
    for scan in scans {
        let scan = scan?;
        let result = run_analysis(&scan, &config, default_palette)?;
        if config.roi.is_none() {
            config.roi = Some(result.roi_coords.clone());
        }
        on_result(&scan, &result)?;
        done += 1;
    }
    Ok(done)
}
