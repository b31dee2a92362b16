use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2, ArrayView3};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calibration::ColourScale;
use crate::consts::STEADY_WINDOW_FRAMES;
use crate::error::{Result, SweError};
use crate::filter::{apply_mask, chromatic_mask, pixel_percent, saturation_mask, void_mask};
use crate::io::results::{nan_matrix_map, roi_points, StatTable};
use crate::matcher::map_to_values;
use crate::region::{RegionSpec, RoiShape};
use crate::stats::{
    frame_mean, frame_median, frame_std, nan_mean, nan_median, nan_std, per_frame,
    steadiest_window,
};
use crate::units::{convert_array, ConversionParams, SweVariable};

pub const VOID_KEY: &str = "%_void";
pub const SATURATED_KEY: &str = "%_saturated";

/// Name of a per-variable stat column, e.g. `youngs_m_median`.
pub fn stat_key(variable: SweVariable, stat: &str) -> String {
    format!("{}_{}", variable.key(), stat)
}

/// Analysed file: name and parent directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileIdentity {
    pub name: String,
    pub parent: PathBuf,
}

impl FileIdentity {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_stem()
            .or_else(|| path.file_name())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self { name, parent }
    }
}

/// Thresholds and physics applied while turning region pixels into values.
#[derive(Clone, Debug, PartialEq)]
pub struct QuantifyParams {
    /// Variable the colour scale is labelled in.
    pub variable: SweVariable,
    pub void_threshold: Option<u16>,
    pub saturation_percent: f64,
    pub conversion: ConversionParams,
}

/// Per-variable value arrays and per-frame statistics of one region.
#[derive(Clone, Debug)]
pub struct Measurements {
    pub raw: BTreeMap<SweVariable, Array2<f64>>,
    pub stats: StatTable,
}

/// Map, filter and summarise the (frames, pixels, 3) RGB values of a region.
///
/// Fails with [`SweError::EmptyData`] when every frame is entirely void.
pub fn quantify(
    pixels: ArrayView3<u8>,
    scale: &ColourScale,
    params: &QuantifyParams,
) -> Result<Measurements> {
    let (frames, count, _) = pixels.dim();
    if frames == 0 || count == 0 {
        return Err(SweError::EmptyData);
    }

    let keep = chromatic_mask(pixels, params.void_threshold);
    let mapped = map_to_values(pixels, scale)?;
    let filtered = apply_mask(&mapped, &keep);

    let saturated = pixel_percent(
        saturation_mask(&filtered, scale.max_scale(), params.saturation_percent).view(),
    );
    let void = pixel_percent(void_mask(&filtered).view());
    if void.iter().all(|&v| v >= 100.0) {
        return Err(SweError::EmptyData);
    }
    info!(
        frames,
        pixels = count,
        mean_void = nan_mean(void.iter()),
        mean_saturated = nan_mean(saturated.iter()),
        "Quantified region"
    );

    let mut raw = BTreeMap::new();
    let mut stats = StatTable::default();
    stats.insert(VOID_KEY, void);
    stats.insert(SATURATED_KEY, saturated);

    for variable in SweVariable::ALL {
        let values = if variable == params.variable {
            filtered.clone()
        } else {
            convert_array(&filtered, params.variable, variable, &params.conversion)?
        };
        stats.insert(stat_key(variable, "median"), per_frame(&values, frame_median));
        stats.insert(stat_key(variable, "mean"), per_frame(&values, frame_mean));
        stats.insert(stat_key(variable, "SD"), per_frame(&values, frame_std));
        raw.insert(variable, values);
    }

    Ok(Measurements { raw, stats })
}

/// Whole-clip summary of one variable.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipSummary {
    pub variable: SweVariable,
    pub median: f64,
    pub mean: f64,
    pub sd: f64,
    /// Mean of the steadiest run of per-frame means.
    pub steady_mean: f64,
    /// Frames contributing to `steady_mean`.
    pub steady_frames: Vec<bool>,
}

/// Result of one analysis, handed to persistence and export.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub file: FileIdentity,
    #[serde(with = "roi_points")]
    pub roi_coords: RegionSpec,
    pub roi_shape: RoiShape,
    #[serde(with = "nan_matrix_map")]
    pub raw: BTreeMap<SweVariable, Array2<f64>>,
    pub stats: StatTable,
}

impl AnalysisResult {
    pub fn new(file: FileIdentity, roi: RegionSpec, measurements: Measurements) -> Self {
        Self {
            file,
            roi_shape: roi.shape(),
            roi_coords: roi,
            raw: measurements.raw,
            stats: measurements.stats,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.stats.frame_count()
    }

    pub fn void_percent(&self) -> Option<&Array1<f64>> {
        self.stats.get(VOID_KEY)
    }

    pub fn summary(&self, variable: SweVariable) -> Option<ClipSummary> {
        let values = self.raw.get(&variable)?;
        let frame_means = per_frame(values, frame_mean);
        let (steady_mean, steady_frames) =
            steadiest_window(frame_means.view(), STEADY_WINDOW_FRAMES)?;
        Some(ClipSummary {
            variable,
            median: nan_median(values.iter()),
            mean: nan_mean(values.iter()),
            sd: nan_std(values.iter()),
            steady_mean,
            steady_frames,
        })
    }
}
