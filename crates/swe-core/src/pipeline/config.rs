use serde::{Deserialize, Serialize};

use crate::analysis::QuantifyParams;
use crate::calibration::CalibrationConfig;
use crate::consts::{
    DEFAULT_DECIMALS, DEFAULT_ROI_OFFSET, DEFAULT_SATURATION_PERCENT, DEFAULT_SWE_FHZ,
    DEFAULT_TISSUE_DENSITY, DEFAULT_VOID_THRESHOLD, MAX_CHANNEL_DIVERGENCE,
};
use crate::error::{Result, SweError};
use crate::region::RegionSpec;
use crate::units::{ConversionParams, SweVariable};

/// Everything one analysis needs besides the scan itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// SWE overlay refresh rate (Hz) used for resampling.
    #[serde(default = "default_swe_fhz")]
    pub swe_fhz: f64,
    /// Value at the top of the device colour bar.
    pub max_scale: f64,
    /// Variable the colour bar is labelled in.
    #[serde(default)]
    pub variable: SweVariable,
    /// Channel divergence above which a pixel is kept (0..=765).
    #[serde(default = "default_void_threshold")]
    pub void_threshold: u16,
    #[serde(default = "default_saturation_percent")]
    pub saturation_percent: f64,
    /// Tissue density (kg/m³).
    #[serde(default = "default_density")]
    pub density: f64,
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    /// Pixels trimmed from each side of the header regions.
    #[serde(default = "default_roi_offset")]
    pub roi_offset: u32,
    /// Region to analyse; the detected SWE box when unset.
    #[serde(default)]
    pub roi: Option<RegionSpec>,
    #[serde(default)]
    pub calibration: CalibrationConfig,
}

fn default_swe_fhz() -> f64 {
    DEFAULT_SWE_FHZ
}
fn default_void_threshold() -> u16 {
    DEFAULT_VOID_THRESHOLD
}
fn default_saturation_percent() -> f64 {
    DEFAULT_SATURATION_PERCENT
}
fn default_density() -> f64 {
    DEFAULT_TISSUE_DENSITY
}
fn default_decimals() -> u32 {
    DEFAULT_DECIMALS
}
fn default_roi_offset() -> u32 {
    DEFAULT_ROI_OFFSET
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            swe_fhz: DEFAULT_SWE_FHZ,
            max_scale: 100.0,
            variable: SweVariable::default(),
            void_threshold: DEFAULT_VOID_THRESHOLD,
            saturation_percent: DEFAULT_SATURATION_PERCENT,
            density: DEFAULT_TISSUE_DENSITY,
            decimals: DEFAULT_DECIMALS,
            roi_offset: DEFAULT_ROI_OFFSET,
            roi: None,
            calibration: CalibrationConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| SweError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SweError::Config(e.to_string()))
    }

    pub fn conversion(&self) -> ConversionParams {
        ConversionParams {
            density: self.density,
            decimals: self.decimals,
        }
    }

    pub fn quantify_params(&self) -> QuantifyParams {
        QuantifyParams {
            variable: self.variable,
            void_threshold: Some(self.void_threshold),
            saturation_percent: self.saturation_percent,
            conversion: self.conversion(),
        }
    }

    /// Reject values no analysis can run with.
    pub fn validate(&self) -> Result<()> {
        if !self.swe_fhz.is_finite() || self.swe_fhz <= 0.0 {
            return Err(SweError::InvalidFrequency(format!(
                "target SWE frequency must be > 0, got {}",
                self.swe_fhz
            )));
        }
        if !self.max_scale.is_finite() || self.max_scale <= 0.0 {
            return Err(SweError::Config(format!(
                "max scale must be > 0, got {}",
                self.max_scale
            )));
        }
        if !self.density.is_finite() || self.density <= 0.0 {
            return Err(SweError::Config(format!(
                "tissue density must be > 0, got {}",
                self.density
            )));
        }
        if self.void_threshold > MAX_CHANNEL_DIVERGENCE {
            return Err(SweError::Config(format!(
                "void threshold must be <= {MAX_CHANNEL_DIVERGENCE}, got {}",
                self.void_threshold
            )));
        }
        if self.calibration.stretch == Some(0) {
            return Err(SweError::Config(
                "palette stretch must be at least 1 colour".into(),
            ));
        }
        Ok(())
    }
}
