use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::calibration::CalibrationSource;
use crate::consts::MAX_RECENT_PATHS;
use crate::error::{Result, SweError};
use crate::region::RegionSpec;
use crate::units::SweVariable;

/// Parameters remembered between sessions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default)]
    pub recent_paths: Vec<PathBuf>,
    pub swe_fhz: Option<f64>,
    pub max_scale: Option<f64>,
    pub variable: Option<SweVariable>,
    pub calibration_source: Option<CalibrationSource>,
    pub saturation_percent: Option<f64>,
    /// Region used for the first file of the last batch.
    pub roi: Option<RegionSpec>,
}

impl SessionSettings {
    /// Load settings, or defaults when the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| SweError::Config(format!("{}: {e}", path.display())))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let text = toml::to_string_pretty(self).map_err(|e| SweError::Config(e.to_string()))?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Put `path` first in the recent list. Already-known paths are left in place.
    pub fn add_recent(&mut self, path: &Path) {
        if self.recent_paths.iter().any(|p| p == path) {
            return;
        }
        self.recent_paths.insert(0, path.to_path_buf());
        self.recent_paths.truncate(MAX_RECENT_PATHS);
    }

    /// Forget one remembered parameter group, or everything.
    pub fn clear(&mut self, what: Option<SettingKey>) {
        match what {
            None => *self = Self::default(),
            Some(SettingKey::RecentPaths) => self.recent_paths.clear(),
            Some(SettingKey::SweParams) => {
                self.swe_fhz = None;
                self.max_scale = None;
            }
            Some(SettingKey::Variable) => self.variable = None,
            Some(SettingKey::CalibrationSource) => self.calibration_source = None,
            Some(SettingKey::SaturationPercent) => self.saturation_percent = None,
            Some(SettingKey::Roi) => self.roi = None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingKey {
    RecentPaths,
    SweParams,
    Variable,
    CalibrationSource,
    SaturationPercent,
    Roi,
}
