pub mod analyse;
pub mod batch;
pub mod clear;
pub mod config;
pub mod export;
pub mod info;
pub mod resample;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use swe_core::calibration::CalibrationSource;
use swe_core::consts::PALETTE_FILE_NAME;
use swe_core::io::settings::SessionSettings;
use swe_core::pipeline::config::AnalysisConfig;
use swe_core::region::{Point, RegionSpec};
use swe_core::units::SweVariable;

#[derive(Clone, Copy, ValueEnum)]
pub enum VariableArg {
    #[value(name = "velocity")]
    Velocity,
    #[value(name = "shear_m")]
    ShearM,
    #[value(name = "youngs_m")]
    YoungsM,
}

impl From<VariableArg> for SweVariable {
    fn from(arg: VariableArg) -> Self {
        match arg {
            VariableArg::Velocity => SweVariable::Velocity,
            VariableArg::ShearM => SweVariable::ShearModulus,
            VariableArg::YoungsM => SweVariable::YoungsModulus,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CalibrationArg {
    Local,
    External,
}

impl From<CalibrationArg> for CalibrationSource {
    fn from(arg: CalibrationArg) -> Self {
        match arg {
            CalibrationArg::Local => CalibrationSource::Local,
            CalibrationArg::External => CalibrationSource::External,
        }
    }
}

/// Analysis options shared by `analyse` and `batch`.
#[derive(Args)]
pub struct AnalysisOpts {
    /// Analysis config file (TOML); flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// SWE overlay refresh rate in Hz
    #[arg(long)]
    pub swe_fhz: Option<f64>,

    /// Value at the top of the colour bar
    #[arg(long)]
    pub max_scale: Option<f64>,

    /// Variable the colour bar is labelled in
    #[arg(long, value_enum)]
    pub variable: Option<VariableArg>,

    /// Colour ramp source
    #[arg(long, value_enum)]
    pub calibration: Option<CalibrationArg>,

    /// External palette file (r,g,b rows in [0, 1])
    #[arg(long)]
    pub palette: Option<PathBuf>,

    /// Interpolate the colour ramp to this many colours
    #[arg(long)]
    pub stretch: Option<usize>,

    /// Saturation level in percent of the max scale
    #[arg(long)]
    pub saturation: Option<f64>,

    /// Region as "x,y;x,y[;x,y...]": 2 points for a rectangle, 3+ for a polygon
    #[arg(long)]
    pub roi: Option<String>,

    /// Directory for cached results and session settings
    #[arg(long, default_value = ".swequant")]
    pub cache_dir: PathBuf,

    /// Directory for CSV exports (defaults to each scan's directory)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

impl AnalysisOpts {
    /// Start from the config file (or remembered settings), then apply flags.
    pub fn build_config(&self, settings: &SessionSettings) -> Result<AnalysisConfig> {
        let mut config = if let Some(ref path) = self.config {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            AnalysisConfig::from_toml(&text).context("Invalid analysis config")?
        } else {
            let mut config = AnalysisConfig::default();
            if let Some(fhz) = settings.swe_fhz {
                config.swe_fhz = fhz;
            }
            if let Some(scale) = settings.max_scale {
                config.max_scale = scale;
            }
            if let Some(variable) = settings.variable {
                config.variable = variable;
            }
            if let Some(ref source) = settings.calibration_source {
                config.calibration.source = source.clone();
            }
            if let Some(sat) = settings.saturation_percent {
                config.saturation_percent = sat;
            }
            config
        };

        if let Some(fhz) = self.swe_fhz {
            config.swe_fhz = fhz;
        }
        if let Some(scale) = self.max_scale {
            config.max_scale = scale;
        }
        if let Some(variable) = self.variable {
            config.variable = variable.into();
        }
        if let Some(source) = self.calibration {
            config.calibration.source = source.into();
        }
        if let Some(ref palette) = self.palette {
            config.calibration.palette = Some(palette.clone());
        }
        if let Some(n) = self.stretch {
            config.calibration.stretch = Some(n);
        }
        if let Some(sat) = self.saturation {
            config.saturation_percent = sat;
        }
        if let Some(ref roi) = self.roi {
            config.roi = Some(parse_roi(roi)?);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.cache_dir.join("settings.toml")
    }

    /// Where the CSV export of `scan` goes.
    pub fn csv_path(&self, scan: &Path, name: &str) -> PathBuf {
        let dir = self
            .output_dir
            .clone()
            .or_else(|| scan.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        dir.join(format!("{name}.csv"))
    }
}

/// Remember the parameters of a successful run.
pub fn remember(settings: &mut SessionSettings, scan: &Path, config: &AnalysisConfig) {
    let path = scan.canonicalize().unwrap_or_else(|_| scan.to_path_buf());
    settings.add_recent(&path);
    settings.swe_fhz = Some(config.swe_fhz);
    settings.max_scale = Some(config.max_scale);
    settings.variable = Some(config.variable);
    settings.calibration_source = Some(config.calibration.source.clone());
    settings.saturation_percent = Some(config.saturation_percent);
}

/// Parse "x,y;x,y;..." into a region.
pub fn parse_roi(text: &str) -> Result<RegionSpec> {
    let mut points = Vec::new();
    for pair in text.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let coords: Vec<i64> = pair
            .split(',')
            .map(|s| s.trim().parse::<i64>())
            .collect::<std::result::Result<_, _>>()
            .with_context(|| format!("Invalid ROI point '{pair}'"))?;
        if coords.len() != 2 {
            bail!("ROI point '{pair}' must be 'x,y'");
        }
        points.push(Point(coords[0], coords[1]));
    }
    Ok(RegionSpec::from_points(points)?)
}

/// Bundled palette copied next to the binary by the build script.
pub fn default_palette() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let path = exe.parent()?.join("data").join(PALETTE_FILE_NAME);
    path.exists().then_some(path)
}
