use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use swe_core::io::results::clear_cache;
use swe_core::io::settings::{SessionSettings, SettingKey};

#[derive(Clone, Copy, ValueEnum)]
pub enum SettingArg {
    All,
    Recent,
    SweParams,
    Variable,
    Calibration,
    Saturation,
    Roi,
}

impl SettingArg {
    fn key(self) -> Option<SettingKey> {
        match self {
            Self::All => None,
            Self::Recent => Some(SettingKey::RecentPaths),
            Self::SweParams => Some(SettingKey::SweParams),
            Self::Variable => Some(SettingKey::Variable),
            Self::Calibration => Some(SettingKey::CalibrationSource),
            Self::Saturation => Some(SettingKey::SaturationPercent),
            Self::Roi => Some(SettingKey::Roi),
        }
    }
}

#[derive(Args)]
pub struct ClearArgs {
    /// Directory holding cached results and session settings
    #[arg(long, default_value = ".swequant")]
    pub cache_dir: PathBuf,

    /// Forget remembered settings instead of cached results
    #[arg(long, value_enum)]
    pub settings: Option<SettingArg>,
}

pub fn run(args: &ClearArgs) -> Result<()> {
    if let Some(which) = args.settings {
        let path = args.cache_dir.join("settings.toml");
        let mut settings = SessionSettings::load(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        settings.clear(which.key());
        settings
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Settings updated in {}", path.display());
        return Ok(());
    }

    let removed = clear_cache(&args.cache_dir)
        .with_context(|| format!("Failed to clear {}", args.cache_dir.display()))?;
    println!("Removed {removed} cached result(s)");
    Ok(())
}
