use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use swe_core::io::scan::open_scan;
use swe_core::pipeline::config::AnalysisConfig;
use swe_core::pipeline::resample_scan;

#[derive(Args)]
pub struct ResampleArgs {
    /// Scan directory (header.toml + frame images)
    pub scan: PathBuf,

    /// SWE overlay refresh rate in Hz
    #[arg(long, default_value = "1.0")]
    pub swe_fhz: f64,
}

pub fn run(args: &ResampleArgs) -> Result<()> {
    let scan = open_scan(&args.scan)
        .with_context(|| format!("Failed to open {}", args.scan.display()))?;
    let config = AnalysisConfig {
        swe_fhz: args.swe_fhz,
        ..Default::default()
    };
    let resampled = resample_scan(&scan.sequence, &scan.header, &config)?;

    println!(
        "Kept {} of {} frames (source {} Hz, SWE {} Hz)",
        resampled.indices.len(),
        scan.sequence.frame_count(),
        resampled.geometry.frame_rate,
        args.swe_fhz
    );
    let list: Vec<String> = resampled
        .indices
        .as_slice()
        .iter()
        .map(|i| i.to_string())
        .collect();
    println!("Frames: {}", list.join(", "));

    Ok(())
}
