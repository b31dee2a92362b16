use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use swe_core::io::results::{export_stats_csv, load_result};

#[derive(Args)]
pub struct ExportArgs {
    /// Cached result file (JSON)
    pub result: PathBuf,

    /// Output CSV path (defaults to <name>.csv next to the analysed scan)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ExportArgs) -> Result<()> {
    let result = load_result(&args.result)
        .with_context(|| format!("Failed to load {}", args.result.display()))?;
    let out = args
        .output
        .clone()
        .unwrap_or_else(|| result.file.parent.join(format!("{}.csv", result.file.name)));
    export_stats_csv(&result, &out)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Exported {} frames to {}", result.frame_count(), out.display());
    Ok(())
}
