use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use swe_core::io::results::{export_stats_csv, save_result};
use swe_core::io::scan::open_scan;
use swe_core::io::settings::SessionSettings;
use swe_core::pipeline::{run_analysis_reported, AnalysisStage, ProgressReporter};

use super::{default_palette, remember, AnalysisOpts};
use crate::summary::print_analysis_summary;

#[derive(Args)]
pub struct AnalyseArgs {
    /// Scan directory (header.toml + frame images)
    pub scan: PathBuf,

    #[command(flatten)]
    pub opts: AnalysisOpts,
}

/// Shows the current stage as a spinner message.
struct SpinnerReporter {
    pb: ProgressBar,
}

impl ProgressReporter for SpinnerReporter {
    fn begin_stage(&self, stage: AnalysisStage) {
        self.pb.set_message(stage.to_string());
    }

    fn finish_stage(&self) {
        self.pb.tick();
    }
}

pub fn run(args: &AnalyseArgs) -> Result<()> {
    let settings_path = args.opts.settings_path();
    let mut settings = SessionSettings::load(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    let config = args.opts.build_config(&settings)?;

    let scan = open_scan(&args.scan)
        .with_context(|| format!("Failed to open {}", args.scan.display()))?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    let reporter = Arc::new(SpinnerReporter { pb: pb.clone() });

    let palette = default_palette();
    let result = run_analysis_reported(&scan, &config, palette.as_deref(), reporter)
        .with_context(|| format!("Analysis of {} failed", args.scan.display()))?;
    pb.finish_and_clear();

    print_analysis_summary(&args.scan, &config, &result);

    let cached = save_result(&args.opts.cache_dir, &result)
        .context("Failed to cache result")?;
    let csv = args.opts.csv_path(&args.scan, &result.file.name);
    export_stats_csv(&result, &csv)
        .with_context(|| format!("Failed to write {}", csv.display()))?;

    remember(&mut settings, &args.scan, &config);
    settings
        .save(&settings_path)
        .with_context(|| format!("Failed to write {}", settings_path.display()))?;

    println!("Result cached in {}", cached.display());
    println!("Stats saved to {}", csv.display());
    Ok(())
}
