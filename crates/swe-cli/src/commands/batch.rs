use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use swe_core::io::results::{export_stats_csv, save_result};
use swe_core::io::scan::open_scan;
use swe_core::io::settings::SessionSettings;
use swe_core::pipeline::run_batch;
use swe_core::region::RegionSpec;
use tracing::debug;

use super::{default_palette, remember, AnalysisOpts};

#[derive(Args)]
pub struct BatchArgs {
    /// Scan directories, analysed in the given order
    #[arg(required = true)]
    pub scans: Vec<PathBuf>,

    #[command(flatten)]
    pub opts: AnalysisOpts,
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let settings_path = args.opts.settings_path();
    let mut settings = SessionSettings::load(&settings_path)
        .with_context(|| format!("Failed to read {}", settings_path.display()))?;
    let config = args.opts.build_config(&settings)?;

    println!("Analysing {} scan(s)", args.scans.len());

    let pb = ProgressBar::new(args.scans.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:24} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );

    let palette = default_palette();
    let scans = args.scans.iter().map(|path| {
        pb.set_message(path.display().to_string());
        open_scan(path)
    });

    let mut first_roi: Option<RegionSpec> = None;
    let mut written = Vec::new();
    let done = run_batch(scans, &config, palette.as_deref(), |scan, result| {
        if first_roi.is_none() {
            first_roi = Some(result.roi_coords.clone());
        }
        save_result(&args.opts.cache_dir, result)?;
        let csv = args.opts.csv_path(&scan.path, &result.file.name);
        export_stats_csv(result, &csv)?;
        debug!(scan = %scan.path.display(), csv = %csv.display(), "Batch item written");
        written.push(csv);
        pb.inc(1);
        Ok(())
    })
    .context("Batch analysis failed")?;
    pb.finish_with_message("Done");

    for scan in &args.scans[..done] {
        remember(&mut settings, scan, &config);
    }
    if let Some(roi) = first_roi {
        settings.roi = Some(roi);
    }
    settings
        .save(&settings_path)
        .with_context(|| format!("Failed to write {}", settings_path.display()))?;

    println!();
    for csv in &written {
        println!("  {}", csv.display());
    }
    println!("\n{done} scan(s) analysed, results cached in {}", args.opts.cache_dir.display());
    Ok(())
}
