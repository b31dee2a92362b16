use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use swe_core::consts::DEFAULT_ROI_OFFSET;
use swe_core::io::scan::open_scan;
use swe_core::metadata::extract_geometry;
use swe_core::region::RegionSpec;

#[derive(Args)]
pub struct InfoArgs {
    /// Scan directory (header.toml + frame images)
    pub scan: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let scan = open_scan(&args.scan)
        .with_context(|| format!("Failed to open {}", args.scan.display()))?;
    let info = scan.info();

    println!("Scan:        {}", scan.path.display());
    if let Some(ref patient) = info.patient {
        println!("Patient:     {}", patient);
    }
    println!("Acquired:    {}", info.acquired);
    println!("Frames:      {}", info.frames);
    println!("Dimensions:  {}x{}", info.columns, info.rows);
    println!("Compressed:  {}", info.compressed);
    println!("Frame rate:  {} Hz", info.frame_rate);

    match extract_geometry(&scan.header, DEFAULT_ROI_OFFSET) {
        Ok(geometry) => {
            println!("Top FOV:     {}", describe(&geometry.top_fov));
            println!("SWE box:     {}", describe(&geometry.swe_box));
            println!("Bottom FOV:  {}", describe(&geometry.bottom_fov));
        }
        Err(e) => println!("Regions:     {e}"),
    }

    Ok(())
}

fn describe(region: &RegionSpec) -> String {
    region
        .points()
        .iter()
        .map(|p| format!("({}, {})", p.x(), p.y()))
        .collect::<Vec<_>>()
        .join(" - ")
}
