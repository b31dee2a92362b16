use serde::Serialize;
use tracing::info;

use crate::consts::EXPECTED_REGION_COUNT;
use crate::error::{Result, SweError};
use crate::frame::{ScanHeader, UltrasoundRegion};
use crate::region::{Point, RegionSpec};

/// The three device regions of an SWE scan, shrunk inward to skip their borders.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScanGeometry {
    pub top_fov: RegionSpec,
    pub swe_box: RegionSpec,
    pub bottom_fov: RegionSpec,
    /// Source video frame rate (Hz).
    pub frame_rate: f64,
}

/// Rectangle covering `region`, shrunk by `offset` pixels on every side.
pub fn region_rect(region: &UltrasoundRegion, offset: u32) -> RegionSpec {
    let offset = offset as i64;
    RegionSpec::rectangle(
        Point(region.min_x0 + offset, region.min_y0 + offset),
        Point(region.max_x1 - offset, region.max_y1 - offset),
    )
}

/// Read the top FOV, SWE box and bottom FOV rectangles plus the frame rate.
///
/// Fails with [`SweError::MissingRegion`] when the header lists fewer than
/// three regions, which means the scan carries no elastography overlay.
pub fn extract_geometry(header: &ScanHeader, offset: u32) -> Result<ScanGeometry> {
    let regions = &header.regions;
    if regions.len() < EXPECTED_REGION_COUNT {
        return Err(SweError::MissingRegion {
            found: regions.len(),
        });
    }

    let geometry = ScanGeometry {
        top_fov: region_rect(&regions[0], offset),
        swe_box: region_rect(&regions[1], offset),
        bottom_fov: region_rect(&regions[2], offset),
        frame_rate: header.frame_rate,
    };
    info!(
        frame_rate = geometry.frame_rate,
        swe_box = ?geometry.swe_box.points(),
        "Read scan geometry"
    );
    Ok(geometry)
}

/// `yes`/`no` compression status shown in scan info.
pub fn compression_status(header: &ScanHeader) -> &'static str {
    if header.lossy_compression {
        "yes"
    } else {
        "no"
    }
}

/// Format a `YYYYMMDDhhmmss` acquisition stamp as `dd/mm/yyyy hh:mm:ss`.
pub fn format_acquisition_datetime(header: &ScanHeader) -> String {
    let Some(stamp) = header.acquisition_datetime.as_deref() else {
        return "(missing)".to_string();
    };
    if stamp.len() < 14 || !stamp.is_ascii() {
        return stamp.to_string();
    }
    let part = |a: usize, b: usize| &stamp[a..b];
    format!(
        "{}/{}/{} {}:{}:{}",
        part(6, 8),
        part(4, 6),
        part(0, 4),
        part(8, 10),
        part(10, 12),
        part(12, 14)
    )
}
