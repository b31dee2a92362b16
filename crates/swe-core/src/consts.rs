/// Cumulative channel divergence above which a pixel counts as colour-coded.
pub const DEFAULT_VOID_THRESHOLD: u16 = 150;

/// Largest possible cumulative divergence: |R-G| + |R-B| + |G-B| with 8-bit channels.
pub const MAX_CHANNEL_DIVERGENCE: u16 = 3 * 255;

/// Percentage of the maximum scale above which a pixel is flagged as saturated.
pub const DEFAULT_SATURATION_PERCENT: f64 = 98.0;

/// Tissue density in kg/m³ (skeletal muscle).
pub const DEFAULT_TISSUE_DENSITY: f64 = 1000.0;

/// Decimal places kept by unit conversions.
pub const DEFAULT_DECIMALS: u32 = 4;

/// Inward offset (pixels) applied to header regions to skip their border.
pub const DEFAULT_ROI_OFFSET: u32 = 5;

/// Number of ultrasound regions emitted by the device: top FOV, SWE box, bottom FOV.
pub const EXPECTED_REGION_COUNT: usize = 3;

/// Calibration strip printed by the device next to the image, as
/// `(x0, y0, x1, y1)` in pixels, half-open.
pub const DEFAULT_CALIBRATION_STRIP: (u32, u32, u32, u32) = (693, 70, 701, 180);

/// Default SWE overlay refresh rate (Hz) requested for resampling.
pub const DEFAULT_SWE_FHZ: f64 = 1.0;

/// Number of channels in a colour frame (R, G, B).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Number of pixels matched per broadcast block in nearest-colour lookup.
/// Bounds the temporary (pixels, N) distance matrix.
pub const MATCH_BLOCK_PIXELS: usize = 4096;

/// Minimum pixel count (frames * pixels) to spread matching blocks over Rayon.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Consecutive frames averaged by the steadiest-window summary.
pub const STEADY_WINDOW_FRAMES: usize = 5;

/// Maximum number of entries kept in the recent-files list.
pub const MAX_RECENT_PATHS: usize = 10;

/// File name of the bundled external palette.
pub const PALETTE_FILE_NAME: &str = "colormap.csv";

/// Scan header file inside a scan directory.
pub const SCAN_HEADER_FILE: &str = "header.toml";
