use std::path::{Path, PathBuf};

use ndarray::Array3;
use tracing::info;

use crate::consts::{COLOR_CHANNEL_COUNT, SCAN_HEADER_FILE};
use crate::error::{Result, SweError};
use crate::frame::{ImageSequence, ScanHeader};

/// A decoded scan: RGB frames plus header fields.
#[derive(Clone, Debug)]
pub struct Scan {
    pub path: PathBuf,
    pub header: ScanHeader,
    pub sequence: ImageSequence,
}

/// Summary printed by `info`.
#[derive(Clone, Debug)]
pub struct ScanInfo {
    pub frames: usize,
    pub rows: usize,
    pub columns: usize,
    pub compressed: &'static str,
    pub frame_rate: f64,
    pub acquired: String,
    pub patient: Option<String>,
}

impl Scan {
    pub fn info(&self) -> ScanInfo {
        ScanInfo {
            frames: self.sequence.frame_count(),
            rows: self.sequence.height(),
            columns: self.sequence.width(),
            compressed: crate::metadata::compression_status(&self.header),
            frame_rate: self.header.frame_rate,
            acquired: crate::metadata::format_acquisition_datetime(&self.header),
            patient: self.header.patient_name.clone(),
        }
    }
}

pub fn read_header(dir: &Path) -> Result<ScanHeader> {
    let path = dir.join(SCAN_HEADER_FILE);
    let text = std::fs::read_to_string(&path)?;
    toml::from_str(&text).map_err(|e| SweError::Config(format!("{}: {e}", path.display())))
}

/// Frame image files of a scan directory, in name order.
fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            let is_frame = p
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("frame_"));
            let is_image = matches!(
                p.extension().and_then(|e| e.to_str()),
                Some("png" | "tif" | "tiff" | "bmp")
            );
            is_frame && is_image
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// Load an image file as a (height, width, 3) RGB array.
pub fn load_rgb_frame(path: &Path) -> Result<Array3<u8>> {
    let img = image::open(path)?.to_rgb8();
    let (w, h) = img.dimensions();
    Array3::from_shape_vec((h as usize, w as usize, COLOR_CHANNEL_COUNT), img.into_raw())
        .map_err(|e| SweError::ShapeMismatch(e.to_string()))
}

/// Save a (height, width, 3) RGB array as an image; format from the extension.
pub fn save_rgb_frame(frame: &Array3<u8>, path: &Path) -> Result<()> {
    let (h, w, c) = frame.dim();
    if c != COLOR_CHANNEL_COUNT {
        return Err(SweError::ShapeMismatch(format!(
            "expected {COLOR_CHANNEL_COUNT} colour channels, got {c}"
        )));
    }
    let pixels: Vec<u8> = frame.iter().copied().collect();
    let img = image::RgbImage::from_raw(w as u32, h as u32, pixels)
        .ok_or_else(|| SweError::ShapeMismatch("buffer size does not match dimensions".into()))?;
    img.save(path)?;
    Ok(())
}

/// Open a scan directory: `header.toml` plus `frame_*.png` images.
pub fn open_scan(dir: &Path) -> Result<Scan> {
    let header = read_header(dir)?;
    let paths = frame_paths(dir)?;
    if paths.is_empty() {
        return Err(SweError::EmptySequence);
    }
    let frames: Vec<Array3<u8>> = paths
        .iter()
        .map(|p| load_rgb_frame(p))
        .collect::<Result<_>>()?;
    let sequence = ImageSequence::from_frames(&frames)?;
    info!(
        path = %dir.display(),
        frames = sequence.frame_count(),
        width = sequence.width(),
        height = sequence.height(),
        "Loaded scan"
    );
    Ok(Scan {
        path: dir.to_path_buf(),
        header,
        sequence,
    })
}

/// Write a scan directory readable by [`open_scan`].
pub fn write_scan(dir: &Path, header: &ScanHeader, sequence: &ImageSequence) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let text = toml::to_string_pretty(header).map_err(|e| SweError::Config(e.to_string()))?;
    std::fs::write(dir.join(SCAN_HEADER_FILE), text)?;
    for i in 0..sequence.frame_count() {
        let frame = sequence.frame(i).to_owned();
        save_rgb_frame(&frame, &dir.join(format!("frame_{i:04}.png")))?;
    }
    Ok(())
}
