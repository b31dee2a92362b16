use ndarray::{Array3, Array4, ArrayView3, ArrayView4, Axis};
use serde::{Deserialize, Serialize};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, SweError};

/// Decoded scan video: 8-bit RGB frames sharing the same dimensions.
///
/// Pixel data, shape = (frames, height, width, 3).
#[derive(Clone, Debug)]
pub struct ImageSequence {
    data: Array4<u8>,
}

impl ImageSequence {
    pub fn new(data: Array4<u8>) -> Result<Self> {
        let (n, _, _, c) = data.dim();
        if c != COLOR_CHANNEL_COUNT {
            return Err(SweError::ShapeMismatch(format!(
                "expected {COLOR_CHANNEL_COUNT} colour channels, got {c}"
            )));
        }
        if n == 0 {
            return Err(SweError::EmptySequence);
        }
        Ok(Self { data })
    }

    /// Stack individual (height, width, 3) frames into a sequence.
    pub fn from_frames(frames: &[Array3<u8>]) -> Result<Self> {
        let first = frames.first().ok_or(SweError::EmptySequence)?;
        let dim = first.dim();
        for (i, frame) in frames.iter().enumerate() {
            if frame.dim() != dim {
                return Err(SweError::ShapeMismatch(format!(
                    "frame {i} is {:?}, expected {:?}",
                    frame.dim(),
                    dim
                )));
            }
        }
        let views: Vec<ArrayView3<u8>> = frames.iter().map(|f| f.view()).collect();
        let data = ndarray::stack(Axis(0), &views)
            .map_err(|e| SweError::ShapeMismatch(e.to_string()))?;
        Self::new(data)
    }

    pub fn frame_count(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn height(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    pub fn width(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    pub fn frame(&self, index: usize) -> ArrayView3<'_, u8> {
        self.data.index_axis(Axis(0), index)
    }

    pub fn view(&self) -> ArrayView4<'_, u8> {
        self.data.view()
    }

    /// Keep only the frames listed in `indices`, in order.
    pub fn select(&self, indices: &FrameIndexSet) -> ImageSequence {
        ImageSequence {
            data: self.data.select(Axis(0), indices.as_slice()),
        }
    }
}

/// Strictly increasing, non-empty list of frame indices into an [`ImageSequence`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FrameIndexSet(Vec<usize>);

impl FrameIndexSet {
    pub fn new(indices: Vec<usize>, frame_count: usize) -> Result<Self> {
        if indices.is_empty() {
            return Err(SweError::EmptySequence);
        }
        if indices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SweError::ShapeMismatch(
                "frame indices must be strictly increasing".into(),
            ));
        }
        if let Some(&last) = indices.last() {
            if last >= frame_count {
                return Err(SweError::ShapeMismatch(format!(
                    "frame index {last} out of range (total: {frame_count})"
                )));
            }
        }
        Ok(Self(indices))
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Bounding box of one ultrasound region as written in the scan header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UltrasoundRegion {
    pub min_x0: i64,
    pub min_y0: i64,
    pub max_x1: i64,
    pub max_y1: i64,
}

/// Scalar header fields handed over by the decoding collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScanHeader {
    /// Recommended display frame rate of the source video (Hz).
    pub frame_rate: f64,
    /// Pixel data went through lossy compression and was colour-converted upstream.
    #[serde(default)]
    pub lossy_compression: bool,
    #[serde(default)]
    pub patient_name: Option<String>,
    /// Acquisition date-time as `YYYYMMDDhhmmss`.
    #[serde(default)]
    pub acquisition_datetime: Option<String>,
    /// Ultrasound regions in device order: top FOV, SWE box, bottom FOV.
    #[serde(default)]
    pub regions: Vec<UltrasoundRegion>,
}
