use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Scan has {found} ultrasound regions, expected 3: it may not contain SWE data")]
    MissingRegion { found: usize },

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Colour calibration unavailable: {0}")]
    CalibrationUnavailable(String),

    #[error("Invalid unit conversion: {0}")]
    InvalidUnit(String),

    #[error("No elastography data found in the current selection")]
    EmptyData,

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Empty frame sequence")]
    EmptySequence,
}

pub type Result<T> = std::result::Result<T, SweError>;
