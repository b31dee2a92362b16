use std::path::Path;

use ndarray::Array2;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, SweError};

/// Load a continuous reference palette: one `r,g,b` row of floats in [0, 1]
/// per line, lowest value first. Blank lines and `#` comment lines are skipped.
///
/// A missing file is reported as [`SweError::CalibrationUnavailable`].
pub fn load_palette(path: &Path) -> Result<Array2<f64>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        SweError::CalibrationUnavailable(format!("{}: {e}", path.display()))
    })?;
    parse_palette(&text)
}

/// Parse palette text: comma-separated `r,g,b` rows, `#` comment lines.
pub fn parse_palette(text: &str) -> Result<Array2<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut flat: Vec<f64> = Vec::new();
    let mut rows = 0;
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(rows + 1, |p| p.line() as usize);
        if record.len() != COLOR_CHANNEL_COUNT {
            return Err(SweError::Config(format!(
                "palette line {line}: expected {COLOR_CHANNEL_COUNT} values, got {}",
                record.len()
            )));
        }
        for field in &record {
            let value = field
                .parse::<f64>()
                .map_err(|e| SweError::Config(format!("palette line {line}: {e}")))?;
            flat.push(value);
        }
        rows += 1;
    }
    if rows == 0 {
        return Err(SweError::CalibrationUnavailable("palette is empty".into()));
    }
    Array2::from_shape_vec((rows, COLOR_CHANNEL_COUNT), flat)
        .map_err(|e| SweError::ShapeMismatch(e.to_string()))
}
