use ndarray::{Array1, Array3, ArrayView4};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, SweError};

/// Image coordinate as `(x, y)`: x is the column, y the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point(pub i64, pub i64);

impl Point {
    pub fn x(&self) -> i64 {
        self.0
    }

    pub fn y(&self) -> i64 {
        self.1
    }
}

/// Shape tag stored alongside analysis results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoiShape {
    Rectangle,
    Polygon,
}

impl std::fmt::Display for RoiShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rectangle => write!(f, "rectangle"),
            Self::Polygon => write!(f, "polygon"),
        }
    }
}

/// User-selected region of interest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum RegionSpec {
    /// Axis-aligned rectangle, half-open: `[x0, x1) x [y0, y1)`.
    Rectangle { top_left: Point, bottom_right: Point },
    /// Simple polygon with at least 3 vertices.
    Polygon { vertices: Vec<Point> },
}

impl RegionSpec {
    pub fn rectangle(top_left: Point, bottom_right: Point) -> Self {
        Self::Rectangle {
            top_left,
            bottom_right,
        }
    }

    pub fn polygon(vertices: Vec<Point>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(SweError::ShapeMismatch(format!(
                "a polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        Ok(Self::Polygon { vertices })
    }

    /// Build a region from a bare point list: 2 points are a rectangle,
    /// 3 or more a polygon.
    pub fn from_points(points: Vec<Point>) -> Result<Self> {
        match points.len() {
            0 | 1 => Err(SweError::ShapeMismatch(format!(
                "a region needs at least 2 points, got {}",
                points.len()
            ))),
            2 => Ok(Self::rectangle(points[0], points[1])),
            _ => Self::polygon(points),
        }
    }

    pub fn shape(&self) -> RoiShape {
        match self {
            Self::Rectangle { .. } => RoiShape::Rectangle,
            Self::Polygon { .. } => RoiShape::Polygon,
        }
    }

    /// Points as given by the user (2 for a rectangle).
    pub fn points(&self) -> Vec<Point> {
        match self {
            Self::Rectangle {
                top_left,
                bottom_right,
            } => vec![*top_left, *bottom_right],
            Self::Polygon { vertices } => vertices.clone(),
        }
    }

    /// Vertex list used for rasterisation. A rectangle expands to its 4 corners.
    pub fn vertices(&self) -> Vec<Point> {
        match self {
            Self::Rectangle {
                top_left: Point(x0, y0),
                bottom_right: Point(x1, y1),
            } => vec![
                Point(*x0, *y0),
                Point(*x1, *y0),
                Point(*x1, *y1),
                Point(*x0, *y1),
            ],
            Self::Polygon { vertices } => vertices.clone(),
        }
    }
}

/// Rasterise a region into `(row, col)` pixel coordinates, clipped to the image.
///
/// Scanline even-odd fill: for each row `y`, edges crossing the scanline
/// (lower end inclusive, upper end exclusive) give x-intersections; pixels
/// with `x` in `[x_a, x_b)` between successive pairs are inside. Output is
/// row-major, so a rectangle yields the same pixels, in the same order, as
/// slicing `[y0..y1, x0..x1]`.
pub fn rasterize(spec: &RegionSpec, height: usize, width: usize) -> Vec<(usize, usize)> {
    let vertices = spec.vertices();
    let n = vertices.len();
    if n < 3 || height == 0 || width == 0 {
        return Vec::new();
    }

    let min_y = vertices.iter().map(Point::y).min().unwrap_or(0).max(0);
    let max_y = vertices
        .iter()
        .map(Point::y)
        .max()
        .unwrap_or(0)
        .min(height as i64);

    let mut pixels = Vec::new();
    let mut crossings: Vec<f64> = Vec::with_capacity(n);

    for y in min_y..max_y {
        crossings.clear();
        let yf = y as f64;
        for i in 0..n {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            let (lo, hi) = if a.y() <= b.y() { (a, b) } else { (b, a) };
            if lo.y() == hi.y() || y < lo.y() || y >= hi.y() {
                continue;
            }
            let t = (yf - lo.y() as f64) / (hi.y() - lo.y()) as f64;
            crossings.push(lo.x() as f64 + t * (hi.x() - lo.x()) as f64);
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for pair in crossings.chunks_exact(2) {
            let start = (pair[0].ceil() as i64).max(0);
            let stop = (pair[1].ceil() as i64).min(width as i64);
            for x in start..stop {
                pixels.push((y as usize, x as usize));
            }
        }
    }

    pixels
}

/// Gather the RGB values of every frame at the region's pixels.
///
/// Returns an array of shape (frames, pixels, 3).
pub fn extract_region(frames: ArrayView4<u8>, spec: &RegionSpec) -> Result<Array3<u8>> {
    let (n, h, w, c) = frames.dim();
    if c != COLOR_CHANNEL_COUNT {
        return Err(SweError::ShapeMismatch(format!(
            "expected {COLOR_CHANNEL_COUNT} colour channels, got {c}"
        )));
    }
    let coords = rasterize(spec, h, w);
    debug!(shape = %spec.shape(), pixels = coords.len(), "Rasterised region");

    let mut out = Array3::<u8>::zeros((n, coords.len(), COLOR_CHANNEL_COUNT));
    for (frame, mut dst) in frames.outer_iter().zip(out.outer_iter_mut()) {
        for (p, &(row, col)) in coords.iter().enumerate() {
            for ch in 0..COLOR_CHANNEL_COUNT {
                dst[[p, ch]] = frame[[row, col, ch]];
            }
        }
    }
    Ok(out)
}

/// Mean over pixels and channels of each frame's region: one value per frame.
pub fn mean_intensity(region: &Array3<u8>) -> Array1<f64> {
    region
        .outer_iter()
        .map(|frame| {
            if frame.is_empty() {
                f64::NAN
            } else {
                frame.iter().map(|&v| v as f64).sum::<f64>() / frame.len() as f64
            }
        })
        .collect()
}
