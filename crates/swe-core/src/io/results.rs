use std::path::{Path, PathBuf};

use ndarray::Array1;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::info;

use crate::analysis::AnalysisResult;
use crate::error::{Result, SweError};

/// Ordered per-frame statistics: column name -> one value per frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatTable {
    columns: Vec<(String, Array1<f64>)>,
}

impl StatTable {
    /// Insert or replace a column, keeping first-insertion order.
    pub fn insert(&mut self, key: impl Into<String>, values: Array1<f64>) {
        let key = key.into();
        match self.columns.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = values,
            None => self.columns.push((key, values)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Array1<f64>> {
        self.columns.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array1<f64>)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of frames (rows); 0 for an empty table.
    pub fn frame_count(&self) -> usize {
        self.columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0)
    }
}

fn to_nullable(values: &Array1<f64>) -> Vec<Option<f64>> {
    values.iter().map(|v| (!v.is_nan()).then_some(*v)).collect()
}

fn from_nullable(values: Vec<Option<f64>>) -> Array1<f64> {
    values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect()
}

impl Serialize for StatTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (key, values) in &self.columns {
            map.serialize_entry(key, &to_nullable(values))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StatTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = StatTable;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of stat name to per-frame values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<StatTable, A::Error> {
                let mut table = StatTable::default();
                while let Some((key, values)) = access.next_entry::<String, Vec<Option<f64>>>()? {
                    table.insert(key, from_nullable(values));
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Serde adapter storing (frames, pixels) arrays as nested lists, NaN as null.
pub mod nan_matrix_map {
    use std::collections::BTreeMap;

    use ndarray::Array2;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::units::SweVariable;

    type Rows = Vec<Vec<Option<f64>>>;

    pub fn serialize<S: Serializer>(
        raw: &BTreeMap<SweVariable, Array2<f64>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let nested: BTreeMap<SweVariable, Rows> = raw
            .iter()
            .map(|(var, arr)| {
                let rows = arr
                    .outer_iter()
                    .map(|row| row.iter().map(|v| (!v.is_nan()).then_some(*v)).collect())
                    .collect();
                (*var, rows)
            })
            .collect();
        nested.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<SweVariable, Array2<f64>>, D::Error> {
        let nested = BTreeMap::<SweVariable, Rows>::deserialize(deserializer)?;
        nested
            .into_iter()
            .map(|(var, rows)| {
                let frames = rows.len();
                let pixels = rows.first().map_or(0, Vec::len);
                let flat: Vec<f64> = rows
                    .into_iter()
                    .flatten()
                    .map(|v| v.unwrap_or(f64::NAN))
                    .collect();
                Array2::from_shape_vec((frames, pixels), flat)
                    .map(|arr| (var, arr))
                    .map_err(D::Error::custom)
            })
            .collect()
    }
}

/// Serde adapter storing a region as its bare point list.
pub mod roi_points {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::region::{Point, RegionSpec};

    pub fn serialize<S: Serializer>(spec: &RegionSpec, serializer: S) -> Result<S::Ok, S::Error> {
        spec.points().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<RegionSpec, D::Error> {
        let points = Vec::<Point>::deserialize(deserializer)?;
        RegionSpec::from_points(points).map_err(D::Error::custom)
    }
}

/// Cache file of a result: `<cache_dir>/<file name>.json`.
pub fn cache_path(cache_dir: &Path, result: &AnalysisResult) -> PathBuf {
    cache_dir.join(format!("{}.json", result.file.name))
}

/// Write a result to the cache directory, creating it if needed.
pub fn save_result(cache_dir: &Path, result: &AnalysisResult) -> Result<PathBuf> {
    std::fs::create_dir_all(cache_dir)?;
    let path = cache_path(cache_dir, result);
    let json = serde_json::to_string(result)?;
    std::fs::write(&path, json)?;
    info!(path = %path.display(), "Saved analysis result");
    Ok(path)
}

pub fn load_result(path: &Path) -> Result<AnalysisResult> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Cached result files in `cache_dir`, sorted by name.
pub fn list_cached(cache_dir: &Path) -> Result<Vec<PathBuf>> {
    if !cache_dir.exists() {
        return Ok(Vec::new());
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(cache_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|e| e == "json"))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Delete every cached result. Returns the number of files removed.
pub fn clear_cache(cache_dir: &Path) -> Result<usize> {
    let paths = list_cached(cache_dir)?;
    for path in &paths {
        std::fs::remove_file(path)?;
    }
    Ok(paths.len())
}

/// Write the stats table as CSV records with a leading `frame` column.
/// NaN becomes an empty cell.
fn write_stats<W: std::io::Write>(stats: &StatTable, writer: &mut csv::Writer<W>) -> Result<()> {
    let mut header = vec!["frame"];
    header.extend(stats.keys());
    writer.write_record(&header)?;

    for frame in 0..stats.frame_count() {
        let mut record = vec![frame.to_string()];
        record.extend(stats.iter().map(|(_, values)| {
            values
                .get(frame)
                .filter(|v| !v.is_nan())
                .map_or_else(String::new, |v| v.to_string())
        }));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the stats table as CSV text.
pub fn stats_csv(stats: &StatTable) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_stats(stats, &mut writer)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| SweError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| SweError::Config(e.to_string()))
}

pub fn export_stats_csv(result: &AnalysisResult, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    write_stats(&result.stats, &mut writer)?;
    info!(path = %path.display(), frames = result.frame_count(), "Exported stats");
    Ok(())
}
