mod common;

use std::path::PathBuf;

use ndarray::array;
use swe_core::analysis::{quantify, AnalysisResult, FileIdentity, QuantifyParams};
use swe_core::calibration::CalibrationSource;
use swe_core::error::SweError;
use swe_core::io::results::{
    cache_path, clear_cache, list_cached, load_result, save_result, stats_csv, StatTable,
};
use swe_core::io::scan::{open_scan, write_scan};
use swe_core::io::settings::{SessionSettings, SettingKey};
use swe_core::pipeline::config::AnalysisConfig;
use swe_core::region::{Point, RegionSpec};
use swe_core::units::{ConversionParams, SweVariable};

fn sample_result(name: &str) -> AnalysisResult {
    let scale = common::synthetic_scale(100.0);
    let grey = [50, 50, 50];
    let pixels = ndarray::Array3::from_shape_fn((2, 3, 3), |(f, p, c)| {
        if f == 1 && p == 2 {
            grey[c]
        } else {
            common::ramp_colour(10 * (p + 1))[c]
        }
    });
    let params = QuantifyParams {
        variable: SweVariable::YoungsModulus,
        void_threshold: Some(150),
        saturation_percent: 98.0,
        conversion: ConversionParams::default(),
    };
    let measurements = quantify(pixels.view(), &scale, &params).unwrap();
    AnalysisResult::new(
        FileIdentity {
            name: name.into(),
            parent: PathBuf::from("/scans"),
        },
        RegionSpec::polygon(vec![Point(1, 1), Point(9, 1), Point(1, 9)]).unwrap(),
        measurements,
    )
}

// ---------------------------------------------------------------------------
// Results cache
// ---------------------------------------------------------------------------

#[test]
fn test_result_json_round_trip_keeps_nan() {
    let dir = tempfile::tempdir().unwrap();
    let result = sample_result("clip");
    let path = save_result(dir.path(), &result).unwrap();
    assert_eq!(path, cache_path(dir.path(), &result));
    assert_eq!(path.file_name().unwrap(), "clip.json");

    let loaded = load_result(&path).unwrap();
    assert_eq!(loaded.file, result.file);
    assert_eq!(loaded.roi_coords, result.roi_coords);
    assert_eq!(loaded.roi_shape, result.roi_shape);
    assert_eq!(
        loaded.stats.keys().collect::<Vec<_>>(),
        result.stats.keys().collect::<Vec<_>>()
    );

    let raw = &loaded.raw[&SweVariable::YoungsModulus];
    assert_eq!(raw.dim(), (2, 3));
    assert!(raw[[1, 2]].is_nan());
    assert_eq!(raw[[0, 0]], 90.0);
}

#[test]
fn test_json_uses_null_for_nan() {
    let dir = tempfile::tempdir().unwrap();
    let path = save_result(dir.path(), &sample_result("nulls")).unwrap();
    let text = std::fs::read_to_string(path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["roi_shape"], "polygon");
    assert_eq!(value["roi_coords"][1], serde_json::json!([9, 1]));
    assert!(value["raw"]["youngs_m"][1][2].is_null());
    assert!(value["stats"]["%_void"].is_array());
}

#[test]
fn test_list_and_clear_cache() {
    let dir = tempfile::tempdir().unwrap();
    save_result(dir.path(), &sample_result("b")).unwrap();
    save_result(dir.path(), &sample_result("a")).unwrap();
    std::fs::write(dir.path().join("settings.toml"), "").unwrap();

    let cached = list_cached(dir.path()).unwrap();
    assert_eq!(cached.len(), 2);
    assert!(cached[0].ends_with("a.json"));

    assert_eq!(clear_cache(dir.path()).unwrap(), 2);
    assert!(list_cached(dir.path()).unwrap().is_empty());
    assert!(dir.path().join("settings.toml").exists());
}

#[test]
fn test_list_missing_cache_dir_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(list_cached(&dir.path().join("nope")).unwrap().is_empty());
}

#[test]
fn test_load_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(load_result(&path), Err(SweError::Json(_))));
}

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

#[test]
fn test_stats_csv_layout() {
    let mut table = StatTable::default();
    table.insert("%_void", array![0.0, 50.0]);
    table.insert("youngs_m_mean", array![12.5, f64::NAN]);
    let csv = stats_csv(&table).unwrap();
    assert_eq!(csv, "frame,%_void,youngs_m_mean\n0,0,12.5\n1,50,\n");
}

#[test]
fn test_stats_csv_quotes_awkward_names() {
    let mut table = StatTable::default();
    table.insert("mean, kPa", array![1.5]);
    table.insert("say \"hi\"", array![2.0]);
    let text = stats_csv(&table).unwrap();
    assert_eq!(text, "frame,\"mean, kPa\",\"say \"\"hi\"\"\"\n0,1.5,2\n");

    let mut reader = csv::ReaderBuilder::new().from_reader(text.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[1], "mean, kPa");
    assert_eq!(&headers[2], "say \"hi\"");
}

#[test]
fn test_stat_table_insert_replaces() {
    let mut table = StatTable::default();
    table.insert("a", array![1.0]);
    table.insert("b", array![2.0]);
    table.insert("a", array![3.0]);
    assert_eq!(table.len(), 2);
    assert_eq!(table.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(table.get("a").unwrap()[0], 3.0);
}

#[test]
fn test_export_result_csv() {
    let dir = tempfile::tempdir().unwrap();
    let result = sample_result("export");
    let path = dir.path().join("export.csv");
    swe_core::io::results::export_stats_csv(&result, &path).unwrap();
    let text = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("frame,%_void,%_saturated,velocity_median"));
    assert!(lines[2].starts_with("1,33.33333333333333"));
}

// ---------------------------------------------------------------------------
// Session settings
// ---------------------------------------------------------------------------

#[test]
fn test_settings_missing_file_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let settings = SessionSettings::load(&dir.path().join("settings.toml")).unwrap();
    assert_eq!(settings, SessionSettings::default());
}

#[test]
fn test_settings_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");
    let mut settings = SessionSettings {
        swe_fhz: Some(1.0),
        max_scale: Some(180.0),
        variable: Some(SweVariable::ShearModulus),
        calibration_source: Some(CalibrationSource::External),
        saturation_percent: Some(95.0),
        roi: Some(RegionSpec::rectangle(Point(1, 2), Point(30, 40))),
        ..Default::default()
    };
    settings.add_recent(&PathBuf::from("/scans/a"));
    settings.save(&path).unwrap();
    assert_eq!(SessionSettings::load(&path).unwrap(), settings);
}

#[test]
fn test_recent_paths_capped_most_recent_first() {
    let mut settings = SessionSettings::default();
    for i in 0..12 {
        settings.add_recent(&PathBuf::from(format!("/scans/{i}")));
    }
    assert_eq!(settings.recent_paths.len(), 10);
    assert_eq!(settings.recent_paths[0], PathBuf::from("/scans/11"));
    assert_eq!(settings.recent_paths[9], PathBuf::from("/scans/2"));
}

#[test]
fn test_recent_paths_no_duplicates() {
    let mut settings = SessionSettings::default();
    settings.add_recent(&PathBuf::from("/scans/a"));
    settings.add_recent(&PathBuf::from("/scans/b"));
    settings.add_recent(&PathBuf::from("/scans/a"));
    assert_eq!(settings.recent_paths.len(), 2);
}

#[test]
fn test_clear_settings() {
    let mut settings = SessionSettings {
        swe_fhz: Some(1.0),
        max_scale: Some(100.0),
        variable: Some(SweVariable::Velocity),
        ..Default::default()
    };
    settings.add_recent(&PathBuf::from("/scans/a"));

    settings.clear(Some(SettingKey::SweParams));
    assert_eq!(settings.swe_fhz, None);
    assert_eq!(settings.max_scale, None);
    assert_eq!(settings.variable, Some(SweVariable::Velocity));

    settings.clear(None);
    assert_eq!(settings, SessionSettings::default());
}

#[test]
fn test_malformed_settings_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "swe_fhz = \"fast\"").unwrap();
    assert!(matches!(SessionSettings::load(&path), Err(SweError::Config(_))));
}

// ---------------------------------------------------------------------------
// Analysis config
// ---------------------------------------------------------------------------

#[test]
fn test_default_config_toml_round_trip() {
    let config = AnalysisConfig::default();
    let text = config.to_toml().unwrap();
    assert!(text.contains("void_threshold = 150"));
    assert_eq!(AnalysisConfig::from_toml(&text).unwrap(), config);
}

#[test]
fn test_minimal_config_uses_defaults() {
    let config = AnalysisConfig::from_toml("max_scale = 60.0\n").unwrap();
    assert_eq!(config.max_scale, 60.0);
    assert_eq!(config.swe_fhz, 1.0);
    assert_eq!(config.variable, SweVariable::YoungsModulus);
    assert_eq!(config.calibration.source, CalibrationSource::Local);
    assert_eq!(config.saturation_percent, 98.0);
    assert_eq!(config.decimals, 4);
}

#[test]
fn test_config_missing_max_scale_rejected() {
    assert!(matches!(
        AnalysisConfig::from_toml("swe_fhz = 1.0\n"),
        Err(SweError::Config(_))
    ));
}

#[test]
fn test_config_validate() {
    let mut config = AnalysisConfig::default();
    assert!(config.validate().is_ok());
    config.swe_fhz = 0.0;
    assert!(matches!(config.validate(), Err(SweError::InvalidFrequency(_))));
    config.swe_fhz = 1.0;
    config.max_scale = -1.0;
    assert!(matches!(config.validate(), Err(SweError::Config(_))));
}

#[test]
fn test_config_void_threshold_range() {
    let mut config = AnalysisConfig::default();
    config.void_threshold = 765;
    assert!(config.validate().is_ok());
    config.void_threshold = 766;
    assert!(matches!(config.validate(), Err(SweError::Config(_))));
}

#[test]
fn test_config_zero_stretch_rejected() {
    let mut config = AnalysisConfig::default();
    config.calibration.stretch = Some(0);
    assert!(matches!(config.validate(), Err(SweError::Config(_))));
    config.calibration.stretch = Some(256);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_with_polygon_roi() {
    let text = r#"
max_scale = 100.0
variable = "velocity"

[roi]
shape = "polygon"
vertices = [[1, 1], [9, 1], [1, 9]]

[calibration]
source = "external"
palette = "/opt/colormap.csv"
"#;
    let config = AnalysisConfig::from_toml(text).unwrap();
    assert_eq!(config.variable, SweVariable::Velocity);
    assert_eq!(
        config.roi,
        Some(RegionSpec::polygon(vec![Point(1, 1), Point(9, 1), Point(1, 9)]).unwrap())
    );
    assert_eq!(config.calibration.source, CalibrationSource::External);
}

// ---------------------------------------------------------------------------
// Scan directories
// ---------------------------------------------------------------------------

#[test]
fn test_scan_write_open_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let frames = vec![common::overlay_frame(0), common::overlay_frame(30)];
    let header = common::three_region_header(12.5);
    write_scan(dir.path(), &header, &common::sequence_of(&frames)).unwrap();

    let scan = open_scan(dir.path()).unwrap();
    assert_eq!(scan.header, header);
    assert_eq!(scan.sequence.frame_count(), 2);
    assert_eq!(scan.sequence.frame(1), frames[1].view());

    let info = scan.info();
    assert_eq!(info.frames, 2);
    assert_eq!(info.rows, common::FRAME_HEIGHT);
    assert_eq!(info.columns, common::FRAME_WIDTH);
    assert_eq!(info.compressed, "no");
    assert_eq!(info.frame_rate, 12.5);
    assert_eq!(info.acquired, "31/01/2024 09:30:05");
    assert_eq!(info.patient.as_deref(), Some("Test^Patient"));
}

#[test]
fn test_scan_without_frames_is_empty_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let header = common::three_region_header(10.0);
    std::fs::write(
        dir.path().join("header.toml"),
        toml::to_string(&header).unwrap(),
    )
    .unwrap();
    assert!(matches!(open_scan(dir.path()), Err(SweError::EmptySequence)));
}

#[test]
fn test_scan_without_header_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(open_scan(dir.path()), Err(SweError::Io(_))));
}

#[test]
fn test_scan_frames_of_different_size() {
    let dir = tempfile::tempdir().unwrap();
    let header = common::three_region_header(10.0);
    write_scan(dir.path(), &header, &common::uniform_sequence(1, 4, 4, [1, 2, 3])).unwrap();
    let other = common::uniform_sequence(1, 5, 4, [1, 2, 3]);
    swe_core::io::scan::save_rgb_frame(&other.frame(0).to_owned(), &dir.path().join("frame_0001.png"))
        .unwrap();
    assert!(matches!(open_scan(dir.path()), Err(SweError::ShapeMismatch(_))));
}
