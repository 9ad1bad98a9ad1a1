//! Configuration loading from disk.

use std::fs;
use waitlens::config::{AnalysisConfig, ImageFormat};

#[test]
fn loads_a_complete_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("waitlens.toml");
    fs::write(
        &path,
        r#"
[paths]
dataset = "data/radiology_cases.csv"
plots = "plots"

[columns]
site = "aidoc_site"
algorithm = "algorithm"
patient_class = "patient_class"
ai_result = "aidoc_result"
wait_minutes = "wait_time_minutes"
study_acquired = "study_acquisition_time"
case_opened = "case_open_time"

[plot]
width = 800
height = 500
format = "svg"

[labels]
positive = "suspected"
negative = "clear"
"#,
    )
    .unwrap();

    let config = AnalysisConfig::from_file(&path).unwrap();
    assert_eq!(config.plot.width, 800);
    assert_eq!(config.plot.format, ImageFormat::Svg);
    assert_eq!(config.labels.positive, "suspected");
    // Unset keys fall back to defaults.
    assert_eq!(config.labels.month_format, "%B");
    assert_eq!(config.plot.fill_color, "#4c72b0");
}

#[test]
fn missing_file_error_names_the_path() {
    let err = AnalysisConfig::from_file(std::path::Path::new("/nonexistent/waitlens.toml"))
        .unwrap_err();
    assert!(err.to_string().contains("/nonexistent/waitlens.toml"));
}

#[test]
fn parse_error_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[paths]\ndataset = ").unwrap();
    let err = AnalysisConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("broken.toml"));
}
