//! Typed analysis configuration.
//!
//! All run parameters live in one TOML file (`waitlens.toml` by default):
//! file paths, dataset column names, plot styling, and the category labels
//! used by the recode and test stages. The file is parsed once into an
//! [`AnalysisConfig`] that is passed by reference through the pipeline; no
//! global configuration state exists.
//!
//! Required sections (`paths`, `columns`) fail loudly when a key is absent.
//! Styling and label keys all carry defaults so a minimal file stays small.

use crate::errors::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration, one field per TOML section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub paths: PathsConfig,
    pub columns: ColumnsConfig,
    #[serde(default)]
    pub plot: PlotConfig,
    #[serde(default)]
    pub labels: LabelsConfig,
}

/// `[paths]` — where the dataset lives and where plots are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// CSV file of radiology case records.
    pub dataset: PathBuf,
    /// Directory receiving rendered plot files. Created if absent.
    pub plots: PathBuf,
}

/// `[columns]` — dataset column names, externalized so the same pipeline
/// runs against exports with different headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsConfig {
    pub site: String,
    pub algorithm: String,
    pub patient_class: String,
    /// Boolean flag: the algorithm's positive/negative suspicion.
    pub ai_result: String,
    /// Minutes between scan acquisition and case open.
    pub wait_minutes: String,
    pub study_acquired: String,
    pub case_opened: String,
}

impl ColumnsConfig {
    /// Names of the text columns as they appear in the CSV, in load order.
    pub fn text_columns(&self) -> [&str; 3] {
        [&self.site, &self.algorithm, &self.patient_class]
    }

    /// The two timestamp columns, acquisition first.
    pub fn timestamp_columns(&self) -> [&str; 2] {
        [&self.study_acquired, &self.case_opened]
    }
}

/// Output image format for plot artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => ".png",
            ImageFormat::Svg => ".svg",
        }
    }
}

/// `[plot]` — styling shared by every renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Fill color for histogram and bar bodies, `#rrggbb`.
    #[serde(default = "default_fill_color")]
    pub fill_color: String,
    /// Outlier point color on box plots, `#rrggbb`.
    #[serde(default = "default_point_color")]
    pub point_color: String,
    /// Bar edge stroke color, `#rrggbb`.
    #[serde(default = "default_bar_edge_color")]
    pub bar_edge_color: String,
    /// Stroke width for box borders and whiskers, pixels.
    #[serde(default = "default_line_width")]
    pub line_width: u32,
    #[serde(default = "default_axis_label_size")]
    pub axis_label_size: u32,
    #[serde(default = "default_tick_label_size")]
    pub tick_label_size: u32,
    /// Distance between an axis label and its tick labels, pixels.
    #[serde(default = "default_label_pad")]
    pub label_pad: u32,
    /// Tick label rotation in degrees; one of 0, 90, 180, 270.
    #[serde(default = "default_tick_rotation")]
    pub tick_rotation: u32,
    /// Whether grouped box plots draw a series legend.
    #[serde(default = "default_legend")]
    pub legend: bool,
    /// Polished axis label for the wait-time column.
    #[serde(default = "default_wait_label")]
    pub wait_label: String,
    #[serde(default = "default_format")]
    pub format: ImageFormat,
    /// File-name prefixes, `<prefix>_<column><ext>`.
    #[serde(default = "default_bar_prefix")]
    pub bar_prefix: String,
    #[serde(default = "default_hist_prefix")]
    pub hist_prefix: String,
    #[serde(default = "default_box_prefix")]
    pub box_prefix: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fill_color: default_fill_color(),
            point_color: default_point_color(),
            bar_edge_color: default_bar_edge_color(),
            line_width: default_line_width(),
            axis_label_size: default_axis_label_size(),
            tick_label_size: default_tick_label_size(),
            label_pad: default_label_pad(),
            tick_rotation: default_tick_rotation(),
            legend: default_legend(),
            wait_label: default_wait_label(),
            format: default_format(),
            bar_prefix: default_bar_prefix(),
            hist_prefix: default_hist_prefix(),
            box_prefix: default_box_prefix(),
        }
    }
}

fn default_width() -> u32 {
    1000
}
fn default_height() -> u32 {
    600
}
fn default_fill_color() -> String {
    "#4c72b0".to_string()
}
fn default_point_color() -> String {
    "#c44e52".to_string()
}
fn default_bar_edge_color() -> String {
    "#2d2d2d".to_string()
}
fn default_line_width() -> u32 {
    2
}
fn default_axis_label_size() -> u32 {
    22
}
fn default_tick_label_size() -> u32 {
    16
}
fn default_label_pad() -> u32 {
    12
}
fn default_tick_rotation() -> u32 {
    0
}
fn default_legend() -> bool {
    true
}
fn default_wait_label() -> String {
    "Wait Time (Minutes)".to_string()
}
fn default_format() -> ImageFormat {
    ImageFormat::Png
}
fn default_bar_prefix() -> String {
    "bar".to_string()
}
fn default_hist_prefix() -> String {
    "hist".to_string()
}
fn default_box_prefix() -> String {
    "box".to_string()
}

/// `[labels]` — category labels, derived-column naming, and the datetime
/// formats of the two timestamp columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsConfig {
    /// Replacement label for `true` AI results.
    #[serde(default = "default_positive")]
    pub positive: String,
    /// Replacement label for `false` AI results.
    #[serde(default = "default_negative")]
    pub negative: String,
    /// Suffix for the de-skewed wait-time column.
    #[serde(default = "default_transform_suffix")]
    pub transform_suffix: String,
    /// Suffix for derived month-label columns.
    #[serde(default = "default_month_keyword")]
    pub month_keyword: String,
    /// Substring marking a column as datetime-derived, used to pick
    /// chronological category ordering on plots.
    #[serde(default = "default_time_keyword")]
    pub time_keyword: String,
    /// Regex matching the trailing seconds of the case-open timestamps.
    #[serde(default = "default_seconds_pattern")]
    pub seconds_pattern: String,
    /// strftime format of the study-acquisition column.
    #[serde(default = "default_timestamp_format")]
    pub acquired_format: String,
    /// strftime format of the case-open column after seconds removal.
    #[serde(default = "default_timestamp_format")]
    pub opened_format: String,
    /// strftime format used to extract month labels.
    #[serde(default = "default_month_format")]
    pub month_format: String,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            positive: default_positive(),
            negative: default_negative(),
            transform_suffix: default_transform_suffix(),
            month_keyword: default_month_keyword(),
            time_keyword: default_time_keyword(),
            seconds_pattern: default_seconds_pattern(),
            acquired_format: default_timestamp_format(),
            opened_format: default_timestamp_format(),
            month_format: default_month_format(),
        }
    }
}

fn default_positive() -> String {
    "positive".to_string()
}
fn default_negative() -> String {
    "negative".to_string()
}
fn default_transform_suffix() -> String {
    "arcsinh".to_string()
}
fn default_month_keyword() -> String {
    "month".to_string()
}
fn default_time_keyword() -> String {
    "time".to_string()
}
fn default_seconds_pattern() -> String {
    r":\d{2}$".to_string()
}
fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}
fn default_month_format() -> String {
    "%B".to_string()
}

impl AnalysisConfig {
    /// Read and validate the configuration at `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).map_err(|e| AnalysisError::io_at(e, path))?;
        parse_and_validate(&contents)
            .map_err(|e| attach_path(e, path))
    }

    /// Name of the de-skewed wait-time column.
    pub fn transformed_wait_column(&self) -> String {
        format!(
            "{}_{}",
            self.columns.wait_minutes, self.labels.transform_suffix
        )
    }

    /// True when a column name marks it as datetime-derived.
    pub fn is_time_derived(&self, column: &str) -> bool {
        column.contains(&self.labels.time_keyword)
    }
}

fn attach_path(err: AnalysisError, path: &Path) -> AnalysisError {
    match err {
        AnalysisError::Config { message, path: None } => {
            AnalysisError::config_at(message, path)
        }
        other => other,
    }
}

/// Parse TOML contents into a validated configuration.
pub fn parse_and_validate(contents: &str) -> Result<AnalysisConfig> {
    let config: AnalysisConfig = toml::from_str(contents)
        .map_err(|e| AnalysisError::config(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AnalysisConfig) -> Result<()> {
    if config.plot.width == 0 || config.plot.height == 0 {
        return Err(AnalysisError::config(
            "plot dimensions must be nonzero",
        ));
    }
    if config.plot.line_width == 0 {
        return Err(AnalysisError::config("plot line_width must be nonzero"));
    }
    if !matches!(config.plot.tick_rotation, 0 | 90 | 180 | 270) {
        return Err(AnalysisError::config(
            "plot.tick_rotation must be one of 0, 90, 180, 270",
        ));
    }
    for (key, value) in [
        ("fill_color", &config.plot.fill_color),
        ("point_color", &config.plot.point_color),
        ("bar_edge_color", &config.plot.bar_edge_color),
    ] {
        parse_hex_color(value).ok_or_else(|| {
            AnalysisError::config(format!("plot.{key} `{value}` is not a #rrggbb color"))
        })?;
    }
    regex::Regex::new(&config.labels.seconds_pattern).map_err(|e| {
        AnalysisError::config(format!("labels.seconds_pattern is not a valid regex: {e}"))
    })?;
    if config.labels.positive == config.labels.negative {
        return Err(AnalysisError::config(
            "labels.positive and labels.negative must differ",
        ));
    }
    Ok(())
}

/// Parse a `#rrggbb` string into RGB components.
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
