//! Plot rendering.
//!
//! Three renderers — histogram, bar, box — each producing one image file
//! under the configured plots directory, named `<prefix>_<column><ext>`.
//! Styling (dimensions, colors, font sizes, legend presence, output
//! format) is resolved once from the `[plot]` config section into a
//! [`PlotStyle`] shared by every call. Rendering errors propagate
//! immediately; there is no retry or partial-output handling.

pub mod bar;
pub mod box_plot;
pub mod histogram;

use crate::config::{parse_hex_color, ImageFormat, PlotConfig};
use crate::errors::{AnalysisError, Result};
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::path::{Path, PathBuf};

/// Resolved styling parameters shared by all renderers.
#[derive(Debug, Clone)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub fill: RGBColor,
    pub point: RGBColor,
    pub bar_edge: RGBColor,
    pub line_width: u32,
    pub axis_label_size: u32,
    pub tick_label_size: u32,
    pub label_pad: u32,
    pub tick_rotation: u32,
    pub legend: bool,
    pub wait_label: String,
    pub format: ImageFormat,
    pub bar_prefix: String,
    pub hist_prefix: String,
    pub box_prefix: String,
}

impl PlotStyle {
    /// Resolve the `[plot]` section. Colors were already validated at
    /// config load; an unparseable color here is still an error rather
    /// than a silent fallback.
    pub fn from_config(config: &PlotConfig) -> Result<Self> {
        Ok(Self {
            width: config.width,
            height: config.height,
            fill: resolve_color(&config.fill_color)?,
            point: resolve_color(&config.point_color)?,
            bar_edge: resolve_color(&config.bar_edge_color)?,
            line_width: config.line_width,
            axis_label_size: config.axis_label_size,
            tick_label_size: config.tick_label_size,
            label_pad: config.label_pad,
            tick_rotation: config.tick_rotation,
            legend: config.legend,
            wait_label: config.wait_label.clone(),
            format: config.format,
            bar_prefix: config.bar_prefix.clone(),
            hist_prefix: config.hist_prefix.clone(),
            box_prefix: config.box_prefix.clone(),
        })
    }

    /// Output path for one artifact: `<dir>/<prefix>_<column><ext>`.
    pub fn artifact_path(&self, dir: &Path, prefix: &str, column: &str) -> PathBuf {
        dir.join(format!("{prefix}_{column}{}", self.format.extension()))
    }

    pub(crate) fn axis_font(&self) -> TextStyle<'static> {
        ("sans-serif", self.axis_label_size).into_font().into()
    }

    pub(crate) fn tick_font(&self) -> TextStyle<'static> {
        let font = ("sans-serif", self.tick_label_size).into_font();
        match self.tick_rotation {
            90 => font.transform(FontTransform::Rotate90).into(),
            180 => font.transform(FontTransform::Rotate180).into(),
            270 => font.transform(FontTransform::Rotate270).into(),
            _ => font.into(),
        }
    }
}

fn resolve_color(value: &str) -> Result<RGBColor> {
    let (r, g, b) = parse_hex_color(value)
        .ok_or_else(|| AnalysisError::config(format!("`{value}` is not a #rrggbb color")))?;
    Ok(RGBColor(r, g, b))
}

/// Display label for a column name: underscores to spaces, words
/// title-cased ("patient_class" → "Patient Class").
pub fn nice_label(column: &str) -> String {
    column
        .split('_')
        .filter(|w| !w.is_empty())
        .map(crate::transform::titlecase)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn plot_error<E: std::fmt::Display>(path: &Path) -> impl Fn(E) -> AnalysisError + '_ {
    move |e| AnalysisError::plot(path, e.to_string())
}
