//! Box-plot renderer: a numeric column against the categories of a text
//! column, optionally sub-grouped by a second (hue) categorical series.

use super::{plot_error, PlotStyle};
use crate::config::ImageFormat;
use crate::errors::{AnalysisError, Result};
use crate::stats::quantile;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// One hue series: its legend label and one sample per x category.
/// Without a hue column there is a single unlabeled series.
#[derive(Debug, Clone)]
pub struct HueSeries {
    pub label: Option<String>,
    pub samples: Vec<Vec<f64>>,
}

/// Render grouped box plots to `path`. `categories` are the x-axis
/// labels; every series must carry exactly one sample per category.
pub fn render(
    path: &Path,
    x_label: &str,
    y_label: &str,
    categories: &[String],
    series: &[HueSeries],
    style: &PlotStyle,
) -> Result<()> {
    if categories.is_empty() || series.is_empty() {
        return Err(AnalysisError::stats(format!(
            "box plot `{x_label}` has no data"
        )));
    }
    for hue in series {
        if hue.samples.len() != categories.len() {
            return Err(AnalysisError::stats(format!(
                "box plot `{x_label}`: series has {} samples for {} categories",
                hue.samples.len(),
                categories.len()
            )));
        }
    }
    match style.format {
        ImageFormat::Png => {
            let root =
                BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
            draw(&root, path, x_label, y_label, categories, series, style)?;
            root.present().map_err(plot_error(path))
        }
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
            draw(&root, path, x_label, y_label, categories, series, style)?;
            root.present().map_err(plot_error(path))
        }
    }
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    path: &Path,
    x_label: &str,
    y_label: &str,
    categories: &[String],
    series: &[HueSeries],
    style: &PlotStyle,
) -> Result<()> {
    root.fill(&WHITE).map_err(plot_error(path))?;

    let all_values: Vec<f64> = series
        .iter()
        .flat_map(|s| s.samples.iter().flatten().copied())
        .collect();
    if all_values.is_empty() {
        return Err(AnalysisError::stats(format!(
            "box plot `{x_label}`: every sample is empty"
        )));
    }
    let y_min = all_values.iter().cloned().fold(f64::INFINITY, f64::min);
    let y_max = all_values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let pad = ((y_max - y_min) * 0.05).max(0.5);
    let label_area = style.axis_label_size + style.tick_label_size + style.label_pad;

    // Boxplot elements plot in f32; the y axis follows suit.
    let y_range = (y_min - pad) as f32..(y_max + pad) as f32;
    let n = categories.len() as u32;
    let mut chart = ChartBuilder::on(root)
        .margin(16)
        .x_label_area_size(label_area)
        .y_label_area_size(label_area)
        .build_cartesian_2d((0u32..n).into_segmented(), y_range)
        .map_err(plot_error(path))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .x_labels(categories.len())
        .x_label_formatter(&|value| {
            let index = match value {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => *i as usize,
                SegmentValue::Last => return String::new(),
            };
            categories.get(index).cloned().unwrap_or_default()
        })
        .axis_desc_style(style.axis_font())
        .label_style(style.tick_font())
        .draw()
        .map_err(plot_error(path))?;

    let slot = box_slot_px(style.width, categories.len(), series.len());

    for (hue_index, hue) in series.iter().enumerate() {
        let color = hue_color(style, hue_index, series.len());
        let offset = series_offset(hue_index, series.len(), slot);

        let boxes: Vec<_> = hue
            .samples
            .iter()
            .enumerate()
            .filter(|(_, sample)| !sample.is_empty())
            .map(|(i, sample)| {
                Boxplot::new_vertical(
                    SegmentValue::CenterOf(i as u32),
                    &Quartiles::new(sample),
                )
                .width(slot.saturating_sub(4).max(4))
                .whisker_width(0.6)
                .style(color.stroke_width(style.line_width))
                .offset(offset)
            })
            .collect();

        let annotation = chart.draw_series(boxes).map_err(plot_error(path))?;
        if let Some(label) = &hue.label {
            annotation
                .label(label.clone())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled())
                });
        }

        // Outlier points beyond the 1.5 IQR fences, seaborn-style fliers.
        let fliers: Vec<_> = hue
            .samples
            .iter()
            .enumerate()
            .flat_map(|(i, sample)| {
                outliers(sample)
                    .into_iter()
                    .map(move |value| (i as u32, value))
            })
            .map(|(i, value)| {
                EmptyElement::at((SegmentValue::CenterOf(i), value as f32))
                    + Circle::new((offset, 0), 3, style.point.filled())
            })
            .collect();
        chart.draw_series(fliers).map_err(plot_error(path))?;
    }

    let has_hue = series.iter().any(|s| s.label.is_some());
    if style.legend && has_hue {
        chart
            .configure_series_labels()
            .border_style(style.bar_edge)
            .label_font(("sans-serif", style.tick_label_size))
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(plot_error(path))?;
    }

    Ok(())
}

/// Horizontal pixels available to one box.
fn box_slot_px(plot_width: u32, n_categories: usize, n_series: usize) -> u32 {
    let usable = plot_width.saturating_sub(120).max(120);
    let per_box = usable / (n_categories.max(1) as u32 * n_series.max(1) as u32);
    per_box.clamp(8, 48)
}

/// Pixel offset centering a series group on its category tick.
fn series_offset(index: usize, n_series: usize, slot: u32) -> i32 {
    let center = (n_series as f64 - 1.0) / 2.0;
    ((index as f64 - center) * (slot as f64 + 2.0)).round() as i32
}

fn hue_color(style: &PlotStyle, index: usize, n_series: usize) -> RGBColor {
    if n_series == 1 {
        style.fill
    } else {
        let rgba = Palette99::pick(index).to_rgba();
        RGBColor(rgba.0, rgba.1, rgba.2)
    }
}

/// Values outside the 1.5 IQR fences.
fn outliers(sample: &[f64]) -> Vec<f64> {
    let (Some(q1), Some(q3)) = (quantile(sample, 0.25), quantile(sample, 0.75)) else {
        return Vec::new();
    };
    let iqr = q3 - q1;
    let lo = q1 - 1.5 * iqr;
    let hi = q3 + 1.5 * iqr;
    sample
        .iter()
        .copied()
        .filter(|v| *v < lo || *v > hi)
        .collect()
}
