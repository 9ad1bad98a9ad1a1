//! Histogram renderer for numeric columns.

use super::{plot_error, PlotStyle};
use crate::config::ImageFormat;
use crate::errors::{AnalysisError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// One histogram bin: [start, end) and its count.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Bin a sample with Sturges' rule, k = ⌈log₂(n)⌉ + 1. A zero-range
/// sample collapses to a single unit-width bin.
pub fn sturges_bins(values: &[f64]) -> Result<Vec<Bin>> {
    if values.is_empty() {
        return Err(AnalysisError::stats("histogram of an empty sample"));
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range <= f64::EPSILON {
        return Ok(vec![Bin {
            start: min - 0.5,
            end: min + 0.5,
            count: values.len(),
        }]);
    }

    let n_bins = ((values.len() as f64).log2().ceil() as usize + 1).max(2);
    let width = range / n_bins as f64;
    let mut counts = vec![0usize; n_bins];
    for &x in values {
        let bin = (((x - min) / width).floor() as usize).min(n_bins - 1);
        counts[bin] += 1;
    }
    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count,
        })
        .collect())
}

/// Render a histogram of `values` to `path`.
pub fn render(
    path: &Path,
    x_label: &str,
    series_name: &str,
    values: &[f64],
    style: &PlotStyle,
) -> Result<()> {
    let bins = sturges_bins(values)?;
    match style.format {
        ImageFormat::Png => {
            let root =
                BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
            draw(&root, path, x_label, series_name, &bins, style)?;
            root.present().map_err(plot_error(path))
        }
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
            draw(&root, path, x_label, series_name, &bins, style)?;
            root.present().map_err(plot_error(path))
        }
    }
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    path: &Path,
    x_label: &str,
    series_name: &str,
    bins: &[Bin],
    style: &PlotStyle,
) -> Result<()> {
    root.fill(&WHITE).map_err(plot_error(path))?;

    let x_min = bins.first().map(|b| b.start).unwrap_or(0.0);
    let x_max = bins.last().map(|b| b.end).unwrap_or(1.0);
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(1) as f64 * 1.05;
    let label_area = style.axis_label_size + style.tick_label_size + style.label_pad;

    let mut chart = ChartBuilder::on(root)
        .margin(16)
        .x_label_area_size(label_area)
        .y_label_area_size(label_area)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(plot_error(path))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(x_label)
        .y_desc("Frequency")
        .axis_desc_style(style.axis_font())
        .label_style(style.tick_font())
        .draw()
        .map_err(plot_error(path))?;

    let fill = style.fill;
    chart
        .draw_series(bins.iter().map(|bin| {
            Rectangle::new(
                [(bin.start, 0.0), (bin.end, bin.count as f64)],
                fill.filled(),
            )
        }))
        .map_err(plot_error(path))?
        .label(series_name.to_string())
        .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], fill.filled()));

    // Bin outlines on top of the fills.
    chart
        .draw_series(bins.iter().map(|bin| {
            Rectangle::new(
                [(bin.start, 0.0), (bin.end, bin.count as f64)],
                style.bar_edge.stroke_width(1),
            )
        }))
        .map_err(plot_error(path))?;

    if style.legend {
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
