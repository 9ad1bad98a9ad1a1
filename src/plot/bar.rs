//! Bar-plot renderer for categorical column frequencies.

use super::{plot_error, PlotStyle};
use crate::config::ImageFormat;
use crate::errors::{AnalysisError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

/// Render category counts to `path`. Bars appear in the order given;
/// the caller decides between frequency and chronological ordering.
pub fn render(
    path: &Path,
    x_label: &str,
    series_name: &str,
    categories: &[(String, usize)],
    style: &PlotStyle,
) -> Result<()> {
    if categories.is_empty() {
        return Err(AnalysisError::stats(format!(
            "bar plot `{x_label}` has no categories"
        )));
    }
    match style.format {
        ImageFormat::Png => {
            let root =
                BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
            draw(&root, path, x_label, series_name, categories, style)?;
            root.present().map_err(plot_error(path))
        }
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
            draw(&root, path, x_label, series_name, categories, style)?;
            root.present().map_err(plot_error(path))
        }
    }
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    path: &Path,
    x_label: &str,
    series_name: &str,
    categories: &[(String, usize)],
    style: &PlotStyle,
) -> Result<()> {
    root.fill(&WHITE).map_err(plot_error(path))?;

    let n = categories.len() as u32;
    let y_max = categories.iter().map(|(_, c)| *c).max().unwrap_or(1) as f64 * 1.05;
    let label_area = style.axis_label_size + style.tick_label_size + style.label_pad;

    let mut chart = ChartBuilder::on(root)
        .margin(16)
        .x_label_area_size(label_area)
        .y_label_area_size(label_area)
        .build_cartesian_2d((0u32..n).into_segmented(), 0.0..y_max)
        .map_err(plot_error(path))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(x_label)
        .y_desc("Count")
        .x_labels(categories.len())
        .x_label_formatter(&|value| {
            let index = match value {
                SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => *i as usize,
                SegmentValue::Last => return String::new(),
            };
            categories
                .get(index)
                .map(|(label, _)| label.clone())
                .unwrap_or_default()
        })
        .axis_desc_style(style.axis_font())
        .label_style(style.tick_font())
        .draw()
        .map_err(plot_error(path))?;

    let fill = style.fill;
    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(fill.filled())
                .margin(6)
                .data(
                    categories
                        .iter()
                        .enumerate()
                        .map(|(i, (_, count))| (i as u32, *count as f64)),
                ),
        )
        .map_err(plot_error(path))?
        .label(series_name.to_string())
        .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], fill.filled()));

    // Bar edges drawn as unfilled bars over the fills.
    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(style.bar_edge.stroke_width(style.line_width))
                .margin(6)
                .data(
                    categories
                        .iter()
                        .enumerate()
                        .map(|(i, (_, count))| (i as u32, *count as f64)),
                ),
        )
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
