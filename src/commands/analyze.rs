//! The analysis pipeline.
//!
//! Stage order follows the study workflow: profile the raw export, drop
//! incomplete rows, look at the wait-time distribution before and after
//! the de-skew transform, derive the datetime and categorical columns,
//! render the descriptive plots, then summarize and test wait times
//! across the AI-result outcome.

use crate::config::AnalysisConfig;
use crate::core::{ColumnData, Dataset};
use crate::plot::box_plot::HueSeries;
use crate::plot::{bar, box_plot, histogram, nice_label, PlotStyle};
use crate::{io, report, stats, transform};
use anyhow::{anyhow, Context, Result};

/// Run the full pipeline against a loaded configuration.
pub fn handle_analyze(config: &AnalysisConfig) -> Result<()> {
    let mut dataset = io::load_dataset(config).context("loading dataset")?;
    report::print_profile(&dataset);

    let dropped = dataset.drop_missing_rows();
    if dropped > 0 {
        log::info!("dropped {dropped} rows with missing values");
    }

    io::ensure_dir(&config.paths.plots).context("creating plots directory")?;
    let style = PlotStyle::from_config(&config.plot)?;

    render_wait_histograms(config, &style, &mut dataset)
        .context("rendering wait-time histograms")?;
    derive_columns(config, &mut dataset).context("deriving columns")?;

    // Second look now that the derived columns exist.
    report::print_head(&dataset);

    render_category_bars(config, &style, &dataset).context("rendering bar plots")?;
    render_wait_boxes(config, &style, &dataset).context("rendering box plots")?;
    summarize(config, &dataset).context("printing summary statistics")?;
    run_wait_time_test(config, &dataset).context("running Welch's t-test")?;

    log::debug!("analysis complete");
    Ok(())
}

/// Histogram of the raw wait time, then of its asinh transform. The
/// transform column stays on the dataset for the box plots and the test.
fn render_wait_histograms(
    config: &AnalysisConfig,
    style: &PlotStyle,
    dataset: &mut Dataset,
) -> Result<()> {
    let wait = config.columns.wait_minutes.as_str();
    let values = dataset.float_values(wait)?;
    let path = style.artifact_path(&config.paths.plots, &style.hist_prefix, wait);
    histogram::render(&path, &style.wait_label, wait, &values, style)?;
    log::debug!("wrote {}", path.display());

    let transformed = config.transformed_wait_column();
    transform::asinh_column(dataset, wait, &transformed)?;
    let values = dataset.float_values(&transformed)?;
    let label = format!(
        "{} - {}",
        style.wait_label,
        transform::titlecase(&config.labels.transform_suffix)
    );
    let path = style.artifact_path(&config.paths.plots, &style.hist_prefix, &transformed);
    histogram::render(&path, &label, &transformed, &values, style)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Seconds strip, datetime parsing, month labels, and the bool recode.
fn derive_columns(config: &AnalysisConfig, dataset: &mut Dataset) -> Result<()> {
    transform::strip_seconds(
        dataset,
        &config.columns.case_opened,
        &config.labels.seconds_pattern,
    )?;
    transform::parse_datetime_column(
        dataset,
        &config.columns.study_acquired,
        &config.labels.acquired_format,
    )?;
    transform::parse_datetime_column(
        dataset,
        &config.columns.case_opened,
        &config.labels.opened_format,
    )?;
    for column in config.columns.timestamp_columns() {
        let name = transform::derive_month_labels(
            dataset,
            column,
            &config.labels.month_keyword,
            &config.labels.month_format,
        )?;
        log::debug!("derived `{name}`");
    }
    transform::recode_bool_column(
        dataset,
        &config.columns.ai_result,
        &config.labels.positive,
        &config.labels.negative,
    )?;
    Ok(())
}

/// One bar plot per categorical column. Month-derived columns order
/// their categories chronologically, the rest by descending count.
fn render_category_bars(
    config: &AnalysisConfig,
    style: &PlotStyle,
    dataset: &Dataset,
) -> Result<()> {
    for column in dataset.categorical_columns() {
        let mut counts = dataset.value_counts(&column)?;
        if config.is_time_derived(&column) {
            counts.sort_by_key(|(label, _)| {
                transform::month_order(label, &config.labels.month_format).unwrap_or(u32::MAX)
            });
        }
        let path = style.artifact_path(&config.paths.plots, &style.bar_prefix, &column);
        bar::render(&path, &nice_label(&column), &column, &counts, style)?;
        log::debug!("wrote {}", path.display());
    }
    Ok(())
}

/// Transformed wait time against every categorical column, sub-grouped
/// by the AI result except when that column is itself the x axis.
fn render_wait_boxes(
    config: &AnalysisConfig,
    style: &PlotStyle,
    dataset: &Dataset,
) -> Result<()> {
    let transformed = config.transformed_wait_column();
    let hue_column = config.columns.ai_result.as_str();

    for column in dataset.categorical_columns() {
        let mut categories = appearance_order(dataset, &column)?;
        if config.is_time_derived(&column) {
            categories.sort_by_key(|label| {
                transform::month_order(label, &config.labels.month_format).unwrap_or(u32::MAX)
            });
        }

        let series = if column == hue_column {
            single_series_ordered(dataset, &column, &transformed, &categories)?
        } else {
            grouped_by_hue_ordered(dataset, &column, hue_column, &transformed, &categories)?
        };

        let path = style.artifact_path(&config.paths.plots, &style.box_prefix, &column);
        box_plot::render(
            &path,
            &nice_label(&column),
            &transformed,
            &categories,
            &series,
            style,
        )?;
        log::debug!("wrote {}", path.display());
    }
    Ok(())
}

/// Hue series for a fixed category ordering: one series per hue value,
/// each with one sample per x category.
fn grouped_by_hue_ordered(
    dataset: &Dataset,
    x_column: &str,
    hue_column: &str,
    num_column: &str,
    categories: &[String],
) -> Result<Vec<HueSeries>> {
    let x_cells = text_cells(dataset, x_column)?;
    let hue_cells = text_cells(dataset, hue_column)?;
    let num_cells = float_cells(dataset, num_column)?;

    let mut hue_order: Vec<String> = Vec::new();
    for cell in hue_cells.iter().flatten() {
        if !hue_order.iter().any(|h| h == cell) {
            hue_order.push(cell.clone());
        }
    }

    let mut series: Vec<HueSeries> = hue_order
        .iter()
        .map(|label| HueSeries {
            label: Some(label.clone()),
            samples: vec![Vec::new(); categories.len()],
        })
        .collect();

    for ((x, hue), value) in x_cells.iter().zip(hue_cells).zip(num_cells) {
        let (Some(x), Some(hue), Some(value)) = (x, hue, value) else {
            continue;
        };
        let Some(cat_index) = categories.iter().position(|c| c == x) else {
            continue;
        };
        let Some(hue_index) = hue_order.iter().position(|h| h == hue) else {
            continue;
        };
        series[hue_index].samples[cat_index].push(*value);
    }
    Ok(series)
}

/// Single unlabeled series for a fixed category ordering.
fn single_series_ordered(
    dataset: &Dataset,
    x_column: &str,
    num_column: &str,
    categories: &[String],
) -> Result<Vec<HueSeries>> {
    let groups = dataset.grouped_floats(x_column, num_column)?;
    let samples = categories
        .iter()
        .map(|cat| {
            groups
                .iter()
                .find(|(label, _)| label == cat)
                .map(|(_, values)| values.clone())
                .unwrap_or_default()
        })
        .collect();
    Ok(vec![HueSeries {
        label: None,
        samples,
    }])
}

fn appearance_order(dataset: &Dataset, column: &str) -> Result<Vec<String>> {
    let cells = text_cells(dataset, column)?;
    let mut order: Vec<String> = Vec::new();
    for cell in cells.iter().flatten() {
        if !order.iter().any(|c| c == cell) {
            order.push(cell.clone());
        }
    }
    Ok(order)
}

fn text_cells<'a>(dataset: &'a Dataset, column: &str) -> Result<&'a Vec<Option<String>>> {
    match &dataset.column(column)?.data {
        ColumnData::Text(cells) => Ok(cells),
        _ => Err(anyhow!("column `{column}` is not categorical")),
    }
}

fn float_cells<'a>(dataset: &'a Dataset, column: &str) -> Result<&'a Vec<Option<f64>>> {
    match &dataset.column(column)?.data {
        ColumnData::Float(cells) => Ok(cells),
        _ => Err(anyhow!("column `{column}` is not numeric")),
    }
}

/// describe() for the raw wait time, overall and per AI result.
fn summarize(config: &AnalysisConfig, dataset: &Dataset) -> Result<()> {
    let wait = config.columns.wait_minutes.as_str();
    let overall = stats::describe(&dataset.float_values(wait)?)?;
    report::print_describe(wait, &overall);

    let groups = stats::describe_grouped(dataset, &config.columns.ai_result, wait)?;
    report::print_grouped_describe(&config.columns.ai_result, &groups);
    Ok(())
}

/// Welch's t-test of the transformed wait time, positive cases first.
fn run_wait_time_test(config: &AnalysisConfig, dataset: &Dataset) -> Result<()> {
    let transformed = config.transformed_wait_column();
    let groups = dataset.grouped_floats(&config.columns.ai_result, &transformed)?;

    let sample_for = |label: &str| -> Result<Vec<f64>> {
        groups
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, values)| values.clone())
            .ok_or_else(|| {
                anyhow!(
                    "no `{label}` cases in `{}`; cannot run the test",
                    config.columns.ai_result
                )
            })
    };
    let positive = sample_for(&config.labels.positive)?;
    let negative = sample_for(&config.labels.negative)?;

    let result = stats::welch_t_test(&positive, &negative)?;
    report::print_test_outcome(
        &transformed,
        &config.labels.positive,
        &config.labels.negative,
        &result,
    );
    Ok(())
}
