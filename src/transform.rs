//! Column cleaning and derivation.
//!
//! The derive stage of the pipeline is built from these operations:
//! stripping the seconds component from case-open timestamps, parsing the
//! timestamp text into datetime columns, extracting month labels, the
//! inverse-hyperbolic-sine de-skew of the wait time, and recoding the
//! boolean AI result into the configured category labels.

use crate::core::{Column, ColumnData, Dataset};
use crate::errors::{AnalysisError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

/// Remove the text matching `pattern` from every cell of a text column.
/// Used to drop the trailing `:ss` of case-open timestamps so both
/// timestamp columns share a format.
pub fn strip_seconds(dataset: &mut Dataset, column: &str, pattern: &str) -> Result<()> {
    let re = Regex::new(pattern)
        .map_err(|e| AnalysisError::config(format!("invalid seconds pattern: {e}")))?;
    let cells = match &dataset.column(column)?.data {
        ColumnData::Text(v) => v,
        _ => return Err(AnalysisError::column(column, "expected a text column")),
    };
    let stripped: Vec<Option<String>> = cells
        .iter()
        .map(|cell| cell.as_ref().map(|raw| re.replace_all(raw, "").into_owned()))
        .collect();
    dataset.replace_column_data(column, ColumnData::Text(stripped))
}

/// Parse a text column into a datetime column in place, using a strftime
/// format.
pub fn parse_datetime_column(dataset: &mut Dataset, column: &str, format: &str) -> Result<()> {
    let cells = match &dataset.column(column)?.data {
        ColumnData::Text(v) => v,
        _ => return Err(AnalysisError::column(column, "expected a text column")),
    };
    let parsed: Vec<Option<NaiveDateTime>> = cells
        .iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            None => Ok(None),
            Some(raw) => NaiveDateTime::parse_from_str(raw, format)
                .map(Some)
                .map_err(|e| {
                    AnalysisError::cell(
                        row,
                        column,
                        format!("`{raw}` does not match `{format}`: {e}"),
                    )
                }),
        })
        .collect::<Result<_>>()?;
    dataset.replace_column_data(column, ColumnData::DateTime(parsed))
}

/// Derive a month-label text column `<column>_<month_keyword>` from a
/// datetime column. Returns the new column's name.
pub fn derive_month_labels(
    dataset: &mut Dataset,
    column: &str,
    month_keyword: &str,
    month_format: &str,
) -> Result<String> {
    let cells = match &dataset.column(column)?.data {
        ColumnData::DateTime(v) => v,
        _ => return Err(AnalysisError::column(column, "expected a datetime column")),
    };
    let labels: Vec<Option<String>> = cells
        .iter()
        .map(|cell| cell.map(|t| t.format(month_format).to_string()))
        .collect();
    let name = format!("{column}_{month_keyword}");
    dataset.push_column(Column::new(&name, ColumnData::Text(labels)))?;
    Ok(name)
}

/// Add `new_name` = asinh(values of `source`). The inverse hyperbolic sine
/// behaves like log for large values but is defined at zero, which suits
/// the right-skewed wait-time distribution.
pub fn asinh_column(dataset: &mut Dataset, source: &str, new_name: &str) -> Result<()> {
    let cells = match &dataset.column(source)?.data {
        ColumnData::Float(v) => v,
        _ => return Err(AnalysisError::column(source, "expected a float column")),
    };
    let transformed: Vec<Option<f64>> = cells.iter().map(|cell| cell.map(f64::asinh)).collect();
    dataset.push_column(Column::new(new_name, ColumnData::Float(transformed)))
}

/// Recode a bool column into a text column in place: `true` becomes
/// `positive`, `false` becomes `negative`.
pub fn recode_bool_column(
    dataset: &mut Dataset,
    column: &str,
    positive: &str,
    negative: &str,
) -> Result<()> {
    let cells = match &dataset.column(column)?.data {
        ColumnData::Bool(v) => v,
        _ => return Err(AnalysisError::column(column, "expected a bool column")),
    };
    let recoded: Vec<Option<String>> = cells
        .iter()
        .map(|cell| {
            cell.map(|flag| {
                if flag {
                    positive.to_string()
                } else {
                    negative.to_string()
                }
            })
        })
        .collect();
    dataset.replace_column_data(column, ColumnData::Text(recoded))
}

/// Calendar position (1-12) of a month label under `month_format`, found
/// by formatting each month of a reference year and matching. `None` for
/// labels that are not months of that format.
pub fn month_order(label: &str, month_format: &str) -> Option<u32> {
    (1..=12).find(|&month| {
        NaiveDate::from_ymd_opt(2000, month, 1)
            .map(|d| d.format(month_format).to_string() == label)
            .unwrap_or(false)
    })
}

/// Title-case a single word: "arcsinh" → "Arcsinh". Used for the polished
/// histogram axis label of the transformed column.
pub fn titlecase(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_column(name: &str, cells: &[&str]) -> Column {
        Column::new(
            name,
            ColumnData::Text(cells.iter().map(|c| Some(c.to_string())).collect()),
        )
    }

    #[test]
    fn strip_seconds_removes_trailing_component() {
        let mut ds = Dataset::new();
        ds.push_column(text_column(
            "case_open_time",
            &["2023-01-15 11:04:30", "2023-02-02 08:12:00"],
        ))
        .unwrap();
        strip_seconds(&mut ds, "case_open_time", r":\d{2}$").unwrap();
        assert_eq!(
            ds.column("case_open_time").unwrap().cell_display(0),
            "2023-01-15 11:04"
        );
    }

    #[test]
    fn datetime_parse_then_month_label() {
        let mut ds = Dataset::new();
        ds.push_column(text_column(
            "study_acquisition_time",
            &["2023-01-15 10:30:00"],
        ))
        .unwrap();
        parse_datetime_column(&mut ds, "study_acquisition_time", "%Y-%m-%d %H:%M:%S").unwrap();
        let name =
            derive_month_labels(&mut ds, "study_acquisition_time", "month", "%B").unwrap();
        assert_eq!(name, "study_acquisition_time_month");
        assert_eq!(ds.column(&name).unwrap().cell_display(0), "January");
    }

    #[test]
    fn datetime_parse_failure_names_row_and_format() {
        let mut ds = Dataset::new();
        ds.push_column(text_column("t", &["2023-01-15 10:30", "not a time"]))
            .unwrap();
        let err = parse_datetime_column(&mut ds, "t", "%Y-%m-%d %H:%M").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("row 1"));
        assert!(text.contains("%Y-%m-%d %H:%M"));
    }

    #[test]
    fn asinh_adds_transformed_column() {
        let mut ds = Dataset::new();
        ds.push_column(Column::new(
            "wait",
            ColumnData::Float(vec![Some(0.0), Some(10.0), None]),
        ))
        .unwrap();
        asinh_column(&mut ds, "wait", "wait_arcsinh").unwrap();
        let values = ds.float_values("wait_arcsinh").unwrap();
        assert_eq!(values[0], 0.0);
        assert!((values[1] - 10.0_f64.asinh()).abs() < 1e-12);
        assert_eq!(ds.column("wait_arcsinh").unwrap().len(), 3);
    }

    #[test]
    fn recode_maps_bools_to_labels_exactly() {
        let mut ds = Dataset::new();
        ds.push_column(Column::new(
            "aidoc_result",
            ColumnData::Bool(vec![Some(true), Some(false), None]),
        ))
        .unwrap();
        recode_bool_column(&mut ds, "aidoc_result", "positive", "negative").unwrap();
        let col = ds.column("aidoc_result").unwrap();
        assert_eq!(col.cell_display(0), "positive");
        assert_eq!(col.cell_display(1), "negative");
        assert_eq!(col.cell_display(2), "NA");
    }

    #[test]
    fn month_order_is_chronological() {
        assert_eq!(month_order("January", "%B"), Some(1));
        assert_eq!(month_order("December", "%B"), Some(12));
        assert_eq!(month_order("Jan", "%b"), Some(1));
        assert_eq!(month_order("inpatient", "%B"), None);
    }

    #[test]
    fn titlecase_capitalizes_first_letter() {
        assert_eq!(titlecase("arcsinh"), "Arcsinh");
        assert_eq!(titlecase(""), "");
    }
}
