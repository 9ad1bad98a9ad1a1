//! CSV dataset loader.
//!
//! Reads the configured CSV export into a [`Dataset`] with the schema the
//! pipeline expects: three text columns, the boolean AI-result flag, the
//! numeric wait time, and the two timestamp columns (kept as text until
//! the derive stage parses them). Extra CSV columns are ignored; a
//! configured column missing from the header is an immediate error, as is
//! any cell that fails to parse as its declared type. Empty cells load as
//! missing.

use crate::config::{AnalysisConfig, ColumnsConfig};
use crate::core::{Column, ColumnData, Dataset};
use crate::errors::{AnalysisError, Result};
use std::path::Path;

/// Load the dataset named by `config.paths.dataset`.
pub fn load_dataset(config: &AnalysisConfig) -> Result<Dataset> {
    let path = &config.paths.dataset;
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| AnalysisError::config_at(format!("cannot open dataset: {e}"), path))?;

    let header_index = resolve_header(&mut reader, &config.columns, path)?;
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); header_index.len()];

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            AnalysisError::cell(row, "<record>", format!("malformed CSV row: {e}"))
        })?;
        for (slot, &col) in header_index.iter().enumerate() {
            let raw = record.get(col).unwrap_or("").trim();
            cells[slot].push(if raw.is_empty() {
                None
            } else {
                Some(raw.to_string())
            });
        }
    }

    build_dataset(&config.columns, cells)
}

/// Map each configured column to its position in the CSV header, in the
/// order [site, algorithm, patient_class, ai_result, wait, acquired, opened].
fn resolve_header(
    reader: &mut csv::Reader<std::fs::File>,
    columns: &ColumnsConfig,
    path: &Path,
) -> Result<Vec<usize>> {
    let headers = reader
        .headers()
        .map_err(|e| AnalysisError::config_at(format!("cannot read CSV header: {e}"), path))?
        .clone();

    configured_order(columns)
        .iter()
        .map(|name| {
            headers
                .iter()
                .position(|h| h.trim() == *name)
                .ok_or_else(|| AnalysisError::column(*name, "not found in CSV header"))
        })
        .collect()
}

fn configured_order(columns: &ColumnsConfig) -> [&str; 7] {
    [
        &columns.site,
        &columns.algorithm,
        &columns.patient_class,
        &columns.ai_result,
        &columns.wait_minutes,
        &columns.study_acquired,
        &columns.case_opened,
    ]
}

fn build_dataset(columns: &ColumnsConfig, mut cells: Vec<Vec<Option<String>>>) -> Result<Dataset> {
    // Pop in reverse of configured_order.
    let opened = cells.pop().expect("seven slots");
    let acquired = cells.pop().expect("seven slots");
    let wait = cells.pop().expect("seven slots");
    let ai_result = cells.pop().expect("seven slots");

    let mut dataset = Dataset::new();
    for (name, text) in columns.text_columns().into_iter().zip(cells) {
        dataset.push_column(Column::new(name, ColumnData::Text(text)))?;
    }
    dataset.push_column(Column::new(
        &columns.ai_result,
        ColumnData::Bool(parse_cells(&columns.ai_result, ai_result, parse_bool)?),
    ))?;
    dataset.push_column(Column::new(
        &columns.wait_minutes,
        ColumnData::Float(parse_cells(&columns.wait_minutes, wait, parse_float)?),
    ))?;
    dataset.push_column(Column::new(&columns.study_acquired, ColumnData::Text(acquired)))?;
    dataset.push_column(Column::new(&columns.case_opened, ColumnData::Text(opened)))?;
    Ok(dataset)
}

fn parse_cells<T>(
    column: &str,
    cells: Vec<Option<String>>,
    parse: fn(&str) -> Option<T>,
) -> Result<Vec<Option<T>>> {
    cells
        .into_iter()
        .enumerate()
        .map(|(row, cell)| match cell {
            None => Ok(None),
            Some(raw) => parse(&raw).map(Some).ok_or_else(|| {
                AnalysisError::cell(row, column, format!("unparseable value `{raw}`"))
            }),
        })
        .collect()
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|x| x.is_finite())
}

/// Accepts the spellings pandas writes for bool columns.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" | "True" | "TRUE" | "1" => Some(true),
        "false" | "False" | "FALSE" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_and_validate;
    use indoc::{formatdoc, indoc};
    use std::io::Write;

    fn config_for(dir: &Path, csv_name: &str) -> AnalysisConfig {
        let contents = formatdoc! {r#"
            [paths]
            dataset = "{dataset}"
            plots = "{plots}"

            [columns]
            site = "aidoc_site"
            algorithm = "algorithm"
            patient_class = "patient_class"
            ai_result = "aidoc_result"
            wait_minutes = "wait_time_minutes"
            study_acquired = "study_acquisition_time"
            case_opened = "case_open_time"
        "#,
            dataset = dir.join(csv_name).display(),
            plots = dir.join("plots").display(),
        };
        parse_and_validate(&contents).unwrap()
    }

    fn write_csv(dir: &Path, name: &str, contents: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    const SMALL: &str = indoc! {"
        aidoc_site,algorithm,patient_class,aidoc_result,wait_time_minutes,study_acquisition_time,case_open_time,extra
        north,ich,inpatient,True,34.5,2023-01-15 10:30,2023-01-15 11:04:30,ignored
        south,pe,emergency,False,,2023-02-02 08:00,2023-02-02 08:12:00,ignored
    "};

    #[test]
    fn loads_configured_columns_and_ignores_extras() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(dir.path(), "cases.csv", SMALL);
        let config = config_for(dir.path(), "cases.csv");

        let ds = load_dataset(&config).unwrap();
        assert_eq!(ds.shape(), (2, 7));
        assert!(ds.column_names().all(|n| n != "extra"));
        assert_eq!(ds.float_values("wait_time_minutes").unwrap(), vec![34.5]);
        assert_eq!(ds.missing_counts()[4], ("wait_time_minutes", 1));
    }

    #[test]
    fn bool_cells_parse_pandas_spellings() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("false"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn missing_configured_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write_csv(
            dir.path(),
            "cases.csv",
            "aidoc_site,algorithm\nnorth,ich\n",
        );
        let config = config_for(dir.path(), "cases.csv");
        let err = load_dataset(&config).unwrap_err();
        assert!(err.to_string().contains("not found in CSV header"));
    }

    #[test]
    fn malformed_numeric_cell_names_row_and_column() {
        let dir = tempfile::tempdir().unwrap();
        let bad = SMALL.replace("34.5", "fast");
        write_csv(dir.path(), "cases.csv", &bad);
        let config = config_for(dir.path(), "cases.csv");
        let err = load_dataset(&config).unwrap_err();
        let text = err.to_string();
        assert!(text.contains("wait_time_minutes"));
        assert!(text.contains("`fast`"));
    }
}
