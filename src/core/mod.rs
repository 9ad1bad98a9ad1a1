//! In-memory column-oriented table of radiology case records.
//!
//! The whole analysis runs over one [`Dataset`]: named, typed columns of
//! equal length whose cells may be missing. Columns are added and replaced
//! over the pipeline's lifetime (datetime parsing, derived month labels,
//! the de-skewed wait time, the recoded AI result); rows only ever leave
//! through [`Dataset::drop_missing_rows`].

use crate::errors::{AnalysisError, Result};
use chrono::NaiveDateTime;
use std::collections::{HashMap, HashSet};

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DType {
    Text,
    Float,
    Bool,
    DateTime,
}

impl std::fmt::Display for DType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DType::Text => "text",
            DType::Float => "float",
            DType::Bool => "bool",
            DType::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

/// Typed cell storage, one vector per column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Text(Vec<Option<String>>),
    Float(Vec<Option<f64>>),
    Bool(Vec<Option<bool>>),
    DateTime(Vec<Option<NaiveDateTime>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::DateTime(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn missing_count(&self) -> usize {
        match self {
            ColumnData::Text(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Float(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Bool(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::DateTime(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    fn is_missing(&self, row: usize) -> bool {
        match self {
            ColumnData::Text(v) => v[row].is_none(),
            ColumnData::Float(v) => v[row].is_none(),
            ColumnData::Bool(v) => v[row].is_none(),
            ColumnData::DateTime(v) => v[row].is_none(),
        }
    }

    fn retain_rows(&mut self, keep: &[bool]) {
        fn filter<T: Clone>(cells: &mut Vec<Option<T>>, keep: &[bool]) {
            let mut row = 0;
            cells.retain(|_| {
                let kept = keep[row];
                row += 1;
                kept
            });
        }
        match self {
            ColumnData::Text(v) => filter(v, keep),
            ColumnData::Float(v) => filter(v, keep),
            ColumnData::Bool(v) => filter(v, keep),
            ColumnData::DateTime(v) => filter(v, keep),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn dtype(&self) -> DType {
        match self.data {
            ColumnData::Text(_) => DType::Text,
            ColumnData::Float(_) => DType::Float,
            ColumnData::Bool(_) => DType::Bool,
            ColumnData::DateTime(_) => DType::DateTime,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cell rendered for console display. Missing cells render as `NA`.
    pub fn cell_display(&self, row: usize) -> String {
        match &self.data {
            ColumnData::Text(v) => v[row].clone().unwrap_or_else(|| "NA".to_string()),
            ColumnData::Float(v) => v[row]
                .map(|x| format!("{x:.2}"))
                .unwrap_or_else(|| "NA".to_string()),
            ColumnData::Bool(v) => v[row]
                .map(|b| b.to_string())
                .unwrap_or_else(|| "NA".to_string()),
            ColumnData::DateTime(v) => v[row]
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "NA".to_string()),
        }
    }
}

/// Equal-length named columns; the one data entity of the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.columns.len())
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| AnalysisError::column(name, "no such column"))
    }

    pub fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| AnalysisError::column(name, "no such column"))
    }

    /// Append a column; its length must match the existing rows.
    pub fn push_column(&mut self, column: Column) -> Result<()> {
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(AnalysisError::Data(format!(
                "column `{}` has {} rows, expected {}",
                column.name,
                column.len(),
                self.n_rows()
            )));
        }
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(AnalysisError::Data(format!(
                "column `{}` already exists",
                column.name
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Swap a column's storage in place, keeping its name and position.
    /// Used by the datetime-parse and bool-recode stages.
    pub fn replace_column_data(&mut self, name: &str, data: ColumnData) -> Result<()> {
        if data.len() != self.n_rows() {
            return Err(AnalysisError::Data(format!(
                "replacement for `{name}` has {} rows, expected {}",
                data.len(),
                self.n_rows()
            )));
        }
        self.column_mut(name)?.data = data;
        Ok(())
    }

    /// Number of rows that duplicate an earlier row, all columns considered.
    pub fn duplicate_row_count(&self) -> usize {
        let mut seen: HashSet<String> = HashSet::new();
        let mut duplicates = 0;
        for row in 0..self.n_rows() {
            let key = self
                .columns
                .iter()
                .map(|c| c.cell_display(row))
                .collect::<Vec<_>>()
                .join("\u{1f}");
            if !seen.insert(key) {
                duplicates += 1;
            }
        }
        duplicates
    }

    /// Per-column missing-cell counts, in column order.
    pub fn missing_counts(&self) -> Vec<(&str, usize)> {
        self.columns
            .iter()
            .map(|c| (c.name.as_str(), c.data.missing_count()))
            .collect()
    }

    /// Remove every row with a missing cell in any column. Returns the
    /// number of rows dropped.
    pub fn drop_missing_rows(&mut self) -> usize {
        let n = self.n_rows();
        let keep: Vec<bool> = (0..n)
            .map(|row| !self.columns.iter().any(|c| c.data.is_missing(row)))
            .collect();
        let dropped = keep.iter().filter(|k| !**k).count();
        if dropped > 0 {
            for column in &mut self.columns {
                column.data.retain_rows(&keep);
            }
        }
        dropped
    }

    /// Names of the text (categorical) columns, in column order.
    pub fn categorical_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.dtype() == DType::Text)
            .map(|c| c.name.clone())
            .collect()
    }

    /// Non-missing values of a float column.
    pub fn float_values(&self, name: &str) -> Result<Vec<f64>> {
        match &self.column(name)?.data {
            ColumnData::Float(v) => Ok(v.iter().flatten().copied().collect()),
            _ => Err(AnalysisError::column(name, "expected a float column")),
        }
    }

    /// Category frequencies of a text column, ordered by descending count
    /// and then by label for deterministic output.
    pub fn value_counts(&self, name: &str) -> Result<Vec<(String, usize)>> {
        let cells = match &self.column(name)?.data {
            ColumnData::Text(v) => v,
            _ => return Err(AnalysisError::column(name, "expected a text column")),
        };
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for cell in cells.iter().flatten() {
            *counts.entry(cell.as_str()).or_default() += 1;
        }
        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(label, n)| (label.to_string(), n))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(counts)
    }

    /// Values of a float column partitioned by the categories of a text
    /// column, categories in first-appearance order.
    pub fn grouped_floats(&self, cat: &str, num: &str) -> Result<Vec<(String, Vec<f64>)>> {
        let labels = match &self.column(cat)?.data {
            ColumnData::Text(v) => v,
            _ => return Err(AnalysisError::column(cat, "expected a text column")),
        };
        let values = match &self.column(num)?.data {
            ColumnData::Float(v) => v,
            _ => return Err(AnalysisError::column(num, "expected a float column")),
        };
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<f64>> = HashMap::new();
        for (label, value) in labels.iter().zip(values) {
            let (Some(label), Some(value)) = (label, value) else {
                continue;
            };
            if !groups.contains_key(label) {
                order.push(label.clone());
            }
            groups.entry(label.clone()).or_default().push(*value);
        }
        Ok(order
            .into_iter()
            .map(|label| {
                let values = groups.remove(&label).unwrap_or_default();
                (label, values)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Dataset {
        let mut ds = Dataset::new();
        ds.push_column(Column::new(
            "site",
            ColumnData::Text(vec![
                Some("north".into()),
                Some("south".into()),
                Some("north".into()),
                None,
            ]),
        ))
        .unwrap();
        ds.push_column(Column::new(
            "wait",
            ColumnData::Float(vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)]),
        ))
        .unwrap();
        ds
    }

    #[test]
    fn shape_reports_rows_and_columns() {
        assert_eq!(sample().shape(), (4, 2));
    }

    #[test]
    fn push_column_rejects_length_mismatch() {
        let mut ds = sample();
        let short = Column::new("x", ColumnData::Float(vec![Some(1.0)]));
        assert!(ds.push_column(short).is_err());
    }

    #[test]
    fn push_column_rejects_duplicate_name() {
        let mut ds = sample();
        let dup = Column::new("site", ColumnData::Text(vec![None, None, None, None]));
        assert!(ds.push_column(dup).is_err());
    }

    #[test]
    fn missing_counts_per_column() {
        let ds = sample();
        assert_eq!(ds.missing_counts(), vec![("site", 1), ("wait", 0)]);
    }

    #[test]
    fn drop_missing_rows_removes_incomplete_rows() {
        let mut ds = sample();
        let dropped = ds.drop_missing_rows();
        assert_eq!(dropped, 1);
        assert_eq!(ds.shape(), (3, 2));
        assert_eq!(ds.float_values("wait").unwrap(), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn duplicate_rows_counted_after_first_occurrence() {
        let mut ds = Dataset::new();
        ds.push_column(Column::new(
            "a",
            ColumnData::Text(vec![
                Some("x".into()),
                Some("x".into()),
                Some("y".into()),
                Some("x".into()),
            ]),
        ))
        .unwrap();
        assert_eq!(ds.duplicate_row_count(), 2);
    }

    #[test]
    fn value_counts_sorted_by_descending_count() {
        let ds = sample();
        assert_eq!(
            ds.value_counts("site").unwrap(),
            vec![("north".to_string(), 2), ("south".to_string(), 1)]
        );
    }

    #[test]
    fn grouped_floats_partitions_by_category() {
        let mut ds = sample();
        ds.drop_missing_rows();
        let groups = ds.grouped_floats("site", "wait").unwrap();
        assert_eq!(
            groups,
            vec![
                ("north".to_string(), vec![10.0, 30.0]),
                ("south".to_string(), vec![20.0]),
            ]
        );
    }

    #[test]
    fn categorical_columns_lists_text_only() {
        assert_eq!(sample().categorical_columns(), vec!["site".to_string()]);
    }

    #[test]
    fn replace_column_data_keeps_position() {
        let mut ds = sample();
        ds.replace_column_data(
            "site",
            ColumnData::Bool(vec![Some(true), Some(false), Some(true), None]),
        )
        .unwrap();
        assert_eq!(ds.columns()[0].dtype(), DType::Bool);
        assert_eq!(ds.columns()[0].name, "site");
    }

    #[test]
    fn missing_cells_render_as_na() {
        let ds = sample();
        assert_eq!(ds.column("site").unwrap().cell_display(3), "NA");
        assert_eq!(ds.column("wait").unwrap().cell_display(0), "10.00");
    }
}
