//! Descriptive statistics.
//!
//! Small numeric helpers plus the pandas-style `describe` summary used by
//! the console report: count, mean, sample standard deviation, and the
//! min/q1/median/q3/max five-number spread. Quantiles interpolate linearly
//! between order statistics.

pub mod ttest;

pub use ttest::{welch_t_test, WelchTTest};

use crate::core::Dataset;
use crate::errors::{AnalysisError, Result};

/// Arithmetic mean. `None` on an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (n-1 denominator). `None` with fewer than 2 values.
pub fn variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|x| (x - m) * (x - m)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Sample standard deviation.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(f64::sqrt)
}

/// Quantile with linear interpolation between order statistics, `q` in
/// [0, 1]. `None` on an empty slice or out-of-range `q`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("finite values"));
    let h = (sorted.len() - 1) as f64 * q;
    let lower = h.floor() as usize;
    let upper = h.ceil() as usize;
    let frac = h - lower as f64;
    Some(sorted[lower] + frac * (sorted[upper] - sorted[lower]))
}

/// The describe() row printed for a numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Summarize a numeric sample. Requires at least two finite values so the
/// standard deviation is defined.
pub fn describe(values: &[f64]) -> Result<SummaryStats> {
    if values.len() < 2 {
        return Err(AnalysisError::stats(format!(
            "describe needs at least 2 values, got {}",
            values.len()
        )));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::stats("describe requires finite values"));
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Ok(SummaryStats {
        count: values.len(),
        mean: mean(values).expect("nonempty"),
        std: std_dev(values).expect("len >= 2"),
        min,
        q1: quantile(values, 0.25).expect("nonempty"),
        median: quantile(values, 0.5).expect("nonempty"),
        q3: quantile(values, 0.75).expect("nonempty"),
        max,
    })
}

/// `describe` of a numeric column per category of a text column,
/// categories in first-appearance order.
pub fn describe_grouped(
    dataset: &Dataset,
    cat_column: &str,
    num_column: &str,
) -> Result<Vec<(String, SummaryStats)>> {
    dataset
        .grouped_floats(cat_column, num_column)?
        .into_iter()
        .map(|(label, values)| {
            let stats = describe(&values).map_err(|e| {
                AnalysisError::stats(format!("category `{label}` of `{cat_column}`: {e}"))
            })?;
            Ok((label, stats))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Column, ColumnData};

    #[test]
    fn mean_and_std_of_known_sample() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&xs), Some(5.0));
        // Sample variance: ss = 32, n-1 = 7.
        assert!((variance(&xs).unwrap() - 32.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&xs, 0.0), Some(1.0));
        assert_eq!(quantile(&xs, 0.25), Some(1.75));
        assert_eq!(quantile(&xs, 0.5), Some(2.5));
        assert_eq!(quantile(&xs, 0.75), Some(3.25));
        assert_eq!(quantile(&xs, 1.0), Some(4.0));
    }

    #[test]
    fn quantile_handles_unsorted_input() {
        let xs = [4.0, 1.0, 3.0, 2.0];
        assert_eq!(quantile(&xs, 0.5), Some(2.5));
    }

    #[test]
    fn describe_matches_hand_computation() {
        let stats = describe(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 2.5);
        assert!((stats.std - (5.0 / 3.0_f64).sqrt()).abs() < 1e-12);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.q1, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.q3, 3.25);
        assert_eq!(stats.max, 4.0);
    }

    #[test]
    fn describe_rejects_degenerate_samples() {
        assert!(describe(&[]).is_err());
        assert!(describe(&[1.0]).is_err());
        assert!(describe(&[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn grouped_describe_partitions_by_category() {
        let mut ds = Dataset::new();
        ds.push_column(Column::new(
            "result",
            ColumnData::Text(vec![
                Some("positive".into()),
                Some("positive".into()),
                Some("negative".into()),
                Some("negative".into()),
            ]),
        ))
        .unwrap();
        ds.push_column(Column::new(
            "wait",
            ColumnData::Float(vec![Some(10.0), Some(20.0), Some(30.0), Some(50.0)]),
        ))
        .unwrap();
        let groups = describe_grouped(&ds, "result", "wait").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "positive");
        assert_eq!(groups[0].1.mean, 15.0);
        assert_eq!(groups[1].0, "negative");
        assert_eq!(groups[1].1.mean, 40.0);
    }
}
