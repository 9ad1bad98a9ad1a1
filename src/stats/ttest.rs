//! Two-sample Welch's t-test.
//!
//! Welch's form is preferred over Student's pooled test because the two
//! AI-result groups differ in both size and variance. The statistic is
//! t = (x̄₁ - x̄₂) / √(s₁²/n₁ + s₂²/n₂) with Welch–Satterthwaite degrees
//! of freedom; the two-sided p-value comes from the Student's t CDF.
//!
//! Welch (1947), "The generalization of 'Student's' problem when several
//! different population variances are involved", Biometrika 34.

use super::{mean, variance};
use crate::errors::{AnalysisError, Result};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Outcome of the test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelchTTest {
    /// t statistic; negative when the first sample's mean is smaller.
    pub statistic: f64,
    /// Welch–Satterthwaite degrees of freedom (fractional in general).
    pub df: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

/// Run the test on two independent samples.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> Result<WelchTTest> {
    if a.len() < 2 || b.len() < 2 {
        return Err(AnalysisError::stats(format!(
            "each sample needs at least 2 values, got {} and {}",
            a.len(),
            b.len()
        )));
    }
    if a.iter().chain(b).any(|v| !v.is_finite()) {
        return Err(AnalysisError::stats("samples must be finite"));
    }

    let n1 = a.len() as f64;
    let n2 = b.len() as f64;
    let mean1 = mean(a).expect("len >= 2");
    let mean2 = mean(b).expect("len >= 2");
    let var1 = variance(a).expect("len >= 2");
    let var2 = variance(b).expect("len >= 2");

    let se1 = var1 / n1;
    let se2 = var2 / n2;
    let se_sq = se1 + se2;
    if se_sq <= 0.0 {
        return Err(AnalysisError::stats(
            "both samples have zero variance; the test statistic is undefined",
        ));
    }

    let statistic = (mean1 - mean2) / se_sq.sqrt();
    let df = se_sq * se_sq / (se1 * se1 / (n1 - 1.0) + se2 * se2 / (n2 - 1.0));

    let t_dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|e| AnalysisError::stats(format!("t distribution with df={df}: {e}")))?;
    let p_value = 2.0 * (1.0 - t_dist.cdf(statistic.abs()));

    Ok(WelchTTest {
        statistic,
        df,
        p_value,
    })
}
