//! # Monte Carlo Estimators
//!
//! Pure statistical functions over ordered samples. Every diagnostic the
//! engine reports (summary table, convergence checks, audit correlations)
//! goes through these, so they are deterministic and side-effect free.
//!
//! ## Conventions
//! - Empty input yields `0.0` rather than `NaN`.
//! - `variance` defaults to the unbiased estimator (`ddof = 1`).
//! - Quantiles use linear interpolation between order statistics at rank
//!   `q * (n - 1)`. Levels outside `[0, 1]` are rejected, never clamped.
//!
//! ```
//! use simlab_core::estimators::{mean, quantiles, variance};
//!
//! let x = [1.0, 2.0, 3.0, 4.0, 5.0];
//! assert_eq!(mean(&x), 3.0);
//! assert_eq!(variance(&x, 1), 2.5);
//!
//! let deciles: Vec<f64> = (1..=10).map(f64::from).collect();
//! let q = quantiles(&deciles, &[0.9]).unwrap();
//! assert!((q[0] - 9.1).abs() < 1e-12);
//! ```

pub mod normal;

pub use normal::{inverse_normal_cdf, normal_critical_value};

use serde::{Deserialize, Serialize};

use crate::error::EstimatorError;

/// Default percentile levels reported for every player.
pub const DEFAULT_QUANTILE_LEVELS: [f64; 6] = [0.10, 0.25, 0.50, 0.75, 0.90, 0.95];

/// Arithmetic mean; `0.0` for empty input.
pub fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    x.iter().sum::<f64>() / x.len() as f64
}

/// `Σ(xᵢ - mean)² / (n - ddof)`; `0.0` when `n <= ddof`.
pub fn variance(x: &[f64], ddof: usize) -> f64 {
    let n = x.len();
    if n <= ddof {
        return 0.0;
    }
    let m = mean(x);
    let sum_sq: f64 = x.iter().map(|v| (v - m) * (v - m)).sum();
    sum_sq / (n - ddof) as f64
}

/// Unbiased sample standard deviation.
pub fn std_dev(x: &[f64]) -> f64 {
    variance(x, 1).sqrt()
}

/// Standard error of the mean, `std_dev / sqrt(n)`.
pub fn standard_error(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    std_dev(x) / (x.len() as f64).sqrt()
}

/// Rejects any level outside `[0, 1]` (NaN included).
fn check_level(q: f64) -> Result<(), EstimatorError> {
    if (0.0..=1.0).contains(&q) {
        Ok(())
    } else {
        Err(EstimatorError::QuantileOutOfRange(q))
    }
}

/// Quantile of already-sorted data. Caller validates `q`.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    let rank = q * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (lower + 1).min(n - 1);
    if lower == upper {
        return sorted[lower];
    }
    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Empirical quantiles, one per requested level, in request order.
///
/// # Errors
/// [`EstimatorError::QuantileOutOfRange`] if any level is outside `[0, 1]`.
pub fn quantiles(x: &[f64], levels: &[f64]) -> Result<Vec<f64>, EstimatorError> {
    for &q in levels {
        check_level(q)?;
    }
    let mut sorted = x.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(levels.iter().map(|&q| quantile_sorted(&sorted, q)).collect())
}

/// Single-level convenience wrapper around [`quantiles`].
pub fn quantile(x: &[f64], level: f64) -> Result<f64, EstimatorError> {
    check_level(level)?;
    let mut sorted = x.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(quantile_sorted(&sorted, level))
}

/// Normal-approximation confidence interval for the mean:
/// `mean ± z(alpha/2) * standard_error`.
///
/// # Errors
/// [`EstimatorError::InvalidAlpha`] unless `0 < alpha < 1`.
pub fn confidence_interval(x: &[f64], alpha: f64) -> Result<(f64, f64), EstimatorError> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(EstimatorError::InvalidAlpha(alpha));
    }
    if x.is_empty() {
        return Ok((0.0, 0.0));
    }
    let m = mean(x);
    let margin = normal_critical_value(alpha)? * standard_error(x);
    Ok((m - margin, m + margin))
}

/// Unbiased sample covariance of two equally long samples.
pub fn covariance(x: &[f64], y: &[f64]) -> Result<f64, EstimatorError> {
    if x.len() != y.len() {
        return Err(EstimatorError::LengthMismatch { left: x.len(), right: y.len() });
    }
    let n = x.len();
    if n < 2 {
        return Ok(0.0);
    }
    let (mx, my) = (mean(x), mean(y));
    let sum: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
    Ok(sum / (n - 1) as f64)
}

/// Pearson correlation; `0.0` when either sample has zero variance.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Result<f64, EstimatorError> {
    let cov = covariance(x, y)?;
    let denom = std_dev(x) * std_dev(y);
    if denom <= f64::EPSILON {
        return Ok(0.0);
    }
    Ok((cov / denom).clamp(-1.0, 1.0))
}

/// Bundle of every estimator for one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorSummary {
    pub n: usize,
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub standard_error: f64,
    /// `(level, value)` in request order
    pub quantiles: Vec<(f64, f64)>,
    pub confidence_interval: (f64, f64),
    pub alpha: f64,
}

/// Computes every estimator in one pass over the validated inputs.
pub fn summarize(x: &[f64], levels: &[f64], alpha: f64) -> Result<EstimatorSummary, EstimatorError> {
    let values = quantiles(x, levels)?;
    let ci = confidence_interval(x, alpha)?;
    let var = variance(x, 1);
    Ok(EstimatorSummary {
        n: x.len(),
        mean: mean(x),
        variance: var,
        std_dev: var.sqrt(),
        standard_error: standard_error(x),
        quantiles: levels.iter().copied().zip(values).collect(),
        confidence_interval: ci,
        alpha,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_basic_estimators() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!((mean(&x) - 3.0).abs() < EPS);
        assert!((variance(&x, 1) - 2.5).abs() < EPS);
        assert!((std_dev(&x) - 2.5f64.sqrt()).abs() < EPS);
        assert!((standard_error(&x) - 2.5f64.sqrt() / 5f64.sqrt()).abs() < EPS);
        // Population variance
        assert!((variance(&x, 0) - 2.0).abs() < EPS);
    }

    #[test]
    fn test_empty_and_short_inputs() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(variance(&[], 1), 0.0);
        assert_eq!(variance(&[4.0], 1), 0.0);
        assert_eq!(standard_error(&[]), 0.0);
        assert_eq!(quantiles(&[], &[0.5, 0.9]).unwrap(), vec![0.0, 0.0]);
        assert_eq!(confidence_interval(&[], 0.05).unwrap(), (0.0, 0.0));
    }

    #[test]
    fn test_quantile_interpolation() {
        let x: Vec<f64> = (1..=10).map(f64::from).collect();
        let q = quantiles(&x, &[0.9]).unwrap();
        assert!((q[0] - 9.1).abs() < EPS);

        let q = quantiles(&x, &[0.0, 0.5, 1.0]).unwrap();
        assert!((q[0] - 1.0).abs() < EPS);
        assert!((q[1] - 5.5).abs() < EPS);
        assert!((q[2] - 10.0).abs() < EPS);
    }

    #[test]
    fn test_quantiles_ignore_input_order() {
        let shuffled = [7.0, 1.0, 10.0, 3.0, 5.0, 2.0, 9.0, 4.0, 8.0, 6.0];
        let q = quantile(&shuffled, 0.9).unwrap();
        assert!((q - 9.1).abs() < EPS);
    }

    #[test]
    fn test_quantile_rejects_out_of_range() {
        let x = [1.0, 2.0];
        assert_eq!(quantiles(&x, &[0.5, 1.1]), Err(EstimatorError::QuantileOutOfRange(1.1)));
        assert_eq!(quantile(&x, -0.1), Err(EstimatorError::QuantileOutOfRange(-0.1)));
        assert!(quantiles(&x, &[f64::NAN]).is_err());
        // Rejected even when there is no data to interpolate
        assert!(quantiles(&[], &[2.0]).is_err());
    }

    #[test]
    fn test_confidence_interval() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let (lo, hi) = confidence_interval(&x, 0.05).unwrap();
        let se = standard_error(&x);
        assert!((lo - (3.0 - 1.959_963_984_540_054 * se)).abs() < 1e-9);
        assert!((hi - (3.0 + 1.959_963_984_540_054 * se)).abs() < 1e-9);

        // Wider interval at higher confidence
        let (lo99, hi99) = confidence_interval(&x, 0.01).unwrap();
        assert!(hi99 - lo99 > hi - lo);

        assert_eq!(confidence_interval(&x, 0.0), Err(EstimatorError::InvalidAlpha(0.0)));
        assert_eq!(confidence_interval(&x, 1.0), Err(EstimatorError::InvalidAlpha(1.0)));
    }

    #[test]
    fn test_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 4.0, 6.0, 8.0];
        let z = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson_correlation(&x, &y).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson_correlation(&x, &z).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(pearson_correlation(&x, &[1.0, 1.0, 1.0, 1.0]).unwrap(), 0.0);
        assert!(covariance(&x, &y[..3]).is_err());
    }

    #[test]
    fn test_summarize() {
        let x: Vec<f64> = (1..=10).map(f64::from).collect();
        let s = summarize(&x, &DEFAULT_QUANTILE_LEVELS, 0.05).unwrap();
        assert_eq!(s.n, 10);
        assert!((s.mean - 5.5).abs() < EPS);
        assert_eq!(s.quantiles.len(), DEFAULT_QUANTILE_LEVELS.len());
        assert!((s.quantiles[4].1 - 9.1).abs() < EPS);
        assert!(s.confidence_interval.0 < s.mean && s.mean < s.confidence_interval.1);
    }

    #[cfg(all(test, feature = "proptest"))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Quantiles are monotone in the level and bounded by the sample range
            #[test]
            fn prop_quantiles_monotone(
                x in prop::collection::vec(-1000.0f64..1000.0, 1..200),
                a in 0.0f64..=1.0,
                b in 0.0f64..=1.0
            ) {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let q = quantiles(&x, &[lo, hi]).unwrap();
                prop_assert!(q[0] <= q[1] + 1e-9);
                let min = x.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(q[0] >= min - 1e-9 && q[1] <= max + 1e-9);
            }

            /// Variance is never negative
            #[test]
            fn prop_variance_non_negative(x in prop::collection::vec(-1e6f64..1e6, 0..100)) {
                prop_assert!(variance(&x, 1) >= 0.0);
            }
        }
    }
}
