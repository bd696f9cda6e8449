//! Standard-normal critical values.
//!
//! Common two-sided levels come from a full-precision table; anything else
//! goes through the `statrs` normal inverse CDF.

use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::EstimatorError;

/// (alpha, z_{alpha/2}) for the two-sided levels reporting asks for most.
const CRITICAL_VALUES: [(f64, f64); 4] = [
    (0.10, 1.644_853_626_951_472_2),
    (0.05, 1.959_963_984_540_054),
    (0.02, 2.326_347_874_040_840_8),
    (0.01, 2.575_829_303_548_900_4),
];

fn standard_normal() -> Result<Normal, EstimatorError> {
    Normal::new(0.0, 1.0).map_err(|e| EstimatorError::Distribution(e.to_string()))
}

/// Inverse of the standard normal CDF.
///
/// Returns `-inf`/`+inf` at 0 and 1 and `NaN` outside `[0, 1]`.
pub fn inverse_normal_cdf(p: f64) -> Result<f64, EstimatorError> {
    if p.is_nan() || !(0.0..=1.0).contains(&p) {
        return Ok(f64::NAN);
    }
    if p == 0.0 {
        return Ok(f64::NEG_INFINITY);
    }
    if p == 1.0 {
        return Ok(f64::INFINITY);
    }
    Ok(standard_normal()?.inverse_cdf(p))
}

/// Two-sided critical value `z_{alpha/2}`, i.e. the `1 - alpha/2` quantile.
///
/// # Errors
/// [`EstimatorError::InvalidAlpha`] unless `0 < alpha < 1`.
pub fn normal_critical_value(alpha: f64) -> Result<f64, EstimatorError> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(EstimatorError::InvalidAlpha(alpha));
    }
    if let Some((_, z)) = CRITICAL_VALUES.iter().find(|(level, _)| (alpha - level).abs() < 1e-12) {
        return Ok(*z);
    }
    inverse_normal_cdf(1.0 - alpha / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_values() {
        assert!((normal_critical_value(0.05).unwrap() - 1.96).abs() < 1e-3);
        assert!((normal_critical_value(0.10).unwrap() - 1.645).abs() < 1e-3);
        assert!((normal_critical_value(0.01).unwrap() - 2.576).abs() < 1e-3);
        assert!((normal_critical_value(0.02).unwrap() - 2.326).abs() < 1e-3);
    }

    #[test]
    fn test_inverse_cdf_agrees_with_table() {
        for (alpha, z) in CRITICAL_VALUES {
            let inv = inverse_normal_cdf(1.0 - alpha / 2.0).unwrap();
            assert!((inv - z).abs() < 1e-9, "alpha={} inv={} table={}", alpha, inv, z);
        }
    }

    #[test]
    fn test_inverse_cdf_shape() {
        assert!(inverse_normal_cdf(0.5).unwrap().abs() < 1e-12);
        let lo = inverse_normal_cdf(0.001).unwrap();
        let hi = inverse_normal_cdf(0.999).unwrap();
        assert!((lo + hi).abs() < 1e-9);
        assert!((hi - 3.090_232_306_167_813).abs() < 1e-9);
        let grid = [0.001, 0.01, 0.02425, 0.1, 0.5, 0.9, 0.97575, 0.99];
        for pair in grid.windows(2) {
            assert!(inverse_normal_cdf(pair[0]).unwrap() < inverse_normal_cdf(pair[1]).unwrap());
        }
    }

    #[test]
    fn test_edges() {
        assert_eq!(inverse_normal_cdf(0.0).unwrap(), f64::NEG_INFINITY);
        assert_eq!(inverse_normal_cdf(1.0).unwrap(), f64::INFINITY);
        assert!(inverse_normal_cdf(1.5).unwrap().is_nan());
        assert!(inverse_normal_cdf(f64::NAN).unwrap().is_nan());
    }

    #[test]
    fn test_non_table_alpha() {
        // 80% and 99.9% intervals
        assert!((normal_critical_value(0.20).unwrap() - 1.281_551_565_544_601).abs() < 1e-9);
        assert!((normal_critical_value(0.001).unwrap() - 3.290_526_731_491_926).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_alpha() {
        assert_eq!(normal_critical_value(0.0), Err(EstimatorError::InvalidAlpha(0.0)));
        assert_eq!(normal_critical_value(1.0), Err(EstimatorError::InvalidAlpha(1.0)));
    }
}
