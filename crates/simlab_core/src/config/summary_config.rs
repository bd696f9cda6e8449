//! Summary Table Configuration
//!
//! Percentile levels, confidence level, boom thresholds and the limits that
//! raise diagnostic flags on a player row.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::estimators::DEFAULT_QUANTILE_LEVELS;
use crate::models::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SummaryConfig {
    /// Percentile levels in [0, 1] (default: p10/p25/p50/p75/p90/p95)
    pub percentile_levels: Vec<f64>,
    /// Confidence-interval alpha in (0, 1) (default: 0.05)
    pub alpha: f64,

    // === Boom thresholds by position (fantasy points) ===
    pub qb_boom_threshold: f64,
    pub rb_boom_threshold: f64,
    pub wr_boom_threshold: f64,
    pub te_boom_threshold: f64,
    pub dst_boom_threshold: f64,

    // === Diagnostic flags ===
    /// |mean - site| above this raises a flag (default: 5.0)
    pub large_delta_points: f64,
    /// |pct delta| above this raises a flag (default: 0.25)
    pub large_delta_pct: f64,
    /// Means outside [extreme_mean_min, extreme_mean_max] raise a flag (default: 0, 100)
    pub extreme_mean_min: f64,
    pub extreme_mean_max: f64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            percentile_levels: DEFAULT_QUANTILE_LEVELS.to_vec(),
            alpha: 0.05,

            qb_boom_threshold: 25.0,
            rb_boom_threshold: 20.0,
            wr_boom_threshold: 18.0,
            te_boom_threshold: 15.0,
            dst_boom_threshold: 12.0,

            large_delta_points: 5.0,
            large_delta_pct: 0.25,
            extreme_mean_min: 0.0,
            extreme_mean_max: 100.0,
        }
    }
}

impl SummaryConfig {
    pub fn boom_threshold(&self, position: Position) -> f64 {
        match position {
            Position::QB => self.qb_boom_threshold,
            Position::RB => self.rb_boom_threshold,
            Position::WR => self.wr_boom_threshold,
            Position::TE => self.te_boom_threshold,
            Position::DST => self.dst_boom_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(bad) = self.percentile_levels.iter().find(|q| !(0.0..=1.0).contains(*q)) {
            return Err(format!("percentile level {} outside [0, 1]", bad));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(format!("alpha {} outside (0, 1)", self.alpha));
        }
        Ok(())
    }
}
