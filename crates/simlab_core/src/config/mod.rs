//! # Simulation Configuration
//!
//! Every tuning constant the models read lives here, grouped per component,
//! so variance studies can swap presets instead of editing model code.
//!
//! ```rust
//! use simlab_core::config::{ModelConfig, SamplingConfig};
//!
//! let model = ModelConfig::default();
//! let volatile = ModelConfig::high_variance();
//! let sampling = SamplingConfig::new(5_000, 7).with_n_jobs(0);
//! assert!(volatile.game.pace_volatility > model.game.pace_volatility);
//! assert!(sampling.validate().is_ok());
//! ```

mod correlation_config;
mod game_config;
mod player_config;
mod sampling_config;
mod summary_config;

pub use correlation_config::CorrelationConfig;
pub use game_config::GameModelConfig;
pub use player_config::{
    DstParams, FlooredNormal, PlayerModelConfig, PositionParams, QbParams, RbParams,
    ReceiverParams, TailConfig,
};
pub use sampling_config::SamplingConfig;
pub use summary_config::SummaryConfig;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Model tuning shared by every trial of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, JsonSchema)]
pub struct ModelConfig {
    pub game: GameModelConfig,
    pub player: PlayerModelConfig,
    #[serde(default)]
    pub correlation: CorrelationConfig,
}

impl ModelConfig {
    /// League-calibrated defaults
    pub fn realistic() -> Self {
        Self::default()
    }

    /// Wider game and player spread, heavier tails
    pub fn high_variance() -> Self {
        let mut cfg = Self::default();
        cfg.game.pace_volatility = 0.22;
        cfg.game.pass_rate_volatility = 0.11;
        cfg.game.scoring_volatility = 0.18;
        for params in [
            &mut cfg.player.qb_position,
            &mut cfg.player.rb_position,
            &mut cfg.player.wr_position,
            &mut cfg.player.te_position,
            &mut cfg.player.dst_position,
        ] {
            params.tail_weight = (params.tail_weight * 1.5).min(0.5);
        }
        cfg
    }

    /// Tighter environments and thinner tails
    pub fn low_variance() -> Self {
        let mut cfg = Self::default();
        cfg.game.pace_volatility = 0.08;
        cfg.game.pass_rate_volatility = 0.05;
        cfg.game.scoring_volatility = 0.06;
        for params in [
            &mut cfg.player.qb_position,
            &mut cfg.player.rb_position,
            &mut cfg.player.wr_position,
            &mut cfg.player.te_position,
            &mut cfg.player.dst_position,
        ] {
            params.tail_weight *= 0.5;
        }
        cfg
    }

    /// No tail events and no game-level noise (tests)
    pub fn deterministic_environment() -> Self {
        let mut cfg = Self::default();
        cfg.game.pace_volatility = 0.0;
        cfg.game.pass_rate_volatility = 0.0;
        cfg.game.scoring_volatility = 0.0;
        for params in [
            &mut cfg.player.qb_position,
            &mut cfg.player.rb_position,
            &mut cfg.player.wr_position,
            &mut cfg.player.te_position,
            &mut cfg.player.dst_position,
        ] {
            params.tail_weight = 0.0;
        }
        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        let g = &self.game;
        if g.pass_rate_min > g.pass_rate_max {
            return Err(format!(
                "pass_rate_min {} exceeds pass_rate_max {}",
                g.pass_rate_min, g.pass_rate_max
            ));
        }
        if g.baseline_total <= 0.0 || g.league_avg_pace <= 0.0 {
            return Err("league baselines must be positive".to_string());
        }
        let t = &self.player.tail;
        if !(0.0..=1.0).contains(&t.boom_share) || t.bust_min > t.bust_max {
            return Err("tail parameters out of range".to_string());
        }
        for pos in crate::models::Position::ALL {
            let w = self.player.position(pos).tail_weight;
            if !(0.0..=1.0).contains(&w) {
                return Err(format!("{} tail_weight {} outside [0, 1]", pos, w));
            }
        }
        Ok(())
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;

    #[test]
    fn test_default_config() {
        let cfg = ModelConfig::default();
        assert!((cfg.game.league_avg_pace - 65.0).abs() < 1e-12);
        assert!((cfg.player.position(Position::WR).base_volatility - 0.35).abs() < 1e-12);
        assert!((cfg.player.position(Position::DST).tail_weight - 0.30).abs() < 1e-12);
        assert!((cfg.correlation.qb_receiver_max - 0.55).abs() < 1e-12);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_high_variance_widens() {
        let base = ModelConfig::realistic();
        let wide = ModelConfig::high_variance();
        assert!(wide.game.scoring_volatility > base.game.scoring_volatility);
        assert!(wide.player.te_position.tail_weight > base.player.te_position.tail_weight);
        assert!(wide.validate().is_ok());
    }

    #[test]
    fn test_low_variance_narrows() {
        let base = ModelConfig::realistic();
        let narrow = ModelConfig::low_variance();
        assert!(narrow.game.pace_volatility < base.game.pace_volatility);
        assert!(narrow.player.qb_position.tail_weight < base.player.qb_position.tail_weight);
    }

    #[test]
    fn test_deterministic_environment_has_no_tails() {
        let cfg = ModelConfig::deterministic_environment();
        for pos in Position::ALL {
            assert_eq!(cfg.player.position(pos).tail_weight, 0.0);
        }
        assert_eq!(cfg.game.pace_volatility, 0.0);
    }

    #[test]
    fn test_invalid_pass_rate_bounds() {
        let mut cfg = ModelConfig::default();
        cfg.game.pass_rate_min = 0.9;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_summary_defaults() {
        let cfg = SummaryConfig::default();
        assert_eq!(cfg.percentile_levels.len(), 6);
        assert_eq!(cfg.boom_threshold(Position::QB), 25.0);
        assert_eq!(cfg.boom_threshold(Position::DST), 12.0);
        assert!(cfg.validate().is_ok());

        let bad = SummaryConfig { alpha: 1.0, ..SummaryConfig::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_sampling_validation() {
        assert!(SamplingConfig::default().validate().is_ok());
        assert!(SamplingConfig::new(0, 1).validate().is_err());
        assert!(SamplingConfig::default().with_volatility(-1.0).validate().is_err());
        assert!(SamplingConfig::default().with_n_jobs(0).effective_jobs() >= 1);
    }

    #[test]
    fn test_config_serialization() {
        let cfg = ModelConfig::high_variance();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed: ModelConfig = serde_json::from_str(&json).unwrap();
        assert!((parsed.game.pace_volatility - cfg.game.pace_volatility).abs() < 1e-12);
        assert!(
            (parsed.player.wr_position.tail_weight - cfg.player.wr_position.tail_weight).abs()
                < 1e-12
        );
    }
}
