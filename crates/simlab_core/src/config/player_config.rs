//! Player Model Configuration
//!
//! Position tables, per-position efficiency draws and tail modeling.
//! Scoring weights live in [`ScoringRules`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::Position;
use crate::sim::scoring::ScoringRules;

/// Gaussian draw with a hard floor: `max(floor, N(mean, std))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FlooredNormal {
    pub mean: f64,
    pub std: f64,
    pub floor: f64,
}

impl FlooredNormal {
    pub const fn new(mean: f64, std: f64, floor: f64) -> Self {
        Self { mean, std, floor }
    }

    /// Same spread and floor around a different center.
    pub fn recentered(self, mean: f64) -> Self {
        Self { mean, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PositionParams {
    /// Default proj_std as a fraction of the mean
    pub base_volatility: f64,
    /// Default boom threshold as a multiple of the mean
    pub boom_threshold_multiplier: f64,
    /// Probability of a boom/bust tail event per trial
    pub tail_weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TailConfig {
    /// Share of tail events that boom rather than bust (default: 0.7)
    pub boom_share: f64,
    /// Log-normal boom multiplier parameters (default: mu 0.5, sigma 0.4)
    pub boom_log_mu: f64,
    pub boom_log_sigma: f64,
    /// Uniform bust multiplier range (default: 0.1..0.4)
    pub bust_min: f64,
    pub bust_max: f64,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self { boom_share: 0.7, boom_log_mu: 0.5, boom_log_sigma: 0.4, bust_min: 0.1, bust_max: 0.4 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QbParams {
    pub completion_rate: FlooredNormal,
    pub yards_per_attempt: FlooredNormal,
    pub td_rate: FlooredNormal,
    pub int_rate: FlooredNormal,
    pub rush_attempts: FlooredNormal,
    pub rush_yards_per_carry: FlooredNormal,
    /// Poisson mean of rushing touchdowns
    pub rush_td_mean: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RbParams {
    /// Fraction of team targets flowing to the backfield (default: 0.25)
    pub backfield_target_share: f64,
    /// Carry share when no usage line exists (default: 0.15)
    pub fallback_carry_share: f64,
    /// Target share within the backfield pool when no usage line exists (default: 0.08)
    pub fallback_target_share: f64,
    pub yards_per_carry: FlooredNormal,
    pub catch_rate: FlooredNormal,
    pub yards_per_target: FlooredNormal,
    pub rush_td_rate: FlooredNormal,
    pub rec_td_rate: FlooredNormal,
    /// Fumbles per touch (default: 0.012)
    pub fumble_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReceiverParams {
    /// Target share when no usage line exists
    pub fallback_target_share: f64,
    pub catch_rate: FlooredNormal,
    pub yards_per_target: FlooredNormal,
    pub td_rate: FlooredNormal,
    /// Fumbles per reception (default: 0.008)
    pub fumble_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DstParams {
    /// CV on opponent plays (default: 0.15)
    pub opponent_pace_volatility: f64,
    pub opponent_efficiency: FlooredNormal,
    /// Opponent points per offensive play at neutral efficiency (default: 0.35)
    pub points_per_play: f64,
    /// CV on points allowed around the expectation (default: 0.3)
    pub points_allowed_volatility: f64,
    pub sacks_mean: f64,
    pub interceptions_mean: f64,
    pub fumble_recoveries_mean: f64,
    pub touchdowns_mean: f64,
    pub safeties_mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerModelConfig {
    pub qb_position: PositionParams,
    pub rb_position: PositionParams,
    pub wr_position: PositionParams,
    pub te_position: PositionParams,
    pub dst_position: PositionParams,

    pub qb: QbParams,
    pub rb: RbParams,
    pub wr: ReceiverParams,
    pub te: ReceiverParams,
    pub dst: DstParams,

    pub tail: TailConfig,
    pub scoring: ScoringRules,

    /// Floor on the per-trial QB role multiplier (default: 0.1)
    pub role_multiplier_floor: f64,
}

impl Default for PlayerModelConfig {
    fn default() -> Self {
        Self {
            qb_position: PositionParams {
                base_volatility: 0.20,
                boom_threshold_multiplier: 1.5,
                tail_weight: 0.10,
            },
            rb_position: PositionParams {
                base_volatility: 0.30,
                boom_threshold_multiplier: 1.8,
                tail_weight: 0.15,
            },
            wr_position: PositionParams {
                base_volatility: 0.35,
                boom_threshold_multiplier: 2.0,
                tail_weight: 0.20,
            },
            te_position: PositionParams {
                base_volatility: 0.40,
                boom_threshold_multiplier: 2.2,
                tail_weight: 0.25,
            },
            dst_position: PositionParams {
                base_volatility: 0.45,
                boom_threshold_multiplier: 2.5,
                tail_weight: 0.30,
            },

            qb: QbParams {
                completion_rate: FlooredNormal::new(0.65, 0.08, 0.45),
                yards_per_attempt: FlooredNormal::new(7.2, 1.2, 4.0),
                td_rate: FlooredNormal::new(0.045, 0.015, 0.01),
                int_rate: FlooredNormal::new(0.025, 0.01, 0.005),
                rush_attempts: FlooredNormal::new(3.5, 2.0, 0.0),
                rush_yards_per_carry: FlooredNormal::new(4.2, 2.5, 0.0),
                rush_td_mean: 0.15,
            },
            rb: RbParams {
                backfield_target_share: 0.25,
                fallback_carry_share: 0.15,
                fallback_target_share: 0.08,
                yards_per_carry: FlooredNormal::new(4.3, 1.1, 2.0),
                catch_rate: FlooredNormal::new(0.80, 0.12, 0.60),
                yards_per_target: FlooredNormal::new(7.8, 2.2, 4.0),
                rush_td_rate: FlooredNormal::new(0.08, 0.04, 0.01),
                rec_td_rate: FlooredNormal::new(0.12, 0.06, 0.01),
                fumble_rate: 0.012,
            },
            wr: ReceiverParams {
                fallback_target_share: 0.15,
                catch_rate: FlooredNormal::new(0.62, 0.12, 0.45),
                yards_per_target: FlooredNormal::new(9.8, 2.8, 6.0),
                td_rate: FlooredNormal::new(0.08, 0.04, 0.02),
                fumble_rate: 0.008,
            },
            te: ReceiverParams {
                fallback_target_share: 0.10,
                catch_rate: FlooredNormal::new(0.68, 0.10, 0.55),
                yards_per_target: FlooredNormal::new(8.4, 2.2, 5.0),
                td_rate: FlooredNormal::new(0.10, 0.05, 0.02),
                fumble_rate: 0.008,
            },
            dst: DstParams {
                opponent_pace_volatility: 0.15,
                opponent_efficiency: FlooredNormal::new(1.0, 0.25, 0.3),
                points_per_play: 0.35,
                points_allowed_volatility: 0.3,
                sacks_mean: 2.2,
                interceptions_mean: 0.8,
                fumble_recoveries_mean: 0.6,
                touchdowns_mean: 0.15,
                safeties_mean: 0.05,
            },

            tail: TailConfig::default(),
            scoring: ScoringRules::default(),
            role_multiplier_floor: 0.1,
        }
    }
}

impl PlayerModelConfig {
    pub fn position(&self, position: Position) -> &PositionParams {
        match position {
            Position::QB => &self.qb_position,
            Position::RB => &self.rb_position,
            Position::WR => &self.wr_position,
            Position::TE => &self.te_position,
            Position::DST => &self.dst_position,
        }
    }

    pub fn receiver(&self, position: Position) -> &ReceiverParams {
        match position {
            Position::TE => &self.te,
            _ => &self.wr,
        }
    }
}
