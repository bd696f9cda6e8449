//! Correlation Model Configuration

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CorrelationConfig {
    // === QB <-> pass catchers ===
    /// Base QB/receiver correlation before target-share scaling (default: 0.35)
    pub qb_receiver_base: f64,
    /// Cap on the QB/receiver correlation (default: 0.55)
    pub qb_receiver_max: f64,

    // === RB <-> passing game ===
    /// Base RB/passing-game correlation before carry-share scaling (default: -0.25)
    pub rb_passing_base: f64,
    /// Most negative allowed RB/passing-game value (default: -0.45)
    pub rb_passing_min: f64,

    // === Opponents ===
    /// Opposing-team players (default: -0.20)
    pub opposing_team: f64,
    /// Multiplier when either side is a defense (default: 0.5)
    pub opposing_dst_factor: f64,

    // === Teammates at one position ===
    /// Same-position teammates (default: -0.15)
    pub same_position: f64,
    /// Amplifier for WR/TE pairs (default: 1.3)
    pub same_position_receiver_factor: f64,
    /// Most negative allowed same-position value (default: -0.50)
    pub same_position_min: f64,

    // === Same game ===
    /// Weak stack correlation for pairs not already related (default: 0.10)
    pub same_game: f64,

    // === Shares ===
    /// Share used when a player has no usage line (default: 0.15)
    pub default_share: f64,

    // === Matrix numerics ===
    /// Eigenvalue tolerance for the PSD check (default: 1e-10)
    pub eigen_tolerance: f64,
    /// Extra diagonal loading during regularization (default: 0.01)
    pub regularization_pad: f64,

    // === Shock application ===
    /// Score moves by `shock * shock_scale * volatility_multiplier` (default: 0.5)
    pub shock_scale: f64,
    /// Floor on the shock multiplier as a fraction of the base score (default: 0.1)
    pub shock_floor: f64,

    /// Pairs below this magnitude are left out of the audit listing (default: 0.01)
    pub audit_min_magnitude: f64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            qb_receiver_base: 0.35,
            qb_receiver_max: 0.55,

            rb_passing_base: -0.25,
            rb_passing_min: -0.45,

            opposing_team: -0.20,
            opposing_dst_factor: 0.5,

            same_position: -0.15,
            same_position_receiver_factor: 1.3,
            same_position_min: -0.50,

            same_game: 0.10,

            default_share: 0.15,

            eigen_tolerance: 1e-10,
            regularization_pad: 0.01,

            shock_scale: 0.5,
            shock_floor: 0.1,

            audit_min_magnitude: 0.01,
        }
    }
}
