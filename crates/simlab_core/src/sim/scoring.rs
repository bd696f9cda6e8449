//! Fantasy scoring weights and stat lines.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One points-allowed band: scores `points` when allowed `<= max_allowed`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PointsAllowedBand {
    pub max_allowed: f64,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoringRules {
    // === Offense ===
    pub pass_yard: f64,
    pub pass_td: f64,
    pub interception: f64,
    pub rush_yard: f64,
    pub rush_td: f64,
    pub reception: f64,
    pub rec_yard: f64,
    pub rec_td: f64,
    pub fumble_lost: f64,

    // === Defense ===
    pub dst_sack: f64,
    pub dst_interception: f64,
    pub dst_fumble_recovery: f64,
    pub dst_td: f64,
    pub dst_safety: f64,
    /// Ascending bands; allowed points above the last band score `points_allowed_floor`
    pub points_allowed_bands: Vec<PointsAllowedBand>,
    pub points_allowed_floor: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        let band = |max_allowed, points| PointsAllowedBand { max_allowed, points };
        Self {
            pass_yard: 0.04,
            pass_td: 4.0,
            interception: -1.0,
            rush_yard: 0.1,
            rush_td: 6.0,
            reception: 1.0,
            rec_yard: 0.1,
            rec_td: 6.0,
            fumble_lost: -1.0,

            dst_sack: 1.0,
            dst_interception: 2.0,
            dst_fumble_recovery: 2.0,
            dst_td: 6.0,
            dst_safety: 2.0,
            points_allowed_bands: vec![
                band(0.0, 10.0),
                band(6.0, 7.0),
                band(13.0, 4.0),
                band(20.0, 1.0),
                band(27.0, 0.0),
                band(34.0, -1.0),
            ],
            points_allowed_floor: -4.0,
        }
    }
}

impl ScoringRules {
    pub fn points_allowed_score(&self, points_allowed: f64) -> f64 {
        self.points_allowed_bands
            .iter()
            .find(|b| points_allowed <= b.max_allowed)
            .map_or(self.points_allowed_floor, |b| b.points)
    }
}

/// Offensive box score for one trial.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatLine {
    /// Not scored
    pub completions: f64,
    pub pass_yards: f64,
    pub pass_tds: f64,
    pub interceptions: f64,
    pub rush_yards: f64,
    pub rush_tds: f64,
    pub receptions: f64,
    pub rec_yards: f64,
    pub rec_tds: f64,
    pub fumbles: f64,
}

impl StatLine {
    pub fn fantasy_points(&self, rules: &ScoringRules) -> f64 {
        self.pass_yards * rules.pass_yard
            + self.pass_tds * rules.pass_td
            + self.interceptions * rules.interception
            + self.rush_yards * rules.rush_yard
            + self.rush_tds * rules.rush_td
            + self.receptions * rules.reception
            + self.rec_yards * rules.rec_yard
            + self.rec_tds * rules.rec_td
            + self.fumbles * rules.fumble_lost
    }
}

/// Team defense box score for one trial.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DefenseLine {
    /// Whole points
    pub points_allowed: f64,
    pub sacks: f64,
    pub interceptions: f64,
    pub fumble_recoveries: f64,
    pub touchdowns: f64,
    pub safeties: f64,
}

impl DefenseLine {
    pub fn fantasy_points(&self, rules: &ScoringRules) -> f64 {
        rules.points_allowed_score(self.points_allowed)
            + self.sacks * rules.dst_sack
            + self.interceptions * rules.dst_interception
            + self.fumble_recoveries * rules.dst_fumble_recovery
            + self.touchdowns * rules.dst_td
            + self.safeties * rules.dst_safety
    }
}
