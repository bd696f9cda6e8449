//! Player projection inputs.
//!
//! A [`PlayerProjection`] is created once per run from normalized input and is
//! read-only for the duration of the simulation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::PlayerModelConfig;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
    DST,
}

impl Position {
    pub const ALL: [Position; 5] =
        [Position::QB, Position::RB, Position::WR, Position::TE, Position::DST];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
            Position::DST => "DST",
        }
    }

    /// Pass catchers: positions competing for targets.
    pub fn is_receiver(&self) -> bool {
        matches!(self, Position::WR | Position::TE)
    }

    /// Positions whose production comes from the passing game.
    pub fn is_passing_game(&self) -> bool {
        matches!(self, Position::QB | Position::WR | Position::TE)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QB" => Ok(Position::QB),
            "RB" => Ok(Position::RB),
            "WR" => Ok(Position::WR),
            "TE" => Ok(Position::TE),
            "DST" | "DEF" | "D/ST" | "D" => Ok(Position::DST),
            other => Err(format!("unknown position: {}", other)),
        }
    }
}

/// Usage distribution parameters (per-game opportunity).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerUsage {
    pub targets_mean: f64,
    pub targets_std: f64,
    pub carries_mean: f64,
    pub carries_std: f64,
    pub snap_share: f64,
    pub red_zone_share: f64,
    pub goal_line_share: f64,
}

/// Efficiency parameters. Zero means "no opinion": the position default is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerEfficiency {
    pub yards_per_target: f64,
    pub yards_per_carry: f64,
    pub catch_rate: f64,
    pub td_rate: f64,
    pub fumble_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerProjection {
    pub player_id: String,
    pub name: String,
    pub team: String,
    pub position: Position,
    pub salary: f64,
    #[serde(default)]
    pub site_projection: Option<f64>,

    #[serde(default)]
    pub usage: Option<PlayerUsage>,
    #[serde(default)]
    pub efficiency: Option<PlayerEfficiency>,

    /// Missing mean marks the distribution as degenerate
    #[serde(default)]
    pub proj_mean: Option<f64>,
    #[serde(default)]
    pub proj_std: f64,
    /// p10
    #[serde(default)]
    pub proj_floor: f64,
    /// p90
    #[serde(default)]
    pub proj_ceiling: f64,

    /// Probability the player suits up and plays their role, in [0, 1]
    #[serde(default = "default_active_probability")]
    pub active_probability: f64,
    /// Standard deviation of usage-share draws, >= 0
    #[serde(default = "default_role_volatility")]
    pub role_volatility: f64,

    /// Score at or above which a trial counts as a boom; 0 = position default
    #[serde(default)]
    pub boom_threshold: f64,
    #[serde(default)]
    pub bust_floor: f64,
}

fn default_active_probability() -> f64 {
    1.0
}

fn default_role_volatility() -> f64 {
    0.15
}

impl PlayerProjection {
    /// Bare projection with no distribution parameters. Simulates as a
    /// degenerate zero until a mean and std are supplied.
    pub fn new(
        player_id: impl Into<String>,
        name: impl Into<String>,
        team: impl Into<String>,
        position: Position,
        salary: f64,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            name: name.into(),
            team: team.into(),
            position,
            salary,
            site_projection: None,
            usage: None,
            efficiency: None,
            proj_mean: None,
            proj_std: 0.0,
            proj_floor: 0.0,
            proj_ceiling: 0.0,
            active_probability: default_active_probability(),
            role_volatility: default_role_volatility(),
            boom_threshold: 0.0,
            bust_floor: 0.0,
        }
    }

    /// Projection with every derived field filled from the site projection
    /// and position defaults (mean 8.0 when no site number is known).
    pub fn from_site_projection(
        player_id: impl Into<String>,
        name: impl Into<String>,
        team: impl Into<String>,
        position: Position,
        salary: f64,
        site_projection: Option<f64>,
        params: &PlayerModelConfig,
    ) -> Self {
        let mut projection = Self::new(player_id, name, team, position, salary);
        projection.site_projection = site_projection;
        let mean = site_projection.filter(|v| *v > 0.0).unwrap_or(8.0);
        let pos = params.position(position);
        projection.proj_mean = Some(mean);
        projection.proj_std = mean * pos.base_volatility;
        projection.proj_floor = mean * 0.4;
        projection.proj_ceiling = mean * 2.0;
        projection.boom_threshold = mean * pos.boom_threshold_multiplier;
        projection
    }

    pub fn with_usage(mut self, usage: PlayerUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn with_efficiency(mut self, efficiency: PlayerEfficiency) -> Self {
        self.efficiency = Some(efficiency);
        self
    }

    pub fn with_projection(mut self, mean: f64, std: f64) -> Self {
        self.proj_mean = Some(mean);
        self.proj_std = std;
        self
    }

    pub fn with_active_probability(mut self, p: f64) -> Self {
        self.active_probability = p;
        self
    }

    pub fn with_role_volatility(mut self, volatility: f64) -> Self {
        self.role_volatility = volatility;
        self
    }

    pub fn with_boom_threshold(mut self, threshold: f64) -> Self {
        self.boom_threshold = threshold;
        self
    }

    /// A usable distribution needs a finite mean and a positive, finite std.
    pub fn has_valid_distribution(&self) -> bool {
        matches!(self.proj_mean, Some(m) if m.is_finite())
            && self.proj_std.is_finite()
            && self.proj_std > 0.0
    }

    /// Share of team targets implied by the usage line, if any.
    pub fn target_share(&self, team_pass_attempts: f64) -> Option<f64> {
        let usage = self.usage.as_ref()?;
        if team_pass_attempts <= 0.0 || usage.targets_mean <= 0.0 {
            return None;
        }
        Some((usage.targets_mean / team_pass_attempts).clamp(0.0, 1.0))
    }

    /// Share of team carries implied by the usage line, if any.
    pub fn carry_share(&self, team_rush_attempts: f64) -> Option<f64> {
        let usage = self.usage.as_ref()?;
        if team_rush_attempts <= 0.0 || usage.carries_mean <= 0.0 {
            return None;
        }
        Some((usage.carries_mean / team_rush_attempts).clamp(0.0, 1.0))
    }

    /// Checks the knobs that have hard domains.
    pub fn validate(&self) -> Result<(), String> {
        if self.player_id.is_empty() {
            return Err("player_id is empty".to_string());
        }
        if !(0.0..=1.0).contains(&self.active_probability) {
            return Err(format!(
                "active_probability {} outside [0, 1]",
                self.active_probability
            ));
        }
        if !(self.role_volatility >= 0.0 && self.role_volatility.is_finite()) {
            return Err(format!("role_volatility {} must be >= 0", self.role_volatility));
        }
        if !self.salary.is_finite() || self.salary < 0.0 {
            return Err(format!("salary {} must be >= 0", self.salary));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_parsing() {
        assert_eq!("qb".parse::<Position>().unwrap(), Position::QB);
        assert_eq!(" WR ".parse::<Position>().unwrap(), Position::WR);
        assert_eq!("D/ST".parse::<Position>().unwrap(), Position::DST);
        assert_eq!("DEF".parse::<Position>().unwrap(), Position::DST);
        assert!("K".parse::<Position>().is_err());
    }

    #[test]
    fn test_position_serde_uppercase() {
        let json = serde_json::to_string(&Position::DST).unwrap();
        assert_eq!(json, "\"DST\"");
        let back: Position = serde_json::from_str("\"TE\"").unwrap();
        assert_eq!(back, Position::TE);
    }

    #[test]
    fn test_from_site_projection_defaults() {
        let params = PlayerModelConfig::default();
        let p = PlayerProjection::from_site_projection(
            "wr1", "Receiver", "KC", Position::WR, 6500.0, Some(15.0), &params,
        );
        assert_eq!(p.proj_mean, Some(15.0));
        assert!((p.proj_std - 15.0 * 0.35).abs() < 1e-12);
        assert!((p.boom_threshold - 30.0).abs() < 1e-12);
        assert!((p.proj_floor - 6.0).abs() < 1e-12);
        assert!(p.has_valid_distribution());

        let no_site = PlayerProjection::from_site_projection(
            "te1", "Tight End", "KC", Position::TE, 4000.0, None, &params,
        );
        assert_eq!(no_site.proj_mean, Some(8.0));
    }

    #[test]
    fn test_degenerate_distribution_detection() {
        let bare = PlayerProjection::new("x", "X", "NYJ", Position::RB, 5000.0);
        assert!(!bare.has_valid_distribution());
        assert!(!bare.clone().with_projection(10.0, 0.0).has_valid_distribution());
        assert!(!bare.clone().with_projection(f64::NAN, 2.0).has_valid_distribution());
        assert!(bare.with_projection(10.0, 2.0).has_valid_distribution());
    }

    #[test]
    fn test_validate() {
        let p = PlayerProjection::new("x", "X", "NYJ", Position::RB, 5000.0);
        assert!(p.validate().is_ok());
        assert!(p.clone().with_active_probability(1.2).validate().is_err());
        assert!(p.clone().with_role_volatility(-0.1).validate().is_err());
    }

    #[test]
    fn test_usage_shares() {
        let p = PlayerProjection::new("x", "X", "NYJ", Position::WR, 5000.0).with_usage(PlayerUsage {
            targets_mean: 9.75,
            ..Default::default()
        });
        assert!((p.target_share(39.0).unwrap() - 0.25).abs() < 1e-12);
        assert!(p.carry_share(26.0).is_none());
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let json = r#"{
            "player_id": "qb1", "name": "Passer", "team": "BUF",
            "position": "QB", "salary": 7800.0, "proj_mean": 22.0, "proj_std": 6.0
        }"#;
        let p: PlayerProjection = serde_json::from_str(json).unwrap();
        assert_eq!(p.active_probability, 1.0);
        assert!((p.role_volatility - 0.15).abs() < 1e-12);
        assert!(p.has_valid_distribution());
    }
}
