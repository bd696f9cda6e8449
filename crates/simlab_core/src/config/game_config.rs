//! Game Model Configuration

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GameModelConfig {
    // === League Baselines ===
    /// Plays per team per game (default: 65.0)
    pub league_avg_pace: f64,
    /// Neutral pass rate (default: 0.60)
    pub league_avg_pass_rate: f64,
    /// Total line the pace/scoring scaling is normalized around (default: 45.0)
    pub baseline_total: f64,

    // === Pace ===
    /// Coefficient of variation of team pace (default: 0.15)
    pub pace_volatility: f64,
    /// Fraction of pace volatility shared by both teams in a game (default: 0.5)
    pub shared_pace_weight: f64,
    /// Fraction of pace volatility private to each team (default: 0.7)
    pub team_pace_weight: f64,
    /// Minimum plays (default: 35.0)
    pub pace_floor: f64,

    // === Pass Rate ===
    /// Pass-rate bonus for the home team (default: 0.02)
    pub home_field_advantage: f64,
    /// Pass-rate shift per point of spread; favorite passes less (default: 0.005)
    pub spread_pass_rate_effect: f64,
    /// Noise std on pass rate (default: 0.08)
    pub pass_rate_volatility: f64,
    /// Pass-rate clip bounds (default: 0.35, 0.85)
    pub pass_rate_min: f64,
    pub pass_rate_max: f64,

    // === Weather / Venue (pass rate) ===
    /// Rain, snow or wind (default: -0.03)
    pub adverse_weather_pass_penalty: f64,
    /// Cold (default: -0.01)
    pub cold_weather_pass_penalty: f64,
    /// Dome (default: +0.01)
    pub dome_pass_bonus: f64,

    // === Scoring Environment ===
    /// Scoring factor in rain/snow (default: 0.90)
    pub precipitation_scoring_factor: f64,
    /// Scoring factor in wind (default: 0.95)
    pub wind_scoring_factor: f64,
    /// CV of the scoring shock (default: 0.12)
    pub scoring_volatility: f64,
    /// Scoring multiplier floor (default: 0.5)
    pub scoring_floor: f64,

    // === Game Script ===
    /// Volume multiplier per point favored (default: 0.02)
    pub script_per_point: f64,
    /// Lower bound on the script multiplier (default: 0.5)
    pub script_floor: f64,
}

impl Default for GameModelConfig {
    fn default() -> Self {
        Self {
            league_avg_pace: 65.0,
            league_avg_pass_rate: 0.60,
            baseline_total: 45.0,

            pace_volatility: 0.15,
            shared_pace_weight: 0.5,
            team_pace_weight: 0.7,
            pace_floor: 35.0,

            home_field_advantage: 0.02,
            spread_pass_rate_effect: 0.005,
            pass_rate_volatility: 0.08,
            pass_rate_min: 0.35,
            pass_rate_max: 0.85,

            adverse_weather_pass_penalty: -0.03,
            cold_weather_pass_penalty: -0.01,
            dome_pass_bonus: 0.01,

            precipitation_scoring_factor: 0.90,
            wind_scoring_factor: 0.95,
            scoring_volatility: 0.12,
            scoring_floor: 0.5,

            script_per_point: 0.02,
            script_floor: 0.5,
        }
    }
}

impl GameModelConfig {
    pub fn league_pass_attempts(&self) -> f64 {
        self.league_avg_pace * self.league_avg_pass_rate
    }

    pub fn league_rush_attempts(&self) -> f64 {
        self.league_avg_pace * (1.0 - self.league_avg_pass_rate)
    }
}
