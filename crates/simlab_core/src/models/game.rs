//! Game environment inputs and the per-trial game state derived from them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VenueType {
    #[default]
    Outdoor,
    Dome,
    Retractable,
}

/// Coarse weather classes derived from the free-text descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherCondition {
    Clear,
    Rain,
    Snow,
    Wind,
    Cold,
}

impl WeatherCondition {
    /// Case-insensitive keyword match; precipitation and wind beat cold.
    pub fn classify(descriptor: Option<&str>) -> Self {
        let Some(text) = descriptor else {
            return WeatherCondition::Clear;
        };
        let text = text.to_ascii_lowercase();
        if text.contains("rain") {
            WeatherCondition::Rain
        } else if text.contains("snow") {
            WeatherCondition::Snow
        } else if text.contains("wind") {
            WeatherCondition::Wind
        } else if text.contains("cold") {
            WeatherCondition::Cold
        } else {
            WeatherCondition::Clear
        }
    }

    pub fn is_adverse(&self) -> bool {
        matches!(self, WeatherCondition::Rain | WeatherCondition::Snow | WeatherCondition::Wind)
    }

    pub fn is_precipitation(&self) -> bool {
        matches!(self, WeatherCondition::Rain | WeatherCondition::Snow)
    }
}

/// Static team tendencies feeding the game model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TeamProfile {
    /// Plays per game in a neutral environment
    pub base_pace: f64,
    /// Neutral-situation pass rate
    pub base_pass_rate: f64,
    /// Pass rate over expectation
    #[serde(default)]
    pub proe_adjustment: f64,
    /// Multiplier on the total-line pace scaling
    #[serde(default = "default_total_adjustment")]
    pub total_adjustment: f64,
}

fn default_total_adjustment() -> f64 {
    1.0
}

impl TeamProfile {
    pub fn new(base_pace: f64, base_pass_rate: f64) -> Self {
        Self { base_pace, base_pass_rate, proe_adjustment: 0.0, total_adjustment: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GameEnvironment {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    /// Combined points line
    #[serde(default)]
    pub total: Option<f64>,
    /// Positive = home favored
    #[serde(default)]
    pub spread: Option<f64>,
    #[serde(default)]
    pub weather: Option<String>,
    #[serde(default)]
    pub venue_type: VenueType,
    /// League averages when absent
    #[serde(default)]
    pub home_profile: Option<TeamProfile>,
    #[serde(default)]
    pub away_profile: Option<TeamProfile>,
}

impl GameEnvironment {
    pub fn new(
        game_id: impl Into<String>,
        home_team: impl Into<String>,
        away_team: impl Into<String>,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            home_team: home_team.into(),
            away_team: away_team.into(),
            total: None,
            spread: None,
            weather: None,
            venue_type: VenueType::Outdoor,
            home_profile: None,
            away_profile: None,
        }
    }

    pub fn with_total(mut self, total: f64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_spread(mut self, spread: f64) -> Self {
        self.spread = Some(spread);
        self
    }

    pub fn with_weather(mut self, weather: impl Into<String>) -> Self {
        self.weather = Some(weather.into());
        self
    }

    pub fn with_venue(mut self, venue_type: VenueType) -> Self {
        self.venue_type = venue_type;
        self
    }

    pub fn with_profiles(mut self, home: TeamProfile, away: TeamProfile) -> Self {
        self.home_profile = Some(home);
        self.away_profile = Some(away);
        self
    }

    pub fn weather_condition(&self) -> WeatherCondition {
        WeatherCondition::classify(self.weather.as_deref())
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if self.home_team == team {
            Some(&self.away_team)
        } else if self.away_team == team {
            Some(&self.home_team)
        } else {
            None
        }
    }

    /// Lines must be finite and the two sides distinct.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.game_id.is_empty() {
            return Err("game_id is empty".to_string());
        }
        if self.home_team == self.away_team {
            return Err(format!("home and away team are both {}", self.home_team));
        }
        if let Some(total) = self.total {
            if !(total.is_finite() && total > 0.0) {
                return Err(format!("total {} must be positive", total));
            }
        }
        if let Some(spread) = self.spread {
            if !spread.is_finite() {
                return Err("spread is not finite".to_string());
            }
        }
        for profile in [&self.home_profile, &self.away_profile].into_iter().flatten() {
            if !(profile.base_pace > 0.0 && profile.base_pace.is_finite()) {
                return Err(format!("base_pace {} must be positive", profile.base_pace));
            }
            if !(0.0..=1.0).contains(&profile.base_pass_rate) {
                return Err(format!("base_pass_rate {} outside [0, 1]", profile.base_pass_rate));
            }
        }
        Ok(())
    }
}

/// One team's realized state for one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamGameState {
    pub team: String,
    pub opponent: String,
    pub is_home: bool,
    pub base_pace: f64,
    pub base_pass_rate: f64,
    pub proe_adjustment: f64,
    pub total_adjustment: f64,
    /// Realized offensive plays
    pub pace: f64,
    /// Realized pass rate, within the model's clip bounds
    pub pass_rate: f64,
    /// Script multiplier on volume (>1 = favorable)
    pub game_script: f64,
    /// Game-level scoring multiplier, shared by both sides
    pub scoring_multiplier: f64,
}

impl TeamGameState {
    /// League-average state used for players whose team has no game on the slate.
    pub fn neutral(team: &str, pace: f64, pass_rate: f64) -> Self {
        Self {
            team: team.to_string(),
            opponent: String::new(),
            is_home: false,
            base_pace: pace,
            base_pass_rate: pass_rate,
            proe_adjustment: 0.0,
            total_adjustment: 1.0,
            pace,
            pass_rate,
            game_script: 1.0,
            scoring_multiplier: 1.0,
        }
    }

    pub fn pass_attempts(&self) -> f64 {
        self.pace * self.pass_rate
    }

    pub fn rush_attempts(&self) -> f64 {
        self.pace * (1.0 - self.pass_rate)
    }
}

/// Both sides of one game for one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub game_id: String,
    pub home: TeamGameState,
    pub away: TeamGameState,
    pub scoring_multiplier: f64,
}

impl GameState {
    pub fn total_pace(&self) -> f64 {
        self.home.pace + self.away.pace
    }

    pub fn avg_pass_rate(&self) -> f64 {
        (self.home.pass_rate + self.away.pass_rate) / 2.0
    }

    /// `(team, opponent)` view for one side.
    pub fn side(&self, team: &str) -> Option<(&TeamGameState, &TeamGameState)> {
        if self.home.team == team {
            Some((&self.home, &self.away))
        } else if self.away.team == team {
            Some((&self.away, &self.home))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Home,
    Away,
}

/// Where one team plays on a slate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTeam {
    /// Index into the slate's game list
    pub game: usize,
    pub side: Side,
    pub opponent: String,
}

/// Team lookup shared by everything that needs a team's game.
///
/// Each team appears in at most one game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    teams: HashMap<String, ScheduledTeam>,
}

impl Schedule {
    /// # Errors
    /// [`SimError::TeamInMultipleGames`] when a team is listed twice.
    pub fn build(games: &[GameEnvironment]) -> Result<Self> {
        let mut teams: HashMap<String, ScheduledTeam> = HashMap::with_capacity(games.len() * 2);
        for (idx, g) in games.iter().enumerate() {
            for (team, side, opponent) in [
                (&g.home_team, Side::Home, &g.away_team),
                (&g.away_team, Side::Away, &g.home_team),
            ] {
                if let Some(existing) = teams.get(team) {
                    return Err(SimError::TeamInMultipleGames {
                        team: team.clone(),
                        first_game: games[existing.game].game_id.clone(),
                        second_game: g.game_id.clone(),
                    });
                }
                teams.insert(
                    team.clone(),
                    ScheduledTeam { game: idx, side, opponent: opponent.clone() },
                );
            }
        }
        Ok(Self { teams })
    }

    pub fn get(&self, team: &str) -> Option<&ScheduledTeam> {
        self.teams.get(team)
    }

    pub fn game_of(&self, team: &str) -> Option<usize> {
        self.teams.get(team).map(|t| t.game)
    }

    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        self.teams.get(team).map(|t| t.opponent.as_str())
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_classification() {
        assert_eq!(WeatherCondition::classify(None), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::classify(Some("Light RAIN")), WeatherCondition::Rain);
        assert_eq!(WeatherCondition::classify(Some("cold and windy")), WeatherCondition::Wind);
        assert_eq!(WeatherCondition::classify(Some("Cold")), WeatherCondition::Cold);
        assert_eq!(WeatherCondition::classify(Some("sunny")), WeatherCondition::Clear);
        assert!(WeatherCondition::Snow.is_adverse());
        assert!(!WeatherCondition::Cold.is_adverse());
    }

    #[test]
    fn test_opponent_lookup() {
        let game = GameEnvironment::new("g1", "KC", "BUF");
        assert_eq!(game.opponent_of("KC"), Some("BUF"));
        assert_eq!(game.opponent_of("BUF"), Some("KC"));
        assert_eq!(game.opponent_of("NYJ"), None);
        assert!(game.involves("KC"));
    }

    #[test]
    fn test_validate() {
        assert!(GameEnvironment::new("g1", "KC", "BUF").with_total(47.5).validate().is_ok());
        assert!(GameEnvironment::new("g1", "KC", "KC").validate().is_err());
        assert!(GameEnvironment::new("g1", "KC", "BUF").with_total(-3.0).validate().is_err());
        let bad_profile = GameEnvironment::new("g1", "KC", "BUF")
            .with_profiles(TeamProfile::new(65.0, 1.4), TeamProfile::new(65.0, 0.6));
        assert!(bad_profile.validate().is_err());
    }

    #[test]
    fn test_venue_serde() {
        let json = r#"{"game_id":"g","home_team":"A","away_team":"B","venue_type":"dome"}"#;
        let game: GameEnvironment = serde_json::from_str(json).unwrap();
        assert_eq!(game.venue_type, VenueType::Dome);
        assert!(game.total.is_none());
    }

    #[test]
    fn test_schedule_lookup() {
        let games = vec![GameEnvironment::new("g1", "KC", "BUF"), GameEnvironment::new("g2", "NYJ", "MIA")];
        let schedule = Schedule::build(&games).unwrap();
        assert_eq!(schedule.len(), 4);
        let kc = schedule.get("KC").unwrap();
        assert_eq!((kc.game, kc.side), (0, Side::Home));
        assert_eq!(schedule.get("MIA").map(|t| t.side), Some(Side::Away));
        assert_eq!(schedule.opponent_of("NYJ"), Some("MIA"));
        assert_eq!(schedule.game_of("LV"), None);
    }

    #[test]
    fn test_schedule_rejects_double_booked_team() {
        let games = vec![GameEnvironment::new("g1", "KC", "BUF"), GameEnvironment::new("g2", "NYJ", "KC")];
        match Schedule::build(&games) {
            Err(SimError::TeamInMultipleGames { team, first_game, second_game }) => {
                assert_eq!(team, "KC");
                assert_eq!(first_game, "g1");
                assert_eq!(second_game, "g2");
            }
            other => panic!("expected double-booked team error, got {:?}", other),
        }
    }

    #[test]
    fn test_side_view() {
        let home = TeamGameState::neutral("KC", 66.0, 0.6);
        let mut away = TeamGameState::neutral("BUF", 62.0, 0.55);
        away.opponent = "KC".to_string();
        let state = GameState { game_id: "g1".to_string(), home, away, scoring_multiplier: 1.0 };
        let (team, opp) = state.side("BUF").unwrap();
        assert_eq!(team.team, "BUF");
        assert_eq!(opp.team, "KC");
        assert!((state.total_pace() - 128.0).abs() < 1e-12);
    }
}
