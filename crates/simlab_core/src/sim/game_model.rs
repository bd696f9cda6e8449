//! Game Model: per-trial pace, pass rate, script and scoring environment.
//!
//! Draw order per game is fixed: shared pace shock, home pace shock, away
//! pace shock, home pass noise, away pass noise, scoring shock.

use rand::Rng;

use super::draws::normal;
use crate::config::GameModelConfig;
use crate::models::{
    GameEnvironment, GameState, TeamGameState, TeamProfile, VenueType, WeatherCondition,
};

#[derive(Debug, Clone, Default)]
pub struct GameModel {
    config: GameModelConfig,
}

impl GameModel {
    pub fn new(config: GameModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GameModelConfig {
        &self.config
    }

    fn league_profile(&self) -> TeamProfile {
        TeamProfile::new(self.config.league_avg_pace, self.config.league_avg_pass_rate)
    }

    /// Multiplier the total line applies to pace and scoring.
    pub fn total_factor(&self, game: &GameEnvironment) -> f64 {
        game.total.map_or(1.0, |t| t / self.config.baseline_total)
    }

    /// Volume multiplier implied by the spread; favorites above 1.
    pub fn game_script(&self, game: &GameEnvironment, is_home: bool) -> f64 {
        let spread = game.spread.unwrap_or(0.0);
        let signed = if is_home { spread } else { -spread };
        (1.0 + self.config.script_per_point * signed).max(self.config.script_floor)
    }

    /// Deterministic pass-rate shift from venue, weather, home field and spread.
    pub fn pass_rate_adjustment(&self, game: &GameEnvironment, is_home: bool) -> f64 {
        let cfg = &self.config;
        let mut adj = 0.0;
        if is_home {
            adj += cfg.home_field_advantage;
        }
        let spread = game.spread.unwrap_or(0.0);
        let team_spread = if is_home { spread } else { -spread };
        adj -= cfg.spread_pass_rate_effect * team_spread;

        if game.venue_type == VenueType::Dome {
            adj += cfg.dome_pass_bonus;
        } else {
            let weather = game.weather_condition();
            if weather.is_adverse() {
                adj += cfg.adverse_weather_pass_penalty;
            } else if weather == WeatherCondition::Cold {
                adj += cfg.cold_weather_pass_penalty;
            }
        }
        adj
    }

    /// Scoring environment before the random shock.
    pub fn base_scoring_multiplier(&self, game: &GameEnvironment) -> f64 {
        let weather = if game.venue_type == VenueType::Dome {
            1.0
        } else {
            let condition = game.weather_condition();
            if condition.is_precipitation() {
                self.config.precipitation_scoring_factor
            } else if condition == WeatherCondition::Wind {
                self.config.wind_scoring_factor
            } else {
                1.0
            }
        };
        self.total_factor(game) * weather
    }

    /// Realized state of one game for one trial.
    pub fn simulate<R: Rng + ?Sized>(&self, game: &GameEnvironment, rng: &mut R) -> GameState {
        let cfg = &self.config;
        let sigma = cfg.pace_volatility;
        let shared = normal(rng, 0.0, sigma * cfg.shared_pace_weight);
        let home_shock = normal(rng, 0.0, sigma * cfg.team_pace_weight);
        let away_shock = normal(rng, 0.0, sigma * cfg.team_pace_weight);
        let home_noise = normal(rng, 0.0, cfg.pass_rate_volatility);
        let away_noise = normal(rng, 0.0, cfg.pass_rate_volatility);
        let scoring_shock = normal(rng, 0.0, cfg.scoring_volatility);

        let scoring_multiplier =
            (self.base_scoring_multiplier(game) * (1.0 + scoring_shock)).max(cfg.scoring_floor);

        let home_profile = game.home_profile.clone().unwrap_or_else(|| self.league_profile());
        let away_profile = game.away_profile.clone().unwrap_or_else(|| self.league_profile());

        let home = self.team_state(
            game,
            &game.home_team,
            &game.away_team,
            true,
            &home_profile,
            shared + home_shock,
            home_noise,
            scoring_multiplier,
        );
        let away = self.team_state(
            game,
            &game.away_team,
            &game.home_team,
            false,
            &away_profile,
            shared + away_shock,
            away_noise,
            scoring_multiplier,
        );

        GameState { game_id: game.game_id.clone(), home, away, scoring_multiplier }
    }

    #[allow(clippy::too_many_arguments)]
    fn team_state(
        &self,
        game: &GameEnvironment,
        team: &str,
        opponent: &str,
        is_home: bool,
        profile: &TeamProfile,
        pace_shock: f64,
        pass_noise: f64,
        scoring_multiplier: f64,
    ) -> TeamGameState {
        let cfg = &self.config;
        let pace = (profile.base_pace
            * (1.0 + pace_shock)
            * self.total_factor(game)
            * profile.total_adjustment)
            .max(cfg.pace_floor);

        let pass_rate = (profile.base_pass_rate
            + profile.proe_adjustment
            + self.pass_rate_adjustment(game, is_home)
            + pass_noise)
            .clamp(cfg.pass_rate_min, cfg.pass_rate_max);

        TeamGameState {
            team: team.to_string(),
            opponent: opponent.to_string(),
            is_home,
            base_pace: profile.base_pace,
            base_pass_rate: profile.base_pass_rate,
            proe_adjustment: profile.proe_adjustment,
            total_adjustment: profile.total_adjustment,
            pace,
            pass_rate,
            game_script: self.game_script(game, is_home),
            scoring_multiplier,
        }
    }

    /// League-average state for a team with no game on the slate.
    pub fn neutral_state(&self, team: &str) -> TeamGameState {
        TeamGameState::neutral(team, self.config.league_avg_pace, self.config.league_avg_pass_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::estimators::{mean, pearson_correlation};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn game() -> GameEnvironment {
        GameEnvironment::new("g1", "KC", "BUF").with_total(54.0).with_spread(3.0)
    }

    #[test]
    fn test_bounds_hold() {
        let model = GameModel::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let g = game().with_weather("heavy snow");
        for _ in 0..2000 {
            let s = model.simulate(&g, &mut rng);
            for side in [&s.home, &s.away] {
                assert!(side.pace >= 35.0);
                assert!((0.35..=0.85).contains(&side.pass_rate));
                assert!(side.game_script >= 0.5);
            }
            assert!(s.scoring_multiplier >= 0.5);
            assert_eq!(s.home.scoring_multiplier, s.scoring_multiplier);
        }
    }

    #[test]
    fn test_high_total_raises_pace() {
        let model = GameModel::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let high: Vec<f64> =
            (0..2000).map(|_| model.simulate(&game(), &mut rng).home.pace).collect();
        let low_game = GameEnvironment::new("g2", "NYJ", "CLE").with_total(36.0);
        let low: Vec<f64> =
            (0..2000).map(|_| model.simulate(&low_game, &mut rng).home.pace).collect();
        assert!(mean(&high) > mean(&low) + 10.0);
    }

    #[test]
    fn test_shared_pace_component_correlates_sides() {
        let model = GameModel::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let states: Vec<GameState> = (0..5000).map(|_| model.simulate(&game(), &mut rng)).collect();
        let home: Vec<f64> = states.iter().map(|s| s.home.pace).collect();
        let away: Vec<f64> = states.iter().map(|s| s.away.pace).collect();
        let rho = pearson_correlation(&home, &away).unwrap();
        // 0.25 / (0.25 + 0.49) ~ 0.34
        assert!(rho > 0.2 && rho < 0.5, "rho = {}", rho);
    }

    #[test]
    fn test_script_and_pass_adjustment() {
        let model = GameModel::default();
        let g = game();
        assert!((model.game_script(&g, true) - 1.06).abs() < 1e-12);
        assert!((model.game_script(&g, false) - 0.94).abs() < 1e-12);
        let blowout = GameEnvironment::new("g", "A", "B").with_spread(40.0);
        assert_eq!(model.game_script(&blowout, false), 0.5);

        // home: +0.02 bonus, favored by 3 -> -0.015
        assert!((model.pass_rate_adjustment(&g, true) - 0.005).abs() < 1e-12);
        assert!((model.pass_rate_adjustment(&g, false) - 0.015).abs() < 1e-12);

        let dome = game().with_weather("rain").with_venue(VenueType::Dome);
        assert!((model.pass_rate_adjustment(&dome, false) - 0.025).abs() < 1e-12);
        let rain = game().with_weather("rain");
        assert!((model.pass_rate_adjustment(&rain, false) + 0.015).abs() < 1e-12);
        let cold = game().with_weather("Cold");
        assert!((model.pass_rate_adjustment(&cold, false) - 0.005).abs() < 1e-12);
    }

    #[test]
    fn test_weather_scoring_factor() {
        let model = GameModel::default();
        let base = GameEnvironment::new("g", "A", "B").with_total(45.0);
        assert!((model.base_scoring_multiplier(&base) - 1.0).abs() < 1e-12);
        let rain = base.clone().with_weather("Rain");
        assert!((model.base_scoring_multiplier(&rain) - 0.9).abs() < 1e-12);
        let wind = base.clone().with_weather("windy");
        assert!((model.base_scoring_multiplier(&wind) - 0.95).abs() < 1e-12);
        let cold = base.clone().with_weather("cold");
        assert!((model.base_scoring_multiplier(&cold) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_noiseless_config_is_deterministic() {
        let model = GameModel::new(ModelConfig::deterministic_environment().game);
        let g = GameEnvironment::new("g", "A", "B");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let s = model.simulate(&g, &mut rng);
        assert!((s.home.pace - 65.0).abs() < 1e-12);
        assert!((s.home.pass_rate - 0.62).abs() < 1e-12);
        assert!((s.away.pass_rate - 0.60).abs() < 1e-12);
        assert!((s.scoring_multiplier - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_state() {
        let model = GameModel::default();
        let a = model.simulate(&game(), &mut ChaCha8Rng::seed_from_u64(77));
        let b = model.simulate(&game(), &mut ChaCha8Rng::seed_from_u64(77));
        assert_eq!(a, b);
    }
}
