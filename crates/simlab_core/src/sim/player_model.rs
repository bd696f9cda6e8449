//! Player Model: one non-negative fantasy score per player per trial.
//!
//! ## Per-trial steps
//! 1. Degenerate projections (no mean, non-positive std) score 0 with no draws.
//! 2. `active_probability` coin flip; inactive players score exactly 0.
//! 3. Position generator builds a box score from the team's realized state.
//! 4. Tail event: boom (log-normal multiplier) or bust (uniform multiplier).
//! 5. Floor at 0.

use rand::Rng;

use super::draws::{bernoulli, floored, log_normal, normal, poisson, uniform};
use super::scoring::{DefenseLine, StatLine};
use crate::config::{FlooredNormal, PlayerModelConfig};
use crate::models::{PlayerProjection, Position, TeamGameState};

/// Recenters `prior` on a positive override, leaving it untouched otherwise.
fn with_override(prior: FlooredNormal, value: Option<f64>) -> FlooredNormal {
    match value {
        Some(v) if v > 0.0 && v.is_finite() => prior.recentered(v),
        _ => prior,
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlayerModel {
    config: PlayerModelConfig,
}

impl PlayerModel {
    pub fn new(config: PlayerModelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlayerModelConfig {
        &self.config
    }

    /// Full per-trial draw for one player.
    ///
    /// `opponent` is only read for defenses; without it the defense faces a
    /// mirror of its own team state.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        player: &PlayerProjection,
        team: &TeamGameState,
        opponent: Option<&TeamGameState>,
        rng: &mut R,
    ) -> f64 {
        if !player.has_valid_distribution() {
            return 0.0;
        }
        if !bernoulli(rng, player.active_probability) {
            return 0.0;
        }
        let base = self.base_points(player, team, opponent, rng);
        let value = self.apply_tail(base, player, rng);
        // NaN passes through for the sampler to reject
        if value < 0.0 {
            0.0
        } else {
            value
        }
    }

    /// Position-specific score before tail modeling.
    pub fn base_points<R: Rng + ?Sized>(
        &self,
        player: &PlayerProjection,
        team: &TeamGameState,
        opponent: Option<&TeamGameState>,
        rng: &mut R,
    ) -> f64 {
        let rules = &self.config.scoring;
        match player.position {
            Position::QB => self.simulate_qb(player, team, rng).fantasy_points(rules),
            Position::RB => self.simulate_rb(player, team, rng).fantasy_points(rules),
            Position::WR | Position::TE => {
                self.simulate_receiver(player, team, rng).fantasy_points(rules)
            }
            Position::DST => {
                self.simulate_dst(team, opponent.unwrap_or(team), rng).fantasy_points(rules)
            }
        }
    }

    pub fn simulate_qb<R: Rng + ?Sized>(
        &self,
        player: &PlayerProjection,
        team: &TeamGameState,
        rng: &mut R,
    ) -> StatLine {
        let p = &self.config.qb;
        let eff = player.efficiency.as_ref();

        let role = normal(rng, 1.0, player.role_volatility).max(self.config.role_multiplier_floor);
        let attempts = team.pass_attempts() * team.game_script * role;

        let completion_rate = floored(rng, p.completion_rate);
        let ypa = floored(rng, p.yards_per_attempt);
        let td_rate = floored(rng, with_override(p.td_rate, eff.map(|e| e.td_rate)));
        let int_rate = floored(rng, p.int_rate);

        let rush_attempts = floored(rng, p.rush_attempts);
        let ypc = floored(rng, with_override(p.rush_yards_per_carry, eff.map(|e| e.yards_per_carry)));
        let rush_tds = if rush_attempts > 0.0 {
            poisson(rng, p.rush_td_mean * team.scoring_multiplier)
        } else {
            0.0
        };

        StatLine {
            completions: attempts * completion_rate,
            pass_yards: attempts * ypa,
            pass_tds: attempts * td_rate * team.scoring_multiplier,
            interceptions: attempts * int_rate,
            rush_yards: rush_attempts * ypc,
            rush_tds,
            ..Default::default()
        }
    }

    pub fn simulate_rb<R: Rng + ?Sized>(
        &self,
        player: &PlayerProjection,
        team: &TeamGameState,
        rng: &mut R,
    ) -> StatLine {
        let p = &self.config.rb;
        let eff = player.efficiency.as_ref();
        let rv = player.role_volatility;

        let team_rushes = team.rush_attempts();
        let backfield_targets = team.pass_attempts() * p.backfield_target_share;
        let carry_mean = player.carry_share(team_rushes).unwrap_or(p.fallback_carry_share);
        let target_mean = player.target_share(backfield_targets).unwrap_or(p.fallback_target_share);
        let carry_share = normal(rng, carry_mean, rv).max(0.0);
        let target_share = normal(rng, target_mean, rv).max(0.0);

        let carries = team_rushes * carry_share * team.game_script;
        let targets = backfield_targets * target_share;

        let ypc = floored(rng, with_override(p.yards_per_carry, eff.map(|e| e.yards_per_carry)));
        let catch_rate = floored(rng, with_override(p.catch_rate, eff.map(|e| e.catch_rate)));
        let ypt = floored(rng, with_override(p.yards_per_target, eff.map(|e| e.yards_per_target)));
        let rush_td_rate = floored(rng, with_override(p.rush_td_rate, eff.map(|e| e.td_rate)));
        let rec_td_rate = floored(rng, p.rec_td_rate);

        let receptions = targets * catch_rate;
        let rush_tds = poisson(rng, carries * rush_td_rate * team.scoring_multiplier);
        let rec_tds = poisson(rng, receptions * rec_td_rate * team.scoring_multiplier);
        let fumble_rate = eff.map(|e| e.fumble_rate).filter(|r| *r > 0.0).unwrap_or(p.fumble_rate);
        let fumbles = poisson(rng, (carries + receptions) * fumble_rate);

        StatLine {
            rush_yards: carries * ypc,
            rush_tds,
            receptions,
            rec_yards: targets * ypt,
            rec_tds,
            fumbles,
            ..Default::default()
        }
    }

    pub fn simulate_receiver<R: Rng + ?Sized>(
        &self,
        player: &PlayerProjection,
        team: &TeamGameState,
        rng: &mut R,
    ) -> StatLine {
        let p = self.config.receiver(player.position);
        let eff = player.efficiency.as_ref();

        let team_targets = team.pass_attempts();
        let share_mean = player.target_share(team_targets).unwrap_or(p.fallback_target_share);
        let share = normal(rng, share_mean, player.role_volatility).max(0.0);
        let targets = team_targets * share * team.game_script;

        let catch_rate = floored(rng, with_override(p.catch_rate, eff.map(|e| e.catch_rate)));
        let ypt = floored(rng, with_override(p.yards_per_target, eff.map(|e| e.yards_per_target)));
        let td_rate = floored(rng, with_override(p.td_rate, eff.map(|e| e.td_rate)));

        let receptions = targets * catch_rate;
        let rec_tds = poisson(rng, receptions * td_rate * team.scoring_multiplier);
        let fumble_rate = eff.map(|e| e.fumble_rate).filter(|r| *r > 0.0).unwrap_or(p.fumble_rate);
        let fumbles = poisson(rng, receptions * fumble_rate);

        StatLine {
            receptions,
            rec_yards: targets * ypt,
            rec_tds,
            fumbles,
            ..Default::default()
        }
    }

    /// Defense of `team` against `opponent`'s realized offense.
    pub fn simulate_dst<R: Rng + ?Sized>(
        &self,
        team: &TeamGameState,
        opponent: &TeamGameState,
        rng: &mut R,
    ) -> DefenseLine {
        let p = &self.config.dst;

        let opp_plays = opponent.pace * normal(rng, 1.0, p.opponent_pace_volatility);
        let efficiency = floored(rng, p.opponent_efficiency) / team.game_script.max(f64::EPSILON);
        let expected = (opp_plays * p.points_per_play * efficiency * opponent.scoring_multiplier)
            .max(0.0);
        let points_allowed =
            normal(rng, expected, expected * p.points_allowed_volatility).max(0.0).round();

        DefenseLine {
            points_allowed,
            sacks: poisson(rng, p.sacks_mean),
            interceptions: poisson(rng, p.interceptions_mean),
            fumble_recoveries: poisson(rng, p.fumble_recoveries_mean),
            touchdowns: poisson(rng, p.touchdowns_mean),
            safeties: poisson(rng, p.safeties_mean),
        }
    }

    /// Boom/bust tail event with the position's tail weight.
    pub fn apply_tail<R: Rng + ?Sized>(
        &self,
        base: f64,
        player: &PlayerProjection,
        rng: &mut R,
    ) -> f64 {
        let tail = &self.config.tail;
        let weight = self.config.position(player.position).tail_weight;
        if !bernoulli(rng, weight) {
            return base;
        }
        if bernoulli(rng, tail.boom_share) {
            base * log_normal(rng, tail.boom_log_mu, tail.boom_log_sigma)
        } else {
            let bust = base * uniform(rng, tail.bust_min, tail.bust_max);
            if player.bust_floor > 0.0 {
                bust.max(player.bust_floor.min(base))
            } else {
                bust
            }
        }
    }
}
