//! Monte Carlo Sampler: drives every trial of a run.
//!
//! ## Lifecycle
//! `prepare()` validates inputs and builds the correlation factor
//! ([`RunPhase::Configured`]); `execute()` runs all trials
//! ([`RunPhase::Running`]) and returns a [`CompletedRun`]
//! ([`RunPhase::Complete`]). A failed trial aborts the run with no output.
//!
//! ## Determinism
//! Trial `i` always draws from the streams of child seed `i`. Workers take
//! contiguous trial ranges and results are concatenated in range order, so
//! any `n_jobs` reproduces the sequential run bit for bit.

use nalgebra::DMatrix;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::correlation::{CorrelationFactor, CorrelationMatrix, CorrelationModel, CorrelationPair};
use super::draws::normal;
use super::game_model::GameModel;
use super::player_model::PlayerModel;
use super::seed::SeedSequence;
use super::summary::SummaryTable;
use crate::config::{ModelConfig, SamplingConfig, SummaryConfig};
use crate::error::{Result, SimError};
use crate::estimators::pearson_correlation;
use crate::models::{
    GameEnvironment, GameState, PlayerProjection, Schedule, ScheduledTeam, Side,
    SimulationResult, SlateIndex, TeamGameState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Configured,
    Running,
    Complete,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            RunPhase::Configured => "CONFIGURED",
            RunPhase::Running => "RUNNING",
            RunPhase::Complete => "COMPLETE",
        };
        f.write_str(s)
    }
}

/// Contiguous trial ranges, one per worker: `⌊n/k⌋` each, the remainder
/// going one apiece to the earliest workers. Empty ranges are dropped.
pub fn partition_trials(n_trials: usize, n_jobs: usize) -> Vec<Range<usize>> {
    let jobs = n_jobs.max(1);
    let base = n_trials / jobs;
    let extra = n_trials % jobs;
    let mut ranges = Vec::with_capacity(jobs);
    let mut start = 0;
    for worker in 0..jobs {
        let len = base + usize::from(worker < extra);
        if len == 0 {
            continue;
        }
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// Runs `batch` over each partition, on a dedicated pool when `n_jobs > 1`,
/// and concatenates the outputs in trial order.
fn run_partitioned<T, F>(n_trials: usize, n_jobs: usize, batch: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(Range<usize>) -> Result<Vec<T>> + Sync,
{
    let ranges = partition_trials(n_trials, n_jobs);
    let batches: Vec<Vec<T>> = if ranges.len() <= 1 {
        ranges.into_iter().map(&batch).collect::<Result<_>>()?
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(ranges.len())
            .build()
            .map_err(|e| SimError::WorkerPool(e.to_string()))?;
        pool.install(|| ranges.into_par_iter().map(&batch).collect::<Result<_>>())?
    };
    Ok(batches.into_iter().flatten().collect())
}

/// Runs an arbitrary per-trial generator through the engine's seeding and
/// batching. Output is identical for any `n_jobs`.
pub fn simulate_scalar<F>(base_seed: u64, n_trials: usize, n_jobs: usize, f: F) -> Result<Vec<f64>>
where
    F: Fn(&mut ChaCha8Rng) -> f64 + Sync,
{
    let seeds = SeedSequence::new(base_seed);
    run_partitioned(n_trials, n_jobs, |range| {
        Ok(range
            .map(|i| {
                let (_, mut rng, _) = seeds.trial_rngs(i as u64);
                f(&mut rng)
            })
            .collect())
    })
}

/// Score multiplier for a global volatility scale other than 1.
pub fn volatility_adjustment<R: Rng + ?Sized>(multiplier: f64, rng: &mut R) -> f64 {
    let spread = (multiplier - 1.0).abs() * 0.2;
    normal(rng, 1.0, spread).max(0.5)
}

/// Where a player's team state comes from each trial.
#[derive(Debug, Clone)]
enum TeamSlot {
    Home(usize),
    Away(usize),
    Unscheduled(TeamGameState),
}

pub struct MonteCarloSampler {
    sampling: SamplingConfig,
    model: ModelConfig,
    summary: SummaryConfig,
    game_model: GameModel,
    player_model: PlayerModel,
    correlation_model: CorrelationModel,
}

impl MonteCarloSampler {
    pub fn new(sampling: SamplingConfig, model: ModelConfig) -> Result<Self> {
        Self::with_summary(sampling, model, SummaryConfig::default())
    }

    pub fn with_summary(
        sampling: SamplingConfig,
        model: ModelConfig,
        summary: SummaryConfig,
    ) -> Result<Self> {
        sampling.validate().map_err(SimError::InvalidConfig)?;
        model.validate().map_err(SimError::InvalidConfig)?;
        summary.validate().map_err(SimError::InvalidConfig)?;
        Ok(Self {
            game_model: GameModel::new(model.game.clone()),
            player_model: PlayerModel::new(model.player.clone()),
            correlation_model: CorrelationModel::new(model.correlation.clone(), &model.game),
            sampling,
            model,
            summary,
        })
    }

    pub fn sampling_config(&self) -> &SamplingConfig {
        &self.sampling
    }

    pub fn model_config(&self) -> &ModelConfig {
        &self.model
    }

    pub fn summary_config(&self) -> &SummaryConfig {
        &self.summary
    }

    /// Validates the slate and builds everything trials share.
    pub fn prepare(
        &self,
        players: &[PlayerProjection],
        games: &[GameEnvironment],
    ) -> Result<PreparedRun<'_>> {
        let mut seen = HashSet::new();
        for p in players {
            p.validate().map_err(|reason| SimError::InvalidPlayer {
                player_id: p.player_id.clone(),
                reason,
            })?;
            if !seen.insert(p.player_id.as_str()) {
                return Err(SimError::DuplicatePlayer(p.player_id.clone()));
            }
        }
        let mut seen_games = HashSet::new();
        for g in games {
            g.validate().map_err(|reason| SimError::InvalidGame {
                game_id: g.game_id.clone(),
                reason,
            })?;
            if !seen_games.insert(g.game_id.as_str()) {
                return Err(SimError::DuplicateGame(g.game_id.clone()));
            }
        }

        let schedule = Schedule::build(games)?;

        let slots = players
            .iter()
            .map(|p| match schedule.get(&p.team) {
                Some(ScheduledTeam { game, side: Side::Home, .. }) => TeamSlot::Home(*game),
                Some(ScheduledTeam { game, side: Side::Away, .. }) => TeamSlot::Away(*game),
                None => {
                    warn!(
                        player_id = %p.player_id,
                        team = %p.team,
                        "team has no game on the slate, using league-average state"
                    );
                    TeamSlot::Unscheduled(self.game_model.neutral_state(&p.team))
                }
            })
            .collect();

        for p in players.iter().filter(|p| !p.has_valid_distribution()) {
            warn!(player_id = %p.player_id, "degenerate projection, simulating as zero");
        }

        let seeds = match self.sampling.base_seed {
            Some(seed) => SeedSequence::new(seed),
            None => {
                let seq = SeedSequence::from_entropy();
                warn!(
                    effective_seed = seq.entropy(),
                    "no base seed configured, drew fresh entropy"
                );
                seq
            }
        };

        let correlation = self
            .correlation_model
            .build(players, &schedule)
            .scaled(self.sampling.correlation_strength, &self.model.correlation);
        let factor = (self.sampling.include_correlations && !players.is_empty())
            .then(|| correlation.factor());

        let index = Arc::new(SlateIndex::new(
            players.iter().map(|p| p.player_id.clone()).collect(),
            games.iter().map(|g| g.game_id.clone()).collect(),
        ));

        debug!(
            players = players.len(),
            games = games.len(),
            correlations = factor.is_some(),
            phase = %RunPhase::Configured,
            "run prepared"
        );

        Ok(PreparedRun {
            sampler: self,
            players: players.to_vec(),
            games: games.to_vec(),
            slots,
            index,
            correlation,
            factor,
            seeds,
        })
    }

    /// `prepare` then `execute`.
    pub fn run(
        &self,
        players: &[PlayerProjection],
        games: &[GameEnvironment],
    ) -> Result<CompletedRun> {
        self.prepare(players, games)?.execute()
    }
}

/// A validated slate ready to run.
pub struct PreparedRun<'a> {
    sampler: &'a MonteCarloSampler,
    players: Vec<PlayerProjection>,
    games: Vec<GameEnvironment>,
    slots: Vec<TeamSlot>,
    index: Arc<SlateIndex>,
    correlation: CorrelationMatrix,
    factor: Option<CorrelationFactor>,
    seeds: SeedSequence,
}

impl<'a> PreparedRun<'a> {
    pub fn phase(&self) -> RunPhase {
        RunPhase::Configured
    }

    pub fn correlation_matrix(&self) -> &CorrelationMatrix {
        &self.correlation
    }

    /// Seed the trial tree is rooted at; recorded even for unseeded runs.
    pub fn effective_seed(&self) -> u64 {
        self.seeds.entropy()
    }

    fn simulate_trial(&self, sim_id: usize) -> Result<SimulationResult> {
        let sampling = &self.sampler.sampling;
        let (seed, mut rng, mut shock_rng) = self.seeds.trial_rngs(sim_id as u64);

        let states: Vec<GameState> =
            self.games.iter().map(|g| self.sampler.game_model.simulate(g, &mut rng)).collect();
        let shocks = self.factor.as_ref().map(|f| f.sample(&mut shock_rng));

        let shock_scale = self.sampler.model.correlation.shock_scale;
        let shock_floor = self.sampler.model.correlation.shock_floor;
        let vol = sampling.volatility_multiplier;

        let mut scores = Vec::with_capacity(self.players.len());
        for (i, player) in self.players.iter().enumerate() {
            let (team, opponent) = match &self.slots[i] {
                TeamSlot::Home(g) => (&states[*g].home, Some(&states[*g].away)),
                TeamSlot::Away(g) => (&states[*g].away, Some(&states[*g].home)),
                TeamSlot::Unscheduled(state) => (state, None),
            };
            let mut score = self.sampler.player_model.simulate(player, team, opponent, &mut rng);
            if let Some(shocks) = &shocks {
                score *= (1.0 + shocks[i] * shock_scale * vol).max(shock_floor);
            }
            if vol != 1.0 {
                score *= volatility_adjustment(vol, &mut rng);
            }
            if !score.is_finite() {
                return Err(SimError::NonFiniteScore { sim_id, player_id: player.player_id.clone() });
            }
            scores.push(score.max(0.0));
        }

        Ok(SimulationResult::new(sim_id, seed, scores, states, Arc::clone(&self.index)))
    }

    fn run_batch(&self, range: Range<usize>) -> Result<Vec<SimulationResult>> {
        let batch_size = self.sampler.sampling.batch_size;
        let (start, end) = (range.start, range.end);
        let mut out = Vec::with_capacity(range.len());
        for sim_id in range {
            out.push(self.simulate_trial(sim_id)?);
            let done = sim_id + 1 - start;
            if done % batch_size == 0 {
                debug!(start, end, done, "batch progress");
            }
        }
        Ok(out)
    }

    /// Runs every trial. Any failure aborts the whole run.
    pub fn execute(self) -> Result<CompletedRun> {
        let sampling = &self.sampler.sampling;
        let n_trials = sampling.n_trials;
        let n_jobs = sampling.effective_jobs();
        info!(
            n_trials,
            n_jobs,
            players = self.players.len(),
            games = self.games.len(),
            seed = self.seeds.entropy(),
            phase = %RunPhase::Running,
            "starting simulation"
        );
        let started = Instant::now();

        let results = run_partitioned(n_trials, n_jobs, |range| self.run_batch(range))?;

        let columns: Vec<Vec<f64>> = (0..self.players.len())
            .map(|i| results.iter().map(|r| r.scores()[i]).collect())
            .collect();
        let summary = SummaryTable::build(&self.players, &columns, &self.sampler.summary)?;

        let elapsed = started.elapsed();
        let secs = elapsed.as_secs_f64();
        info!(
            n_trials,
            elapsed_ms = elapsed.as_millis() as u64,
            trials_per_sec = if secs > 0.0 { n_trials as f64 / secs } else { 0.0 },
            phase = %RunPhase::Complete,
            "simulation complete"
        );

        Ok(CompletedRun {
            results,
            columns,
            players: self.players,
            games: self.games,
            index: self.index,
            correlation: self.correlation,
            summary,
            effective_seed: self.seeds.entropy(),
            include_correlations: self.factor.is_some(),
            audit_min_magnitude: self.sampler.model.correlation.audit_min_magnitude,
            elapsed,
        })
    }
}

/// Output of a finished run.
#[derive(Debug, Clone)]
pub struct CompletedRun {
    results: Vec<SimulationResult>,
    columns: Vec<Vec<f64>>,
    players: Vec<PlayerProjection>,
    games: Vec<GameEnvironment>,
    index: Arc<SlateIndex>,
    correlation: CorrelationMatrix,
    summary: SummaryTable,
    effective_seed: u64,
    include_correlations: bool,
    audit_min_magnitude: f64,
    elapsed: Duration,
}

impl CompletedRun {
    pub fn phase(&self) -> RunPhase {
        RunPhase::Complete
    }

    /// Trials ordered by `sim_id`.
    pub fn results(&self) -> &[SimulationResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<SimulationResult> {
        self.results
    }

    pub fn summary(&self) -> &SummaryTable {
        &self.summary
    }

    pub fn players(&self) -> &[PlayerProjection] {
        &self.players
    }

    pub fn games(&self) -> &[GameEnvironment] {
        &self.games
    }

    pub fn n_trials(&self) -> usize {
        self.results.len()
    }

    pub fn effective_seed(&self) -> u64 {
        self.effective_seed
    }

    pub fn correlations_applied(&self) -> bool {
        self.include_correlations
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn correlation_matrix(&self) -> &CorrelationMatrix {
        &self.correlation
    }

    pub fn correlation_pairs(&self) -> Vec<CorrelationPair> {
        self.correlation.pairs(&self.players, self.audit_min_magnitude)
    }

    /// One player's scores across all trials.
    pub fn player_scores(&self, player_id: &str) -> Option<&[f64]> {
        self.index.player_index(player_id).map(|i| self.columns[i].as_slice())
    }

    /// Joint `n_trials x n_players` score matrix, columns in slate order.
    pub fn score_matrix(&self) -> DMatrix<f64> {
        let n_players = self.index.n_players();
        DMatrix::from_fn(self.results.len(), n_players, |r, c| self.columns[c][r])
    }

    /// Pearson correlation of two players' simulated scores.
    pub fn empirical_correlation(&self, a: &str, b: &str) -> Result<Option<f64>> {
        match (self.player_scores(a), self.player_scores(b)) {
            (Some(x), Some(y)) => Ok(Some(pearson_correlation(x, y)?)),
            _ => Ok(None),
        }
    }

    /// Realized state of one game in every trial.
    pub fn game_trace(&self, game_id: &str) -> Vec<&GameState> {
        self.results.iter().filter_map(|r| r.game_state(game_id)).collect()
    }
}
