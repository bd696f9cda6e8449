//! Simulation components: seeding, the game, player and correlation models,
//! the sampler that drives them, and the reporting built on their output.

pub mod cache;
pub mod correlation;
pub mod draws;
pub mod game_model;
pub mod player_model;
pub mod sampler;
pub mod scoring;
pub mod seed;
pub mod summary;

pub use cache::{CachedSampler, InMemoryCache, NoCache, RunKey, SimulationCache};
pub use correlation::{
    CorrelationFactor, CorrelationMatrix, CorrelationModel, CorrelationPair, FactorMethod,
    PairKind,
};
pub use game_model::GameModel;
pub use player_model::PlayerModel;
pub use sampler::{
    partition_trials, simulate_scalar, CompletedRun, MonteCarloSampler, PreparedRun, RunPhase,
};
pub use scoring::{DefenseLine, PointsAllowedBand, ScoringRules, StatLine};
pub use seed::SeedSequence;
pub use summary::{Percentile, PlayerSummary, SummaryFlag, SummaryTable};
