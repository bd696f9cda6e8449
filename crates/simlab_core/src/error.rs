use thiserror::Error;

/// Errors raised by the estimator library.
///
/// These are programmer errors (bad quantile levels, bad alpha) and are never
/// clamped away silently.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimatorError {
    #[error("Quantile level {0} must be between 0.0 and 1.0")]
    QuantileOutOfRange(f64),

    #[error("Significance level {0} must be strictly between 0.0 and 1.0")]
    InvalidAlpha(f64),

    #[error("Sample lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Distribution construction failed: {0}")]
    Distribution(String),
}

/// Errors raised while configuring or running a simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid player {player_id}: {reason}")]
    InvalidPlayer { player_id: String, reason: String },

    #[error("Duplicate player id: {0}")]
    DuplicatePlayer(String),

    #[error("Invalid game {game_id}: {reason}")]
    InvalidGame { game_id: String, reason: String },

    #[error("Team {team} is listed in both {first_game} and {second_game}")]
    TeamInMultipleGames { team: String, first_game: String, second_game: String },

    #[error("Duplicate game id: {0}")]
    DuplicateGame(String),

    #[error("Trial {sim_id} produced a non-finite score for player {player_id}")]
    NonFiniteScore { sim_id: usize, player_id: String },

    #[error("Worker pool error: {0}")]
    WorkerPool(String),

    #[error("Estimator error: {0}")]
    Estimator(#[from] EstimatorError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SimError {
    /// Input and configuration problems are fixable by the caller; trial and
    /// worker failures mean the run itself went wrong.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SimError::InvalidConfig(_)
                | SimError::InvalidPlayer { .. }
                | SimError::DuplicatePlayer(_)
                | SimError::InvalidGame { .. }
                | SimError::DuplicateGame(_)
                | SimError::TeamInMultipleGames { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
