//! Static simulation inputs and per-trial outputs.

pub mod game;
pub mod player;
pub mod result;

pub use game::{
    GameEnvironment, GameState, Schedule, ScheduledTeam, Side, TeamGameState, TeamProfile,
    VenueType, WeatherCondition,
};
pub use player::{PlayerEfficiency, PlayerProjection, PlayerUsage, Position};
pub use result::{SimulationResult, SlateIndex, TrialRecord};
