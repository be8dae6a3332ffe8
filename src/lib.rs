//! Doubles court rotation: round assignment engine with models and selection logic.

pub mod logic;
pub mod models;

pub use logic::{
    AlertSink, CollectedAlerts, EngineOptions, LogAlerts, OptimizedRound, RoundEngine,
    RoundStrategy, SitOutStrategy, StatsStore,
};
pub use models::{
    Court, CourtId, EngineError, FixedPartnership, Game, GameAssignment, GameId, GameResult,
    LiveSession, PartnershipConstraint, Player, PlayerId, PlayerStats, Round, RoundAssignment,
    Session, SessionId, Side, Team,
};
