//! Data structures for the rotation engine: players, courts, partnerships, games, sessions.

mod court;
mod game;
mod partnership;
mod player;
mod session;

pub use court::{Court, CourtId};
pub use game::{Game, GameAssignment, GameId, GameResult, Round, RoundAssignment, Side, Team};
pub use partnership::{FixedPartnership, PartnershipConstraint, PartnershipId};
pub use player::{Player, PlayerId, PlayerStats};
pub use session::{EngineError, LiveSession, Session, SessionId};
