//! Session snapshot: roster, courts, partnerships and (once live) round history.

use crate::models::court::Court;
use crate::models::game::Round;
use crate::models::partnership::PartnershipConstraint;
use crate::models::player::{Player, PlayerId, PlayerStats};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Errors raised by the engine and the session snapshot.
///
/// Constraint trade-offs (rating gates, partnerships, too few players) are never errors; they
/// are resolved by the selection rules or show up as an empty assignment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EngineError {
    /// The session has no live data (round history and stats); it was never started.
    SessionNotLive,
    /// The session was already started.
    AlreadyLive,
    /// A round index outside the recorded history.
    RoundOutOfBounds { index: usize, len: usize },
    /// Not every game in the round has a result (score or explicit scoreless).
    IncompleteResults,
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Player names must not be blank.
    EmptyPlayerName,
    /// Player not found on the roster.
    PlayerNotFound(PlayerId),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::SessionNotLive => write!(f, "Session is not live"),
            EngineError::AlreadyLive => write!(f, "Session has already started"),
            EngineError::RoundOutOfBounds { index, len } => {
                write!(f, "Round index {} out of bounds ({} rounds recorded)", index, len)
            }
            EngineError::IncompleteResults => write!(f, "Not all games have a result"),
            EngineError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            EngineError::EmptyPlayerName => write!(f, "Player name must not be empty"),
            EngineError::PlayerNotFound(id) => write!(f, "Player {} not found", id),
        }
    }
}

impl std::error::Error for EngineError {}

/// Unique identifier for a session.
pub type SessionId = Uuid;

/// Data that only exists while a session is being played.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LiveSession {
    pub started_at: DateTime<Utc>,
    pub rounds: Vec<Round>,
    /// Persisted stats from the last completed round. Players missing here start at zero.
    pub player_stats: Vec<PlayerStats>,
    /// Paused or excluded players; not available for the next round.
    pub excluded_player_ids: HashSet<PlayerId>,
}

/// A scheduled play event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    pub players: Vec<Player>,
    pub courts: Vec<Court>,
    pub partnerships: PartnershipConstraint,
    /// None until the session starts.
    pub live: Option<LiveSession>,
}

impl Session {
    /// Create a session with no players or courts, not yet started.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            players: Vec::new(),
            courts: Vec::new(),
            partnerships: PartnershipConstraint::default(),
            live: None,
        }
    }

    /// Create a live session from a roster and courts (convenience for callers and tests).
    pub fn live_with(
        players: Vec<Player>,
        courts: Vec<Court>,
        partnerships: PartnershipConstraint,
    ) -> Self {
        let mut session = Self {
            players,
            courts,
            partnerships,
            ..Self::new("Session")
        };
        session.live = Some(LiveSession::new());
        session
    }

    /// Add a player. Names must be unique (case-insensitive). Returns the new player's id.
    pub fn add_player(&mut self, player: Player) -> Result<PlayerId, EngineError> {
        let name = player.name.trim();
        if name.is_empty() {
            return Err(EngineError::EmptyPlayerName);
        }
        let is_duplicate = self.players.iter().any(|p| p.name.eq_ignore_ascii_case(name));
        if is_duplicate {
            return Err(EngineError::DuplicatePlayerName);
        }
        let player = Player {
            name: name.to_owned(),
            ..player
        };
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    pub fn add_court(&mut self, court: Court) {
        self.courts.push(court);
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Start the session: create an empty round history and stats container.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.live.is_some() {
            return Err(EngineError::AlreadyLive);
        }
        self.live = Some(LiveSession::new());
        Ok(())
    }

    pub fn live(&self) -> Result<&LiveSession, EngineError> {
        self.live.as_ref().ok_or(EngineError::SessionNotLive)
    }

    fn live_mut(&mut self) -> Result<&mut LiveSession, EngineError> {
        self.live.as_mut().ok_or(EngineError::SessionNotLive)
    }

    /// Pause a player: they stay on the roster but are skipped when generating rounds.
    pub fn exclude_player(&mut self, player_id: PlayerId) -> Result<(), EngineError> {
        if !self.players.iter().any(|p| p.id == player_id) {
            return Err(EngineError::PlayerNotFound(player_id));
        }
        self.live_mut()?.excluded_player_ids.insert(player_id);
        Ok(())
    }

    pub fn include_player(&mut self, player_id: PlayerId) -> Result<(), EngineError> {
        if !self.players.iter().any(|p| p.id == player_id) {
            return Err(EngineError::PlayerNotFound(player_id));
        }
        self.live_mut()?.excluded_player_ids.remove(&player_id);
        Ok(())
    }

    /// Roster minus paused players, in roster order. Empty when the session is not live.
    pub fn available_players(&self) -> Vec<Player> {
        match &self.live {
            Some(live) => self
                .players
                .iter()
                .filter(|p| !live.excluded_player_ids.contains(&p.id))
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn round(&self, index: usize) -> Result<&Round, EngineError> {
        let rounds = &self.live()?.rounds;
        rounds.get(index).ok_or(EngineError::RoundOutOfBounds {
            index,
            len: rounds.len(),
        })
    }

    /// Mutable access to a recorded round (for entering scores).
    pub fn round_mut(&mut self, index: usize) -> Result<&mut Round, EngineError> {
        let rounds = &mut self.live_mut()?.rounds;
        let len = rounds.len();
        rounds.get_mut(index).ok_or(EngineError::RoundOutOfBounds { index, len })
    }

    /// Number of the round about to be generated: completed rounds + 1.
    pub fn current_round_number(&self) -> u32 {
        self.live
            .as_ref()
            .map_or(1, |live| live.rounds.len() as u32 + 1)
    }

    pub fn record_round(&mut self, round: Round) -> Result<(), EngineError> {
        self.live_mut()?.rounds.push(round);
        Ok(())
    }

    /// Persist stats produced by the engine after a round.
    pub fn store_stats(&mut self, stats: Vec<PlayerStats>) -> Result<(), EngineError> {
        self.live_mut()?.player_stats = stats;
        Ok(())
    }
}

impl LiveSession {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            rounds: Vec::new(),
            player_stats: Vec::new(),
            excluded_player_ids: HashSet::new(),
        }
    }
}

impl Default for LiveSession {
    fn default() -> Self {
        Self::new()
    }
}
