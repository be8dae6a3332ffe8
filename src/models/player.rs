//! Player and PlayerStats data structures.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::court::CourtId;

/// Unique identifier for a player (used in assignments and lookups).
pub type PlayerId = Uuid;

/// A player on the session roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Skill rating used for court eligibility. Unrated players only play on unrated courts.
    pub rating: Option<f64>,
}

impl Player {
    /// Create a new unrated player with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            rating: None,
        }
    }

    /// Create a new player with a skill rating.
    pub fn rated(name: impl Into<String>, rating: f64) -> Self {
        Self {
            rating: Some(rating),
            ..Self::new(name)
        }
    }

    /// Whether this player may play on a court gated at `minimum` (None = ungated).
    pub fn meets_rating(&self, minimum: Option<f64>) -> bool {
        match minimum {
            None => true,
            Some(min) => self.rating.is_some_and(|r| r >= min),
        }
    }
}

/// Historical play counters for one player, carried from round to round.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_id: PlayerId,
    pub games_played: u32,
    pub games_sat_out: u32,
    /// Games played in a row since the last sit-out.
    pub consecutive_games: u32,
    /// Teammate id -> games played together.
    pub partners: HashMap<PlayerId, u32>,
    /// Opponent id -> games played against.
    pub opponents: HashMap<PlayerId, u32>,
    pub games_on_court: HashMap<CourtId, u32>,
    /// Informational: games played alongside the player's fixed partner.
    pub fixed_partnership_games: u32,
    pub total_score: u32,
    pub total_score_against: u32,
    pub last_partner_id: Option<PlayerId>,
    /// The two opponents from the most recent game played.
    pub last_opponent_ids: Vec<PlayerId>,
}

impl PlayerStats {
    /// Zeroed stats for a player seen for the first time.
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            ..Self::default()
        }
    }

    pub fn partner_count(&self, other: PlayerId) -> u32 {
        self.partners.get(&other).copied().unwrap_or(0)
    }

    pub fn opponent_count(&self, other: PlayerId) -> u32 {
        self.opponents.get(&other).copied().unwrap_or(0)
    }

    /// Partner plus opponent count against `other`.
    pub fn interactions_with(&self, other: PlayerId) -> u32 {
        self.partner_count(other) + self.opponent_count(other)
    }

    pub fn court_games(&self, court_id: CourtId) -> u32 {
        self.games_on_court.get(&court_id).copied().unwrap_or(0)
    }

    pub fn was_last_partner(&self, other: PlayerId) -> bool {
        self.last_partner_id == Some(other)
    }

    pub fn was_last_opponent(&self, other: PlayerId) -> bool {
        self.last_opponent_ids.contains(&other)
    }

    /// Record one game played with `partner` against `opponents` on `court_id`.
    pub fn record_game(&mut self, partner: PlayerId, opponents: [PlayerId; 2], court_id: CourtId) {
        self.games_played += 1;
        self.consecutive_games += 1;
        *self.partners.entry(partner).or_insert(0) += 1;
        for opponent in opponents {
            *self.opponents.entry(opponent).or_insert(0) += 1;
        }
        *self.games_on_court.entry(court_id).or_insert(0) += 1;
        self.last_partner_id = Some(partner);
        self.last_opponent_ids = opponents.to_vec();
    }

    /// Record that this player sat out one round.
    pub fn record_sat_out(&mut self) {
        self.games_sat_out += 1;
        self.consecutive_games = 0;
    }

    pub fn add_score(&mut self, scored: u32, conceded: u32) {
        self.total_score += scored;
        self.total_score_against += conceded;
    }
}
