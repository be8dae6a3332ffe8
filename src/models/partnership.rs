//! Fixed partnership constraints, as configured on the session.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a fixed partnership.
pub type PartnershipId = Uuid;

/// Two players who should always be teammates when both are playing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FixedPartnership {
    pub id: PartnershipId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub is_active: bool,
}

impl FixedPartnership {
    pub fn new(player1_id: PlayerId, player2_id: PlayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            player1_id,
            player2_id,
            is_active: true,
        }
    }

    /// Whether `a` and `b` are this partnership's two members (in either order).
    pub fn matches(&self, a: PlayerId, b: PlayerId) -> bool {
        (self.player1_id == a && self.player2_id == b)
            || (self.player1_id == b && self.player2_id == a)
    }
}

/// All fixed partnerships of a session plus how strictly they are honoured.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PartnershipConstraint {
    pub partnerships: Vec<FixedPartnership>,
    /// Hard mode: a pair is never split, even for sit-outs. Soft mode allows splitting when needed.
    pub enforce_all_pairings: bool,
}

impl PartnershipConstraint {
    pub fn new(enforce_all_pairings: bool) -> Self {
        Self {
            partnerships: Vec::new(),
            enforce_all_pairings,
        }
    }

    /// Add an active partnership between two players.
    pub fn add(&mut self, player1_id: PlayerId, player2_id: PlayerId) -> PartnershipId {
        let partnership = FixedPartnership::new(player1_id, player2_id);
        let id = partnership.id;
        self.partnerships.push(partnership);
        id
    }

    /// Active partnerships only.
    pub fn active(&self) -> impl Iterator<Item = &FixedPartnership> {
        self.partnerships.iter().filter(|p| p.is_active)
    }

    /// Whether `a` and `b` form an active fixed partnership.
    pub fn is_active_pair(&self, a: PlayerId, b: PlayerId) -> bool {
        self.active().any(|p| p.matches(a, b))
    }
}
