//! Read-only view shared by every selection step, plus the random tie-break helpers.
//!
//! All randomness in round generation goes through the `&mut dyn RngCore` handed to these
//! helpers, so a seeded generator makes a whole round reproducible.

use crate::logic::partnership::PartnershipContext;
use crate::logic::stats::StatsStore;
use crate::models::{Court, Player, PlayerId};
use rand::seq::SliceRandom;
use rand::RngCore;
use std::collections::HashMap;

/// Everything a selection step may look at for one round.
pub struct SelectionContext<'a> {
    /// Available players in roster order.
    pub available: &'a [Player],
    /// Active courts, highest minimum rating first.
    pub courts: Vec<&'a Court>,
    pub stats: &'a StatsStore,
    pub partnerships: &'a PartnershipContext,
    by_id: HashMap<PlayerId, &'a Player>,
}

impl<'a> SelectionContext<'a> {
    pub fn new(
        available: &'a [Player],
        courts: Vec<&'a Court>,
        stats: &'a StatsStore,
        partnerships: &'a PartnershipContext,
    ) -> Self {
        Self {
            available,
            courts,
            stats,
            partnerships,
            by_id: available.iter().map(|p| (p.id, p)).collect(),
        }
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&'a Player> {
        self.by_id.get(&player_id).copied()
    }

    pub fn available_ids(&self) -> Vec<PlayerId> {
        self.available.iter().map(|p| p.id).collect()
    }

    /// Player slots across all active courts.
    pub fn slots(&self) -> usize {
        self.courts.len() * 4
    }

    /// Whether `player_id` may play on `court`.
    ///
    /// With enforced pairings a paired player also needs their partner to meet the court's
    /// rating, so the pair drops to a lower court together.
    pub fn is_eligible(&self, player_id: PlayerId, court: &Court) -> bool {
        let meets = |id: PlayerId| {
            self.player(id)
                .is_some_and(|p| p.meets_rating(court.minimum_rating))
        };
        if !meets(player_id) {
            return false;
        }
        if !self.partnerships.enforce_all_pairings() {
            return true;
        }
        self.partnerships.partner_of(player_id).map_or(true, meets)
    }

    /// Roster position, used for deterministic ordering.
    pub fn roster_index(&self, player_id: PlayerId) -> usize {
        self.available
            .iter()
            .position(|p| p.id == player_id)
            .unwrap_or(usize::MAX)
    }
}

/// Uniform random pick.
pub fn pick(candidates: &[PlayerId], rng: &mut dyn RngCore) -> Option<PlayerId> {
    candidates.choose(rng).copied()
}

/// Candidates sharing the lowest score.
pub fn lowest_by<F>(candidates: Vec<PlayerId>, score: F) -> Vec<PlayerId>
where
    F: Fn(PlayerId) -> u32,
{
    let scored: Vec<(PlayerId, u32)> = candidates.into_iter().map(|id| (id, score(id))).collect();
    let Some(min) = scored.iter().map(|&(_, s)| s).min() else {
        return Vec::new();
    };
    scored
        .into_iter()
        .filter(|&(_, s)| s == min)
        .map(|(id, _)| id)
        .collect()
}

/// Keep candidates matching `keep`, unless none match; then keep all of them.
pub fn prefer<F>(candidates: Vec<PlayerId>, keep: F) -> Vec<PlayerId>
where
    F: Fn(PlayerId) -> bool,
{
    let preferred: Vec<PlayerId> = candidates.iter().copied().filter(|&id| keep(id)).collect();
    if preferred.is_empty() {
        candidates
    } else {
        preferred
    }
}
