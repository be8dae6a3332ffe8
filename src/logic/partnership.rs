//! Partnership context: which fixed partnerships are in play for this round.

use crate::logic::alerts::AlertSink;
use crate::models::{PartnershipConstraint, Player, PlayerId};
use std::collections::{HashMap, HashSet};

/// A fixed partnership with both members available this round.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PairedPlayers {
    pub first: PlayerId,
    pub second: PlayerId,
}

impl PairedPlayers {
    pub fn ids(&self) -> [PlayerId; 2] {
        [self.first, self.second]
    }
}

/// Partnerships resolved against the currently available roster. Rebuilt for every round.
#[derive(Clone, Debug, Default)]
pub struct PartnershipContext {
    partner_map: HashMap<PlayerId, PlayerId>,
    pairs: Vec<PairedPlayers>,
    unpaired: Vec<PlayerId>,
    enforce_all_pairings: bool,
}

impl PartnershipContext {
    /// Resolve `constraint` against `available` players.
    ///
    /// `roster` is every player the session knows about. A partnership naming an id outside the
    /// roster is reported to `alerts` and ignored. Inactive partnerships, or ones with a member
    /// missing from `available`, leave both members unpaired for this round.
    pub fn build(
        roster: &[Player],
        available: &[Player],
        constraint: &PartnershipConstraint,
        alerts: &mut dyn AlertSink,
    ) -> Self {
        let known: HashSet<PlayerId> = roster.iter().chain(available).map(|p| p.id).collect();
        let present: HashSet<PlayerId> = available.iter().map(|p| p.id).collect();

        let mut partner_map = HashMap::new();
        let mut pairs = Vec::new();
        for partnership in constraint.active() {
            let (a, b) = (partnership.player1_id, partnership.player2_id);
            if let Some(missing) = [a, b].into_iter().find(|id| !known.contains(id)) {
                alerts.alert(format!(
                    "Fixed partnership {} references unknown player {}; ignoring it",
                    partnership.id, missing
                ));
                continue;
            }
            if a == b {
                alerts.alert(format!(
                    "Fixed partnership {} pairs player {} with themselves; ignoring it",
                    partnership.id, a
                ));
                continue;
            }
            if !present.contains(&a) || !present.contains(&b) {
                continue;
            }
            if partner_map.contains_key(&a) || partner_map.contains_key(&b) {
                alerts.alert(format!(
                    "Fixed partnership {} overlaps another active partnership; ignoring it",
                    partnership.id
                ));
                continue;
            }
            partner_map.insert(a, b);
            partner_map.insert(b, a);
            pairs.push(PairedPlayers {
                first: a,
                second: b,
            });
        }

        let unpaired = available
            .iter()
            .map(|p| p.id)
            .filter(|id| !partner_map.contains_key(id))
            .collect();

        Self {
            partner_map,
            pairs,
            unpaired,
            enforce_all_pairings: constraint.enforce_all_pairings,
        }
    }

    /// The available fixed partner of `player_id`, if any.
    pub fn partner_of(&self, player_id: PlayerId) -> Option<PlayerId> {
        self.partner_map.get(&player_id).copied()
    }

    pub fn is_paired(&self, player_id: PlayerId) -> bool {
        self.partner_map.contains_key(&player_id)
    }

    pub fn pairs(&self) -> &[PairedPlayers] {
        &self.pairs
    }

    pub fn unpaired(&self) -> &[PlayerId] {
        &self.unpaired
    }

    pub fn enforce_all_pairings(&self) -> bool {
        self.enforce_all_pairings
    }
}
