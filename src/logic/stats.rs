//! Per-player historical counters and the post-round update.

use crate::models::{
    CourtId, EngineError, Game, GameResult, PartnershipConstraint, PlayerId, PlayerStats, Round,
};
use std::collections::HashMap;

/// Stats for every player the engine has seen, in first-seen order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsStore {
    by_player: HashMap<PlayerId, PlayerStats>,
    order: Vec<PlayerId>,
}

impl StatsStore {
    /// Seed from persisted stats, then add zeroed stats for any roster player not yet seen.
    pub fn seed(persisted: &[PlayerStats], roster: impl IntoIterator<Item = PlayerId>) -> Self {
        let mut store = Self::default();
        for stats in persisted {
            if !store.by_player.contains_key(&stats.player_id) {
                store.order.push(stats.player_id);
            }
            store.by_player.insert(stats.player_id, stats.clone());
        }
        for id in roster {
            store.entry(id);
        }
        store
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&PlayerStats> {
        self.by_player.get(&player_id)
    }

    /// Stats for `player_id`, created with zero values on first use.
    pub fn entry(&mut self, player_id: PlayerId) -> &mut PlayerStats {
        let order = &mut self.order;
        self.by_player.entry(player_id).or_insert_with(|| {
            order.push(player_id);
            PlayerStats::new(player_id)
        })
    }

    pub fn games_played(&self, player_id: PlayerId) -> u32 {
        self.get(player_id).map_or(0, |s| s.games_played)
    }

    pub fn games_sat_out(&self, player_id: PlayerId) -> u32 {
        self.get(player_id).map_or(0, |s| s.games_sat_out)
    }

    pub fn consecutive_games(&self, player_id: PlayerId) -> u32 {
        self.get(player_id).map_or(0, |s| s.consecutive_games)
    }

    pub fn partner_count(&self, player_id: PlayerId, other: PlayerId) -> u32 {
        self.get(player_id).map_or(0, |s| s.partner_count(other))
    }

    pub fn interactions(&self, player_id: PlayerId, other: PlayerId) -> u32 {
        self.get(player_id).map_or(0, |s| s.interactions_with(other))
    }

    pub fn court_games(&self, player_id: PlayerId, court_id: CourtId) -> u32 {
        self.get(player_id).map_or(0, |s| s.court_games(court_id))
    }

    pub fn was_last_partner(&self, player_id: PlayerId, other: PlayerId) -> bool {
        self.get(player_id).is_some_and(|s| s.was_last_partner(other))
    }

    pub fn was_last_opponent(&self, player_id: PlayerId, other: PlayerId) -> bool {
        self.get(player_id).is_some_and(|s| s.was_last_opponent(other))
    }

    pub fn last_partner(&self, player_id: PlayerId) -> Option<PlayerId> {
        self.get(player_id).and_then(|s| s.last_partner_id)
    }

    /// All stats in first-seen order.
    pub fn to_vec(&self) -> Vec<PlayerStats> {
        self.order
            .iter()
            .filter_map(|id| self.by_player.get(id).cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Apply a finished round to `store`.
///
/// Every game must have a result (a score, or explicitly scoreless). Each player in a game gets
/// one game played; each player in `sitting_out_ids` gets one sit-out.
pub fn apply_round(
    store: &mut StatsStore,
    round: &Round,
    partnerships: &PartnershipConstraint,
) -> Result<(), EngineError> {
    if !round.is_complete() {
        return Err(EngineError::IncompleteResults);
    }

    for game in &round.games {
        apply_game(store, game, partnerships);
    }
    for &player_id in &round.sitting_out_ids {
        store.entry(player_id).record_sat_out();
    }
    Ok(())
}

fn apply_game(store: &mut StatsStore, game: &Game, partnerships: &PartnershipConstraint) {
    let sides = [
        (game.serve_team, game.receive_team),
        (game.receive_team, game.serve_team),
    ];
    for (is_serve, (team, opponents)) in [true, false].into_iter().zip(sides) {
        let fixed = partnerships.is_active_pair(team.player1_id, team.player2_id);
        for (player_id, partner_id) in [
            (team.player1_id, team.player2_id),
            (team.player2_id, team.player1_id),
        ] {
            let stats = store.entry(player_id);
            stats.record_game(partner_id, opponents.ids(), game.court_id);
            if fixed {
                stats.fixed_partnership_games += 1;
            }
            if let Some(GameResult::Scored { serve, receive }) = game.result {
                if is_serve {
                    stats.add_score(serve, receive);
                } else {
                    stats.add_score(receive, serve);
                }
            }
        }
    }
}
