//! Sit-out selection strategies.
//!
//! Every strategy returns exactly `available - slots` players when it can, and never splits an
//! enforced partnership to get there. If only a whole pair can fill the last place, the pair sits
//! out and an unpaired player is handed back; if nobody can be handed back the overshoot stands.

use crate::logic::courts::{assign_sequentially, CourtFill};
use crate::logic::selection::SelectionContext;
use crate::models::PlayerId;
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Interchangeable round-building strategy.
pub trait RoundStrategy {
    /// Choose who sits out, given `slots_needed` playing places across the active courts.
    fn select_sitting_out_players(
        &self,
        ctx: &SelectionContext<'_>,
        slots_needed: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<PlayerId>;

    /// Place the remaining `pool` on courts.
    fn assign_players_to_courts(
        &self,
        ctx: &SelectionContext<'_>,
        pool: Vec<PlayerId>,
        rng: &mut dyn RngCore,
    ) -> CourtFill {
        assign_sequentially(ctx, pool, rng)
    }
}

/// Which sit-out strategy an engine uses. Chosen once, at construction.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SitOutStrategy {
    /// Fewest sit-outs play first, with pair-aware quota handling.
    #[default]
    FairWeighted,
    /// Weighted random draw favouring unpaired players who have played the most.
    Lottery,
    /// Deterministic: sit out whole units of two in fairness order.
    WholeUnits,
}

impl SitOutStrategy {
    pub fn strategy(self) -> &'static dyn RoundStrategy {
        match self {
            SitOutStrategy::FairWeighted => &FairWeightedSelector,
            SitOutStrategy::Lottery => &LotterySelector,
            SitOutStrategy::WholeUnits => &UnitSelector,
        }
    }
}

impl std::str::FromStr for SitOutStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fair" | "fair_weighted" => Ok(SitOutStrategy::FairWeighted),
            "lottery" => Ok(SitOutStrategy::Lottery),
            "units" | "whole_units" => Ok(SitOutStrategy::WholeUnits),
            other => Err(format!("Unknown sit-out strategy: {}", other)),
        }
    }
}

/// Number of players that must sit out.
fn quota(ctx: &SelectionContext<'_>, slots_needed: usize) -> usize {
    ctx.available.len().saturating_sub(slots_needed)
}

/// Fairness key: fewest sit-outs first, then most games, then longest current streak.
fn fairness_key(ctx: &SelectionContext<'_>, id: PlayerId) -> (u32, Reverse<u32>, Reverse<u32>) {
    (
        ctx.stats.games_sat_out(id),
        Reverse(ctx.stats.games_played(id)),
        Reverse(ctx.stats.consecutive_games(id)),
    )
}

/// Available players, most due to sit out first. Ties broken at random.
fn fair_ranking(ctx: &SelectionContext<'_>, rng: &mut dyn RngCore) -> Vec<PlayerId> {
    let mut with_tiebreak: Vec<(PlayerId, u32)> = ctx
        .available_ids()
        .into_iter()
        .map(|id| (id, rng.gen::<u32>()))
        .collect();
    with_tiebreak.sort_by_key(|&(id, t)| (fairness_key(ctx, id), t));
    with_tiebreak.into_iter().map(|(id, _)| id).collect()
}

/// Hit the quota exactly when pairs got in the way.
///
/// Below quota with only intact pairs left: the next pair in `ranking` sits out. Above quota:
/// unpaired players are handed back, latest-ranked (most owed a game) first.
fn settle_quota(
    ctx: &SelectionContext<'_>,
    ranking: &[PlayerId],
    selected: &mut Vec<PlayerId>,
    quota: usize,
) {
    if selected.len() < quota {
        let next_pair = ranking
            .iter()
            .filter(|id| !selected.contains(id))
            .find_map(|&id| ctx.partnerships.partner_of(id).map(|partner| [id, partner]));
        if let Some(pair) = next_pair {
            selected.extend(pair);
        }
    }
    while selected.len() > quota {
        let hand_back = ranking
            .iter()
            .rev()
            .filter(|&&id| !ctx.partnerships.is_paired(id))
            .find_map(|id| selected.iter().position(|s| s == id));
        match hand_back {
            Some(pos) => {
                selected.remove(pos);
            }
            None => {
                log::debug!(
                    "Sitting out {} players instead of {} to keep partnerships intact",
                    selected.len(),
                    quota
                );
                break;
            }
        }
    }
}

/// Primary strategy: walk the fairness ranking, seating pairs out atomically.
#[derive(Clone, Copy, Debug, Default)]
pub struct FairWeightedSelector;

impl RoundStrategy for FairWeightedSelector {
    fn select_sitting_out_players(
        &self,
        ctx: &SelectionContext<'_>,
        slots_needed: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<PlayerId> {
        let quota = quota(ctx, slots_needed);
        if quota == 0 {
            return Vec::new();
        }
        let ranking = fair_ranking(ctx, rng);
        let enforce = ctx.partnerships.enforce_all_pairings();

        let mut selected: Vec<PlayerId> = Vec::new();
        for &id in &ranking {
            let open = quota.saturating_sub(selected.len());
            if open == 0 {
                break;
            }
            if selected.contains(&id) {
                continue;
            }
            match ctx.partnerships.partner_of(id) {
                None => selected.push(id),
                Some(partner) if open >= 2 => selected.extend([id, partner]),
                // One place left: an enforced pair waits, a soft pair is split.
                Some(_) if enforce => {}
                Some(_) => selected.push(id),
            }
        }

        settle_quota(ctx, &ranking, &mut selected, quota);
        selected
    }
}

/// A sit-out unit: an intact pair or a single unpaired player.
#[derive(Clone, Debug)]
struct Unit {
    members: Vec<PlayerId>,
    paired: bool,
}

/// Random draw, weighted towards players who have played more and sat out less.
/// Unpaired players weigh double.
#[derive(Clone, Copy, Debug, Default)]
pub struct LotterySelector;

impl LotterySelector {
    fn weight(ctx: &SelectionContext<'_>, unit: &Unit) -> f64 {
        let fairness: f64 = unit
            .members
            .iter()
            .map(|&id| {
                let played = f64::from(1 + ctx.stats.games_played(id));
                played / f64::from(1 + ctx.stats.games_sat_out(id))
            })
            .sum::<f64>()
            / unit.members.len() as f64;
        if unit.paired {
            fairness
        } else {
            2.0 * fairness
        }
    }
}

impl RoundStrategy for LotterySelector {
    fn select_sitting_out_players(
        &self,
        ctx: &SelectionContext<'_>,
        slots_needed: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<PlayerId> {
        let quota = quota(ctx, slots_needed);
        if quota == 0 {
            return Vec::new();
        }
        let enforce = ctx.partnerships.enforce_all_pairings();
        let mut units: Vec<Unit> = ctx
            .partnerships
            .pairs()
            .iter()
            .map(|pair| Unit {
                members: pair.ids().to_vec(),
                paired: true,
            })
            .chain(ctx.partnerships.unpaired().iter().map(|&id| Unit {
                members: vec![id],
                paired: false,
            }))
            .collect();

        let mut selected: Vec<PlayerId> = Vec::new();
        while selected.len() < quota && !units.is_empty() {
            let weights: Vec<f64> = units.iter().map(|u| Self::weight(ctx, u)).collect();
            let Ok(dist) = WeightedIndex::new(&weights) else {
                break;
            };
            let unit = units.swap_remove(dist.sample(rng));
            let open = quota - selected.len();
            if unit.members.len() <= open {
                selected.extend(unit.members);
            } else if !enforce {
                let member = unit.members[rng.gen_range(0..unit.members.len())];
                selected.push(member);
            }
        }

        let ranking = fair_ranking(ctx, rng);
        settle_quota(ctx, &ranking, &mut selected, quota);
        selected
    }
}

/// Deterministic: groups players into units of two (pairs, then unpaired players two at a time
/// in fairness order) and sits out whole units, least sat-out first.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnitSelector;

impl UnitSelector {
    fn ranking(ctx: &SelectionContext<'_>) -> Vec<PlayerId> {
        let mut ids = ctx.available_ids();
        ids.sort_by_key(|&id| (fairness_key(ctx, id), ctx.roster_index(id)));
        ids
    }

    fn units(ctx: &SelectionContext<'_>, ranking: &[PlayerId]) -> Vec<Unit> {
        let mut units: Vec<Unit> = ctx
            .partnerships
            .pairs()
            .iter()
            .map(|pair| Unit {
                members: pair.ids().to_vec(),
                paired: true,
            })
            .collect();
        let singles: Vec<PlayerId> = ranking
            .iter()
            .copied()
            .filter(|&id| !ctx.partnerships.is_paired(id))
            .collect();
        units.extend(singles.chunks(2).map(|chunk| Unit {
            members: chunk.to_vec(),
            paired: false,
        }));
        // Per-member averages, scaled by two so units of one and two compare exactly.
        let key = |unit: &Unit| {
            let scale = 2 / unit.members.len() as u32;
            let sat_out: u32 = unit.members.iter().map(|&id| ctx.stats.games_sat_out(id)).sum();
            let played: u32 = unit.members.iter().map(|&id| ctx.stats.games_played(id)).sum();
            let first = unit.members.iter().map(|&id| ctx.roster_index(id)).min();
            (sat_out * scale, Reverse(played * scale), first)
        };
        units.sort_by_key(key);
        units
    }
}

impl RoundStrategy for UnitSelector {
    fn select_sitting_out_players(
        &self,
        ctx: &SelectionContext<'_>,
        slots_needed: usize,
        _rng: &mut dyn RngCore,
    ) -> Vec<PlayerId> {
        let quota = quota(ctx, slots_needed);
        if quota == 0 {
            return Vec::new();
        }
        let enforce = ctx.partnerships.enforce_all_pairings();
        let ranking = Self::ranking(ctx);

        let mut selected: Vec<PlayerId> = Vec::new();
        for unit in Self::units(ctx, &ranking) {
            let open = quota - selected.len();
            if open == 0 {
                break;
            }
            if unit.members.len() <= open {
                selected.extend(unit.members);
            } else if !unit.paired || !enforce {
                selected.push(unit.members[0]);
            }
        }

        settle_quota(ctx, &ranking, &mut selected, quota);
        selected
    }
}
