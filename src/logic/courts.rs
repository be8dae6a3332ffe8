//! Court ranking and the per-court, four-slot player selection.
//!
//! Courts are filled one at a time, highest rating gate first, from a shrinking pool:
//! 1. Serve player 1: fewest games on this court (rated courts), players whose partner can
//!    also play here preferred.
//! 2. Serve player 2: player 1's partner if eligible, else the least-frequent teammate.
//! 3. Receive player 3: the least-seen opponent of the serve team.
//! 4. Receive player 4: player 3's partner if eligible, else the freshest fit for all three.
//!
//! With enforced pairings, slots 1 and 3 only take an unpaired player when another unpaired
//! player is left to be their teammate, so slots 2 and 4 never have to break up a pair.

use crate::logic::selection::{lowest_by, pick, prefer, SelectionContext};
use crate::models::{Court, GameAssignment, PlayerId, Team};
use rand::RngCore;

/// Recency surcharge when a receive candidate faced a serve player last round.
const RECENT_OPPONENT_PENALTY: u32 = 15;
/// Surcharge per seated player the last-slot candidate partnered or faced last round.
const RECENT_MEETING_PENALTY: u32 = 10;

/// Active courts ordered by minimum rating, highest first (unrated counts as 0).
///
/// Rating-gated courts draw from the pool before lower courts can use up their players.
pub fn rank_courts(courts: &[Court]) -> Vec<&Court> {
    let mut active: Vec<&Court> = courts.iter().filter(|c| c.is_active).collect();
    active.sort_by(|a, b| {
        let a = a.minimum_rating.unwrap_or(0.0);
        let b = b.minimum_rating.unwrap_or(0.0);
        b.total_cmp(&a)
    });
    active
}

/// Result of filling the courts: games formed plus players no court could take.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CourtFill {
    pub games: Vec<GameAssignment>,
    pub leftover: Vec<PlayerId>,
}

/// Fill every ranked court in turn from `pool`.
///
/// A court with fewer than four eligible players left is skipped; its candidates stay in the
/// pool for the courts after it.
pub fn assign_sequentially(
    ctx: &SelectionContext<'_>,
    mut pool: Vec<PlayerId>,
    rng: &mut dyn RngCore,
) -> CourtFill {
    let mut games = Vec::new();
    for court in &ctx.courts {
        let Some(game) = select_for_court(ctx, court, &pool, rng) else {
            log::debug!("Court {} skipped: fewer than 4 eligible players", court.name);
            continue;
        };
        pool.retain(|id| !game.player_ids().contains(id));
        games.push(game);
    }
    CourtFill {
        games,
        leftover: pool,
    }
}

/// Pick four players for `court` from `pool`, or None if fewer than four are eligible.
pub fn select_for_court(
    ctx: &SelectionContext<'_>,
    court: &Court,
    pool: &[PlayerId],
    rng: &mut dyn RngCore,
) -> Option<GameAssignment> {
    let mut eligible: Vec<PlayerId> = pool
        .iter()
        .copied()
        .filter(|&id| ctx.is_eligible(id, court))
        .collect();
    if eligible.len() < 4 {
        return None;
    }

    let p1 = select_first_server(ctx, court, &eligible, rng)?;
    eligible.retain(|&id| id != p1);
    let p2 = select_teammate(ctx, court, p1, &eligible, rng)?;
    eligible.retain(|&id| id != p2);
    let p3 = select_first_receiver(ctx, [p1, p2], &eligible, rng)?;
    eligible.retain(|&id| id != p3);
    let p4 = select_last_receiver(ctx, [p1, p2, p3], &eligible, rng)?;

    Some(GameAssignment {
        court_id: court.id,
        serve_team: Team::new(p1, p2),
        receive_team: Team::new(p3, p4),
    })
}

/// Fewest games on this court, for rated courts; unrated courts keep everyone.
fn court_fairest(
    ctx: &SelectionContext<'_>,
    court: &Court,
    candidates: Vec<PlayerId>,
) -> Vec<PlayerId> {
    if court.is_rated() {
        lowest_by(candidates, |id| ctx.stats.court_games(id, court.id))
    } else {
        candidates
    }
}

/// The eligible partner of `player_id`, if they have one in `eligible`.
fn eligible_partner(
    ctx: &SelectionContext<'_>,
    player_id: PlayerId,
    eligible: &[PlayerId],
) -> Option<PlayerId> {
    ctx.partnerships
        .partner_of(player_id)
        .filter(|partner| eligible.contains(partner))
}

/// Candidates for a team's first seat (slot 1 or 3).
///
/// With enforced pairings, a single unpaired player cannot open a team: their teammate would
/// have to come out of a pair. Only the pairs are offered then.
fn anchor_candidates(ctx: &SelectionContext<'_>, remaining: &[PlayerId]) -> Vec<PlayerId> {
    if !ctx.partnerships.enforce_all_pairings() {
        return remaining.to_vec();
    }
    let (paired, unpaired): (Vec<PlayerId>, Vec<PlayerId>) = remaining
        .iter()
        .copied()
        .partition(|&id| eligible_partner(ctx, id, remaining).is_some());
    if unpaired.len() == 1 && !paired.is_empty() {
        paired
    } else {
        remaining.to_vec()
    }
}

fn select_first_server(
    ctx: &SelectionContext<'_>,
    court: &Court,
    eligible: &[PlayerId],
    rng: &mut dyn RngCore,
) -> Option<PlayerId> {
    let candidates = court_fairest(ctx, court, anchor_candidates(ctx, eligible));
    let candidates = prefer(candidates, |id| eligible_partner(ctx, id, eligible).is_some());
    pick(&candidates, rng)
}

/// Slot 2 or 4: `anchor`'s partner when eligible, else the least repeated teammate.
///
/// With enforced pairings, candidates whose own partner is still eligible are passed over so the
/// pair can be seated together later. `anchor_candidates` keeps at least one such candidate.
fn partner_candidates(
    ctx: &SelectionContext<'_>,
    anchor: PlayerId,
    remaining: &[PlayerId],
) -> Result<PlayerId, Vec<PlayerId>> {
    if let Some(partner) = eligible_partner(ctx, anchor, remaining) {
        return Ok(partner);
    }
    let mut candidates = remaining.to_vec();
    if ctx.partnerships.enforce_all_pairings() {
        candidates = prefer(candidates, |id| eligible_partner(ctx, id, remaining).is_none());
    }
    Err(lowest_by(candidates, |id| ctx.stats.partner_count(anchor, id)))
}

fn select_teammate(
    ctx: &SelectionContext<'_>,
    court: &Court,
    p1: PlayerId,
    remaining: &[PlayerId],
    rng: &mut dyn RngCore,
) -> Option<PlayerId> {
    let candidates = match partner_candidates(ctx, p1, remaining) {
        Ok(partner) => return Some(partner),
        Err(candidates) => candidates,
    };
    let last_partner = ctx.stats.last_partner(p1);
    let candidates = prefer(candidates, |id| Some(id) != last_partner);
    let candidates = court_fairest(ctx, court, candidates);
    pick(&candidates, rng)
}

/// Repeat-matchup score of a receive candidate against the serve team.
fn receiver_score(ctx: &SelectionContext<'_>, servers: [PlayerId; 2], candidate: PlayerId) -> u32 {
    servers
        .iter()
        .map(|&server| {
            let mut score = 2 * ctx.stats.interactions(server, candidate);
            if ctx.stats.was_last_opponent(server, candidate) {
                score += RECENT_OPPONENT_PENALTY;
            }
            score
        })
        .sum()
}

fn select_first_receiver(
    ctx: &SelectionContext<'_>,
    servers: [PlayerId; 2],
    remaining: &[PlayerId],
    rng: &mut dyn RngCore,
) -> Option<PlayerId> {
    let candidates = lowest_by(anchor_candidates(ctx, remaining), |id| {
        receiver_score(ctx, servers, id)
    });
    pick(&candidates, rng)
}

/// Worst interaction count with any seated player, plus recency surcharges.
fn last_slot_score(ctx: &SelectionContext<'_>, seated: [PlayerId; 3], candidate: PlayerId) -> u32 {
    let most_interactions = seated
        .iter()
        .map(|&p| ctx.stats.interactions(p, candidate))
        .max()
        .unwrap_or(0);
    let recent_meetings = seated
        .iter()
        .filter(|&&p| {
            ctx.stats.was_last_partner(p, candidate) || ctx.stats.was_last_opponent(p, candidate)
        })
        .count() as u32;
    most_interactions + RECENT_MEETING_PENALTY * recent_meetings
}

fn select_last_receiver(
    ctx: &SelectionContext<'_>,
    seated: [PlayerId; 3],
    remaining: &[PlayerId],
    rng: &mut dyn RngCore,
) -> Option<PlayerId> {
    let candidates = match partner_candidates(ctx, seated[2], remaining) {
        Ok(partner) => return Some(partner),
        Err(candidates) => candidates,
    };
    let candidates = lowest_by(candidates, |id| last_slot_score(ctx, seated, id));
    pick(&candidates, rng)
}
