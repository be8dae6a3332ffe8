//! Freshness scoring of a whole round, and the multi-trial optimizer built on it.
//!
//! Per-court selection is greedy, so one pass can paint itself into a corner on the last court.
//! The optimizer runs the full pipeline several times and keeps the freshest candidate.

use crate::logic::selection::SelectionContext;
use crate::logic::sit_out::RoundStrategy;
use crate::logic::stats::StatsStore;
use crate::models::{GameAssignment, PlayerId, RoundAssignment};
use rand::RngCore;

/// Base surcharge for repeating last round's teammates.
const REPEAT_PARTNER_BASE: u32 = 35;
/// Base surcharge for repeating last round's opponents.
const REPEAT_OPPONENT_BASE: u32 = 15;

/// Scores rounds against play history; lower is fresher.
///
/// Recency surcharges grow with `round_number`, since later in a session there are fewer
/// unseen pairings left and a repeat should still stand out.
pub struct FreshnessScorer<'a> {
    stats: &'a StatsStore,
    round_number: u32,
}

impl<'a> FreshnessScorer<'a> {
    pub fn new(stats: &'a StatsStore, round_number: u32) -> Self {
        Self { stats, round_number }
    }

    fn teammates(&self, a: PlayerId, b: PlayerId) -> u32 {
        let mut score = self.stats.interactions(a, b);
        if self.stats.was_last_partner(a, b) {
            score += REPEAT_PARTNER_BASE + self.round_number;
        }
        score
    }

    fn opponents(&self, a: PlayerId, b: PlayerId) -> u32 {
        let mut score = self.stats.interactions(a, b);
        if self.stats.was_last_opponent(a, b) {
            score += REPEAT_OPPONENT_BASE + self.round_number;
        }
        score
    }

    /// Score of one game: its six player pairs.
    pub fn score_game(&self, game: &GameAssignment) -> u32 {
        let [s1, s2] = game.serve_team.ids();
        let [r1, r2] = game.receive_team.ids();
        self.teammates(s1, s2)
            + self.teammates(r1, r2)
            + [(s1, r1), (s1, r2), (s2, r1), (s2, r2)]
                .iter()
                .map(|&(a, b)| self.opponents(a, b))
                .sum::<u32>()
    }

    pub fn score_round(&self, round: &RoundAssignment) -> u32 {
        round.game_assignments.iter().map(|g| self.score_game(g)).sum()
    }
}

/// A generated round with its freshness score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoredRound {
    pub assignment: RoundAssignment,
    pub score: u32,
}

/// Outcome of a multi-trial run: the kept candidate plus every trial's score, in trial order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptimizedRound {
    pub best: ScoredRound,
    pub candidate_scores: Vec<u32>,
}

/// Build one candidate round: sit-outs, then courts. Anyone no court could take also sits out.
pub fn build_candidate(
    ctx: &SelectionContext<'_>,
    strategy: &dyn RoundStrategy,
    forced_sit_outs: Option<&[PlayerId]>,
    rng: &mut dyn RngCore,
) -> RoundAssignment {
    let mut sitting_out: Vec<PlayerId> = match forced_sit_outs {
        Some(forced) => ctx
            .available_ids()
            .into_iter()
            .filter(|id| forced.contains(id))
            .collect(),
        None => strategy.select_sitting_out_players(ctx, ctx.slots(), rng),
    };
    let pool: Vec<PlayerId> = ctx
        .available_ids()
        .into_iter()
        .filter(|id| !sitting_out.contains(id))
        .collect();

    let fill = strategy.assign_players_to_courts(ctx, pool, rng);
    sitting_out.extend(fill.leftover);
    RoundAssignment {
        game_assignments: fill.games,
        sitting_out_ids: sitting_out,
    }
}

/// Run `trials` independent candidates and keep the lowest score (earliest on ties).
pub fn optimize_round(
    ctx: &SelectionContext<'_>,
    strategy: &dyn RoundStrategy,
    scorer: &FreshnessScorer<'_>,
    forced_sit_outs: Option<&[PlayerId]>,
    trials: usize,
    rng: &mut dyn RngCore,
) -> OptimizedRound {
    let mut best: Option<ScoredRound> = None;
    let mut candidate_scores = Vec::with_capacity(trials);
    for trial in 0..trials.max(1) {
        let assignment = build_candidate(ctx, strategy, forced_sit_outs, rng);
        let score = scorer.score_round(&assignment);
        log::debug!(
            "Trial {}: {} games, freshness score {}",
            trial + 1,
            assignment.game_assignments.len(),
            score
        );
        candidate_scores.push(score);
        if best.as_ref().map_or(true, |b| score < b.score) {
            best = Some(ScoredRound { assignment, score });
        }
    }
    OptimizedRound {
        best: best.unwrap_or(ScoredRound {
            assignment: RoundAssignment::default(),
            score: 0,
        }),
        candidate_scores,
    }
}
