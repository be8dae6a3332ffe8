//! Round engine: one instance per round generation, built from a session snapshot.

use crate::logic::alerts::{AlertSink, LogAlerts};
use crate::logic::courts::rank_courts;
use crate::logic::freshness::{optimize_round, FreshnessScorer, OptimizedRound};
use crate::logic::partnership::PartnershipContext;
use crate::logic::selection::SelectionContext;
use crate::logic::sit_out::SitOutStrategy;
use crate::logic::stats::{apply_round, StatsStore};
use crate::models::{
    Court, EngineError, PartnershipConstraint, Player, PlayerId, PlayerStats, Round,
    RoundAssignment, Session,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Independent candidates generated per round.
pub const DEFAULT_TRIALS: usize = 3;

/// Engine settings chosen at construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EngineOptions {
    pub strategy: SitOutStrategy,
    pub trials: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            strategy: SitOutStrategy::default(),
            trials: DEFAULT_TRIALS,
        }
    }
}

/// Generates one round from an immutable session snapshot, then folds the played round back
/// into the stats it was seeded with. Not shared between sessions.
pub struct RoundEngine<R: RngCore = StdRng> {
    roster: Vec<Player>,
    available: Vec<Player>,
    courts: Vec<Court>,
    partnerships: PartnershipConstraint,
    stats: StatsStore,
    round_number: u32,
    options: EngineOptions,
    rng: R,
    alerts: Box<dyn AlertSink>,
}

impl RoundEngine<StdRng> {
    /// Engine with an entropy-seeded random source.
    pub fn new(session: &Session, options: EngineOptions) -> Result<Self, EngineError> {
        Self::with_rng(session, options, StdRng::from_entropy())
    }
}

impl<R: RngCore> RoundEngine<R> {
    /// Snapshot `session`. Fails if the session is not live.
    pub fn with_rng(
        session: &Session,
        options: EngineOptions,
        rng: R,
    ) -> Result<Self, EngineError> {
        let live = session.live()?;
        let available = session.available_players();
        let stats = StatsStore::seed(&live.player_stats, available.iter().map(|p| p.id));
        Ok(Self {
            roster: session.players.clone(),
            available,
            courts: session.courts.clone(),
            partnerships: session.partnerships.clone(),
            stats,
            round_number: session.current_round_number(),
            options,
            rng,
            alerts: Box::new(LogAlerts),
        })
    }

    /// Send data-quality alerts to `alerts` instead of the log.
    pub fn with_alerts(mut self, alerts: impl AlertSink + 'static) -> Self {
        self.alerts = Box::new(alerts);
        self
    }

    /// The round being generated (completed rounds + 1).
    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn available_players(&self) -> &[Player] {
        &self.available
    }

    /// Generate the next round. `forced_sit_outs` replaces sit-out selection when given.
    ///
    /// An empty `game_assignments` means no court could be filled; everyone available is then
    /// listed as sitting out.
    pub fn generate_round_assignment(
        &mut self,
        forced_sit_outs: Option<&[PlayerId]>,
    ) -> RoundAssignment {
        self.optimize_round(forced_sit_outs).best.assignment
    }

    /// Like `generate_round_assignment`, but also reports every trial's freshness score.
    pub fn optimize_round(&mut self, forced_sit_outs: Option<&[PlayerId]>) -> OptimizedRound {
        let partnerships = PartnershipContext::build(
            &self.roster,
            &self.available,
            &self.partnerships,
            &mut *self.alerts,
        );
        let ctx = SelectionContext::new(
            &self.available,
            rank_courts(&self.courts),
            &self.stats,
            &partnerships,
        );
        let scorer = FreshnessScorer::new(&self.stats, self.round_number);
        let result = optimize_round(
            &ctx,
            self.options.strategy.strategy(),
            &scorer,
            forced_sit_outs,
            self.options.trials,
            &mut self.rng,
        );
        log::info!(
            "Round {}: {} games, {} sitting out (freshness {}, trials {:?})",
            self.round_number,
            result.best.assignment.game_assignments.len(),
            result.best.assignment.sitting_out_ids.len(),
            result.best.score,
            result.candidate_scores
        );
        result
    }

    /// Fold a played round into the stats and return the updated stats for persisting.
    pub fn update_stats_for_round(
        &mut self,
        round: &Round,
    ) -> Result<Vec<PlayerStats>, EngineError> {
        apply_round(&mut self.stats, round, &self.partnerships)?;
        self.round_number = round.number + 1;
        Ok(self.stats.to_vec())
    }

    /// Current stats, in first-seen order.
    pub fn player_stats(&self) -> Vec<PlayerStats> {
        self.stats.to_vec()
    }
}
