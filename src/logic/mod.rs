//! Round generation: partnerships, sit-outs, court selection, freshness and stats.

mod alerts;
mod courts;
mod engine;
mod freshness;
mod partnership;
mod selection;
mod sit_out;
mod stats;

pub use alerts::{AlertSink, CollectedAlerts, LogAlerts};
pub use courts::{assign_sequentially, rank_courts, select_for_court, CourtFill};
pub use engine::{EngineOptions, RoundEngine, DEFAULT_TRIALS};
pub use freshness::{build_candidate, optimize_round, FreshnessScorer, OptimizedRound, ScoredRound};
pub use partnership::{PairedPlayers, PartnershipContext};
pub use selection::SelectionContext;
pub use sit_out::{
    FairWeightedSelector, LotterySelector, RoundStrategy, SitOutStrategy, UnitSelector,
};
pub use stats::{apply_round, StatsStore};
