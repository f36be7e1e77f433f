//! Tournament business logic: pairing constraint, progression engine, ranking, export.

mod engine;
mod export;
mod pairing;
mod stats;

pub use engine::{MatchSubmission, SubmitOutcome, TournamentEngine};
pub use export::ranking_csv;
pub use pairing::{PairKey, PairingTracker, MAX_MATCHES_PER_PAIR};
pub use stats::{aggregate, Highlight, RankingEntry, RankingView};
