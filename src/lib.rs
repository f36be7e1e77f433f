//! Cue sports round-robin scorekeeper: library with models and tournament logic.

pub mod logic;
pub mod models;

pub use logic::{
    aggregate, ranking_csv, Highlight, MatchSubmission, PairKey, PairingTracker, RankingEntry,
    RankingView, SubmitOutcome, TournamentEngine, MAX_MATCHES_PER_PAIR,
};
pub use models::{
    build_roster, BreakRecord, Match, MatchError, MatchId, Phase, PhaseError, Player, Progress,
    SetupError, TournamentId,
};
