//! Data structures for the tournament: players, matches, phase and errors.

mod game;
mod player;
mod tournament;

pub use game::{BreakRecord, Match, MatchId};
pub use player::{build_roster, Player};
pub use tournament::{MatchError, Phase, PhaseError, Progress, SetupError, TournamentId};
