//! Tournament phase, progress and the error taxonomy for engine operations.

use crate::models::player::Player;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Unique identifier for a tournament.
pub type TournamentId = uuid::Uuid;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Roster not fixed yet; no matches accepted.
    #[default]
    Setup,
    /// Matches accepted one at a time.
    InProgress,
    /// Terminal until reset; show the ranking.
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Setup => "setup",
            Phase::InProgress => "in progress",
            Phase::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// Sequencing position: the index of the next match and the declared tournament length.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub match_index: usize,
    pub total_matches: usize,
}

/// An operation was called in a phase that does not allow it.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("Operation requires phase '{expected}' but tournament is '{actual}'")]
pub struct PhaseError {
    pub expected: Phase,
    pub actual: Phase,
}

/// Errors from `initialize`. The engine is unchanged when one is returned.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SetupError {
    #[error(transparent)]
    WrongPhase(#[from] PhaseError),

    #[error("Need at least 2 players (got {count})")]
    InsufficientPlayers { count: usize },

    #[error("Player {} has an empty name", .position + 1)]
    EmptyPlayerName { position: usize },

    #[error("A player named '{0}' already exists")]
    DuplicatePlayerName(String),
}

/// Errors from `submit_match`. The engine is unchanged when one is returned.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MatchError {
    #[error(transparent)]
    WrongPhase(#[from] PhaseError),

    #[error("'{0}' is not in the roster")]
    UnknownPlayer(String),

    #[error("'{0}' cannot play against themselves")]
    SamePlayer(Player),

    #[error("{player_a} and {player_b} have already played each other twice, pick another opponent")]
    PairExhausted { player_a: Player, player_b: Player },

    #[error("Highest break player '{0}' did not play in this match")]
    InvalidBreakPlayer(String),

    #[error("Score for {player} must not be negative (got {score})")]
    NegativeScore { player: Player, score: i64 },

    #[error("Score for {player} is too large (got {score})")]
    ScoreOutOfRange { player: Player, score: i64 },
}
