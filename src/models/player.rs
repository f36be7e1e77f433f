//! Player identity and roster validation.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::models::tournament::SetupError;

/// A player, identified by a unique display name (case-sensitive, exact match).
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Player {
    name: String,
}

impl Player {
    /// Create a player with exactly the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Player {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Player {
    fn eq(&self, other: &str) -> bool {
        self.name == other
    }
}

/// Build a roster from names taken as given: at least 2 players, none empty, no duplicates.
///
/// Checks run in that order, so a roster of one empty name reports
/// `InsufficientPlayers` rather than `EmptyPlayerName`.
pub fn build_roster<S: AsRef<str>>(names: &[S]) -> Result<Vec<Player>, SetupError> {
    if names.len() < 2 {
        return Err(SetupError::InsufficientPlayers { count: names.len() });
    }
    let mut seen = HashSet::with_capacity(names.len());
    let mut roster = Vec::with_capacity(names.len());
    for (position, raw) in names.iter().enumerate() {
        let player = Player::new(raw.as_ref());
        if player.name().is_empty() {
            return Err(SetupError::EmptyPlayerName { position });
        }
        if !seen.insert(player.name().to_string()) {
            return Err(SetupError::DuplicatePlayerName(player.name().to_string()));
        }
        roster.push(player);
    }
    Ok(roster)
}
