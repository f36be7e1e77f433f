//! Pairing constraint: each unordered pair of players may meet at most twice.

use crate::models::{MatchError, Player};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Matches allowed between the same two players.
pub const MAX_MATCHES_PER_PAIR: u8 = 2;

/// Unordered pair of two distinct players, stored sorted so (A, B) and (B, A) are the same key.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct PairKey(Player, Player);

impl PairKey {
    /// Canonical key for two players; `None` if they are the same player.
    pub fn new(a: &Player, b: &Player) -> Option<Self> {
        match a.cmp(b) {
            std::cmp::Ordering::Less => Some(Self(a.clone(), b.clone())),
            std::cmp::Ordering::Greater => Some(Self(b.clone(), a.clone())),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn players(&self) -> (&Player, &Player) {
        (&self.0, &self.1)
    }
}

/// Count of matches played per pair. Counts only ever go up, and never past the cap.
#[derive(Clone, Debug, Default)]
pub struct PairingTracker {
    counts: HashMap<PairKey, u8>,
}

impl PairingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches already played between `a` and `b` (0 for unseen pairs and for a == b).
    pub fn count(&self, a: &Player, b: &Player) -> u8 {
        PairKey::new(a, b)
            .and_then(|key| self.counts.get(&key).copied())
            .unwrap_or(0)
    }

    /// True iff `a != b` and the pair has played fewer than the cap.
    pub fn is_eligible(&self, a: &Player, b: &Player) -> bool {
        a != b && self.count(a, b) < MAX_MATCHES_PER_PAIR
    }

    /// Record one more match between `a` and `b`, returning the updated count (1 or 2).
    pub fn record_play(&mut self, a: &Player, b: &Player) -> Result<u8, MatchError> {
        let key = PairKey::new(a, b).ok_or_else(|| MatchError::SamePlayer(a.clone()))?;
        let count = self.counts.entry(key).or_insert(0);
        if *count >= MAX_MATCHES_PER_PAIR {
            return Err(MatchError::PairExhausted {
                player_a: a.clone(),
                player_b: b.clone(),
            });
        }
        *count += 1;
        Ok(*count)
    }

    /// Forget every recorded pair.
    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str) -> Player {
        Player::new(name)
    }

    #[test]
    fn pair_key_is_unordered() {
        assert_eq!(PairKey::new(&p("A"), &p("B")), PairKey::new(&p("B"), &p("A")));
        assert_eq!(PairKey::new(&p("A"), &p("A")), None);
    }

    #[test]
    fn record_play_counts_up_to_cap_then_rejects() {
        let mut tracker = PairingTracker::new();
        assert_eq!(tracker.record_play(&p("A"), &p("B")), Ok(1));
        assert!(tracker.is_eligible(&p("B"), &p("A")));
        assert_eq!(tracker.record_play(&p("B"), &p("A")), Ok(2));
        assert!(!tracker.is_eligible(&p("A"), &p("B")));
        assert!(matches!(
            tracker.record_play(&p("A"), &p("B")),
            Err(MatchError::PairExhausted { .. })
        ));
        assert_eq!(tracker.count(&p("A"), &p("B")), 2);
    }

    #[test]
    fn same_player_is_never_eligible() {
        let mut tracker = PairingTracker::new();
        assert!(!tracker.is_eligible(&p("A"), &p("A")));
        assert!(matches!(
            tracker.record_play(&p("A"), &p("A")),
            Err(MatchError::SamePlayer(_))
        ));
    }

    #[test]
    fn pairs_are_tracked_independently() {
        let mut tracker = PairingTracker::new();
        tracker.record_play(&p("A"), &p("B")).unwrap();
        tracker.record_play(&p("A"), &p("B")).unwrap();
        assert!(tracker.is_eligible(&p("A"), &p("C")));
        assert_eq!(tracker.count(&p("C"), &p("B")), 0);
        tracker.clear();
        assert!(tracker.is_eligible(&p("A"), &p("B")));
    }
}
