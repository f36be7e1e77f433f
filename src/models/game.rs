//! A recorded match between two players, with its highest break.

use crate::models::player::Player;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Highest single break in a match and who made it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BreakRecord {
    pub player: Player,
    pub score: u32,
}

/// A single match: two distinct roster players, their final scores and the highest break.
///
/// Fields are private; a `Match` only comes out of the engine and never changes afterwards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    id: MatchId,
    /// 1-based position in the tournament's match list.
    number: usize,
    player1: Player,
    player2: Player,
    score1: u32,
    score2: u32,
    highest_break: BreakRecord,
    recorded_at: DateTime<Utc>,
}

impl Match {
    pub(crate) fn new(
        number: usize,
        (player1, score1): (Player, u32),
        (player2, score2): (Player, u32),
        highest_break: BreakRecord,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            player1,
            player2,
            score1,
            score2,
            highest_break,
            recorded_at: Utc::now(),
        }
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn player1(&self) -> &Player {
        &self.player1
    }

    pub fn player2(&self) -> &Player {
        &self.player2
    }

    /// Both players with their scores, player1 first.
    pub fn scores(&self) -> [(&Player, u32); 2] {
        [(&self.player1, self.score1), (&self.player2, self.score2)]
    }

    /// Score of `player` in this match, or `None` if they did not play in it.
    pub fn score_of(&self, player: &Player) -> Option<u32> {
        if *player == self.player1 {
            Some(self.score1)
        } else if *player == self.player2 {
            Some(self.score2)
        } else {
            None
        }
    }

    /// The strictly higher scorer; `None` on a tie.
    pub fn winner(&self) -> Option<&Player> {
        match self.score1.cmp(&self.score2) {
            std::cmp::Ordering::Greater => Some(&self.player1),
            std::cmp::Ordering::Less => Some(&self.player2),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn highest_break(&self) -> &BreakRecord {
        &self.highest_break
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(score1: u32, score2: u32) -> Match {
        Match::new(
            1,
            (Player::new("A"), score1),
            (Player::new("B"), score2),
            BreakRecord {
                player: Player::new("A"),
                score: 7,
            },
        )
    }

    #[test]
    fn winner_is_strictly_higher_scorer() {
        assert_eq!(sample(3, 1).winner(), Some(&Player::new("A")));
        assert_eq!(sample(1, 3).winner(), Some(&Player::new("B")));
        assert_eq!(sample(2, 2).winner(), None);
    }

    #[test]
    fn score_of_non_participant_is_none() {
        let m = sample(4, 9);
        assert_eq!(m.score_of(&Player::new("B")), Some(9));
        assert_eq!(m.score_of(&Player::new("C")), None);
    }
}
