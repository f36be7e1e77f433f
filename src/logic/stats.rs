//! Ranking and highlights computed from the recorded matches.
//!
//! `aggregate` is pure: it owns no state and gives the same result for any ordering
//! of the match list.

use crate::models::{Match, Player};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the leaderboard.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// 1-based; never shared between players.
    pub rank: usize,
    pub player: Player,
    pub wins: u32,
    /// Best single-match score.
    pub max_score: u32,
    pub played: u32,
    pub losses: u32,
}

/// A tournament-wide best (single-match score or single break) and who holds it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub player: Player,
    pub score: u32,
}

/// Leaderboard plus tournament-wide highlights. Highlights are `None` until a match is recorded.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankingView {
    pub entries: Vec<RankingEntry>,
    pub highest_match_score: Option<Highlight>,
    pub highest_break: Option<Highlight>,
}

#[derive(Default)]
struct Tally {
    wins: u32,
    losses: u32,
    played: u32,
    max_score: u32,
}

/// Keep the higher score; on equal scores keep the player earlier in the roster.
fn offer(best: &mut Option<(usize, Highlight)>, position: usize, player: &Player, score: u32) {
    let better = match best {
        None => true,
        Some((best_pos, h)) => score > h.score || (score == h.score && position < *best_pos),
    };
    if better {
        *best = Some((
            position,
            Highlight {
                player: player.clone(),
                score,
            },
        ));
    }
}

/// Aggregate wins, best scores and highlights, and rank the roster.
///
/// Ranking order: wins descending, then best single-match score descending, then roster
/// order. Ties on score for a highlight go to the player earlier in the roster.
/// Matches naming players outside the roster are ignored.
pub fn aggregate(roster: &[Player], matches: &[Match]) -> RankingView {
    let position: HashMap<&Player, usize> =
        roster.iter().enumerate().map(|(i, p)| (p, i)).collect();
    let mut tallies: Vec<Tally> = roster.iter().map(|_| Tally::default()).collect();
    let mut highest_match: Option<(usize, Highlight)> = None;
    let mut highest_break: Option<(usize, Highlight)> = None;

    for m in matches {
        let [(p1, _), (p2, _)] = m.scores();
        let (Some(&i1), Some(&i2)) = (position.get(p1), position.get(p2)) else {
            continue;
        };
        match m.winner() {
            Some(w) if w == p1 => {
                tallies[i1].wins += 1;
                tallies[i2].losses += 1;
            }
            Some(_) => {
                tallies[i2].wins += 1;
                tallies[i1].losses += 1;
            }
            None => {}
        }
        for ((player, score), idx) in m.scores().into_iter().zip([i1, i2]) {
            let tally = &mut tallies[idx];
            tally.played += 1;
            tally.max_score = tally.max_score.max(score);
            offer(&mut highest_match, idx, player, score);
        }
        let brk = m.highest_break();
        if let Some(&idx) = position.get(&brk.player) {
            offer(&mut highest_break, idx, &brk.player, brk.score);
        }
    }

    let mut order: Vec<usize> = (0..roster.len()).collect();
    // Stable sort keeps roster order for full ties.
    order.sort_by(|&a, &b| {
        let (ta, tb) = (&tallies[a], &tallies[b]);
        tb.wins
            .cmp(&ta.wins)
            .then_with(|| tb.max_score.cmp(&ta.max_score))
    });

    let entries = order
        .into_iter()
        .enumerate()
        .map(|(i, idx)| {
            let t = &tallies[idx];
            RankingEntry {
                rank: i + 1,
                player: roster[idx].clone(),
                wins: t.wins,
                max_score: t.max_score,
                played: t.played,
                losses: t.losses,
            }
        })
        .collect();

    RankingView {
        entries,
        highest_match_score: highest_match.map(|(_, h)| h),
        highest_break: highest_break.map(|(_, h)| h),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BreakRecord;

    fn game(a: &str, sa: u32, b: &str, sb: u32, brk: &str, bs: u32) -> Match {
        Match::new(
            1,
            (Player::new(a), sa),
            (Player::new(b), sb),
            BreakRecord {
                player: Player::new(brk),
                score: bs,
            },
        )
    }

    fn roster(names: &[&str]) -> Vec<Player> {
        names.iter().map(|n| Player::new(*n)).collect()
    }

    #[test]
    fn empty_match_list_ranks_in_roster_order() {
        let view = aggregate(&roster(&["X", "Y", "Z"]), &[]);
        let names: Vec<_> = view.entries.iter().map(|e| e.player.name()).collect();
        assert_eq!(names, ["X", "Y", "Z"]);
        assert!(view.entries.iter().all(|e| e.wins == 0 && e.max_score == 0));
        assert_eq!(view.highest_match_score, None);
        assert_eq!(view.highest_break, None);
    }

    #[test]
    fn ties_award_no_win() {
        let view = aggregate(&roster(&["A", "B"]), &[game("A", 4, "B", 4, "B", 3)]);
        assert!(view.entries.iter().all(|e| e.wins == 0 && e.losses == 0 && e.played == 1));
    }

    #[test]
    fn highlight_ties_go_to_earlier_roster_player() {
        let matches = [game("B", 9, "A", 9, "B", 5), game("A", 1, "B", 2, "A", 5)];
        let view = aggregate(&roster(&["A", "B"]), &matches);
        assert_eq!(view.highest_match_score.unwrap().player.name(), "A");
        assert_eq!(view.highest_break.unwrap().player.name(), "A");
    }
}
