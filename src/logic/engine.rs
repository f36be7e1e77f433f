//! Tournament progression: Setup -> InProgress -> Complete, and match submission.

use crate::logic::pairing::{PairKey, PairingTracker};
use crate::logic::stats::{aggregate, RankingView};
use crate::models::{
    build_roster, BreakRecord, Match, MatchError, Phase, PhaseError, Player, Progress, SetupError,
    TournamentId,
};
use serde::Serialize;
use uuid::Uuid;

/// Candidate match as entered by the caller. Scores are signed so negative input can be reported.
#[derive(Clone, Debug)]
pub struct MatchSubmission<'a> {
    pub player1: &'a str,
    pub player2: &'a str,
    pub score1: i64,
    pub score2: i64,
    pub break_player: &'a str,
    pub break_score: i64,
}

/// Result of an accepted submission.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SubmitOutcome {
    pub recorded: Match,
    pub phase: Phase,
    pub match_index: usize,
}

/// A submission that passed every check, with scores converted.
struct ValidMatch {
    p1: Player,
    p2: Player,
    score1: u32,
    score2: u32,
    highest_break: BreakRecord,
}

/// One tournament: roster, recorded matches, pairing counts and phase.
///
/// Every mutating call either succeeds completely or leaves the engine untouched.
#[derive(Clone, Debug)]
pub struct TournamentEngine {
    id: TournamentId,
    roster: Vec<Player>,
    matches: Vec<Match>,
    pairings: PairingTracker,
    total_matches: usize,
    /// Index of the next match to record (1-based).
    match_index: usize,
    phase: Phase,
}

impl Default for TournamentEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TournamentEngine {
    /// Create an engine in Setup with no roster.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            roster: Vec::new(),
            matches: Vec::new(),
            pairings: PairingTracker::new(),
            total_matches: 0,
            match_index: 1,
            phase: Phase::Setup,
        }
    }

    pub fn id(&self) -> TournamentId {
        self.id
    }

    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> Progress {
        Progress {
            match_index: self.match_index,
            total_matches: self.total_matches,
        }
    }

    pub fn roster(&self) -> &[Player] {
        &self.roster
    }

    /// Recorded matches in insertion order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Matches already played between two named players.
    pub fn pair_count(&self, a: &str, b: &str) -> u8 {
        self.pairings.count(&Player::new(a), &Player::new(b))
    }

    /// Every roster pair that may still meet, in roster order.
    pub fn remaining_pairs(&self) -> Vec<PairKey> {
        let mut pairs = Vec::new();
        for (i, a) in self.roster.iter().enumerate() {
            for b in &self.roster[i + 1..] {
                if self.pairings.is_eligible(a, b) {
                    pairs.extend(PairKey::new(a, b));
                }
            }
        }
        pairs
    }

    /// Ranking of the matches recorded so far.
    pub fn ranking(&self) -> RankingView {
        aggregate(&self.roster, &self.matches)
    }

    fn require_phase(&self, expected: Phase) -> Result<(), PhaseError> {
        if self.phase != expected {
            return Err(PhaseError {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    /// Fix the roster and start the tournament. Total length is n * (n - 1) matches.
    pub fn initialize<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), SetupError> {
        self.require_phase(Phase::Setup)?;
        let roster = build_roster(names)?;
        let n = roster.len();
        self.roster = roster;
        self.total_matches = n * (n - 1);
        self.match_index = 1;
        self.phase = Phase::InProgress;
        log::info!(
            "Tournament {} started with {} players ({} matches)",
            self.id,
            n,
            self.total_matches
        );
        Ok(())
    }

    fn roster_player(&self, name: &str) -> Result<&Player, MatchError> {
        self.roster
            .iter()
            .find(|p| **p == *name)
            .ok_or_else(|| MatchError::UnknownPlayer(name.to_string()))
    }

    /// Checks in order: both players in roster, distinct players, pair still eligible,
    /// break player is one of the two, no negative score.
    fn validate(&self, submission: &MatchSubmission<'_>) -> Result<ValidMatch, MatchError> {
        let p1 = self.roster_player(submission.player1)?.clone();
        let p2 = self.roster_player(submission.player2)?.clone();
        if p1 == p2 {
            return Err(MatchError::SamePlayer(p1));
        }
        if !self.pairings.is_eligible(&p1, &p2) {
            return Err(MatchError::PairExhausted {
                player_a: p1,
                player_b: p2,
            });
        }
        let break_name = submission.break_player;
        let break_player = if p1 == *break_name {
            p1.clone()
        } else if p2 == *break_name {
            p2.clone()
        } else {
            return Err(MatchError::InvalidBreakPlayer(break_name.to_string()));
        };
        let score1 = non_negative(&p1, submission.score1)?;
        let score2 = non_negative(&p2, submission.score2)?;
        let break_score = non_negative(&break_player, submission.break_score)?;
        Ok(ValidMatch {
            p1,
            p2,
            score1,
            score2,
            highest_break: BreakRecord {
                player: break_player,
                score: break_score,
            },
        })
    }

    /// Validate and record one match, completing the tournament once the match index
    /// passes the total.
    ///
    /// A finished tournament still reports why a submission is invalid (typically
    /// `PairExhausted`) before reporting the phase.
    pub fn submit_match(
        &mut self,
        submission: &MatchSubmission<'_>,
    ) -> Result<SubmitOutcome, MatchError> {
        if self.phase == Phase::Setup {
            return Err(PhaseError {
                expected: Phase::InProgress,
                actual: Phase::Setup,
            }
            .into());
        }
        let ValidMatch {
            p1,
            p2,
            score1,
            score2,
            highest_break,
        } = self.validate(submission)?;
        self.require_phase(Phase::InProgress)?;

        // Cannot fail: eligibility checked above.
        let pair_count = self.pairings.record_play(&p1, &p2)?;
        let recorded = Match::new(
            self.match_index,
            (p1, score1),
            (p2, score2),
            highest_break,
        );
        log::debug!(
            "Tournament {}: match {} recorded ({} vs {}, {}-{}, pair count {})",
            self.id,
            self.match_index,
            recorded.player1(),
            recorded.player2(),
            score1,
            score2,
            pair_count
        );
        self.matches.push(recorded.clone());
        self.match_index += 1;
        if self.match_index > self.total_matches {
            self.phase = Phase::Complete;
            log::info!(
                "Tournament {} complete after {} matches",
                self.id,
                self.matches.len()
            );
        }

        Ok(SubmitOutcome {
            recorded,
            phase: self.phase,
            match_index: self.match_index,
        })
    }

    /// Back to a fresh Setup from any phase. The tournament id is kept.
    pub fn reset(&mut self) {
        let id = self.id;
        *self = Self { id, ..Self::new() };
        log::info!("Tournament {} reset", id);
    }
}

fn non_negative(player: &Player, score: i64) -> Result<u32, MatchError> {
    if score < 0 {
        return Err(MatchError::NegativeScore {
            player: player.clone(),
            score,
        });
    }
    u32::try_from(score).map_err(|_| MatchError::ScoreOutOfRange {
        player: player.clone(),
        score,
    })
}
