//! CSV rendering of the leaderboard.

use crate::logic::stats::RankingView;
use serde::Serialize;

#[derive(Serialize)]
struct CsvRow<'a> {
    rank: usize,
    player: &'a str,
    wins: u32,
    max_score: u32,
}

/// Render the leaderboard as CSV with header `rank,player,wins,max_score`.
pub fn ranking_csv(view: &RankingView) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for entry in &view.entries {
        writer.serialize(CsvRow {
            rank: entry.rank,
            player: entry.player.name(),
            wins: entry.wins,
            max_score: entry.max_score,
        })?;
    }
    if view.entries.is_empty() {
        writer.write_record(["rank", "player", "wins", "max_score"])?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
