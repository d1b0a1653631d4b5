use std::collections::HashMap;

use serde::Serialize;

use crate::record::AttemptRecord;

/// A fail is charged as seven guesses in totals and fail-inclusive averages.
pub const FAIL_GUESS_WEIGHT: u32 = 7;

/// Worst result on record: a fail beats any slow solve for "worst".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Worst {
    Fail,
    Guesses(u8),
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub player: String,
    pub games: u32,
    pub wins: u32,
    pub fails: u32,
    /// Winning guesses plus seven per fail.
    pub total_guesses: u32,
    /// Mean winning guess count; 0 when the player has no wins.
    pub avg: f64,
    /// (win sum + fails * 7) / games, the primary ranking metric.
    pub avg_with_fails: f64,
    /// Best (minimum) winning guess count; `None` until the first win.
    pub best: Option<u8>,
    pub worst: Option<Worst>,
    pub ones: u32,
    pub twos: u32,
    pub threes: u32,
    pub fours: u32,
    pub fives: u32,
    pub sixes: u32,
}

impl LeaderboardRow {
    /// 2s + 3s, the "sniper" count used by period awards.
    pub fn snipes(&self) -> u32 {
        self.twos + self.threes
    }
}

#[derive(Debug, Default)]
struct PlayerAcc {
    games: u32,
    wins: u32,
    fails: u32,
    win_sum: u32,
    total_guesses: u32,
    best: Option<u8>,
    worst_win: Option<u8>,
    histogram: [u32; 6],
}

/// Reduce records into ranked per-player rows. Ranking (ascending = better):
/// fail-inclusive average, then fewer fails, then lower best, with a missing
/// best ordering after any real value. The sort is stable, so residual ties
/// keep first-appearance order.
pub fn compute_leaderboard(records: &[AttemptRecord]) -> Vec<LeaderboardRow> {
    let mut order: Vec<&str> = Vec::new();
    let mut accs: HashMap<&str, PlayerAcc> = HashMap::new();

    for rec in records {
        let acc = accs.entry(rec.player.as_str()).or_insert_with(|| {
            order.push(rec.player.as_str());
            PlayerAcc::default()
        });
        acc.games += 1;
        if rec.failed {
            acc.fails += 1;
            acc.total_guesses += FAIL_GUESS_WEIGHT;
        } else {
            acc.wins += 1;
            acc.win_sum += rec.guesses as u32;
            acc.total_guesses += rec.guesses as u32;
            acc.best = Some(acc.best.map_or(rec.guesses, |b| b.min(rec.guesses)));
            acc.worst_win = Some(acc.worst_win.map_or(rec.guesses, |w| w.max(rec.guesses)));
            // Exactly one increment per winning record.
            acc.histogram[rec.guesses as usize - 1] += 1;
        }
    }

    let mut rows: Vec<LeaderboardRow> = order
        .iter()
        .map(|player| {
            let acc = &accs[player];
            let avg = if acc.wins > 0 {
                acc.win_sum as f64 / acc.wins as f64
            } else {
                0.0
            };
            let avg_with_fails = if acc.games > 0 {
                (acc.win_sum + acc.fails * FAIL_GUESS_WEIGHT) as f64 / acc.games as f64
            } else {
                0.0
            };
            let worst = if acc.fails > 0 {
                Some(Worst::Fail)
            } else {
                acc.worst_win.map(Worst::Guesses)
            };
            LeaderboardRow {
                player: player.to_string(),
                games: acc.games,
                wins: acc.wins,
                fails: acc.fails,
                total_guesses: acc.total_guesses,
                avg,
                avg_with_fails,
                best: acc.best,
                worst,
                ones: acc.histogram[0],
                twos: acc.histogram[1],
                threes: acc.histogram[2],
                fours: acc.histogram[3],
                fives: acc.histogram[4],
                sixes: acc.histogram[5],
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.avg_with_fails
            .total_cmp(&b.avg_with_fails)
            .then_with(|| a.fails.cmp(&b.fails))
            .then_with(|| a.best.unwrap_or(u8::MAX).cmp(&b.best.unwrap_or(u8::MAX)))
    });
    rows
}
