use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::leaderboard::LeaderboardRow;
use crate::record::AttemptRecord;
use crate::streaks::StreakState;

/// A superlative value and everyone tied at it. Ties are first-class: the set
/// is replaced wholesale on a strictly better value and grown on an equal one,
/// never collapsed to a single winner.
#[derive(Debug, Clone, Serialize)]
pub struct Leaders<T> {
    pub value: T,
    pub players: Vec<String>,
}

impl Leaders<u32> {
    /// Maximum of a counting stat across rows, with its tie set. A maximum of
    /// zero means nobody earned the record, not a zero-valued one.
    pub fn most(rows: &[LeaderboardRow], value: impl Fn(&LeaderboardRow) -> u32) -> Option<Self> {
        let best = rows.iter().map(&value).max()?;
        if best == 0 {
            return None;
        }
        Some(Self {
            value: best,
            players: rows
                .iter()
                .filter(|r| value(r) == best)
                .map(|r| r.player.clone())
                .collect(),
        })
    }
}

/// Lowest winning guess count ever, held by whoever hit it most often.
#[derive(Debug, Clone, Serialize)]
pub struct BestSolve {
    pub guesses: u8,
    /// How many times the leaders hit that minimum.
    pub count: u32,
    pub players: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HardestPuzzle {
    /// Mean winning guess count, wins only.
    pub average: f64,
    pub puzzles: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HallOfFame {
    /// Lowest fail-inclusive average over the full history.
    pub king: Option<Leaders<f64>>,
    pub most_wins: Option<Leaders<u32>>,
    pub best_solve: Option<BestSolve>,
    pub most_twos: Option<Leaders<u32>>,
    pub most_threes: Option<Leaders<u32>>,
    pub streak_lord: Option<Leaders<u32>>,
    /// Lowest population standard deviation of winning guesses, five wins
    /// minimum to qualify.
    pub most_consistent: Option<Leaders<f64>>,
    pub hardest_puzzle: Option<HardestPuzzle>,
    pub most_fails: Option<Leaders<u32>>,
}

const CONSISTENCY_MIN_WINS: usize = 5;

/// Run every superlative query over the full history. `rows` and `streaks`
/// are the full-history leaderboard and streak map for the same records.
pub fn compute_hall_of_fame(
    records: &[AttemptRecord],
    rows: &[LeaderboardRow],
    streaks: &BTreeMap<String, StreakState>,
) -> HallOfFame {
    HallOfFame {
        king: king(rows),
        most_wins: Leaders::most(rows, |r| r.wins),
        best_solve: best_solve(records, rows),
        most_twos: Leaders::most(rows, |r| r.twos),
        most_threes: Leaders::most(rows, |r| r.threes),
        streak_lord: Leaders::most(rows, |r| {
            streaks.get(&r.player).map_or(0, |st| st.longest)
        }),
        most_consistent: most_consistent(records, rows),
        hardest_puzzle: hardest_puzzle(records),
        most_fails: Leaders::most(rows, |r| r.fails),
    }
}

fn king(rows: &[LeaderboardRow]) -> Option<Leaders<f64>> {
    let best = rows
        .iter()
        .map(|r| r.avg_with_fails)
        .min_by(f64::total_cmp)?;
    if best <= 0.0 {
        return None;
    }
    Some(Leaders {
        value: best,
        players: rows
            .iter()
            .filter(|r| r.avg_with_fails == best)
            .map(|r| r.player.clone())
            .collect(),
    })
}

/// Minimum guess count among all wins, then the players who solved at that
/// minimum most often. One lucky single hit does not outrank a repeat.
fn best_solve(records: &[AttemptRecord], rows: &[LeaderboardRow]) -> Option<BestSolve> {
    let guesses = records
        .iter()
        .filter(|r| !r.failed)
        .map(|r| r.guesses)
        .min()?;

    let mut counts: HashMap<&str, u32> = HashMap::new();
    for rec in records.iter().filter(|r| !r.failed && r.guesses == guesses) {
        *counts.entry(rec.player.as_str()).or_default() += 1;
    }
    let count = counts.values().copied().max()?;

    // Emit leaders in leaderboard order so the tie set is deterministic.
    let players = rows
        .iter()
        .filter(|r| counts.get(r.player.as_str()) == Some(&count))
        .map(|r| r.player.clone())
        .collect();
    Some(BestSolve {
        guesses,
        count,
        players,
    })
}

fn most_consistent(records: &[AttemptRecord], rows: &[LeaderboardRow]) -> Option<Leaders<f64>> {
    let mut wins_by_player: HashMap<&str, Vec<f64>> = HashMap::new();
    for rec in records.iter().filter(|r| !r.failed) {
        wins_by_player
            .entry(rec.player.as_str())
            .or_default()
            .push(rec.guesses as f64);
    }

    let mut best: Option<Leaders<f64>> = None;
    for row in rows {
        let Some(wins) = wins_by_player.get(row.player.as_str()) else {
            continue;
        };
        if wins.len() < CONSISTENCY_MIN_WINS {
            continue;
        }
        let sd = population_sd(wins);
        match &mut best {
            Some(leaders) if sd == leaders.value => leaders.players.push(row.player.clone()),
            Some(leaders) if sd < leaders.value => {
                *leaders = Leaders {
                    value: sd,
                    players: vec![row.player.clone()],
                };
            }
            Some(_) => {}
            None => {
                best = Some(Leaders {
                    value: sd,
                    players: vec![row.player.clone()],
                });
            }
        }
    }
    best
}

fn hardest_puzzle(records: &[AttemptRecord]) -> Option<HardestPuzzle> {
    let mut by_puzzle: BTreeMap<u32, (u32, u32)> = BTreeMap::new();
    for rec in records.iter().filter(|r| !r.failed) {
        let (sum, count) = by_puzzle.entry(rec.puzzle).or_default();
        *sum += rec.guesses as u32;
        *count += 1;
    }

    let mut best: Option<HardestPuzzle> = None;
    for (puzzle, (sum, count)) in by_puzzle {
        let average = sum as f64 / count as f64;
        match &mut best {
            Some(hardest) if average == hardest.average => hardest.puzzles.push(puzzle),
            Some(hardest) if average > hardest.average => {
                *hardest = HardestPuzzle {
                    average,
                    puzzles: vec![puzzle],
                };
            }
            Some(_) => {}
            None => {
                best = Some(HardestPuzzle {
                    average,
                    puzzles: vec![puzzle],
                });
            }
        }
    }
    best
}

fn population_sd(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
