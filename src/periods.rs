use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::hall_of_fame::Leaders;
use crate::leaderboard::{LeaderboardRow, compute_leaderboard};
use crate::record::AttemptRecord;
use crate::streaks::{StreakState, compute_streaks};

/// ISO-8601 week key, `YYYY-Www`. Monday-based; week 1 holds the year's first
/// Thursday, so the ISO year can differ from the calendar year at the edges.
pub fn iso_week_key(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("{}-W{:02}", week.year(), week.week())
}

/// Calendar month key, `YYYY-MM`.
pub fn month_key(date: NaiveDate) -> String {
    format!("{}-{:02}", date.year(), date.month())
}

/// Bucket records by a period key. Returns the sorted, de-duplicated key list
/// alongside the buckets; merging all buckets reproduces the input exactly.
pub fn partition_records(
    records: &[AttemptRecord],
    key_fn: impl Fn(NaiveDate) -> String,
) -> (Vec<String>, BTreeMap<String, Vec<AttemptRecord>>) {
    let mut by_key: BTreeMap<String, Vec<AttemptRecord>> = BTreeMap::new();
    for rec in records {
        by_key.entry(key_fn(rec.date)).or_default().push(rec.clone());
    }
    let keys = by_key.keys().cloned().collect();
    (keys, by_key)
}

/// Awards handed out inside one week or month. Each is a full tie set; a
/// zero-count superlative produces no award.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PeriodAwards {
    /// Lowest fail-inclusive average.
    pub king: Option<Leaders<f64>>,
    /// Most 2s + 3s.
    pub sniper: Option<Leaders<u32>>,
    /// Most fails.
    pub brick_wall: Option<Leaders<u32>>,
    /// Longest streak within the period.
    pub streak_lord: Option<Leaders<u32>>,
}

/// One period's independent view: its own leaderboard, streaks and awards,
/// reduced over only that period's records.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodBoard {
    pub key: String,
    pub leaderboard: Vec<LeaderboardRow>,
    pub streaks: BTreeMap<String, StreakState>,
    pub awards: PeriodAwards,
}

impl PeriodBoard {
    pub fn compute(key: String, records: &[AttemptRecord]) -> Self {
        let leaderboard = compute_leaderboard(records);
        let streaks = compute_streaks(records);
        let awards = period_awards(&leaderboard, &streaks);
        Self {
            key,
            leaderboard,
            streaks,
            awards,
        }
    }
}

/// Boards for every period under a key function, in key order.
pub fn compute_period_boards(
    records: &[AttemptRecord],
    key_fn: impl Fn(NaiveDate) -> String,
) -> Vec<PeriodBoard> {
    let (_, by_key) = partition_records(records, key_fn);
    by_key
        .into_iter()
        .map(|(key, bucket)| PeriodBoard::compute(key, &bucket))
        .collect()
}

fn period_awards(
    rows: &[LeaderboardRow],
    streaks: &BTreeMap<String, StreakState>,
) -> PeriodAwards {
    let king = rows.first().map(|top| Leaders {
        value: top.avg_with_fails,
        players: rows
            .iter()
            .filter(|r| r.avg_with_fails == top.avg_with_fails)
            .map(|r| r.player.clone())
            .collect(),
    });

    PeriodAwards {
        king,
        sniper: Leaders::most(rows, |r| r.snipes()),
        brick_wall: Leaders::most(rows, |r| r.fails),
        streak_lord: Leaders::most(rows, |r| {
            streaks.get(&r.player).map_or(0, |st| st.longest)
        }),
    }
}
