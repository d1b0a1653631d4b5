use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::hall_of_fame::{HallOfFame, Leaders, compute_hall_of_fame};
use crate::ingest::{impute_missing_days, ingest_rows, split_csv};
use crate::leaderboard::{LeaderboardRow, compute_leaderboard};
use crate::periods::{PeriodBoard, compute_period_boards, iso_week_key, month_key};
use crate::record::AttemptRecord;
use crate::roster::RosterConfig;
use crate::streaks::{StreakState, compute_streaks};
use crate::trends::{DailyAverage, group_daily_average};

/// The snapshot held no usable records. Distinct from real failures so a
/// caller can show "no data yet" instead of an error banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoData;

impl fmt::Display for NoData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no attempt records after filtering")
    }
}

impl std::error::Error for NoData {}

/// Headline chips: the current leader, the group mean, and whoever holds the
/// longest active streak.
#[derive(Debug, Clone, Serialize)]
pub struct GroupSummary {
    pub group_average: f64,
    pub top: Option<Leaders<f64>>,
    pub current_streak: Option<Leaders<u32>>,
}

/// Every derived view for one snapshot of the sheet. Pure function of the
/// record set: recomputing over the same records yields the same bundle.
#[derive(Debug, Clone, Serialize)]
pub struct LeagueStats {
    pub leaderboard: Vec<LeaderboardRow>,
    pub streaks: BTreeMap<String, StreakState>,
    pub week_keys: Vec<String>,
    pub weekly: Vec<PeriodBoard>,
    pub month_keys: Vec<String>,
    pub monthly: Vec<PeriodBoard>,
    pub hall_of_fame: HallOfFame,
    pub summary: GroupSummary,
    pub daily_average: Vec<DailyAverage>,
}

impl LeagueStats {
    /// One synchronous pass over ingested records: impute no-show fails, then
    /// derive every view. Errors with [`NoData`] when nothing survived
    /// ingestion.
    pub fn compute(mut records: Vec<AttemptRecord>, config: &RosterConfig) -> Result<Self> {
        if records.is_empty() {
            return Err(NoData.into());
        }
        impute_missing_days(&mut records, config);

        let leaderboard = compute_leaderboard(&records);
        let streaks = compute_streaks(&records);

        let weekly = compute_period_boards(&records, iso_week_key);
        let week_keys = weekly.iter().map(|b| b.key.clone()).collect();
        let monthly = compute_period_boards(&records, month_key);
        let month_keys = monthly.iter().map(|b| b.key.clone()).collect();

        let hall_of_fame = compute_hall_of_fame(&records, &leaderboard, &streaks);
        let summary = group_summary(&leaderboard, &streaks);
        let daily_average = group_daily_average(&records);

        Ok(Self {
            leaderboard,
            streaks,
            week_keys,
            weekly,
            month_keys,
            monthly,
            hall_of_fame,
            summary,
            daily_average,
        })
    }

    /// Convenience for the common path: raw CSV text straight to views.
    pub fn from_csv(text: &str, config: &RosterConfig) -> Result<Self> {
        Self::compute(ingest_rows(&split_csv(text), config), config)
    }

    /// Serialize the whole bundle for the rendering layer.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).context("serialize league stats")
    }
}

fn group_summary(
    rows: &[LeaderboardRow],
    streaks: &BTreeMap<String, StreakState>,
) -> GroupSummary {
    let group_average = if rows.is_empty() {
        0.0
    } else {
        rows.iter().map(|r| r.avg_with_fails).sum::<f64>() / rows.len() as f64
    };

    let top = rows.first().map(|first| Leaders {
        value: first.avg_with_fails,
        players: rows
            .iter()
            .filter(|r| r.avg_with_fails == first.avg_with_fails)
            .map(|r| r.player.clone())
            .collect(),
    });

    GroupSummary {
        group_average,
        top,
        current_streak: Leaders::most(rows, |r| {
            streaks.get(&r.player).map_or(0, |st| st.current)
        }),
    }
}
