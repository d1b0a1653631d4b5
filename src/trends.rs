use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::record::AttemptRecord;

pub const DEFAULT_FORM_WINDOW: usize = 5;

/// One winning attempt on a player's form line: the raw guess count plus the
/// trailing rolling mean at that point.
#[derive(Debug, Clone, Serialize)]
pub struct FormPoint {
    pub date_key: String,
    pub guesses: u8,
    pub rolling: f64,
}

/// A player's chronological winning guesses with a trailing rolling average:
/// point i averages the last `min(window, i + 1)` wins. Fails never enter the
/// form line. A window of 0 is treated as 1.
pub fn player_form(records: &[AttemptRecord], player: &str, window: usize) -> Vec<FormPoint> {
    let window = window.max(1);
    let mut wins: Vec<&AttemptRecord> = records
        .iter()
        .filter(|r| r.player == player && !r.failed)
        .collect();
    wins.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.puzzle.cmp(&b.puzzle)));

    let guesses: Vec<f64> = wins.iter().map(|r| r.guesses as f64).collect();
    wins.iter()
        .enumerate()
        .map(|(i, rec)| {
            let start = (i + 1).saturating_sub(window);
            let slice = &guesses[start..=i];
            FormPoint {
                date_key: rec.date_key.clone(),
                guesses: rec.guesses,
                rolling: slice.iter().sum::<f64>() / slice.len() as f64,
            }
        })
        .collect()
}

/// Group mean of winning guesses per calendar day, in date order. Days where
/// nobody won produce no point.
#[derive(Debug, Clone, Serialize)]
pub struct DailyAverage {
    pub date_key: String,
    pub average: f64,
}

pub fn group_daily_average(records: &[AttemptRecord]) -> Vec<DailyAverage> {
    let mut by_date: BTreeMap<NaiveDate, (&str, u32, u32)> = BTreeMap::new();
    for rec in records.iter().filter(|r| !r.failed) {
        let (_, sum, count) = by_date
            .entry(rec.date)
            .or_insert((rec.date_key.as_str(), 0, 0));
        *sum += rec.guesses as u32;
        *count += 1;
    }

    by_date
        .into_values()
        .map(|(date_key, sum, count)| DailyAverage {
            date_key: date_key.to_string(),
            average: sum as f64 / count as f64,
        })
        .collect()
}
