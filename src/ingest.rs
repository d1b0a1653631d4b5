use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::debug;

use crate::record::{AttemptRecord, parse_row};
use crate::roster::RosterConfig;

/// Split raw CSV text into rows of fields. The header row is dropped, as are
/// rows with fewer than five fields. No quoted-comma handling: the sheet never
/// produces it.
pub fn split_csv(text: &str) -> Vec<Vec<String>> {
    text.trim()
        .lines()
        .skip(1)
        .map(|line| line.split(',').map(|f| f.to_string()).collect::<Vec<_>>())
        .filter(|fields: &Vec<String>| fields.len() >= 5)
        .collect()
}

/// Turn raw rows into resolved records in canonical order. Rows that fail date
/// parsing or name resolution are dropped; manual data entry makes them
/// routine, so they are logged at debug level only.
pub fn ingest_rows(rows: &[Vec<String>], config: &RosterConfig) -> Vec<AttemptRecord> {
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let fields: Vec<&str> = row.iter().map(String::as_str).collect();
        match parse_row(&fields, config) {
            Some(rec) => records.push(rec),
            None => debug!("dropping row {row:?}"),
        }
    }
    sort_canonical(&mut records);
    records
}

/// Canonical processing order for everything chronological downstream:
/// date, then puzzle, then player.
pub fn sort_canonical(records: &mut [AttemptRecord]) {
    records.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.puzzle.cmp(&b.puzzle))
            .then_with(|| a.player.cmp(&b.player))
    });
}

/// The group convention: a no-show on a day anyone played counts as a fail.
/// For every date carrying at least one real record, append a synthetic fail
/// for each roster member without an entry that date. Dates nobody played
/// produce nothing. Restores canonical order before returning.
pub fn impute_missing_days(records: &mut Vec<AttemptRecord>, config: &RosterConfig) {
    let mut by_date: BTreeMap<NaiveDate, (&str, HashSet<&str>)> = BTreeMap::new();
    for rec in records.iter() {
        by_date
            .entry(rec.date)
            .or_insert_with(|| (rec.date_key.as_str(), HashSet::new()))
            .1
            .insert(rec.player.as_str());
    }

    let mut synthetic = Vec::new();
    for (date, (date_key, present)) in &by_date {
        for member in &config.roster {
            if !present.contains(member.as_str()) {
                synthetic.push(AttemptRecord::synthetic_fail(date_key, *date, member));
            }
        }
    }

    records.extend(synthetic);
    sort_canonical(records);
}

/// Read a local CSV snapshot (the excluded fetch collaborator's output) and
/// run the full ingestion pass over it.
pub fn load_csv_file(path: &Path, config: &RosterConfig) -> Result<Vec<AttemptRecord>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read attempts csv {}", path.display()))?;
    Ok(ingest_rows(&split_csv(&text), config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> RosterConfig {
        RosterConfig::new(
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            HashMap::new(),
        )
    }

    fn rows(text: &str) -> Vec<Vec<String>> {
        split_csv(text)
    }

    #[test]
    fn header_and_short_rows_are_discarded() {
        let text = "Date,Puzzle,Player,Guesses,Result\n1/3/24,100,A,3,win\njunk,row\n";
        assert_eq!(rows(text).len(), 1);
    }

    #[test]
    fn ingest_sorts_by_date_puzzle_player() {
        let text = "h,h,h,h,h\n2/3/24,101,A,3,win\n1/3/24,100,B,4,win\n1/3/24,100,A,2,win\n";
        let records = ingest_rows(&rows(text), &config());
        let order: Vec<(&str, u32)> = records
            .iter()
            .map(|r| (r.player.as_str(), r.puzzle))
            .collect();
        assert_eq!(order, vec![("A", 100), ("B", 100), ("A", 101)]);
    }

    #[test]
    fn imputes_exactly_the_absent_members() {
        let text = "h,h,h,h,h\n1/3/24,100,A,3,win\n1/3/24,100,B,4,win\n2/3/24,101,A,2,win\n";
        let mut records = ingest_rows(&rows(text), &config());
        impute_missing_days(&mut records, &config());

        let day1_synthetic: Vec<&AttemptRecord> = records
            .iter()
            .filter(|r| r.date_key == "1/3/24" && r.puzzle == 0)
            .collect();
        assert_eq!(day1_synthetic.len(), 1);
        assert_eq!(day1_synthetic[0].player, "C");
        assert!(day1_synthetic[0].failed);
        assert_eq!(day1_synthetic[0].guesses, 0);

        // Day 2: only A played, so both B and C get synthetic fails.
        let day2_synthetic = records
            .iter()
            .filter(|r| r.date_key == "2/3/24" && r.puzzle == 0)
            .count();
        assert_eq!(day2_synthetic, 2);
    }

    #[test]
    fn no_phantom_dates_are_invented() {
        let mut records = Vec::new();
        impute_missing_days(&mut records, &config());
        assert!(records.is_empty());
    }

    #[test]
    fn synthetic_fails_keep_canonical_order() {
        let text = "h,h,h,h,h\n1/3/24,100,B,4,win\n";
        let mut records = ingest_rows(&rows(text), &config());
        impute_missing_days(&mut records, &config());
        // puzzle 0 synthetics sort ahead of the real record on the same date.
        assert_eq!(records[0].puzzle, 0);
        assert_eq!(records[2].player, "B");
    }
}
