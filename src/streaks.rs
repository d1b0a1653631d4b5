use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::record::AttemptRecord;

/// Consecutive-calendar-day win streaks. `current` never exceeds `longest`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakState {
    pub current: u32,
    pub longest: u32,
}

/// Per-player streaks over the record set. Streaks are measured in distinct
/// calendar days: a second record on an already-counted day never extends the
/// run, any fail resets it, and a gap of more than one day breaks it.
/// Keyed in a `BTreeMap` so serialized output is stable.
pub fn compute_streaks(records: &[AttemptRecord]) -> BTreeMap<String, StreakState> {
    let mut by_player: HashMap<&str, Vec<&AttemptRecord>> = HashMap::new();
    for rec in records {
        by_player.entry(rec.player.as_str()).or_default().push(rec);
    }

    let mut out = BTreeMap::new();
    for (player, mut series) in by_player {
        series.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.puzzle.cmp(&b.puzzle)));
        out.insert(
            player.to_string(),
            StreakState {
                current: current_streak(&series),
                longest: longest_streak(&series),
            },
        );
    }
    out
}

fn longest_streak(series: &[&AttemptRecord]) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut last_win_day = None;

    for rec in series {
        if rec.failed {
            run = 0;
            last_win_day = None;
            continue;
        }
        match last_win_day {
            Some(day) if rec.date == day => {}
            Some(day) if (rec.date - day).num_days() > 1 => run = 1,
            _ => run += 1,
        }
        last_win_day = Some(rec.date);
        longest = longest.max(run);
    }
    longest
}

fn current_streak(series: &[&AttemptRecord]) -> u32 {
    let mut current = 0u32;
    let mut last_day = None;

    for rec in series.iter().rev() {
        if rec.failed {
            break;
        }
        match last_day {
            Some(day) if rec.date == day => continue,
            Some(day) if (day - rec.date).num_days() > 1 => break,
            _ => {}
        }
        current += 1;
        last_day = Some(rec.date);
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn win(day: u32, player: &str) -> AttemptRecord {
        attempt(day, player, false)
    }

    // Fails get a later puzzle id so a same-day win/fail pair has an
    // unambiguous chronological order.
    fn fail(day: u32, player: &str) -> AttemptRecord {
        let mut rec = attempt(day, player, true);
        rec.puzzle = 200 + day;
        rec
    }

    fn attempt(day: u32, player: &str, failed: bool) -> AttemptRecord {
        AttemptRecord {
            date_key: format!("{day}/3/24"),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            puzzle: 100 + day,
            player: player.to_string(),
            guesses: if failed { 0 } else { 3 },
            failed,
        }
    }

    #[test]
    fn consecutive_wins_build_both_streaks() {
        let st = compute_streaks(&[win(1, "A"), win(2, "A"), win(3, "A")]);
        assert_eq!(st["A"], StreakState { current: 3, longest: 3 });
    }

    #[test]
    fn a_fail_clears_current_but_not_longest() {
        let st = compute_streaks(&[win(1, "A"), win(2, "A"), win(3, "A"), fail(4, "A")]);
        assert_eq!(st["A"], StreakState { current: 0, longest: 3 });
    }

    #[test]
    fn a_gap_breaks_continuity() {
        // Wins on days 1, 2 and 5: the three-day gap strands the old run.
        let st = compute_streaks(&[win(1, "A"), win(2, "A"), win(5, "A")]);
        assert_eq!(st["A"], StreakState { current: 1, longest: 2 });
    }

    #[test]
    fn duplicate_records_on_one_day_count_once() {
        let mut twice = vec![win(1, "A"), win(1, "A"), win(2, "A")];
        twice[1].puzzle = 999;
        let st = compute_streaks(&twice);
        assert_eq!(st["A"], StreakState { current: 2, longest: 2 });
    }

    #[test]
    fn win_after_fail_restarts_at_one() {
        let st = compute_streaks(&[win(1, "A"), fail(2, "A"), win(3, "A")]);
        assert_eq!(st["A"], StreakState { current: 1, longest: 1 });
    }

    #[test]
    fn players_are_independent() {
        let st = compute_streaks(&[win(1, "A"), win(2, "A"), fail(1, "B"), win(2, "B")]);
        assert_eq!(st["A"].longest, 2);
        assert_eq!(st["B"], StreakState { current: 1, longest: 1 });
    }

    #[test]
    fn current_never_exceeds_longest() {
        let st = compute_streaks(&[
            fail(1, "A"),
            win(2, "A"),
            win(3, "A"),
            win(4, "A"),
            fail(4, "A"),
            win(5, "A"),
            win(6, "A"),
        ]);
        let a = st["A"];
        assert!(a.current <= a.longest);
        assert_eq!(a, StreakState { current: 2, longest: 3 });
    }
}
