use chrono::NaiveDate;

use crate::roster::RosterConfig;

pub const MIN_GUESSES: u8 = 1;
pub const MAX_GUESSES: u8 = 6;

/// One resolved attempt: a single player's result on a single calendar day.
/// Synthetic no-show fails carry `puzzle == 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    /// The date exactly as written in the sheet, kept for labeling.
    pub date_key: String,
    pub date: NaiveDate,
    pub puzzle: u32,
    pub player: String,
    /// 1..=6 for a win, 0 for a fail.
    pub guesses: u8,
    pub failed: bool,
}

impl AttemptRecord {
    pub fn synthetic_fail(date_key: &str, date: NaiveDate, player: &str) -> Self {
        Self {
            date_key: date_key.to_string(),
            date,
            puzzle: 0,
            player: player.to_string(),
            guesses: 0,
            failed: true,
        }
    }
}

/// Parse a `d/m/y` or `d/m/yyyy` date. Two-digit years mean 2000+yy.
/// Anything else (wrong shape, non-numeric parts, impossible dates) is `None`.
pub fn parse_date_dmy(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.trim().split('/');
    let day = parts.next()?.trim().parse::<u32>().ok()?;
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    let year = parts.next()?.trim().parse::<i32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let year = if year < 100 { 2000 + year } else { year };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Build one record from an ordered row: date, puzzle, player, guesses, result.
/// Rows with an unparsable date or a player outside the roster yield `None`;
/// malformed sheets are expected and non-fatal.
pub fn parse_row(fields: &[&str], config: &RosterConfig) -> Option<AttemptRecord> {
    if fields.len() < 5 {
        return None;
    }

    let date_key = fields[0].trim().to_string();
    let date = parse_date_dmy(&date_key)?;
    let puzzle = parse_count(fields[1]);
    let player = config.resolve(fields[2])?;

    // A blank or garbled guess column reads as 0, which is a fail unless the
    // result label says otherwise.
    let guesses = parse_count(fields[3]);
    let result = fields[4].trim().to_lowercase();
    let failed = result == "fail" || guesses == 0;

    if !failed && !(MIN_GUESSES as u32..=MAX_GUESSES as u32).contains(&guesses) {
        return None;
    }

    Some(AttemptRecord {
        date_key,
        date,
        puzzle,
        player,
        guesses: if failed { 0 } else { guesses as u8 },
        failed,
    })
}

fn parse_count(raw: &str) -> u32 {
    raw.trim().parse::<u32>().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> RosterConfig {
        RosterConfig::new(
            vec!["Danny".to_string(), "Barry Barry".to_string()],
            HashMap::from([("Danny Denmark".to_string(), "Danny".to_string())]),
        )
    }

    #[test]
    fn parses_two_and_four_digit_years() {
        assert_eq!(
            parse_date_dmy("5/3/24"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
        assert_eq!(
            parse_date_dmy("05/03/2024"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(parse_date_dmy(""), None);
        assert_eq!(parse_date_dmy("5/3"), None);
        assert_eq!(parse_date_dmy("5/3/24/1"), None);
        assert_eq!(parse_date_dmy("fifth/3/24"), None);
        assert_eq!(parse_date_dmy("31/2/24"), None);
    }

    #[test]
    fn fail_label_and_zero_guesses_both_mean_fail() {
        let by_label = parse_row(&["5/3/24", "100", "Danny", "6", "FAIL"], &config()).unwrap();
        assert!(by_label.failed);
        assert_eq!(by_label.guesses, 0);

        let by_zero = parse_row(&["5/3/24", "100", "Danny", "0", "win"], &config()).unwrap();
        assert!(by_zero.failed);
    }

    #[test]
    fn resolves_alias_before_storing() {
        let rec = parse_row(&["5/3/24", "100", "Danny Denmark", "3", "win"], &config()).unwrap();
        assert_eq!(rec.player, "Danny");
        assert_eq!(rec.guesses, 3);
        assert!(!rec.failed);
    }

    #[test]
    fn drops_non_roster_player_and_bad_date() {
        assert!(parse_row(&["5/3/24", "100", "Stranger", "3", "win"], &config()).is_none());
        assert!(parse_row(&["not a date", "100", "Danny", "3", "win"], &config()).is_none());
    }

    #[test]
    fn drops_out_of_range_win() {
        assert!(parse_row(&["5/3/24", "100", "Danny", "9", "win"], &config()).is_none());
    }
}
