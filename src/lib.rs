//! Statistics and rankings for a small league of daily word-puzzle players.
//! CSV-shaped attempt rows go in; leaderboards, streaks, period boards, hall
//! of fame records and trend lines come out as plain serializable data.

pub mod hall_of_fame;
pub mod ingest;
pub mod leaderboard;
pub mod league;
pub mod periods;
pub mod record;
pub mod roster;
pub mod streaks;
pub mod trends;
