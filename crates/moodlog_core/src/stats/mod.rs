//! Rule-based aggregations over a journal window.
//!
//! # Responsibility
//! - Compute averages, trends, counts, group averages and streaks over
//!   entries already fetched in full.
//!
//! # Invariants
//! - Every function is pure; empty input returns the default value
//!   (0, `Trend::Steady`, empty tables) and never an error.
//! - Missing energy (empty day) is encoded as `0` in series and excluded from
//!   every average.
//! - Ranking ties keep first-seen order.

pub mod aggregate;
pub mod streak;

pub use aggregate::{
    average, best_and_worst_day, best_weekday, energy_series, trend_from_series, CountTable,
    GroupAverage, GroupStats, Pace, Trend, WeekdayAverage, PROFILE_TREND_MIN_SAMPLES,
    REPORT_TREND_MIN_SAMPLES,
};
pub use streak::{streaks, Streaks};
