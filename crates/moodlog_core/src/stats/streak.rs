//! Consecutive-day streaks.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

/// Current and best streak lengths in days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    /// Consecutive days with an entry walking back from `today`; 0 when
    /// today has none.
    pub current: u32,
    /// Longest run of consecutive days anywhere in the input.
    pub best: u32,
}

/// Computes streaks over a set of entry dates (duplicates are ignored).
pub fn streaks(dates: impl IntoIterator<Item = NaiveDate>, today: NaiveDate) -> Streaks {
    let days: BTreeSet<NaiveDate> = dates.into_iter().collect();

    let mut current = 0;
    let mut cursor = today;
    while days.contains(&cursor) {
        current += 1;
        cursor -= Duration::days(1);
    }

    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for day in &days {
        run = match previous {
            Some(prev) if *day - prev == Duration::days(1) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(*day);
    }

    Streaks { current, best }
}
