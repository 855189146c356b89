//! Averages, trends and keyed tallies.

use crate::model::entry::DiaryEntry;
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::HashMap;

/// Minimum valid samples before the report screen calls a trend.
pub const REPORT_TREND_MIN_SAMPLES: usize = 3;
/// Minimum valid samples before the profile screen calls a trend.
pub const PROFILE_TREND_MIN_SAMPLES: usize = 4;

const TREND_THRESHOLD: f64 = 0.4;
const PACE_RECOVER_MAX: f64 = 2.3;
const PACE_MAINTAIN_MAX: f64 = 3.4;

/// Direction of energy over a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Rising,
    Falling,
    Steady,
}

impl Trend {
    pub fn label(self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Steady => "steady",
        }
    }
}

/// Advice band derived from average energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    Recover,
    Maintain,
    Expand,
}

impl Pace {
    pub fn from_average(average_energy: f64) -> Self {
        if average_energy <= PACE_RECOVER_MAX {
            Self::Recover
        } else if average_energy <= PACE_MAINTAIN_MAX {
            Self::Maintain
        } else {
            Self::Expand
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Recover => "recover",
            Self::Maintain => "maintain",
            Self::Expand => "expand",
        }
    }
}

/// Arithmetic mean; `0.0` for an empty slice.
pub fn average(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u32 = values.iter().map(|value| u32::from(*value)).sum();
    f64::from(sum) / values.len() as f64
}

/// Compares the first third of the non-zero values against the last third.
///
/// Fewer than `min_samples` non-zero values is always `Steady`.
pub fn trend_from_series(values: &[u8], min_samples: usize) -> Trend {
    let valid: Vec<u8> = values.iter().copied().filter(|value| *value > 0).collect();
    if valid.len() < min_samples || valid.is_empty() {
        return Trend::Steady;
    }

    let third = (valid.len() / 3).max(1);
    let head = average(&valid[..third]);
    let tail = average(&valid[valid.len() - third..]);
    let diff = tail - head;

    if diff > TREND_THRESHOLD {
        Trend::Rising
    } else if diff < -TREND_THRESHOLD {
        Trend::Falling
    } else {
        Trend::Steady
    }
}

/// Energy per day over `start..=end`, `0` for days without an entry.
pub fn energy_series(
    entries: &[DiaryEntry],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<(NaiveDate, u8)> {
    let by_date: HashMap<NaiveDate, u8> = entries
        .iter()
        .map(|entry| (entry.date, entry.energy_score()))
        .collect();
    crate::model::calendar::days_between(start, end)
        .into_iter()
        .map(|day| (day, by_date.get(&day).copied().unwrap_or(0)))
        .collect()
}

/// Insertion-ordered occurrence counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountTable<K> {
    rows: Vec<(K, u32)>,
}

impl<K> Default for CountTable<K> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<K: PartialEq + Clone> CountTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K) {
        match self.rows.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, count)) => *count += 1,
            None => self.rows.push((key, 1)),
        }
    }

    pub fn total(&self) -> u32 {
        self.rows.iter().map(|(_, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Top `n` keys by count; ties keep first-seen order.
    pub fn top_n(&self, n: usize) -> Vec<(K, u32)> {
        let mut sorted = self.rows.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }
}

/// Average energy of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupAverage<K> {
    pub key: K,
    pub average: f64,
    pub count: u32,
}

/// Insertion-ordered sum/count per key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStats<K> {
    rows: Vec<(K, u32, u32)>,
}

impl<K> Default for GroupStats<K> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<K: PartialEq + Clone> GroupStats<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K, value: u8) {
        match self.rows.iter_mut().find(|(existing, _, _)| *existing == key) {
            Some((_, sum, count)) => {
                *sum += u32::from(value);
                *count += 1;
            }
            None => self.rows.push((key, u32::from(value), 1)),
        }
    }

    /// Groups with at least `min_count` samples, highest average first.
    pub fn ranked(&self, min_count: u32) -> Vec<GroupAverage<K>> {
        let mut ranked: Vec<GroupAverage<K>> = self
            .rows
            .iter()
            .filter(|(_, _, count)| *count >= min_count)
            .map(|(key, sum, count)| GroupAverage {
                key: key.clone(),
                average: f64::from(*sum) / f64::from(*count),
                count: *count,
            })
            .collect();
        ranked.sort_by(|a, b| b.average.total_cmp(&a.average));
        ranked
    }
}

/// Weekday with its average energy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayAverage {
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    pub average: f64,
    pub count: u32,
}

fn serialize_weekday<S: serde::Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(crate::model::calendar::weekday_name(*weekday))
}

/// Weekday with the highest average energy. Ties go to the earlier weekday
/// counting from Sunday.
pub fn best_weekday(entries: &[DiaryEntry]) -> Option<WeekdayAverage> {
    let mut totals = [(0u32, 0u32); 7];
    for entry in entries {
        let index = entry.date.weekday().num_days_from_sunday() as usize;
        totals[index].0 += u32::from(entry.energy_score());
        totals[index].1 += 1;
    }

    let mut best: Option<WeekdayAverage> = None;
    for (index, (sum, count)) in totals.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        let average = f64::from(*sum) / f64::from(*count);
        if best.as_ref().map_or(true, |current| average > current.average) {
            best = Some(WeekdayAverage {
                weekday: weekday_from_sunday(index),
                average,
                count: *count,
            });
        }
    }
    best
}

fn weekday_from_sunday(index: usize) -> Weekday {
    match index {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

/// Highest- and lowest-energy entries. The first entry wins ties, so callers
/// pass entries in date order.
pub fn best_and_worst_day(entries: &[DiaryEntry]) -> (Option<&DiaryEntry>, Option<&DiaryEntry>) {
    let mut best: Option<&DiaryEntry> = None;
    let mut worst: Option<&DiaryEntry> = None;
    for entry in entries {
        if best.map_or(true, |current| entry.energy > current.energy) {
            best = Some(entry);
        }
        if worst.map_or(true, |current| entry.energy < current.energy) {
            worst = Some(entry);
        }
    }
    (best, worst)
}

#[cfg(test)]
mod tests {
    use super::{
        average, best_and_worst_day, best_weekday, energy_series, trend_from_series, CountTable,
        GroupStats, Pace, Trend,
    };
    use crate::model::energy::EnergyLevel;
    use crate::model::entry::DiaryEntry;
    use crate::model::mood::Mood;
    use chrono::{NaiveDate, Weekday};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn entry(d: u32, energy: u8) -> DiaryEntry {
        DiaryEntry::new(day(d), Mood::Calm, EnergyLevel::from_score(energy).unwrap())
    }

    #[test]
    fn empty_input_returns_defaults() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(trend_from_series(&[], 3), Trend::Steady);
        assert!(best_weekday(&[]).is_none());
        assert_eq!(best_and_worst_day(&[]), (None, None));
        assert!(CountTable::<String>::new().top_n(5).is_empty());
    }

    #[test]
    fn average_ignores_nothing_but_handles_fractions() {
        assert!((average(&[1, 2, 4]) - 7.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trend_compares_first_and_last_third_of_valid_values() {
        assert_eq!(trend_from_series(&[1, 0, 1, 3, 0, 5, 5], 3), Trend::Rising);
        assert_eq!(trend_from_series(&[5, 5, 4, 2, 1, 1], 3), Trend::Falling);
        assert_eq!(trend_from_series(&[3, 3, 3, 3], 3), Trend::Steady);
        // Below the minimum sample count nothing is called.
        assert_eq!(trend_from_series(&[1, 5, 5], 4), Trend::Steady);
        assert_eq!(trend_from_series(&[1, 0, 0, 5], 3), Trend::Steady);
    }

    #[test]
    fn pace_bands_follow_average_thresholds() {
        assert_eq!(Pace::from_average(2.3), Pace::Recover);
        assert_eq!(Pace::from_average(2.31), Pace::Maintain);
        assert_eq!(Pace::from_average(3.4), Pace::Maintain);
        assert_eq!(Pace::from_average(3.5), Pace::Expand);
    }

    #[test]
    fn count_table_top_n_is_stable_for_ties() {
        let mut table = CountTable::new();
        for key in ["work", "health", "health", "work", "money", "rest"] {
            table.add(key.to_string());
        }
        let top = table.top_n(3);
        assert_eq!(
            top,
            vec![
                ("work".to_string(), 2),
                ("health".to_string(), 2),
                ("money".to_string(), 1)
            ]
        );
        assert_eq!(table.total(), 6);
    }

    #[test]
    fn group_stats_ranked_filters_small_groups() {
        let mut stats = GroupStats::new();
        stats.add("work", 2);
        stats.add("work", 3);
        stats.add("hobby", 5);
        stats.add("hobby", 4);
        stats.add("money", 1);

        let ranked = stats.ranked(2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].key, "hobby");
        assert!((ranked[0].average - 4.5).abs() < f64::EPSILON);
        assert_eq!(ranked[1].key, "work");
    }

    #[test]
    fn energy_series_fills_missing_days_with_zero() {
        let entries = vec![entry(2, 4), entry(4, 2)];
        let series = energy_series(&entries, day(1), day(4));
        let values: Vec<u8> = series.iter().map(|(_, value)| *value).collect();
        assert_eq!(values, vec![0, 4, 0, 2]);
    }

    #[test]
    fn best_weekday_picks_highest_average() {
        // 2026-10-04 is a Sunday, 2026-10-05 a Monday.
        let entries = vec![entry(4, 2), entry(5, 5), entry(12, 3), entry(11, 2)];
        let best = best_weekday(&entries).unwrap();
        assert_eq!(best.weekday, Weekday::Mon);
        assert!((best.average - 4.0).abs() < f64::EPSILON);
        assert_eq!(best.count, 2);
    }

    #[test]
    fn best_and_worst_day_keep_first_on_ties() {
        let entries = vec![entry(1, 3), entry(2, 5), entry(3, 1), entry(4, 5), entry(5, 1)];
        let (best, worst) = best_and_worst_day(&entries);
        assert_eq!(best.unwrap().date, day(2));
        assert_eq!(worst.unwrap().date, day(3));
    }
}
