//! Energy report for the last 7, 30 or 90 days.
//!
//! # Responsibility
//! - Aggregate one window of entries into chart series and coach text.
//!
//! # Invariants
//! - The window is `today - (days - 1) ..= today`, every day present in the
//!   series (`0` for days without an entry).
//! - Only entries with recorded energy participate in counts and averages.

use crate::coach::{
    best_worst_advice, coach_summary, mood_energy_insight, topic_energy_coaching, SummaryInput,
    MIN_GROUP_SAMPLES,
};
use crate::model::calendar::{weekday_label, window_start};
use crate::model::entry::DiaryEntry;
use crate::model::mood::Mood;
use crate::model::user::UserId;
use crate::repo::entry_repo::EntryRepository;
use crate::repo::RepoResult;
use crate::stats::{
    average, best_and_worst_day, energy_series, trend_from_series, CountTable, GroupStats, Trend,
    REPORT_TREND_MIN_SAMPLES,
};
use chrono::{Datelike, NaiveDate};
use log::info;
use serde::Serialize;
use std::time::Instant;

/// How many moods/topics make it onto the charts.
pub const CHART_TOP_N: usize = 5;
/// Pie slice label for moods outside the top five.
pub const OTHER_SLICE_LABEL: &str = "Other";

/// Report window selectable on the report screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    Week,
    Month,
    Quarter,
}

impl ReportPeriod {
    pub fn days(self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
        }
    }

    /// Periods unlocked for the current plan; the free plan only gets a week.
    pub fn available(pro_enabled: bool) -> &'static [ReportPeriod] {
        if pro_enabled {
            &[Self::Week, Self::Month, Self::Quarter]
        } else {
            &[Self::Week]
        }
    }

    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            7 => Some(Self::Week),
            30 => Some(Self::Month),
            90 => Some(Self::Quarter),
            _ => None,
        }
    }
}

/// One point on the energy line chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub label: String,
    /// `0` when the day has no entry.
    pub energy: u8,
}

/// One mood pie slice; `mood` is `None` for the "Other" remainder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    pub mood: Option<Mood>,
    pub label: String,
    pub value: u32,
}

/// One topic bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicBar {
    pub topic: String,
    pub value: u32,
}

/// Everything the report screen renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub period: ReportPeriod,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub series: Vec<SeriesPoint>,
    pub written_days: u32,
    pub average_energy: f64,
    pub trend: Trend,
    pub top_moods: Vec<(Mood, u32)>,
    pub top_topics: Vec<(String, u32)>,
    pub mood_pie: Vec<PieSlice>,
    pub topic_bars: Vec<TopicBar>,
    pub summary_lines: Vec<String>,
    pub best_worst_lines: Vec<String>,
    pub mood_energy_line: String,
    pub topic_energy_line: String,
}

/// Report service facade over repository implementations.
pub struct ReportService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> ReportService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn build_report(
        &self,
        uid: UserId,
        period: ReportPeriod,
        today: NaiveDate,
    ) -> RepoResult<Report> {
        let started_at = Instant::now();
        let days = period.days();
        let start = window_start(today, days);
        let entries = self.repo.list_entries_by_range(uid, start, today)?;
        let report = summarize(period, start, today, &entries);
        info!(
            "event=report_build module=report status=ok uid={} days={} written_days={} duration_ms={}",
            uid,
            days,
            report.written_days,
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }
}

/// Builds a report from entries already limited to `start..=end`.
pub fn summarize(
    period: ReportPeriod,
    start: NaiveDate,
    end: NaiveDate,
    entries: &[DiaryEntry],
) -> Report {
    let days = period.days();
    let raw_series = energy_series(entries, start, end);
    let values: Vec<u8> = raw_series.iter().map(|(_, energy)| *energy).collect();
    let written: Vec<u8> = values.iter().copied().filter(|value| *value > 0).collect();
    let average_energy = average(&written);
    let trend = trend_from_series(&values, REPORT_TREND_MIN_SAMPLES);

    let series = raw_series
        .into_iter()
        .map(|(date, energy)| SeriesPoint {
            date,
            label: axis_label(date, days),
            energy,
        })
        .collect();

    let mut mood_counts = CountTable::new();
    let mut topic_counts = CountTable::new();
    let mut mood_stats = GroupStats::new();
    let mut topic_stats = GroupStats::new();
    for entry in entries {
        let energy = entry.energy_score();
        mood_counts.add(entry.mood);
        mood_stats.add(entry.mood, energy);
        if entry.has_topic() {
            topic_counts.add(entry.topic.clone());
            topic_stats.add(entry.topic.clone(), energy);
        }
    }

    let top_moods = mood_counts.top_n(CHART_TOP_N);
    let top_topics = topic_counts.top_n(CHART_TOP_N);
    let mood_pie = mood_pie(&top_moods, mood_counts.total());
    let topic_bars = top_topics
        .iter()
        .map(|(topic, value)| TopicBar {
            topic: topic.clone(),
            value: *value,
        })
        .collect();

    let summary_lines = coach_summary(&SummaryInput {
        days,
        written_days: written.len() as u32,
        average_energy,
        trend,
        top_mood: top_moods.first().copied(),
        top_topic: top_topics
            .first()
            .map(|(topic, count)| (topic.as_str(), *count)),
    });
    let (best, worst) = best_and_worst_day(entries);
    let best_worst_lines = best_worst_advice(best, worst);
    let mood_energy_line = mood_energy_insight(&mood_stats.ranked(MIN_GROUP_SAMPLES), average_energy);
    let topic_energy_line =
        topic_energy_coaching(&topic_stats.ranked(MIN_GROUP_SAMPLES), average_energy);

    Report {
        period,
        start,
        end,
        series,
        written_days: written.len() as u32,
        average_energy,
        trend,
        top_moods,
        top_topics,
        mood_pie,
        topic_bars,
        summary_lines,
        best_worst_lines,
        mood_energy_line,
        topic_energy_line,
    }
}

fn axis_label(date: NaiveDate, days: u32) -> String {
    if days <= 7 {
        weekday_label(date.weekday()).to_string()
    } else {
        date.format("%m/%d").to_string()
    }
}

fn mood_pie(top_moods: &[(Mood, u32)], total: u32) -> Vec<PieSlice> {
    let mut slices: Vec<PieSlice> = top_moods
        .iter()
        .map(|(mood, value)| PieSlice {
            mood: Some(*mood),
            label: mood.badge(),
            value: *value,
        })
        .collect();
    let shown: u32 = top_moods.iter().map(|(_, value)| value).sum();
    if total > shown {
        slices.push(PieSlice {
            mood: None,
            label: OTHER_SLICE_LABEL.to_string(),
            value: total - shown,
        });
    }
    slices
}

#[cfg(test)]
mod tests {
    use super::{summarize, ReportPeriod, OTHER_SLICE_LABEL};
    use crate::model::energy::EnergyLevel;
    use crate::model::entry::DiaryEntry;
    use crate::model::mood::Mood;
    use crate::stats::Trend;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn entry(d: u32, mood: Mood, energy: EnergyLevel) -> DiaryEntry {
        DiaryEntry::new(day(d), mood, energy)
    }

    #[test]
    fn empty_window_has_zero_series_and_default_text() {
        let report = summarize(ReportPeriod::Week, day(13), day(19), &[]);
        assert_eq!(report.series.len(), 7);
        assert!(report.series.iter().all(|point| point.energy == 0));
        assert_eq!(report.series[0].label, "Tue");
        assert_eq!(report.written_days, 0);
        assert_eq!(report.average_energy, 0.0);
        assert_eq!(report.trend, Trend::Steady);
        assert!(report.mood_pie.is_empty());
        assert_eq!(report.summary_lines.len(), 4);
    }

    #[test]
    fn month_labels_use_month_and_day() {
        let start = NaiveDate::from_ymd_opt(2026, 9, 20).unwrap();
        let report = summarize(ReportPeriod::Month, start, day(19), &[]);
        assert_eq!(report.series.len(), 30);
        assert_eq!(report.series[0].label, "09/20");
        assert_eq!(report.series[29].label, "10/19");
    }

    #[test]
    fn pie_groups_moods_beyond_top_five_as_other() {
        let moods = [
            Mood::Happiness,
            Mood::Happiness,
            Mood::Calm,
            Mood::Sadness,
            Mood::Anxiety,
            Mood::Hope,
            Mood::Lethargy,
            Mood::Lethargy,
            Mood::Lonely,
        ];
        let entries: Vec<DiaryEntry> = moods
            .iter()
            .enumerate()
            .map(|(index, mood)| entry(index as u32 + 1, *mood, EnergyLevel::Normal))
            .collect();
        let report = summarize(ReportPeriod::Month, day(1), day(30), &entries);

        assert_eq!(report.mood_pie.len(), 6);
        assert_eq!(report.mood_pie[0].mood, Some(Mood::Happiness));
        assert_eq!(report.mood_pie[1].mood, Some(Mood::Lethargy));
        let other = report.mood_pie.last().unwrap();
        assert_eq!(other.label, OTHER_SLICE_LABEL);
        assert_eq!(other.value, 2);
    }

    #[test]
    fn topics_skip_blank_values_and_feed_bars() {
        let entries = vec![
            entry(13, Mood::Happiness, EnergyLevel::Full).with_topic("Work"),
            entry(14, Mood::Hope, EnergyLevel::Charged).with_topic("Work"),
            entry(15, Mood::Lethargy, EnergyLevel::Drained),
        ];
        let report = summarize(ReportPeriod::Week, day(13), day(19), &entries);
        assert_eq!(report.written_days, 3);
        assert_eq!(report.top_topics, vec![("Work".to_string(), 2)]);
        assert_eq!(report.topic_bars.len(), 1);
        assert!(report.best_worst_lines[0].contains("10/13"));
        assert!(report.best_worst_lines[1].contains("10/15"));
    }

    #[test]
    fn period_days_round_trip() {
        for period in [ReportPeriod::Week, ReportPeriod::Month, ReportPeriod::Quarter] {
            assert_eq!(ReportPeriod::from_days(period.days()), Some(period));
        }
        assert_eq!(ReportPeriod::from_days(14), None);
        assert_eq!(ReportPeriod::available(false), &[ReportPeriod::Week]);
        assert_eq!(ReportPeriod::available(true).len(), 3);
    }
}
