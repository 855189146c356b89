//! Profile screen: account facts, streaks and "my style" coaching.
//!
//! # Invariants
//! - Style and coaching read a 90-day sample ending today; counts and the
//!   last entry cover the whole journal.

use crate::coach::{
    coach_one_liner, mood_energy_mini_insight, style_lines, topic_coach_line, MIN_GROUP_SAMPLES,
};
use crate::model::calendar::window_start;
use crate::model::entry::DiaryEntry;
use crate::model::user::UserProfile;
use crate::repo::entry_repo::EntryRepository;
use crate::repo::RepoResult;
use crate::stats::{
    average, best_weekday, streaks, trend_from_series, CountTable, GroupStats, Streaks, Trend,
    PROFILE_TREND_MIN_SAMPLES,
};
use chrono::{DateTime, NaiveDate};
use serde::Serialize;

/// Days of history behind the profile's style read.
pub const PROFILE_SAMPLE_DAYS: u32 = 90;

/// Everything the profile screen renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub email: String,
    pub display_name: Option<String>,
    /// `None` when the stored creation time is out of range.
    pub member_since: Option<NaiveDate>,
    pub all_time_count: u64,
    pub last_entry_date: Option<NaiveDate>,
    pub sample_days: u32,
    pub sample_start: NaiveDate,
    pub sample_end: NaiveDate,
    pub streaks: Streaks,
    pub average_energy: f64,
    pub trend: Trend,
    pub coach_line: String,
    pub style_lines: Vec<String>,
    pub mood_energy_line: String,
    pub topic_coach_line: String,
}

/// Profile service facade over repository implementations.
pub struct ProfileService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> ProfileService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn build_profile(&self, profile: &UserProfile, today: NaiveDate) -> RepoResult<ProfileSummary> {
        let all_time_count = self.repo.count_entries(profile.uid)?;
        let last_entry_date = self.repo.last_entry(profile.uid)?.map(|entry| entry.date);
        let sample_start = window_start(today, PROFILE_SAMPLE_DAYS);
        let sample = self
            .repo
            .list_entries_by_range(profile.uid, sample_start, today)?;

        let mut summary = summarize_sample(&sample, sample_start, today);
        summary.email = profile.email.clone();
        summary.display_name = profile.display_name.clone();
        summary.member_since =
            DateTime::from_timestamp_millis(profile.created_at).map(|at| at.date_naive());
        summary.all_time_count = all_time_count;
        summary.last_entry_date = last_entry_date;
        Ok(summary)
    }
}

/// Style and coaching over a date-ordered sample; account fields stay empty.
pub fn summarize_sample(
    sample: &[DiaryEntry],
    sample_start: NaiveDate,
    today: NaiveDate,
) -> ProfileSummary {
    let energies: Vec<u8> = sample.iter().map(DiaryEntry::energy_score).collect();
    let average_energy = average(&energies);
    let trend = trend_from_series(&energies, PROFILE_TREND_MIN_SAMPLES);

    let mut moods = CountTable::new();
    let mut mood_stats = GroupStats::new();
    let mut topic_stats = GroupStats::new();
    for entry in sample {
        moods.add(entry.mood);
        mood_stats.add(entry.mood, entry.energy_score());
        if entry.has_topic() {
            topic_stats.add(entry.topic.clone(), entry.energy_score());
        }
    }

    let topics = topic_stats.ranked(MIN_GROUP_SAMPLES);
    let best_topic = topics.first();
    let worst_topic = if topics.len() >= 2 { topics.last() } else { None };
    let top_mood = moods.top_n(1).first().copied();

    ProfileSummary {
        email: String::new(),
        display_name: None,
        member_since: None,
        all_time_count: 0,
        last_entry_date: None,
        sample_days: PROFILE_SAMPLE_DAYS,
        sample_start,
        sample_end: today,
        streaks: streaks(sample.iter().map(|entry| entry.date), today),
        average_energy,
        trend,
        coach_line: coach_one_liner(average_energy, trend, energies.len() as u32),
        style_lines: style_lines(
            top_mood,
            PROFILE_SAMPLE_DAYS,
            best_weekday(sample).as_ref(),
            best_topic,
        ),
        mood_energy_line: mood_energy_mini_insight(
            &mood_stats.ranked(MIN_GROUP_SAMPLES),
            average_energy,
        ),
        topic_coach_line: topic_coach_line(best_topic, worst_topic),
    }
}

#[cfg(test)]
mod tests {
    use super::summarize_sample;
    use crate::model::energy::EnergyLevel;
    use crate::model::entry::DiaryEntry;
    use crate::model::mood::Mood;
    use crate::stats::Trend;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn empty_sample_uses_needs_more_data_lines() {
        let summary = summarize_sample(&[], day(1), day(19));
        assert_eq!(summary.streaks.current, 0);
        assert_eq!(summary.average_energy, 0.0);
        assert_eq!(summary.trend, Trend::Steady);
        assert!(summary.coach_line.starts_with("Leave one line today"));
        assert_eq!(summary.style_lines.len(), 3);
        assert!(summary.style_lines[0].contains("needs more data"));
    }

    #[test]
    fn rising_sample_reports_streak_and_trend() {
        let energies = [
            EnergyLevel::Drained,
            EnergyLevel::Low,
            EnergyLevel::Normal,
            EnergyLevel::Charged,
            EnergyLevel::Full,
            EnergyLevel::Full,
        ];
        let sample: Vec<DiaryEntry> = energies
            .iter()
            .enumerate()
            .map(|(index, energy)| {
                DiaryEntry::new(day(14 + index as u32), Mood::Calm, *energy).with_topic("Work")
            })
            .collect();

        let summary = summarize_sample(&sample, day(1), day(19));
        assert_eq!(summary.streaks.current, 6);
        assert_eq!(summary.streaks.best, 6);
        assert_eq!(summary.trend, Trend::Rising);
        assert!(summary.style_lines[2].contains("\"Work\""));
        assert!(summary.topic_coach_line.contains("\"Work\" is a topic that lifts you"));
    }
}
