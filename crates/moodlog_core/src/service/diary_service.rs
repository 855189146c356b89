//! Diary entry use-cases: editor save, day detail, calendar and home views.
//!
//! # Responsibility
//! - Turn editor drafts into validated entries (one per day).
//! - Build the calendar month, recent-days list, week strip and today card.
//!
//! # Invariants
//! - Entries can be written for today or earlier, never for a future day.
//! - `score` mirrors `energy`; a zero mood score is stored as "not chosen".
//! - Day lists are ordered oldest first with today last.

use crate::model::calendar::{
    add_days_saturating, days_between, week_start_sunday, weekday_label, window_start, Month,
};
use crate::model::energy::EnergyLevel;
use crate::model::entry::{DiaryEntry, EntryValidationError};
use crate::model::mood::Mood;
use crate::model::topic::primary_topic;
use crate::model::user::UserId;
use crate::repo::entry_repo::EntryRepository;
use crate::repo::{RepoError, RepoResult};
use chrono::{Datelike, NaiveDate};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Days shown by the home screen's recent list.
pub const RECENT_DAYS: u32 = 7;
/// Longest window `recent_days` serves; larger requests are clamped.
pub const MAX_RECENT_DAYS: u32 = 90;
/// Max chars of diary text shown on cards.
pub const SNIPPET_MAX_CHARS: usize = 120;
/// Week strip marker for a day without an entry.
pub const EMPTY_DAY_MARK: &str = "·";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Editor state submitted on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub date: NaiveDate,
    /// Picked topics; only the first non-blank one is stored.
    pub topics: Vec<String>,
    pub mood: Option<Mood>,
    pub energy: Option<EnergyLevel>,
    /// `None` or `Some(0)` means "not chosen".
    pub mood_score: Option<u8>,
    pub content: String,
}

impl EntryDraft {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            topics: Vec::new(),
            mood: None,
            energy: None,
            mood_score: None,
            content: String::new(),
        }
    }
}

/// Service error for diary use-cases.
#[derive(Debug)]
pub enum DiaryServiceError {
    FutureDate { date: NaiveDate, today: NaiveDate },
    MissingMood,
    MissingEnergy,
    Invalid(EntryValidationError),
    EntryNotFound(NaiveDate),
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for DiaryServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FutureDate { date, today } => {
                write!(f, "cannot write an entry for {date}; today is {today}")
            }
            Self::MissingMood => write!(f, "pick a mood before saving"),
            Self::MissingEnergy => write!(f, "pick an energy level before saving"),
            Self::Invalid(err) => write!(f, "{err}"),
            Self::EntryNotFound(date) => write!(f, "no entry for {date}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent entry state: {details}"),
        }
    }
}

impl Error for DiaryServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for DiaryServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Invalid(err),
            RepoError::EntryNotFound { date, .. } => Self::EntryNotFound(date),
            other => Self::Repo(other),
        }
    }
}

/// Calendar dot for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarMark {
    pub date: NaiveDate,
    pub mood: Mood,
    pub icon: String,
}

/// One month of entries for the calendar screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    pub month: Month,
    pub entries: Vec<DiaryEntry>,
    pub marks: Vec<CalendarMark>,
}

/// One row of the recent-days list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub weekday: String,
    pub day: u32,
    pub entry: Option<DiaryEntry>,
}

/// One cell of the Sunday-start week strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekStripDay {
    pub date: NaiveDate,
    pub day: u32,
    pub icon: String,
    pub is_today: bool,
}

/// Home screen "today" card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodayCard {
    pub date: NaiveDate,
    pub entry: Option<DiaryEntry>,
    pub headline: String,
    pub energy_label: String,
    pub snippet: String,
}

/// Diary service facade over repository implementations.
pub struct DiaryService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> DiaryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Saves the editor draft for `draft.date`, replacing any earlier entry
    /// of that day, and returns the stored entry.
    pub fn save_entry(
        &self,
        uid: UserId,
        draft: EntryDraft,
        today: NaiveDate,
    ) -> Result<DiaryEntry, DiaryServiceError> {
        if draft.date > today {
            return Err(DiaryServiceError::FutureDate {
                date: draft.date,
                today,
            });
        }
        let mood = draft.mood.ok_or(DiaryServiceError::MissingMood)?;
        let energy = draft.energy.ok_or(DiaryServiceError::MissingEnergy)?;

        let entry = DiaryEntry::new(draft.date, mood, energy)
            .with_topic(primary_topic(&draft.topics))
            .with_mood_score(draft.mood_score.filter(|score| *score > 0))
            .with_content(draft.content);
        self.repo.upsert_entry(uid, &entry)?;

        info!(
            "event=entry_save module=diary status=ok uid={} date={} energy={} has_topic={} has_mood_score={}",
            uid,
            entry.date,
            entry.energy_score(),
            entry.has_topic(),
            entry.mood_score.is_some()
        );

        self.repo
            .get_entry(uid, entry.date)?
            .ok_or(DiaryServiceError::InconsistentState(
                "saved entry not found in read-back",
            ))
    }

    pub fn get_entry(&self, uid: UserId, date: NaiveDate) -> RepoResult<Option<DiaryEntry>> {
        self.repo.get_entry(uid, date)
    }

    pub fn delete_entry(&self, uid: UserId, date: NaiveDate) -> Result<(), DiaryServiceError> {
        self.repo.delete_entry(uid, date)?;
        info!("event=entry_delete module=diary status=ok uid={uid} date={date}");
        Ok(())
    }

    /// Entries and mood marks for one calendar month.
    pub fn month_view(&self, uid: UserId, month: Month) -> RepoResult<MonthView> {
        let entries = self.repo.list_entries_by_month(uid, month)?;
        let marks = entries
            .iter()
            .map(|entry| CalendarMark {
                date: entry.date,
                mood: entry.mood,
                icon: entry.mood.icon().to_string(),
            })
            .collect();
        Ok(MonthView {
            month,
            entries,
            marks,
        })
    }

    /// The last `days` days ending today (clamped to 1..=`MAX_RECENT_DAYS`),
    /// with their entries when present.
    pub fn recent_days(
        &self,
        uid: UserId,
        today: NaiveDate,
        days: u32,
    ) -> RepoResult<Vec<DayCell>> {
        let start = window_start(today, days.clamp(1, MAX_RECENT_DAYS));
        let mut by_date = self.entries_by_date(uid, start, today)?;
        Ok(days_between(start, today)
            .into_iter()
            .map(|date| DayCell {
                date,
                weekday: weekday_label(date.weekday()).to_string(),
                day: date.day(),
                entry: by_date.remove(&date),
            })
            .collect())
    }

    /// Sunday-to-Saturday strip of the week containing `today`.
    pub fn week_strip(&self, uid: UserId, today: NaiveDate) -> RepoResult<Vec<WeekStripDay>> {
        let start = week_start_sunday(today);
        let end = add_days_saturating(start, 6);
        let by_date = self.entries_by_date(uid, start, end)?;
        Ok(days_between(start, end)
            .into_iter()
            .map(|date| WeekStripDay {
                date,
                day: date.day(),
                icon: by_date
                    .get(&date)
                    .map_or(EMPTY_DAY_MARK, |entry| entry.mood.icon())
                    .to_string(),
                is_today: date == today,
            })
            .collect())
    }

    /// Summary of today's entry, or the prompt to write one.
    pub fn today_card(&self, uid: UserId, today: NaiveDate) -> RepoResult<TodayCard> {
        let entry = self.repo.get_entry(uid, today)?;
        let card = match entry {
            Some(entry) => {
                let snippet = snippet(&entry.content, SNIPPET_MAX_CHARS);
                TodayCard {
                    date: today,
                    headline: "You logged today too".to_string(),
                    energy_label: entry.energy.label().to_string(),
                    snippet: if snippet.is_empty() {
                        "No content".to_string()
                    } else {
                        snippet
                    },
                    entry: Some(entry),
                }
            }
            None => TodayCard {
                date: today,
                entry: None,
                headline: "Write today's entry".to_string(),
                energy_label: "No entry yet".to_string(),
                snippet: "Shall we leave a note for today?".to_string(),
            },
        };
        Ok(card)
    }

    fn entries_by_date(
        &self,
        uid: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<HashMap<NaiveDate, DiaryEntry>> {
        Ok(self
            .repo
            .list_entries_by_range(uid, start, end)?
            .into_iter()
            .map(|entry| (entry.date, entry))
            .collect())
    }
}

/// Collapses whitespace and truncates to `max_chars`, appending `...` when cut.
pub fn snippet(content: &str, max_chars: usize) -> String {
    let collapsed = WHITESPACE_RE.replace_all(content.trim(), " ");
    let mut truncated: String = collapsed.chars().take(max_chars).collect();
    if collapsed.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}
