//! Diary entry domain model.
//!
//! # Responsibility
//! - Define the single-day diary record persisted per user.
//! - Validate field ranges before persistence and after reads.
//!
//! # Invariants
//! - `date` is the entry identity within one user's journal.
//! - `score == energy.score()` (legacy mirror kept in storage).
//! - `mood_score` is `None` or within `1..=5`.

use crate::model::energy::EnergyLevel;
use crate::model::mood::{Mood, MOOD_SCORE_MAX, MOOD_SCORE_MIN};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upper bound on diary text length, in chars.
pub const MAX_CONTENT_CHARS: usize = 10_000;

/// One day's diary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiaryEntry {
    pub date: NaiveDate,
    /// Single topic; empty when none was picked.
    pub topic: String,
    pub mood: Mood,
    pub energy: EnergyLevel,
    /// Mirrors `energy` for older readers of the store.
    pub score: u8,
    /// Optional 1..=5 self-rating.
    pub mood_score: Option<u8>,
    pub content: String,
    /// Last save time in epoch milliseconds, stamped by storage.
    pub updated_at: Option<i64>,
}

impl DiaryEntry {
    /// Creates an entry with empty topic/content and no mood score.
    pub fn new(date: NaiveDate, mood: Mood, energy: EnergyLevel) -> Self {
        Self {
            date,
            topic: String::new(),
            mood,
            energy,
            score: energy.score(),
            mood_score: None,
            content: String::new(),
            updated_at: None,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_mood_score(mut self, mood_score: Option<u8>) -> Self {
        self.mood_score = mood_score;
        self
    }

    /// Energy as a plain `1..=5` number.
    pub fn energy_score(&self) -> u8 {
        self.energy.score()
    }

    /// Whether a non-blank topic was recorded.
    pub fn has_topic(&self) -> bool {
        !self.topic.trim().is_empty()
    }

    /// Checks field ranges and the `score` mirror.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.score != self.energy.score() {
            return Err(EntryValidationError::ScoreMismatch {
                score: self.score,
                energy: self.energy.score(),
            });
        }
        if let Some(value) = self.mood_score {
            if !(MOOD_SCORE_MIN..=MOOD_SCORE_MAX).contains(&value) {
                return Err(EntryValidationError::MoodScoreOutOfRange(value));
            }
        }
        let length = self.content.chars().count();
        if length > MAX_CONTENT_CHARS {
            return Err(EntryValidationError::ContentTooLong(length));
        }
        Ok(())
    }
}

/// Field-level validation failure for `DiaryEntry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    ScoreMismatch { score: u8, energy: u8 },
    MoodScoreOutOfRange(u8),
    ContentTooLong(usize),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScoreMismatch { score, energy } => {
                write!(f, "score {score} must mirror energy {energy}")
            }
            Self::MoodScoreOutOfRange(value) => {
                write!(f, "mood_score {value} is outside 1..=5")
            }
            Self::ContentTooLong(length) => write!(
                f,
                "content has {length} chars; limit is {MAX_CONTENT_CHARS}"
            ),
        }
    }
}

impl Error for EntryValidationError {}
