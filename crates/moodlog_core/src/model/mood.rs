//! Mood vocabulary and mood score labels.
//!
//! # Invariants
//! - Mood keys are stable storage values and never renamed.
//! - `Coldness` is legacy: readable and aggregated, but not offered by the
//!   picker any more.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Categorical mood attached to every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Anxiety,
    Coldness,
    Lethargy,
    Lonely,
    Calm,
    Sadness,
    Happiness,
    Hope,
    Growth,
    Confident,
}

impl Mood {
    /// Every known mood, in storage declaration order.
    pub const ALL: [Mood; 10] = [
        Mood::Anxiety,
        Mood::Coldness,
        Mood::Lethargy,
        Mood::Lonely,
        Mood::Calm,
        Mood::Sadness,
        Mood::Happiness,
        Mood::Hope,
        Mood::Growth,
        Mood::Confident,
    ];

    /// Moods offered by the 3x3 picker grid, row by row.
    pub fn selectable() -> [Mood; 9] {
        [
            Mood::Anxiety,
            Mood::Lethargy,
            Mood::Lonely,
            Mood::Calm,
            Mood::Sadness,
            Mood::Happiness,
            Mood::Hope,
            Mood::Growth,
            Mood::Confident,
        ]
    }

    /// Stable storage key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Anxiety => "anxiety",
            Self::Coldness => "coldness",
            Self::Lethargy => "lethargy",
            Self::Lonely => "lonely",
            Self::Calm => "calm",
            Self::Sadness => "sadness",
            Self::Happiness => "happiness",
            Self::Hope => "hope",
            Self::Growth => "growth",
            Self::Confident => "confident",
        }
    }

    /// Parses a storage key. Keys are matched case-insensitively after trim.
    pub fn parse(key: &str) -> Option<Self> {
        let normalized = key.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|mood| mood.key() == normalized.as_str())
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Anxiety => "Anxiety",
            Self::Coldness => "Coldness",
            Self::Lethargy => "Lethargy",
            Self::Lonely => "Lonely",
            Self::Calm => "Calm",
            Self::Sadness => "Sadness",
            Self::Happiness => "Happiness",
            Self::Hope => "Hope",
            Self::Growth => "Growth",
            Self::Confident => "Confident",
        }
    }

    /// Weather-style icon shown on calendars and in coach text.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Anxiety => "🌩️",
            Self::Coldness => "☁️",
            Self::Lethargy => "🌧️",
            Self::Lonely => "🌙",
            Self::Calm => "🌤️",
            Self::Sadness => "🌫️",
            Self::Happiness => "☀️",
            Self::Hope => "🌈",
            Self::Growth => "🌱",
            Self::Confident => "🔥",
        }
    }

    /// `"{icon} {label}"`, the form used in every coach sentence.
    pub fn badge(self) -> String {
        format!("{} {}", self.icon(), self.label())
    }

    pub fn is_legacy(self) -> bool {
        matches!(self, Self::Coldness)
    }
}

impl Display for Mood {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Lowest selectable mood score.
pub const MOOD_SCORE_MIN: u8 = 1;
/// Highest selectable mood score.
pub const MOOD_SCORE_MAX: u8 = 5;

/// Returns the label of a 1..=5 mood score, `None` outside that range.
pub fn mood_score_label(score: u8) -> Option<&'static str> {
    match score {
        1 => Some("Worst"),
        2 => Some("Bad"),
        3 => Some("Okay"),
        4 => Some("Good"),
        5 => Some("Best"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{mood_score_label, Mood};

    #[test]
    fn parse_accepts_every_key_and_rejects_unknown() {
        for mood in Mood::ALL {
            assert_eq!(Mood::parse(mood.key()), Some(mood));
        }
        assert_eq!(Mood::parse(" Calm "), Some(Mood::Calm));
        assert_eq!(Mood::parse("furious"), None);
    }

    #[test]
    fn picker_excludes_legacy_coldness() {
        let selectable = Mood::selectable();
        assert_eq!(selectable.len(), 9);
        assert!(!selectable.contains(&Mood::Coldness));
        assert!(Mood::Coldness.is_legacy());
    }

    #[test]
    fn mood_score_labels_cover_one_to_five_only() {
        assert_eq!(mood_score_label(1), Some("Worst"));
        assert_eq!(mood_score_label(5), Some("Best"));
        assert_eq!(mood_score_label(0), None);
        assert_eq!(mood_score_label(6), None);
    }
}
