//! Topic vocabulary offered by the entry editor.
//!
//! Topics are free strings; these lists only seed the picker.

/// Topics always shown on the picker.
pub const DEFAULT_TOPICS: [&str; 8] = [
    "Work",
    "Relationships",
    "Health",
    "Money",
    "Me",
    "Family",
    "Study",
    "Hobby",
];

/// Topics revealed by the picker's "more" toggle.
pub const EXTRA_TOPICS: [&str; 4] = ["Rest", "Other", "Dating", "Career move"];

/// Trims one topic. Empty input means "no topic".
pub fn normalize_topic(topic: &str) -> String {
    topic.trim().to_string()
}

/// Entries hold a single topic: the first non-empty pick wins.
pub fn primary_topic(picked: &[String]) -> String {
    picked
        .iter()
        .map(|topic| normalize_topic(topic))
        .find(|topic| !topic.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::primary_topic;

    #[test]
    fn primary_topic_skips_blank_values() {
        let picked = vec!["  ".to_string(), " Health ".to_string(), "Work".to_string()];
        assert_eq!(primary_topic(&picked), "Health");
        assert_eq!(primary_topic(&[]), "");
    }
}
