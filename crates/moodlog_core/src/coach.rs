//! Canned coach sentences built from journal aggregates.
//!
//! # Responsibility
//! - Turn averages, trends and group rankings into short advice lines for
//!   the report and profile screens.
//!
//! # Invariants
//! - Pure text assembly: no I/O, no clock reads.
//! - Every function has a "needs more data" sentence for thin input.
//! - Numbers are printed with one decimal place.

use crate::model::calendar::weekday_name;
use crate::model::entry::DiaryEntry;
use crate::model::mood::Mood;
use crate::stats::{GroupAverage, Pace, Trend, WeekdayAverage};

/// Minimum samples per mood/topic before it is ranked.
pub const MIN_GROUP_SAMPLES: u32 = 2;

const MOOD_GAP_THRESHOLD: f64 = 0.6;
const TOPIC_GAP_THRESHOLD: f64 = 0.5;

const MOOD_ENERGY_NEEDS_DATA: &str = "Mood and energy patterns need more samples. \
     (Accuracy jumps once the same mood shows up at least twice.)";

/// Aggregates behind the report's four-line coaching note.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryInput<'a> {
    pub days: u32,
    pub written_days: u32,
    pub average_energy: f64,
    pub trend: Trend,
    pub top_mood: Option<(Mood, u32)>,
    pub top_topic: Option<(&'a str, u32)>,
}

/// Report coaching note: activity, top mood, top topic, then one action.
pub fn coach_summary(input: &SummaryInput<'_>) -> Vec<String> {
    let activity = if input.written_days == 0 {
        format!(
            "The last {} days are still empty. Leave a single line today and the flow picks up right away.",
            input.days
        )
    } else {
        format!(
            "You wrote on {} of the last {} days. Average energy is {:.1}/5 and the flow is leaning \"{}\".",
            input.written_days,
            input.days,
            input.average_energy,
            input.trend.label()
        )
    };

    let mood = match input.top_mood {
        Some((mood, count)) => format!(
            "Your most frequent mood was {} ({count}x). That feeling is the background music of your days lately.",
            mood.badge()
        ),
        None => "Mood data is still thin. Logging your mood consistently will sharpen the pattern."
            .to_string(),
    };

    let topic = match input.top_topic {
        Some((topic, count)) => format!(
            "\"{topic}\" leads the topics with {count} entries. It is likely the key area shaping your energy right now."
        ),
        None => "Few topics picked. Choosing even one topic makes the report more accurate."
            .to_string(),
    };

    let action = if input.written_days == 0 {
        "Tidy up for five minutes today and leave the rest to tomorrow's you."
    } else {
        match Pace::from_average(input.average_energy) {
            Pace::Recover => "Today's goal is to recover. Finish only the easiest task.",
            Pace::Maintain => "Today's goal is to maintain. Keep a single routine and you win.",
            Pace::Expand => {
                "A good day to expand. Put all your focus on one important task."
            }
        }
    };

    vec![activity, mood, topic, format!("Coach's note: {action}")]
}

/// Highlight lines for the best and the toughest day of the window.
pub fn best_worst_advice(best: Option<&DiaryEntry>, worst: Option<&DiaryEntry>) -> Vec<String> {
    let best_line = match best {
        Some(entry) => format!(
            "Best day ({}): focusing on just one thing like that day makes results grow. Start with what matters.",
            day_context(entry)
        ),
        None => "Best day: once more data piles up I can pin down the pattern of days that go well."
            .to_string(),
    };

    let worst_line = match worst {
        Some(entry) => format!(
            "Toughest day ({}): the goal that day was to hold on. Next time do only the easiest task and skip the self-blame.",
            day_context(entry)
        ),
        None => "Toughest day: once more data piles up I can pin down what drains your energy."
            .to_string(),
    };

    vec![best_line, worst_line]
}

fn day_context(entry: &DiaryEntry) -> String {
    let topic = if entry.has_topic() {
        format!("topic \"{}\"", entry.topic.trim())
    } else {
        "no topic".to_string()
    };
    format!(
        "{} · {} · {}",
        entry.date.format("%m/%d"),
        entry.mood.badge(),
        topic
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoodHint {
    Expand,
    Recover,
    Steady,
}

fn mood_hint(top: &GroupAverage<Mood>, bottom: &GroupAverage<Mood>, overall: f64) -> MoodHint {
    if top.average - overall >= MOOD_GAP_THRESHOLD {
        MoodHint::Expand
    } else if overall - bottom.average >= MOOD_GAP_THRESHOLD {
        MoodHint::Recover
    } else {
        MoodHint::Steady
    }
}

fn mood_extremes(
    ranked: &[GroupAverage<Mood>],
    overall: f64,
) -> Option<(&GroupAverage<Mood>, &GroupAverage<Mood>)> {
    if ranked.len() < 2 || overall == 0.0 {
        return None;
    }
    Some((ranked.first()?, ranked.last()?))
}

/// Report-screen mood/energy read. `ranked` comes from
/// `GroupStats::ranked(MIN_GROUP_SAMPLES)`.
pub fn mood_energy_insight(ranked: &[GroupAverage<Mood>], overall: f64) -> String {
    let Some((top, bottom)) = mood_extremes(ranked, overall) else {
        return MOOD_ENERGY_NEEDS_DATA.to_string();
    };

    let hint = match mood_hint(top, bottom, overall) {
        MoodHint::Expand => {
            "Coach's hint: on days this mood shows up, expanding into one important task pays off."
        }
        MoodHint::Recover => {
            "Coach's hint: when the low-side mood arrives, switch the goal to recovery. One routine is enough."
        }
        MoodHint::Steady => {
            "Coach's hint: energy barely differs by mood. Consistency is what decides it."
        }
    };

    format!(
        "Mood and energy (quick read): on {} days your average energy was {:.1}/5 (n={}), the highest. \
         On {} days it was {:.1}/5 (n={}), the lowest. {hint}",
        top.key.badge(),
        top.average,
        top.count,
        bottom.key.badge(),
        bottom.average,
        bottom.count,
    )
}

/// Report-screen topic/energy coaching.
pub fn topic_energy_coaching(ranked: &[GroupAverage<String>], overall: f64) -> String {
    let top = match ranked.first() {
        Some(top) if overall != 0.0 => top,
        _ => {
            return "Topic energy analysis needs more samples. \
                    (It gets sharper once a topic shows up at least twice.)"
                .to_string();
        }
    };
    let bottom = if ranked.len() >= 2 { ranked.last() } else { None };

    let mut lines = vec![format!(
        "Energy by topic: \"{}\" averaged {:.1}/5 (n={}), the highest.",
        top.key, top.average, top.count
    )];

    if let Some(bottom) = bottom.filter(|bottom| bottom.key != top.key) {
        lines.push(format!(
            "\"{}\" averaged {:.1}/5 (n={}), the lowest.",
            bottom.key, bottom.average, bottom.count
        ));
    }

    if top.average - overall >= TOPIC_GAP_THRESHOLD {
        lines.push(format!(
            "Coach's hint: {} seems to lift you up. On busy days, secure at least ten minutes for it.",
            top.key
        ));
    } else {
        lines.push(
            "Coach's hint: topics do not make a big difference yet. A recording streak will."
                .to_string(),
        );
    }

    if let Some(bottom) = bottom.filter(|bottom| overall - bottom.average >= TOPIC_GAP_THRESHOLD) {
        lines.push(format!(
            "One more thing: {} tends to drain your energy. Break it into small pieces or pair it with a recovery routine.",
            bottom.key
        ));
    }

    lines.join(" ")
}

/// Profile-screen one-liner.
pub fn coach_one_liner(average_energy: f64, trend: Trend, written_days: u32) -> String {
    if written_days == 0 {
        return "Leave one line today and the flow starts showing from tomorrow.".to_string();
    }
    let pace = Pace::from_average(average_energy);
    let advice = match pace {
        Pace::Recover => "Do one easy task and skip the self-blame.",
        Pace::Maintain => "Keep one routine and you win.",
        Pace::Expand => "Focus on one important task.",
    };
    format!(
        "Right now you are in a \"{}\" pace ({}). {advice}",
        pace.label(),
        trend.label()
    )
}

/// Profile-screen mood/energy read, shorter than the report version.
pub fn mood_energy_mini_insight(ranked: &[GroupAverage<Mood>], overall: f64) -> String {
    let Some((top, bottom)) = mood_extremes(ranked, overall) else {
        return MOOD_ENERGY_NEEDS_DATA.to_string();
    };

    let hint = match mood_hint(top, bottom, overall) {
        MoodHint::Expand => "on days this mood shows up, it is fine to expand into one important task.",
        MoodHint::Recover => {
            "when this mood arrives, switch the goal to recovery. One routine is enough."
        }
        MoodHint::Steady => "the gap between moods is small. Consistency is what decides it.",
    };

    format!(
        "Quick read: {} averaged {:.1}/5 (n={}), {} averaged {:.1}/5 (n={}). Coach's hint: {hint}",
        top.key.badge(),
        top.average,
        top.count,
        bottom.key.badge(),
        bottom.average,
        bottom.count,
    )
}

/// Profile-screen topic line from the best/worst topic by average energy.
pub fn topic_coach_line(
    best: Option<&GroupAverage<String>>,
    worst: Option<&GroupAverage<String>>,
) -> String {
    if best.is_none() && worst.is_none() {
        return "Topic energy coaching needs more samples. \
                (It gets sharper once a topic appears at least twice.)"
            .to_string();
    }

    let mut parts = Vec::new();
    if let Some(best) = best {
        parts.push(format!(
            "\"{}\" is a topic that lifts you (avg {:.1}/5, n={}).",
            best.key, best.average, best.count
        ));
    }
    if let Some(worst) = worst {
        if best.map_or(true, |best| best.key != worst.key) {
            parts.push(format!(
                "\"{}\" tends to drain your energy (avg {:.1}/5, n={}).",
                worst.key, worst.average, worst.count
            ));
        }
    }
    parts.push(
        "Coach's note: secure ten minutes for the lifting topic and break the draining one into small pieces."
            .to_string(),
    );
    parts.join(" ")
}

/// "My style" summary: frequent mood, best weekday, energising topic.
pub fn style_lines(
    top_mood: Option<(Mood, u32)>,
    sample_days: u32,
    best_weekday: Option<&WeekdayAverage>,
    best_topic: Option<&GroupAverage<String>>,
) -> Vec<String> {
    let mood = match top_mood {
        Some((mood, count)) => format!(
            "Frequent mood: {} ({count}x, last {sample_days} days)",
            mood.badge()
        ),
        None => "Frequent mood: needs more data.".to_string(),
    };
    let weekday = match best_weekday {
        Some(best) => format!(
            "Highest-energy weekday: {} (avg {:.1}/5, n={})",
            weekday_name(best.weekday),
            best.average,
            best.count
        ),
        None => "Highest-energy weekday: needs more data.".to_string(),
    };
    let topic = match best_topic {
        Some(best) => format!(
            "Energising topic: \"{}\" (avg {:.1}/5)",
            best.key, best.average
        ),
        None => "Energising topic: needs more data.".to_string(),
    };
    vec![mood, weekday, topic]
}

#[cfg(test)]
mod tests {
    use super::{
        best_worst_advice, coach_one_liner, coach_summary, mood_energy_insight,
        mood_energy_mini_insight, style_lines, topic_coach_line, topic_energy_coaching,
        SummaryInput,
    };
    use crate::model::energy::EnergyLevel;
    use crate::model::entry::DiaryEntry;
    use crate::model::mood::Mood;
    use crate::stats::{GroupAverage, Trend, WeekdayAverage};
    use chrono::{NaiveDate, Weekday};

    fn group<K>(key: K, average: f64, count: u32) -> GroupAverage<K> {
        GroupAverage {
            key,
            average,
            count,
        }
    }

    #[test]
    fn summary_for_empty_window_prompts_first_line() {
        let lines = coach_summary(&SummaryInput {
            days: 7,
            written_days: 0,
            average_energy: 0.0,
            trend: Trend::Steady,
            top_mood: None,
            top_topic: None,
        });
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("last 7 days are still empty"));
        assert!(lines[1].contains("still thin"));
        assert!(lines[2].contains("Few topics"));
        assert!(lines[3].starts_with("Coach's note: Tidy up"));
    }

    #[test]
    fn summary_reports_counts_and_pace() {
        let lines = coach_summary(&SummaryInput {
            days: 30,
            written_days: 12,
            average_energy: 3.8,
            trend: Trend::Rising,
            top_mood: Some((Mood::Hope, 5)),
            top_topic: Some(("Work", 4)),
        });
        assert!(lines[0].contains("12 of the last 30 days"));
        assert!(lines[0].contains("3.8/5"));
        assert!(lines[0].contains("\"rising\""));
        assert!(lines[1].contains("🌈 Hope (5x)"));
        assert!(lines[2].contains("\"Work\" leads the topics with 4 entries"));
        assert!(lines[3].contains("expand"));
    }

    #[test]
    fn best_worst_lines_mention_date_mood_and_topic() {
        let best = DiaryEntry::new(
            NaiveDate::from_ymd_opt(2026, 10, 3).unwrap(),
            Mood::Happiness,
            EnergyLevel::Full,
        )
        .with_topic("Hobby");
        let lines = best_worst_advice(Some(&best), None);
        assert!(lines[0].contains("10/03 · ☀️ Happiness · topic \"Hobby\""));
        assert!(lines[1].starts_with("Toughest day: once more data"));
    }

    #[test]
    fn mood_insight_requires_two_ranked_moods() {
        let one = vec![group(Mood::Calm, 3.0, 2)];
        assert!(mood_energy_insight(&one, 3.0).contains("need more samples"));

        let two = vec![group(Mood::Hope, 4.5, 2), group(Mood::Lethargy, 2.0, 3)];
        let line = mood_energy_insight(&two, 3.0);
        assert!(line.contains("🌈 Hope days your average energy was 4.5/5 (n=2)"));
        assert!(line.contains("🌧️ Lethargy days it was 2.0/5 (n=3)"));
        assert!(line.contains("expanding into one important task"));
    }

    #[test]
    fn topic_coaching_flags_lifting_and_draining_topics() {
        let ranked = vec![
            group("Hobby".to_string(), 4.5, 2),
            group("Work".to_string(), 3.0, 3),
            group("Money".to_string(), 1.5, 2),
        ];
        let line = topic_energy_coaching(&ranked, 3.0);
        assert!(line.contains("\"Hobby\" averaged 4.5/5 (n=2), the highest."));
        assert!(line.contains("\"Money\" averaged 1.5/5 (n=2), the lowest."));
        assert!(line.contains("Hobby seems to lift you up"));
        assert!(line.contains("Money tends to drain your energy"));

        assert!(topic_energy_coaching(&[], 3.0).contains("needs more samples"));
    }

    #[test]
    fn one_liner_uses_pace_and_trend() {
        assert!(coach_one_liner(0.0, Trend::Steady, 0).starts_with("Leave one line"));
        let line = coach_one_liner(2.0, Trend::Falling, 5);
        assert!(line.contains("\"recover\" pace (falling)"));
    }

    #[test]
    fn topic_coach_line_skips_duplicate_worst() {
        let best = group("Study".to_string(), 3.5, 2);
        let line = topic_coach_line(Some(&best), None);
        assert!(line.contains("\"Study\" is a topic that lifts you"));
        assert!(!line.contains("drain"));
        assert!(topic_coach_line(None, None).contains("needs more samples"));
    }

    // (top average, bottom average, overall, report fragment, profile fragment)
    const MOOD_HINT_CASES: [(f64, f64, f64, &str, &str); 3] = [
        (
            4.0,
            2.8,
            3.0,
            "expanding into one important task pays off",
            "it is fine to expand into one important task",
        ),
        (
            3.2,
            2.0,
            3.0,
            "when the low-side mood arrives, switch the goal to recovery",
            "when this mood arrives, switch the goal to recovery",
        ),
        (
            3.3,
            2.8,
            3.0,
            "energy barely differs by mood",
            "the gap between moods is small",
        ),
    ];

    #[test]
    fn mood_hints_cover_expand_recover_and_steady() {
        for (top, bottom, overall, report, profile) in MOOD_HINT_CASES {
            let ranked = vec![group(Mood::Hope, top, 2), group(Mood::Lethargy, bottom, 2)];

            let line = mood_energy_insight(&ranked, overall);
            assert!(line.contains(report), "top={top} bottom={bottom}: {line}");

            let mini = mood_energy_mini_insight(&ranked, overall);
            assert!(mini.contains(profile), "top={top} bottom={bottom}: {mini}");
        }
    }

    #[test]
    fn mini_insight_quotes_both_extremes() {
        let ranked = vec![group(Mood::Hope, 4.0, 2), group(Mood::Lethargy, 2.5, 3)];
        let line = mood_energy_mini_insight(&ranked, 3.0);
        assert!(line.starts_with(
            "Quick read: 🌈 Hope averaged 4.0/5 (n=2), 🌧️ Lethargy averaged 2.5/5 (n=3)."
        ));
        assert!(mood_energy_mini_insight(&ranked[..1], 3.0).contains("need more samples"));
    }

    #[test]
    fn zero_overall_energy_means_not_enough_data() {
        let moods = vec![group(Mood::Hope, 4.0, 2), group(Mood::Lethargy, 2.0, 2)];
        assert!(mood_energy_insight(&moods, 0.0).contains("need more samples"));
        assert!(mood_energy_mini_insight(&moods, 0.0).contains("need more samples"));

        let topics = vec![group("Hobby".to_string(), 4.0, 2)];
        assert!(topic_energy_coaching(&topics, 0.0).contains("needs more samples"));
    }

    #[test]
    fn topic_gaps_of_exactly_half_a_point_trigger_both_hints() {
        let at_threshold = vec![
            group("Hobby".to_string(), 3.5, 2),
            group("Money".to_string(), 2.5, 2),
        ];
        let line = topic_energy_coaching(&at_threshold, 3.0);
        assert!(line.contains("Hobby seems to lift you up"), "{line}");
        assert!(line.contains("Money tends to drain your energy"), "{line}");

        let below_threshold = vec![
            group("Hobby".to_string(), 3.25, 2),
            group("Money".to_string(), 2.75, 2),
        ];
        let line = topic_energy_coaching(&below_threshold, 3.0);
        assert!(line.contains("topics do not make a big difference yet"), "{line}");
        assert!(!line.contains("drain"), "{line}");
    }

    #[test]
    fn single_ranked_topic_has_no_lowest_line() {
        let ranked = vec![group("Work".to_string(), 3.0, 4)];
        let line = topic_energy_coaching(&ranked, 3.0);
        assert!(line.contains("\"Work\" averaged 3.0/5 (n=4), the highest."));
        assert!(!line.contains("the lowest"));
    }

    #[test]
    fn style_lines_name_the_best_weekday() {
        let weekday = WeekdayAverage {
            weekday: Weekday::Fri,
            average: 4.5,
            count: 3,
        };
        let lines = style_lines(Some((Mood::Calm, 6)), 90, Some(&weekday), None);
        assert_eq!(lines[0], "Frequent mood: 🌤️ Calm (6x, last 90 days)");
        assert_eq!(lines[1], "Highest-energy weekday: Friday (avg 4.5/5, n=3)");
        assert_eq!(lines[2], "Energising topic: needs more data.");

        let empty = style_lines(None, 90, None, None);
        assert_eq!(empty[1], "Highest-energy weekday: needs more data.");
    }
}
