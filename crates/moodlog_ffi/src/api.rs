//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose journal use-cases (auth, diary, calendar, report, profile,
//!   settings, quote) to Dart via FRB.
//! - Publish the entry editor vocabulary (moods, energy, mood scores, topics).
//! - Hold the signed-in session for the app process.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every fallible call returns an envelope with `ok` + `message`.
//! - Dates cross the boundary as `YYYY-MM-DD`, months as `YYYY-MM`.

use chrono::{Local, NaiveDate};
use log::warn;
use moodlog_core::db::open_db;
use moodlog_core::model::energy::EnergyLevel;
use moodlog_core::model::mood::{mood_score_label, MOOD_SCORE_MAX, MOOD_SCORE_MIN};
use moodlog_core::model::topic::{DEFAULT_TOPICS, EXTRA_TOPICS};
use moodlog_core::{
    core_version as core_version_inner, format_date, init_logging as init_logging_inner,
    parse_date, ping as ping_inner, AppSettings, AuthService, DiaryEntry, DiaryService,
    EntryDraft, Month, Mood, ProfileService, QuoteService, ReportPeriod, ReportService, Session,
    SettingsService, SqliteAccountRepository, SqliteEntryRepository, SqliteSettingsRepository,
    StartScreen, UserId,
};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const DB_FILE_NAME: &str = "moodlog.sqlite3";
const DB_PATH_ENV: &str = "MOODLOG_DB_PATH";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static SESSION: Mutex<Option<Session>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message otherwise.
/// Repeating the call with the same `level + log_dir` is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic result envelope for commands without a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }

    fn from_result(result: Result<(), String>, success: &str) -> Self {
        match result {
            Ok(()) => Self::success(success),
            Err(err) => Self::failure(err),
        }
    }
}

/// Signed-in account as seen by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountResponse {
    pub ok: bool,
    pub message: String,
    pub uid: Option<String>,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl AccountResponse {
    fn signed_in(session: &Session, message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            uid: Some(session.user.uid.to_string()),
            email: Some(session.user.email.clone()),
            display_name: session.user.display_name.clone(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            uid: None,
            email: None,
            display_name: None,
        }
    }
}

/// Password reset token; the app delivers it to the account owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetTokenResponse {
    pub ok: bool,
    pub message: String,
    pub token: Option<String>,
    pub expires_at_ms: Option<i64>,
}

/// Flat diary entry for Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryItem {
    pub date: String,
    pub topic: String,
    pub mood: String,
    pub mood_label: String,
    pub mood_icon: String,
    pub energy: u8,
    pub energy_label: String,
    pub mood_score: Option<u8>,
    pub mood_score_label: Option<String>,
    pub content: String,
    pub updated_at_ms: Option<i64>,
}

impl From<&DiaryEntry> for EntryItem {
    fn from(entry: &DiaryEntry) -> Self {
        Self {
            date: format_date(entry.date),
            topic: entry.topic.clone(),
            mood: entry.mood.key().to_string(),
            mood_label: entry.mood.label().to_string(),
            mood_icon: entry.mood.icon().to_string(),
            energy: entry.energy_score(),
            energy_label: entry.energy.label().to_string(),
            mood_score: entry.mood_score,
            mood_score_label: entry
                .mood_score
                .and_then(mood_score_label)
                .map(str::to_string),
            content: entry.content.clone(),
            updated_at_ms: entry.updated_at,
        }
    }
}

/// Single-entry envelope; `entry` is `None` when the day is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryResponse {
    pub ok: bool,
    pub message: String,
    pub entry: Option<EntryItem>,
}

impl EntryResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            entry: None,
        }
    }
}

/// Entries of one calendar month, date ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonthResponse {
    pub ok: bool,
    pub message: String,
    pub month: String,
    pub entries: Vec<EntryItem>,
}

/// One cell of the home week strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekDayItem {
    pub date: String,
    pub day: u32,
    pub icon: String,
    pub is_today: bool,
}

/// Home screen: today card, week strip and recent days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeResponse {
    pub ok: bool,
    pub message: String,
    pub headline: String,
    pub energy_label: String,
    pub snippet: String,
    pub today_entry: Option<EntryItem>,
    pub week: Vec<WeekDayItem>,
    /// Oldest first; `None` entries are empty days.
    pub recent_dates: Vec<String>,
    pub recent_entries: Vec<Option<EntryItem>>,
}

/// Labelled value for pie and bar charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartBucket {
    pub label: String,
    pub value: u32,
}

/// Report screen payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportResponse {
    pub ok: bool,
    pub message: String,
    pub days: u32,
    pub labels: Vec<String>,
    /// `0` marks an empty day.
    pub energies: Vec<u8>,
    pub written_days: u32,
    pub average_energy: f64,
    pub trend: String,
    pub mood_pie: Vec<ChartBucket>,
    pub topic_bars: Vec<ChartBucket>,
    pub summary_lines: Vec<String>,
    pub best_worst_lines: Vec<String>,
    pub mood_energy_line: String,
    pub topic_energy_line: String,
}

impl ReportResponse {
    fn failure(days: u32, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            days,
            labels: Vec::new(),
            energies: Vec::new(),
            written_days: 0,
            average_energy: 0.0,
            trend: String::new(),
            mood_pie: Vec::new(),
            topic_bars: Vec::new(),
            summary_lines: Vec::new(),
            best_worst_lines: Vec::new(),
            mood_energy_line: String::new(),
            topic_energy_line: String::new(),
        }
    }
}

/// Profile screen payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileResponse {
    pub ok: bool,
    pub message: String,
    pub email: String,
    pub display_name: Option<String>,
    pub member_since: Option<String>,
    pub all_time_count: u64,
    pub last_entry_date: Option<String>,
    pub current_streak: u32,
    pub best_streak: u32,
    pub average_energy: f64,
    pub trend: String,
    pub coach_line: String,
    pub style_lines: Vec<String>,
    pub mood_energy_line: String,
    pub topic_coach_line: String,
}

/// App preferences as seen by the settings screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsItem {
    pub quote_enabled: bool,
    /// `home` or `calendar`.
    pub default_start: String,
    pub reminder_enabled: bool,
    pub reminder_time: String,
    pub pro_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsResponse {
    pub ok: bool,
    pub message: String,
    pub settings: Option<SettingsItem>,
}

/// Quote card state for today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteResponse {
    pub ok: bool,
    pub message: String,
    pub enabled: bool,
    pub closed: bool,
    pub text: Option<String>,
    pub author: Option<String>,
}

/// Mood grid cell of the entry editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodOption {
    pub key: String,
    pub label: String,
    pub icon: String,
}

/// Battery level of the entry editor; `value` is what `entry_save` takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnergyOption {
    pub value: u8,
    pub key: String,
    pub label: String,
}

/// Mood score option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodScoreOption {
    pub value: u8,
    pub label: String,
}

/// Everything the entry editor's pickers show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptionsResponse {
    /// 3x3 grid order; the legacy `coldness` mood is not offered.
    pub moods: Vec<MoodOption>,
    pub energies: Vec<EnergyOption>,
    pub mood_scores: Vec<MoodScoreOption>,
    pub default_topics: Vec<String>,
    /// Shown behind the topic picker's "more" toggle.
    pub extra_topics: Vec<String>,
}

#[flutter_rust_bridge::frb(sync)]
pub fn editor_options() -> EditorOptionsResponse {
    EditorOptionsResponse {
        moods: Mood::selectable()
            .into_iter()
            .map(|mood| MoodOption {
                key: mood.key().to_string(),
                label: mood.label().to_string(),
                icon: mood.icon().to_string(),
            })
            .collect(),
        energies: EnergyLevel::ALL
            .into_iter()
            .map(|level| EnergyOption {
                value: level.score(),
                key: level.key().to_string(),
                label: level.label().to_string(),
            })
            .collect(),
        mood_scores: (MOOD_SCORE_MIN..=MOOD_SCORE_MAX)
            .filter_map(|value| {
                mood_score_label(value).map(|label| MoodScoreOption {
                    value,
                    label: label.to_string(),
                })
            })
            .collect(),
        default_topics: DEFAULT_TOPICS.iter().map(|topic| topic.to_string()).collect(),
        extra_topics: EXTRA_TOPICS.iter().map(|topic| topic.to_string()).collect(),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn auth_sign_up(email: String, password: String, display_name: Option<String>) -> AccountResponse {
    let result = with_conn(|conn| {
        auth_service(conn)?
            .sign_up(&email, &password, display_name.as_deref())
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(session) => {
            let response = AccountResponse::signed_in(&session, "Signed up.");
            store_session(Some(session));
            response
        }
        Err(err) => AccountResponse::failure(format!("auth_sign_up failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn auth_sign_in(email: String, password: String) -> AccountResponse {
    let result = with_conn(|conn| {
        auth_service(conn)?
            .sign_in(&email, &password)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(session) => {
            let response = AccountResponse::signed_in(&session, "Signed in.");
            store_session(Some(session));
            response
        }
        Err(err) => AccountResponse::failure(format!("auth_sign_in failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn auth_sign_out() -> ActionResponse {
    let Some(session) = take_session() else {
        return ActionResponse::success("No active session.");
    };
    let result = with_conn(|conn| {
        auth_service(conn)?.sign_out(session);
        Ok(())
    });
    ActionResponse::from_result(result, "Signed out.")
}

/// Current session, or `ok=false` when signed out.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_current_user() -> AccountResponse {
    match current_session() {
        Ok(session) => AccountResponse::signed_in(&session, "Signed in."),
        Err(err) => AccountResponse::failure(err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn auth_update_display_name(display_name: Option<String>) -> AccountResponse {
    let result = current_session().and_then(|mut session| {
        with_conn(|conn| {
            auth_service(conn)?
                .update_display_name(&mut session, display_name.as_deref())
                .map_err(|err| err.to_string())
        })?;
        Ok(session)
    });
    match result {
        Ok(session) => {
            let response = AccountResponse::signed_in(&session, "Display name updated.");
            store_session(Some(session));
            response
        }
        Err(err) => AccountResponse::failure(format!("auth_update_display_name failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn auth_request_password_reset(email: String) -> ResetTokenResponse {
    let result = with_conn(|conn| {
        auth_service(conn)?
            .request_password_reset(&email)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(ticket) => ResetTokenResponse {
            ok: true,
            message: "Reset token issued.".to_string(),
            token: Some(ticket.token),
            expires_at_ms: Some(ticket.expires_at),
        },
        Err(err) => ResetTokenResponse {
            ok: false,
            message: format!("auth_request_password_reset failed: {err}"),
            token: None,
            expires_at_ms: None,
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn auth_confirm_password_reset(token: String, new_password: String) -> ActionResponse {
    let result = with_conn(|conn| {
        auth_service(conn)?
            .confirm_password_reset(&token, &new_password)
            .map_err(|err| err.to_string())
    });
    match result {
        Ok(()) => ActionResponse::success("Password updated."),
        Err(err) => ActionResponse::failure(format!("auth_confirm_password_reset failed: {err}")),
    }
}

/// Saves the editor state for `date`.
///
/// `mood` is a mood key (empty = not picked), `energy` is `1..=5`
/// (`0` = not picked) and `mood_score` is `1..=5` or `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_save(
    date: String,
    topics: Vec<String>,
    mood: String,
    energy: u8,
    mood_score: Option<u8>,
    content: String,
) -> EntryResponse {
    let result = signed_in_uid().and_then(|uid| {
        let date = parse_date(&date).map_err(|err| err.to_string())?;
        let mood = parse_mood_input(&mood)?;
        // 0 = not picked; anything else snaps onto the battery scale.
        let energy = match energy {
            0 => None,
            value => Some(EnergyLevel::from_clamped(i64::from(value))),
        };
        let draft = EntryDraft {
            date,
            topics,
            mood,
            energy,
            mood_score,
            content,
        };
        with_conn(|conn| {
            diary_service(conn)?
                .save_entry(uid, draft, today())
                .map_err(|err| err.to_string())
        })
    });
    match result {
        Ok(entry) => EntryResponse {
            ok: true,
            message: "Entry saved.".to_string(),
            entry: Some(EntryItem::from(&entry)),
        },
        Err(err) => EntryResponse::failure(format!("entry_save failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn entry_get(date: String) -> EntryResponse {
    let result = signed_in_uid().and_then(|uid| {
        let date = parse_date(&date).map_err(|err| err.to_string())?;
        with_conn(|conn| {
            diary_service(conn)?
                .get_entry(uid, date)
                .map_err(|err| err.to_string())
        })
    });
    match result {
        Ok(entry) => EntryResponse {
            ok: true,
            message: if entry.is_some() {
                "Entry found.".to_string()
            } else {
                "No entry for this day.".to_string()
            },
            entry: entry.as_ref().map(EntryItem::from),
        },
        Err(err) => EntryResponse::failure(format!("entry_get failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn entry_delete(date: String) -> ActionResponse {
    let result = signed_in_uid().and_then(|uid| {
        let date = parse_date(&date).map_err(|err| err.to_string())?;
        with_conn(|conn| {
            diary_service(conn)?
                .delete_entry(uid, date)
                .map_err(|err| err.to_string())
        })
    });
    match result {
        Ok(()) => ActionResponse::success("Entry deleted."),
        Err(err) => ActionResponse::failure(format!("entry_delete failed: {err}")),
    }
}

/// Entries of `month` (`YYYY-MM`); empty input means the current month.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_month(month: String) -> CalendarMonthResponse {
    let result = signed_in_uid().and_then(|uid| {
        let month = if month.trim().is_empty() {
            Month::of(today())
        } else {
            Month::parse(&month).map_err(|err| err.to_string())?
        };
        with_conn(|conn| {
            diary_service(conn)?
                .month_view(uid, month)
                .map_err(|err| err.to_string())
        })
    });
    match result {
        Ok(view) => CalendarMonthResponse {
            ok: true,
            message: format!("{} entries.", view.entries.len()),
            month: view.month.to_string(),
            entries: view.entries.iter().map(EntryItem::from).collect(),
        },
        Err(err) => CalendarMonthResponse {
            ok: false,
            message: format!("calendar_month failed: {err}"),
            month,
            entries: Vec::new(),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn home_view() -> HomeResponse {
    let today = today();
    let result = signed_in_uid().and_then(|uid| {
        with_conn(|conn| {
            let diary = diary_service(conn)?;
            let card = diary.today_card(uid, today).map_err(|err| err.to_string())?;
            let week = diary.week_strip(uid, today).map_err(|err| err.to_string())?;
            let recent = diary
                .recent_days(uid, today, moodlog_core::service::diary_service::RECENT_DAYS)
                .map_err(|err| err.to_string())?;
            Ok((card, week, recent))
        })
    });
    match result {
        Ok((card, week, recent)) => HomeResponse {
            ok: true,
            message: String::new(),
            headline: card.headline,
            energy_label: card.energy_label,
            snippet: card.snippet,
            today_entry: card.entry.as_ref().map(EntryItem::from),
            week: week
                .into_iter()
                .map(|day| WeekDayItem {
                    date: format_date(day.date),
                    day: day.day,
                    icon: day.icon,
                    is_today: day.is_today,
                })
                .collect(),
            recent_dates: recent.iter().map(|cell| format_date(cell.date)).collect(),
            recent_entries: recent
                .iter()
                .map(|cell| cell.entry.as_ref().map(EntryItem::from))
                .collect(),
        },
        Err(err) => HomeResponse {
            ok: false,
            message: format!("home_view failed: {err}"),
            headline: String::new(),
            energy_label: String::new(),
            snippet: String::new(),
            today_entry: None,
            week: Vec::new(),
            recent_dates: Vec::new(),
            recent_entries: Vec::new(),
        },
    }
}

/// Builds the report for the last `days` days (7, 30 or 90). Longer periods
/// need the pro toggle.
#[flutter_rust_bridge::frb(sync)]
pub fn report_build(days: u32) -> ReportResponse {
    let result = signed_in_uid().and_then(|uid| {
        let period = ReportPeriod::from_days(days)
            .ok_or_else(|| format!("report period must be 7, 30 or 90 days, got {days}"))?;
        with_conn(|conn| {
            let pro_enabled = settings_service(conn)?
                .load()
                .map_err(|err| err.to_string())?
                .pro_enabled;
            if !ReportPeriod::available(pro_enabled).contains(&period) {
                return Err(format!("the {days}-day report requires pro"));
            }
            ReportService::new(entry_repo(conn)?)
                .build_report(uid, period, today())
                .map_err(|err| err.to_string())
        })
    });
    match result {
        Ok(report) => ReportResponse {
            ok: true,
            message: String::new(),
            days,
            labels: report.series.iter().map(|point| point.label.clone()).collect(),
            energies: report.series.iter().map(|point| point.energy).collect(),
            written_days: report.written_days,
            average_energy: report.average_energy,
            trend: report.trend.label().to_string(),
            mood_pie: report
                .mood_pie
                .into_iter()
                .map(|slice| ChartBucket {
                    label: slice.label,
                    value: slice.value,
                })
                .collect(),
            topic_bars: report
                .topic_bars
                .into_iter()
                .map(|bar| ChartBucket {
                    label: bar.topic,
                    value: bar.value,
                })
                .collect(),
            summary_lines: report.summary_lines,
            best_worst_lines: report.best_worst_lines,
            mood_energy_line: report.mood_energy_line,
            topic_energy_line: report.topic_energy_line,
        },
        Err(err) => ReportResponse::failure(days, format!("report_build failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn profile_build() -> ProfileResponse {
    let result = current_session().and_then(|session| {
        with_conn(|conn| {
            ProfileService::new(entry_repo(conn)?)
                .build_profile(&session.user, today())
                .map_err(|err| err.to_string())
        })
    });
    match result {
        Ok(summary) => ProfileResponse {
            ok: true,
            message: String::new(),
            email: summary.email,
            display_name: summary.display_name,
            member_since: summary.member_since.map(format_date),
            all_time_count: summary.all_time_count,
            last_entry_date: summary.last_entry_date.map(format_date),
            current_streak: summary.streaks.current,
            best_streak: summary.streaks.best,
            average_energy: summary.average_energy,
            trend: summary.trend.label().to_string(),
            coach_line: summary.coach_line,
            style_lines: summary.style_lines,
            mood_energy_line: summary.mood_energy_line,
            topic_coach_line: summary.topic_coach_line,
        },
        Err(err) => ProfileResponse {
            ok: false,
            message: format!("profile_build failed: {err}"),
            email: String::new(),
            display_name: None,
            member_since: None,
            all_time_count: 0,
            last_entry_date: None,
            current_streak: 0,
            best_streak: 0,
            average_energy: 0.0,
            trend: String::new(),
            coach_line: String::new(),
            style_lines: Vec::new(),
            mood_energy_line: String::new(),
            topic_coach_line: String::new(),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_load() -> SettingsResponse {
    match with_conn(|conn| settings_service(conn)?.load().map_err(|err| err.to_string())) {
        Ok(settings) => SettingsResponse {
            ok: true,
            message: String::new(),
            settings: Some(to_settings_item(&settings)),
        },
        Err(err) => SettingsResponse {
            ok: false,
            message: format!("settings_load failed: {err}"),
            settings: None,
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_save(settings: SettingsItem) -> ActionResponse {
    let result = StartScreen::parse(&settings.default_start)
        .ok_or_else(|| format!("unknown start screen `{}`", settings.default_start))
        .and_then(|default_start| {
            let settings = AppSettings {
                quote_enabled: settings.quote_enabled,
                default_start,
                reminder_enabled: settings.reminder_enabled,
                reminder_time: settings.reminder_time.trim().to_string(),
                pro_enabled: settings.pro_enabled,
            };
            with_conn(|conn| {
                settings_service(conn)?
                    .save(&settings)
                    .map_err(|err| err.to_string())
            })
        });
    match result {
        Ok(()) => ActionResponse::success("Settings saved."),
        Err(err) => ActionResponse::failure(format!("settings_save failed: {err}")),
    }
}

/// Today's quote card. Works signed out; the quote then ignores the uid.
#[flutter_rust_bridge::frb(sync)]
pub fn quote_today() -> QuoteResponse {
    let today = today();
    let uid = current_session().ok().map(|session| session.user.uid);
    let result = with_conn(|conn| {
        let enabled = settings_service(conn)?
            .load()
            .map_err(|err| err.to_string())?
            .quote_enabled;
        let quotes = quote_service(conn)?;
        let closed = quotes.is_closed_today(today).map_err(|err| err.to_string())?;
        let quote = quotes.daily_quote(uid, today).map_err(|err| err.to_string())?;
        Ok((enabled, closed, quote))
    });
    match result {
        Ok((enabled, closed, quote)) => QuoteResponse {
            ok: true,
            message: String::new(),
            enabled,
            closed,
            text: quote.as_ref().map(|quote| quote.text.clone()),
            author: quote.and_then(|quote| quote.author),
        },
        Err(err) => QuoteResponse {
            ok: false,
            message: format!("quote_today failed: {err}"),
            enabled: false,
            closed: false,
            text: None,
            author: None,
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn quote_close_today() -> ActionResponse {
    let result = with_conn(|conn| {
        quote_service(conn)?
            .close_for_today(today())
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Quote hidden for today.")
}

#[flutter_rust_bridge::frb(sync)]
pub fn quote_reopen_today() -> ActionResponse {
    let result = with_conn(|conn| {
        quote_service(conn)?
            .reopen_today()
            .map_err(|err| err.to_string())
    });
    ActionResponse::from_result(result, "Quote shown again.")
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_mood_input(value: &str) -> Result<Option<Mood>, String> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    Mood::parse(value)
        .map(Some)
        .ok_or_else(|| format!("unknown mood `{}`", value.trim()))
}

fn to_settings_item(settings: &AppSettings) -> SettingsItem {
    SettingsItem {
        quote_enabled: settings.quote_enabled,
        default_start: settings.default_start.as_str().to_string(),
        reminder_enabled: settings.reminder_enabled,
        reminder_time: settings.reminder_time.clone(),
        pro_enabled: settings.pro_enabled,
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_conn<T>(f: impl FnOnce(&Connection) -> Result<T, String>) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| {
        warn!("event=ffi_db_open module=ffi status=error error={err}");
        format!("journal DB open failed: {err}")
    })?;
    f(&conn)
}

fn entry_repo(conn: &Connection) -> Result<SqliteEntryRepository<'_>, String> {
    SqliteEntryRepository::try_new(conn).map_err(|err| format!("entry repo init failed: {err}"))
}

fn diary_service(conn: &Connection) -> Result<DiaryService<SqliteEntryRepository<'_>>, String> {
    entry_repo(conn).map(DiaryService::new)
}

fn auth_service(conn: &Connection) -> Result<AuthService<SqliteAccountRepository<'_>>, String> {
    SqliteAccountRepository::try_new(conn)
        .map(AuthService::new)
        .map_err(|err| format!("account repo init failed: {err}"))
}

fn settings_repo(conn: &Connection) -> Result<SqliteSettingsRepository<'_>, String> {
    SqliteSettingsRepository::try_new(conn)
        .map_err(|err| format!("settings repo init failed: {err}"))
}

fn settings_service(
    conn: &Connection,
) -> Result<SettingsService<SqliteSettingsRepository<'_>>, String> {
    settings_repo(conn).map(SettingsService::new)
}

fn quote_service(conn: &Connection) -> Result<QuoteService<SqliteSettingsRepository<'_>>, String> {
    settings_repo(conn).map(QuoteService::new)
}

fn store_session(session: Option<Session>) {
    *SESSION.lock().unwrap_or_else(PoisonError::into_inner) = session;
}

fn take_session() -> Option<Session> {
    SESSION.lock().unwrap_or_else(PoisonError::into_inner).take()
}

fn current_session() -> Result<Session, String> {
    SESSION
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or_else(|| "not signed in".to_string())
}

fn signed_in_uid() -> Result<UserId, String> {
    current_session().map(|session| session.user.uid)
}
