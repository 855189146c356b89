//! Typed app preferences over the key-value settings store.
//!
//! # Responsibility
//! - Map stored strings to `AppSettings` with defaults.
//! - Validate user input (reminder time) before it is written.
//!
//! # Invariants
//! - `load` never fails on malformed values; each bad key falls back to its
//!   default and logs a warning.
//! - `save` writes every key, so a loaded-then-saved store is canonical.

use crate::repo::settings_repo::SettingsRepository;
use crate::repo::{RepoError, RepoResult};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const KEY_QUOTE_ENABLED: &str = "settings.quote_enabled";
pub const KEY_DEFAULT_START: &str = "settings.default_start";
pub const KEY_REMINDER_ENABLED: &str = "settings.reminder_enabled";
pub const KEY_REMINDER_TIME: &str = "settings.reminder_time";
pub const KEY_PRO_ENABLED: &str = "settings.pro_enabled";

pub const DEFAULT_REMINDER_TIME: &str = "21:00";

static REMINDER_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid reminder time regex"));

/// Screen opened after sign-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartScreen {
    #[default]
    Home,
    Calendar,
}

impl StartScreen {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Calendar => "calendar",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "home" => Some(Self::Home),
            "calendar" => Some(Self::Calendar),
            _ => None,
        }
    }
}

/// Device-local app preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub quote_enabled: bool,
    pub default_start: StartScreen,
    pub reminder_enabled: bool,
    /// `HH:MM`, 24-hour clock.
    pub reminder_time: String,
    /// Unlocks 30/90-day reports. Local toggle until billing exists.
    pub pro_enabled: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            quote_enabled: true,
            default_start: StartScreen::Home,
            reminder_enabled: false,
            reminder_time: DEFAULT_REMINDER_TIME.to_string(),
            pro_enabled: false,
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    InvalidReminderTime(String),
    Repo(RepoError),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReminderTime(value) => {
                write!(f, "reminder time must be HH:MM, got `{value}`")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidReminderTime(_) => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for SettingsError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Returns true for a valid 24-hour `HH:MM` value.
pub fn is_valid_reminder_time(value: &str) -> bool {
    REMINDER_TIME_RE.is_match(value)
}

pub struct SettingsService<R: SettingsRepository> {
    repo: R,
}

impl<R: SettingsRepository> SettingsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn load(&self) -> RepoResult<AppSettings> {
        let defaults = AppSettings::default();
        Ok(AppSettings {
            quote_enabled: self.read(KEY_QUOTE_ENABLED, parse_bool)?.unwrap_or(defaults.quote_enabled),
            default_start: self
                .read(KEY_DEFAULT_START, StartScreen::parse)?
                .unwrap_or(defaults.default_start),
            reminder_enabled: self
                .read(KEY_REMINDER_ENABLED, parse_bool)?
                .unwrap_or(defaults.reminder_enabled),
            reminder_time: self
                .read(KEY_REMINDER_TIME, |value| {
                    is_valid_reminder_time(value).then(|| value.to_string())
                })?
                .unwrap_or(defaults.reminder_time),
            pro_enabled: self.read(KEY_PRO_ENABLED, parse_bool)?.unwrap_or(defaults.pro_enabled),
        })
    }

    pub fn save(&self, settings: &AppSettings) -> Result<(), SettingsError> {
        if !is_valid_reminder_time(&settings.reminder_time) {
            return Err(SettingsError::InvalidReminderTime(
                settings.reminder_time.clone(),
            ));
        }
        self.repo
            .set(KEY_QUOTE_ENABLED, bool_str(settings.quote_enabled))?;
        self.repo
            .set(KEY_DEFAULT_START, settings.default_start.as_str())?;
        self.repo
            .set(KEY_REMINDER_ENABLED, bool_str(settings.reminder_enabled))?;
        self.repo.set(KEY_REMINDER_TIME, &settings.reminder_time)?;
        self.repo
            .set(KEY_PRO_ENABLED, bool_str(settings.pro_enabled))?;
        info!(
            "event=settings_save module=settings status=ok quote_enabled={} default_start={} reminder_enabled={} pro_enabled={}",
            settings.quote_enabled,
            settings.default_start.as_str(),
            settings.reminder_enabled,
            settings.pro_enabled
        );
        Ok(())
    }

    fn read<T>(&self, key: &str, parse: impl Fn(&str) -> Option<T>) -> RepoResult<Option<T>> {
        let Some(raw) = self.repo.get(key)? else {
            return Ok(None);
        };
        let parsed = parse(&raw);
        if parsed.is_none() {
            warn!("event=settings_load module=settings status=fallback key={key} value={raw:?}");
        }
        Ok(parsed)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
