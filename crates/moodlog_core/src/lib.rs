//! Core domain logic for MoodLog, a one-entry-per-day mood journal.
//! Storage, statistics and coach text live here; the FFI and CLI crates
//! only adapt these APIs.

pub mod coach;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::calendar::{format_date, parse_date, CalendarParseError, Month};
pub use model::energy::EnergyLevel;
pub use model::entry::{DiaryEntry, EntryValidationError};
pub use model::mood::Mood;
pub use model::user::{UserId, UserProfile};
pub use repo::account_repo::{AccountRepository, SqliteAccountRepository};
pub use repo::entry_repo::{EntryRepository, SqliteEntryRepository};
pub use repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
pub use repo::{RepoError, RepoResult};
pub use service::auth_service::{AuthError, AuthService, PasswordResetTicket, Session};
pub use service::diary_service::{DiaryService, DiaryServiceError, EntryDraft};
pub use service::profile_service::{ProfileService, ProfileSummary};
pub use service::quote_service::{Quote, QuoteService};
pub use service::report_service::{Report, ReportPeriod, ReportService};
pub use service::settings_service::{AppSettings, SettingsError, SettingsService, StartScreen};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
