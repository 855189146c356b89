//! Diary entry repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide per-user entry storage keyed by calendar date.
//! - Serve the range/month/latest queries used by calendar, report and
//!   profile views.
//!
//! # Invariants
//! - All queries are constrained to one `uid`.
//! - `upsert_entry` replaces every field of the `(uid, date)` row and stamps
//!   `updated_at` with the store clock.
//! - List results are ordered by `date ASC`.

use crate::model::calendar::{format_date, parse_date, Month};
use crate::model::energy::EnergyLevel;
use crate::model::entry::DiaryEntry;
use crate::model::mood::Mood;
use crate::model::user::UserId;
use crate::repo::{ensure_table, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const ENTRY_SELECT_SQL: &str = "SELECT
    date,
    topic,
    mood,
    energy,
    score,
    mood_score,
    content,
    updated_at
FROM entries";

const ENTRY_COLUMNS: [&str; 9] = [
    "uid",
    "date",
    "topic",
    "mood",
    "energy",
    "score",
    "mood_score",
    "content",
    "updated_at",
];

/// Repository interface for one journal's entries.
pub trait EntryRepository {
    /// Inserts or fully replaces the entry stored for `entry.date`.
    fn upsert_entry(&self, uid: UserId, entry: &DiaryEntry) -> RepoResult<()>;
    fn get_entry(&self, uid: UserId, date: NaiveDate) -> RepoResult<Option<DiaryEntry>>;
    /// Deletes one entry; `EntryNotFound` when nothing was stored for `date`.
    fn delete_entry(&self, uid: UserId, date: NaiveDate) -> RepoResult<()>;
    /// Inclusive `start..=end` range ordered by date.
    fn list_entries_by_range(
        &self,
        uid: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<DiaryEntry>>;
    /// Every entry of one calendar month ordered by date.
    fn list_entries_by_month(&self, uid: UserId, month: Month) -> RepoResult<Vec<DiaryEntry>> {
        self.list_entries_by_range(uid, month.first_day(), month.last_day())
    }
    /// All-time entry count.
    fn count_entries(&self, uid: UserId) -> RepoResult<u64>;
    /// Entry with the latest date, if any.
    fn last_entry(&self, uid: UserId) -> RepoResult<Option<DiaryEntry>>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, "entries", &ENTRY_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn upsert_entry(&self, uid: UserId, entry: &DiaryEntry) -> RepoResult<()> {
        entry.validate()?;

        self.conn.execute(
            "INSERT INTO entries (
                uid,
                date,
                topic,
                mood,
                energy,
                score,
                mood_score,
                content,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, (strftime('%s', 'now') * 1000))
            ON CONFLICT (uid, date) DO UPDATE SET
                topic = excluded.topic,
                mood = excluded.mood,
                energy = excluded.energy,
                score = excluded.score,
                mood_score = excluded.mood_score,
                content = excluded.content,
                updated_at = excluded.updated_at;",
            params![
                uid.to_string(),
                format_date(entry.date),
                entry.topic.as_str(),
                entry.mood.key(),
                entry.energy.score(),
                entry.score,
                entry.mood_score,
                entry.content.as_str(),
            ],
        )?;

        Ok(())
    }

    fn get_entry(&self, uid: UserId, date: NaiveDate) -> RepoResult<Option<DiaryEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE uid = ?1
               AND date = ?2;"
        ))?;

        let mut rows = stmt.query(params![uid.to_string(), format_date(date)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn delete_entry(&self, uid: UserId, date: NaiveDate) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM entries WHERE uid = ?1 AND date = ?2;",
            params![uid.to_string(), format_date(date)],
        )?;

        if changed == 0 {
            return Err(RepoError::EntryNotFound { uid, date });
        }

        Ok(())
    }

    fn list_entries_by_range(
        &self,
        uid: UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<Vec<DiaryEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE uid = ?1
               AND date >= ?2
               AND date <= ?3
             ORDER BY date ASC;"
        ))?;

        let mut rows = stmt.query(params![
            uid.to_string(),
            format_date(start),
            format_date(end)
        ])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }

    fn count_entries(&self, uid: UserId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM entries WHERE uid = ?1;",
            [uid.to_string()],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative entry count `{count}`")))
    }

    fn last_entry(&self, uid: UserId) -> RepoResult<Option<DiaryEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE uid = ?1
             ORDER BY date DESC
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query([uid.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<DiaryEntry> {
    let date_text: String = row.get("date")?;
    let date = parse_date(&date_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{date_text}` in entries.date"))
    })?;

    let mood_text: String = row.get("mood")?;
    let mood = Mood::parse(&mood_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid mood `{mood_text}` in entries.mood"))
    })?;

    let energy_value: i64 = row.get("energy")?;
    let energy = u8::try_from(energy_value)
        .ok()
        .and_then(EnergyLevel::from_score)
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid energy `{energy_value}` in entries.energy"
            ))
        })?;

    let entry = DiaryEntry {
        date,
        topic: row.get("topic")?,
        mood,
        energy,
        score: row.get("score")?,
        mood_score: row.get("mood_score")?,
        content: row.get("content")?,
        updated_at: row.get("updated_at")?,
    };
    entry.validate()?;
    Ok(entry)
}
