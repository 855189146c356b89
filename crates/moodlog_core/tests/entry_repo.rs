use chrono::NaiveDate;
use moodlog_core::db::open_db_in_memory;
use moodlog_core::repo::account_repo::Credential;
use moodlog_core::{
    AccountRepository, DiaryEntry, EnergyLevel, EntryRepository, Month, Mood, RepoError,
    SqliteAccountRepository, SqliteEntryRepository, UserProfile,
};
use rusqlite::Connection;

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, m, d).unwrap()
}

fn create_user(conn: &Connection, email: &str) -> UserProfile {
    let repo = SqliteAccountRepository::try_new(conn).unwrap();
    let profile = UserProfile::new(email, None, 1_760_000_000_000);
    repo.create_account(
        &profile,
        &Credential {
            password_hash: "$argon2id$test".to_string(),
        },
    )
    .unwrap();
    profile
}

#[test]
fn upsert_keeps_one_row_per_day_and_stamps_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn, "mina@example.com");
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let first = DiaryEntry::new(day(10, 19), Mood::Calm, EnergyLevel::Normal).with_topic("Work");
    repo.upsert_entry(user.uid, &first).unwrap();
    let second = DiaryEntry::new(day(10, 19), Mood::Hope, EnergyLevel::Full)
        .with_mood_score(Some(5))
        .with_content("better evening");
    repo.upsert_entry(user.uid, &second).unwrap();

    assert_eq!(repo.count_entries(user.uid).unwrap(), 1);
    let stored = repo.get_entry(user.uid, day(10, 19)).unwrap().unwrap();
    assert_eq!(stored.mood, Mood::Hope);
    assert_eq!(stored.energy, EnergyLevel::Full);
    assert_eq!(stored.score, 5);
    assert_eq!(stored.mood_score, Some(5));
    assert_eq!(stored.topic, "");
    assert_eq!(stored.content, "better evening");
    assert!(stored.updated_at.is_some());
}

#[test]
fn range_month_and_last_entry_queries_are_date_ordered() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn, "mina@example.com");
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    for date in [day(10, 3), day(9, 30), day(10, 1), day(11, 1)] {
        repo.upsert_entry(
            user.uid,
            &DiaryEntry::new(date, Mood::Calm, EnergyLevel::Charged),
        )
        .unwrap();
    }

    let range = repo
        .list_entries_by_range(user.uid, day(9, 30), day(10, 3))
        .unwrap();
    let dates: Vec<NaiveDate> = range.iter().map(|entry| entry.date).collect();
    assert_eq!(dates, vec![day(9, 30), day(10, 1), day(10, 3)]);

    let october = repo
        .list_entries_by_month(user.uid, Month::parse("2026-10").unwrap())
        .unwrap();
    assert_eq!(october.len(), 2);

    let last = repo.last_entry(user.uid).unwrap().unwrap();
    assert_eq!(last.date, day(11, 1));
}

#[test]
fn entries_are_scoped_per_user() {
    let conn = open_db_in_memory().unwrap();
    let mina = create_user(&conn, "mina@example.com");
    let joon = create_user(&conn, "joon@example.com");
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    repo.upsert_entry(
        mina.uid,
        &DiaryEntry::new(day(10, 19), Mood::Calm, EnergyLevel::Low),
    )
    .unwrap();

    assert!(repo.get_entry(joon.uid, day(10, 19)).unwrap().is_none());
    assert_eq!(repo.count_entries(joon.uid).unwrap(), 0);
    assert!(repo.last_entry(joon.uid).unwrap().is_none());
}

#[test]
fn delete_missing_entry_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn, "mina@example.com");
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let err = repo.delete_entry(user.uid, day(10, 19)).unwrap_err();
    assert!(matches!(err, RepoError::EntryNotFound { .. }));
}

#[test]
fn invalid_entry_is_rejected_before_write() {
    let conn = open_db_in_memory().unwrap();
    let user = create_user(&conn, "mina@example.com");
    let repo = SqliteEntryRepository::try_new(&conn).unwrap();

    let mut entry = DiaryEntry::new(day(10, 19), Mood::Calm, EnergyLevel::Low);
    entry.mood_score = Some(9);
    let err = repo.upsert_entry(user.uid, &entry).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.count_entries(user.uid).unwrap(), 0);
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteEntryRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("entries")));
}
