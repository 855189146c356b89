//! Account, credential and password-reset persistence.
//!
//! # Responsibility
//! - Store user profiles and their PHC-format password hashes.
//! - Track one-shot password reset tokens by digest.
//!
//! # Invariants
//! - Emails are stored normalized and are unique case-insensitively.
//! - A profile and its credential are created in one IMMEDIATE transaction;
//!   a concurrent insert of the same email still surfaces as `DuplicateEmail`.
//! - A reset token can be taken at most once and only before it expires.

use crate::model::user::{normalize_email, UserId, UserProfile};
use crate::repo::{ensure_table, parse_uid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

/// Password hash stored for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// PHC string (`$argon2id$v=19$...`); algorithm, params and salt included.
    pub password_hash: String,
}

/// Repository interface for accounts.
pub trait AccountRepository {
    /// Creates profile + credential; `DuplicateEmail` when the email is taken.
    fn create_account(&self, profile: &UserProfile, credential: &Credential) -> RepoResult<()>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<UserProfile>>;
    fn find_by_uid(&self, uid: UserId) -> RepoResult<Option<UserProfile>>;
    fn credential_for(&self, uid: UserId) -> RepoResult<Option<Credential>>;
    fn update_credential(&self, uid: UserId, credential: &Credential) -> RepoResult<()>;
    fn update_display_name(&self, uid: UserId, display_name: Option<&str>) -> RepoResult<()>;
    /// Stores a reset token digest valid until `expires_at` (epoch ms).
    fn insert_reset_token(
        &self,
        token_digest: &str,
        uid: UserId,
        expires_at: i64,
    ) -> RepoResult<()>;
    /// Marks an unused, unexpired token as used and returns its owner.
    fn take_reset_token(&self, token_digest: &str, now: i64) -> RepoResult<Option<UserId>>;
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAccountRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table(conn, "users", &["uid", "email", "display_name", "created_at"])?;
        ensure_table(conn, "credentials", &["uid", "password_hash"])?;
        ensure_table(conn, "password_resets", &["token", "uid", "expires_at", "used"])?;
        Ok(Self { conn })
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn create_account(&self, profile: &UserProfile, credential: &Credential) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let taken: i64 = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1 COLLATE NOCASE);",
            [profile.email.as_str()],
            |row| row.get(0),
        )?;
        if taken == 1 {
            return Err(RepoError::DuplicateEmail(profile.email.clone()));
        }

        insert_user(&tx, profile)?;
        tx.execute(
            "INSERT INTO credentials (uid, password_hash) VALUES (?1, ?2);",
            params![profile.uid.to_string(), credential.password_hash.as_str()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<UserProfile>> {
        let normalized = normalize_email(email);
        let mut stmt = self.conn.prepare(
            "SELECT uid, email, display_name, created_at
             FROM users
             WHERE email = ?1 COLLATE NOCASE;",
        )?;
        let mut rows = stmt.query([normalized.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(row)?));
        }
        Ok(None)
    }

    fn find_by_uid(&self, uid: UserId) -> RepoResult<Option<UserProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT uid, email, display_name, created_at
             FROM users
             WHERE uid = ?1;",
        )?;
        let mut rows = stmt.query([uid.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_profile_row(row)?));
        }
        Ok(None)
    }

    fn credential_for(&self, uid: UserId) -> RepoResult<Option<Credential>> {
        let credential = self
            .conn
            .query_row(
                "SELECT password_hash FROM credentials WHERE uid = ?1;",
                [uid.to_string()],
                |row| {
                    Ok(Credential {
                        password_hash: row.get(0)?,
                    })
                },
            )
            .optional()?;
        Ok(credential)
    }

    fn update_credential(&self, uid: UserId, credential: &Credential) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE credentials
             SET
                password_hash = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uid = ?1;",
            params![uid.to_string(), credential.password_hash.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::UserNotFound(uid));
        }
        Ok(())
    }

    fn update_display_name(&self, uid: UserId, display_name: Option<&str>) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE users SET display_name = ?2 WHERE uid = ?1;",
            params![uid.to_string(), display_name],
        )?;
        if changed == 0 {
            return Err(RepoError::UserNotFound(uid));
        }
        Ok(())
    }

    fn insert_reset_token(
        &self,
        token_digest: &str,
        uid: UserId,
        expires_at: i64,
    ) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO password_resets (token, uid, expires_at) VALUES (?1, ?2, ?3);",
            params![token_digest, uid.to_string(), expires_at],
        )?;
        Ok(())
    }

    fn take_reset_token(&self, token_digest: &str, now: i64) -> RepoResult<Option<UserId>> {
        let tx = self.conn.unchecked_transaction()?;
        let owner: Option<String> = tx
            .query_row(
                "SELECT uid
                 FROM password_resets
                 WHERE token = ?1
                   AND used = 0
                   AND expires_at > ?2;",
                params![token_digest, now],
                |row| row.get(0),
            )
            .optional()?;

        let Some(owner) = owner else {
            return Ok(None);
        };

        tx.execute(
            "UPDATE password_resets SET used = 1 WHERE token = ?1;",
            [token_digest],
        )?;
        tx.commit()?;
        Ok(Some(parse_uid(&owner, "password_resets.uid")?))
    }
}

fn insert_user(conn: &Connection, profile: &UserProfile) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO users (uid, email, display_name, created_at)
         VALUES (?1, ?2, ?3, ?4);",
        params![
            profile.uid.to_string(),
            profile.email.as_str(),
            profile.display_name.as_deref(),
            profile.created_at,
        ],
    )
    .map_err(|err| {
        if is_unique_violation(&err) {
            RepoError::DuplicateEmail(profile.email.clone())
        } else {
            err.into()
        }
    })?;
    Ok(())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _)
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn parse_profile_row(row: &Row<'_>) -> RepoResult<UserProfile> {
    let uid_text: String = row.get("uid")?;
    Ok(UserProfile {
        uid: parse_uid(&uid_text, "users.uid")?,
        email: row.get("email")?,
        display_name: row.get("display_name")?,
        created_at: row.get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::insert_user;
    use crate::db::open_db_in_memory;
    use crate::model::user::UserProfile;
    use crate::repo::RepoError;

    #[test]
    fn unique_email_violation_maps_to_duplicate_email() {
        let conn = open_db_in_memory().unwrap();
        // Row committed by another writer after the existence check ran.
        conn.execute(
            "INSERT INTO users (uid, email) VALUES ('other-writer', 'MINA@example.com');",
            [],
        )
        .unwrap();

        let profile = UserProfile::new("mina@example.com", None, 1_760_000_000_000);
        match insert_user(&conn, &profile).unwrap_err() {
            RepoError::DuplicateEmail(email) => assert_eq!(email, "mina@example.com"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
