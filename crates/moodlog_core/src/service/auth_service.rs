//! Email/password account use-cases.
//!
//! # Responsibility
//! - Sign up, sign in and password reset against the local account store.
//! - Hash passwords with Argon2id and a per-account random salt.
//!
//! # Invariants
//! - Plain passwords and emails never reach the logs.
//! - Unknown email and wrong password are indistinguishable to callers.
//! - Reset tokens are single-use and expire after one hour.
//! - Only SHA-256 digests of reset tokens are persisted.

use crate::model::user::{normalize_email, UserProfile};
use crate::repo::account_repo::{AccountRepository, Credential};
use crate::repo::RepoError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use log::{error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Minimum accepted password length, in chars.
pub const MIN_PASSWORD_CHARS: usize = 6;
/// Lifetime of a password reset token.
pub const RESET_TOKEN_TTL_MS: i64 = 60 * 60 * 1000;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Authenticated user handle returned by sign-up and sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: UserProfile,
    /// Epoch milliseconds.
    pub signed_in_at: i64,
}

/// Reset token the caller delivers to the account owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetTicket {
    pub token: String,
    pub expires_at: i64,
}

/// Service error for account use-cases.
#[derive(Debug)]
pub enum AuthError {
    InvalidEmail,
    WeakPassword,
    EmailInUse,
    InvalidCredentials,
    AccountNotFound,
    InvalidResetToken,
    /// The password hasher failed; carries the hasher's message.
    Hashing(String),
    Repo(RepoError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email address is malformed"),
            Self::WeakPassword => write!(
                f,
                "password must be at least {MIN_PASSWORD_CHARS} characters"
            ),
            Self::EmailInUse => write!(f, "email is already registered"),
            Self::InvalidCredentials => write!(f, "email or password is incorrect"),
            Self::AccountNotFound => write!(f, "no account is registered for this email"),
            Self::InvalidResetToken => write!(f, "reset token is invalid or expired"),
            Self::Hashing(message) => write!(f, "password hashing failed: {message}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateEmail(_) => Self::EmailInUse,
            other => Self::Repo(other),
        }
    }
}

/// Account service facade over repository implementations.
pub struct AuthService<R: AccountRepository> {
    repo: R,
}

impl<R: AccountRepository> AuthService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new account and signs it in.
    pub fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Session, AuthError> {
        let email = validate_email(email)?;
        validate_password(password)?;

        let now = now_ms();
        let profile = UserProfile::new(&email, display_name, now);
        let credential = new_credential(password)?;
        self.repo.create_account(&profile, &credential)?;

        info!(
            "event=auth_sign_up module=auth status=ok uid={}",
            profile.uid
        );
        Ok(Session {
            user: profile,
            signed_in_at: now,
        })
    }

    /// Verifies email + password and returns the stored profile.
    pub fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = normalize_email(email);
        let Some(profile) = self.repo.find_by_email(&email)? else {
            warn!("event=auth_sign_in module=auth status=error error_code=invalid_credentials");
            return Err(AuthError::InvalidCredentials);
        };
        let credential = self
            .repo
            .credential_for(profile.uid)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&credential.password_hash, password) {
            warn!(
                "event=auth_sign_in module=auth status=error uid={} error_code=invalid_credentials",
                profile.uid
            );
            return Err(AuthError::InvalidCredentials);
        }

        info!("event=auth_sign_in module=auth status=ok uid={}", profile.uid);
        Ok(Session {
            user: profile,
            signed_in_at: now_ms(),
        })
    }

    /// Ends a session. Local sessions hold no server state, so this only logs.
    pub fn sign_out(&self, session: Session) {
        info!(
            "event=auth_sign_out module=auth status=ok uid={}",
            session.user.uid
        );
    }

    /// Issues a one-hour, single-use password reset token.
    pub fn request_password_reset(&self, email: &str) -> Result<PasswordResetTicket, AuthError> {
        let email = validate_email(email)?;
        let profile = self
            .repo
            .find_by_email(&email)?
            .ok_or(AuthError::AccountNotFound)?;

        let ticket = PasswordResetTicket {
            token: Uuid::new_v4().simple().to_string(),
            expires_at: now_ms() + RESET_TOKEN_TTL_MS,
        };
        self.repo.insert_reset_token(
            &reset_token_digest(&ticket.token),
            profile.uid,
            ticket.expires_at,
        )?;
        info!(
            "event=auth_reset_request module=auth status=ok uid={}",
            profile.uid
        );
        Ok(ticket)
    }

    /// Consumes a reset token and replaces the account password.
    pub fn confirm_password_reset(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        validate_password(new_password)?;
        let uid = self
            .repo
            .take_reset_token(&reset_token_digest(token.trim()), now_ms())?
            .ok_or(AuthError::InvalidResetToken)?;

        self.repo
            .update_credential(uid, &new_credential(new_password)?)?;
        info!("event=auth_reset_confirm module=auth status=ok uid={uid}");
        Ok(())
    }

    /// Sets or clears the display name shown on the profile screen.
    pub fn update_display_name(
        &self,
        session: &mut Session,
        display_name: Option<&str>,
    ) -> Result<(), AuthError> {
        let normalized = display_name
            .map(str::trim)
            .filter(|name| !name.is_empty());
        self.repo.update_display_name(session.user.uid, normalized)?;
        session.user.display_name = normalized.map(str::to_string);
        Ok(())
    }
}

fn validate_email(email: &str) -> Result<String, AuthError> {
    let normalized = normalize_email(email);
    if EMAIL_RE.is_match(&normalized) {
        Ok(normalized)
    } else {
        Err(AuthError::InvalidEmail)
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

fn new_credential(password: &str) -> Result<Credential, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| {
            error!("event=auth_hash module=auth status=error error={err}");
            AuthError::Hashing(err.to_string())
        })?
        .to_string();
    Ok(Credential { password_hash })
}

/// Checks `password` against a stored PHC string. Unreadable hashes never match.
pub fn verify_password(password_hash: &str, password: &str) -> bool {
    let parsed = match PasswordHash::new(password_hash) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!("event=auth_verify module=auth status=error error_code=unreadable_hash error={err}");
            return false;
        }
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Hex SHA-256 of a reset token; the form stored in `password_resets`.
pub fn reset_token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub(crate) fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::{
        new_credential, reset_token_digest, validate_email, validate_password, verify_password,
        AuthError,
    };

    #[test]
    fn credentials_are_salted_phc_strings() {
        let first = new_credential("secret1").unwrap();
        let second = new_credential("secret1").unwrap();

        assert!(first.password_hash.starts_with("$argon2id$"));
        assert_ne!(first.password_hash, second.password_hash);
        assert!(verify_password(&first.password_hash, "secret1"));
        assert!(!verify_password(&first.password_hash, "secret2"));
    }

    #[test]
    fn legacy_sha256_digest_never_verifies() {
        let legacy = "a".repeat(64);
        assert!(!verify_password(&legacy, "secret1"));
    }

    #[test]
    fn reset_token_digest_is_hex_sha256() {
        assert_eq!(
            reset_token_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(reset_token_digest("abc"), reset_token_digest("abd"));
    }

    #[test]
    fn email_and_password_rules() {
        assert_eq!(validate_email(" Me@Example.COM ").unwrap(), "me@example.com");
        assert!(matches!(validate_email("nope"), Err(AuthError::InvalidEmail)));
        assert!(matches!(validate_password("12345"), Err(AuthError::WeakPassword)));
        assert!(validate_password("123456").is_ok());
    }
}
