use moodlog_core::db::open_db_in_memory;
use moodlog_core::service::auth_service::reset_token_digest;
use moodlog_core::{AccountRepository, AuthError, AuthService, SqliteAccountRepository};

#[test]
fn sign_up_then_sign_in_returns_stored_profile() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteAccountRepository::try_new(&conn).unwrap());

    let session = auth
        .sign_up("  Mina@Example.com ", "secret1", Some(" Mina "))
        .unwrap();
    assert_eq!(session.user.email, "mina@example.com");
    assert_eq!(session.user.display_name.as_deref(), Some("Mina"));

    let signed_in = auth.sign_in("MINA@example.com", "secret1").unwrap();
    assert_eq!(signed_in.user, session.user);
    auth.sign_out(signed_in);
}

#[test]
fn sign_up_validates_input_and_rejects_duplicates() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteAccountRepository::try_new(&conn).unwrap());

    assert!(matches!(
        auth.sign_up("not-an-email", "secret1", None),
        Err(AuthError::InvalidEmail)
    ));
    assert!(matches!(
        auth.sign_up("mina@example.com", "12345", None),
        Err(AuthError::WeakPassword)
    ));

    auth.sign_up("mina@example.com", "secret1", None).unwrap();
    assert!(matches!(
        auth.sign_up("MINA@example.com", "secret2", None),
        Err(AuthError::EmailInUse)
    ));
}

#[test]
fn wrong_email_and_wrong_password_look_the_same() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteAccountRepository::try_new(&conn).unwrap());
    auth.sign_up("mina@example.com", "secret1", None).unwrap();

    assert!(matches!(
        auth.sign_in("mina@example.com", "wrong-pass"),
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        auth.sign_in("nobody@example.com", "secret1"),
        Err(AuthError::InvalidCredentials)
    ));
}

#[test]
fn password_reset_token_is_single_use() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteAccountRepository::try_new(&conn).unwrap());
    auth.sign_up("mina@example.com", "secret1", None).unwrap();

    let ticket = auth.request_password_reset("mina@example.com").unwrap();
    auth.confirm_password_reset(&ticket.token, "fresh-secret")
        .unwrap();

    assert!(matches!(
        auth.confirm_password_reset(&ticket.token, "another-secret"),
        Err(AuthError::InvalidResetToken)
    ));
    assert!(auth.sign_in("mina@example.com", "secret1").is_err());
    assert!(auth.sign_in("mina@example.com", "fresh-secret").is_ok());
}

#[test]
fn password_reset_for_unknown_account_fails() {
    let conn = open_db_in_memory().unwrap();
    let auth = AuthService::new(SqliteAccountRepository::try_new(&conn).unwrap());

    assert!(matches!(
        auth.request_password_reset("ghost@example.com"),
        Err(AuthError::AccountNotFound)
    ));
}

#[test]
fn expired_reset_token_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAccountRepository::try_new(&conn).unwrap();
    let auth = AuthService::new(SqliteAccountRepository::try_new(&conn).unwrap());
    let session = auth.sign_up("mina@example.com", "secret1", None).unwrap();

    repo.insert_reset_token(&reset_token_digest("stale"), session.user.uid, 1_000)
        .unwrap();
    assert!(matches!(
        auth.confirm_password_reset("stale", "fresh-secret"),
        Err(AuthError::InvalidResetToken)
    ));
}

#[test]
fn display_name_can_be_set_and_cleared() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAccountRepository::try_new(&conn).unwrap();
    let auth = AuthService::new(SqliteAccountRepository::try_new(&conn).unwrap());
    let mut session = auth.sign_up("mina@example.com", "secret1", None).unwrap();

    auth.update_display_name(&mut session, Some("Mina")).unwrap();
    assert_eq!(session.user.display_name.as_deref(), Some("Mina"));
    let stored = repo.find_by_uid(session.user.uid).unwrap().unwrap();
    assert_eq!(stored.display_name.as_deref(), Some("Mina"));

    auth.update_display_name(&mut session, Some("   ")).unwrap();
    assert_eq!(session.user.display_name, None);
}

#[test]
fn stored_credentials_and_reset_tokens_are_not_plaintext() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteAccountRepository::try_new(&conn).unwrap();
    let auth = AuthService::new(SqliteAccountRepository::try_new(&conn).unwrap());
    let session = auth.sign_up("mina@example.com", "secret1", None).unwrap();

    let credential = repo.credential_for(session.user.uid).unwrap().unwrap();
    assert!(credential.password_hash.starts_with("$argon2id$"));
    assert!(!credential.password_hash.contains("secret1"));

    let ticket = auth.request_password_reset("mina@example.com").unwrap();
    let stored: String = conn
        .query_row("SELECT token FROM password_resets;", [], |row| row.get(0))
        .unwrap();
    assert_ne!(stored, ticket.token);
    assert_eq!(stored, reset_token_digest(&ticket.token));
}

#[test]
fn racing_sign_ups_on_separate_connections_report_email_in_use() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("moodlog.sqlite3");
    let first = moodlog_core::open_db(&path).unwrap();
    let second = moodlog_core::open_db(&path).unwrap();

    AuthService::new(SqliteAccountRepository::try_new(&first).unwrap())
        .sign_up("mina@example.com", "secret1", None)
        .unwrap();
    let result = AuthService::new(SqliteAccountRepository::try_new(&second).unwrap())
        .sign_up("Mina@Example.com", "secret2", None);
    assert!(matches!(result, Err(AuthError::EmailInUse)));
}
