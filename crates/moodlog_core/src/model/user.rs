//! Account profile model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of one journal owner.
pub type UserId = Uuid;

/// Public profile of an account. Credentials live in a separate table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: UserId,
    /// Lowercased, trimmed email.
    pub email: String,
    pub display_name: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl UserProfile {
    /// Creates a profile with a generated uid.
    pub fn new(email: &str, display_name: Option<&str>, created_at: i64) -> Self {
        Self {
            uid: Uuid::new_v4(),
            email: normalize_email(email),
            display_name: display_name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            created_at,
        }
    }
}

/// Normalizes an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
