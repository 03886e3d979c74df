//! User store — account creation, lookup, password verification.
//!
//! DESIGN
//! ======
//! Passwords are stored as `salt$digest` where both halves are hex and the
//! digest is SHA-256 over the salt followed by the plaintext. Verification
//! recomputes the digest; no plaintext ever reaches the database. Hashing is
//! an explicit step in `create`, never a hidden side effect of a save.

use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::services::FieldViolation;
use crate::services::session::bytes_to_hex;

pub const DEFAULT_AVATAR_URL: &str = "/avatar/default";

const MAX_USERNAME_LEN: usize = 31;
const MAX_NAME_LEN: usize = 63;
const MAX_PASSWORD_LEN: usize = 63;

/// Client-facing user shape. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub avatar_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("user validation failed")]
    Validation(Vec<FieldViolation>),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// PASSWORDS
// =============================================================================

/// Hash a plaintext password with a fresh random salt.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt: [u8; 16] = rand::rng().random();
    let salt_hex = bytes_to_hex(&salt);
    format!("{salt_hex}${}", digest_hex(&salt_hex, password))
}

/// Verify a plaintext password against a stored `salt$digest` value.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest)) = stored.split_once('$') else {
        return false;
    };
    digest_hex(salt_hex, password) == digest
}

fn digest_hex(salt_hex: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt_hex.as_bytes());
    hasher.update(password.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Check a new account before any mutation.
#[must_use]
pub fn validate_new_user(username: &str, name: &str, password: &str) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    let username_len = username.chars().count();
    if username_len == 0 || username_len > MAX_USERNAME_LEN {
        violations.push(FieldViolation::new(
            "username",
            format!("username must be 1..={MAX_USERNAME_LEN} characters"),
        ));
    }

    let name_len = name.chars().count();
    if name_len == 0 || name_len > MAX_NAME_LEN {
        violations.push(FieldViolation::new("name", format!("name must be 1..={MAX_NAME_LEN} characters")));
    }

    let password_len = password.chars().count();
    if password_len == 0 || password_len > MAX_PASSWORD_LEN {
        violations.push(FieldViolation::new(
            "password",
            format!("password must be 1..={MAX_PASSWORD_LEN} characters"),
        ));
    }

    violations
}

// =============================================================================
// STORE
// =============================================================================

/// Create a user. `name` defaults to the username when absent.
///
/// # Errors
///
/// Returns `Validation` for out-of-range fields, `Database` if the insert
/// fails (including a duplicate username).
pub async fn create(
    pool: &PgPool,
    username: &str,
    name: Option<&str>,
    password: &str,
) -> Result<User, UserError> {
    let username = username.trim();
    let name = name.unwrap_or(username);

    let violations = validate_new_user(username, name, password);
    if !violations.is_empty() {
        return Err(UserError::Validation(violations));
    }

    let user = User {
        id: Uuid::new_v4(),
        username: username.to_owned(),
        name: name.to_owned(),
        avatar_url: DEFAULT_AVATAR_URL.to_owned(),
    };

    sqlx::query("INSERT INTO users (id, username, name, avatar_url, password_hash) VALUES ($1, $2, $3, $4, $5)")
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.avatar_url)
        .bind(hash_password(password))
        .execute(pool)
        .await?;

    Ok(user)
}

/// Look up a user and their password hash by username.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<(User, String)>, sqlx::Error> {
    let row = sqlx::query("SELECT id, username, name, avatar_url, password_hash FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| {
        (
            User {
                id: r.get("id"),
                username: r.get("username"),
                name: r.get("name"),
                avatar_url: r.get("avatar_url"),
            },
            r.get("password_hash"),
        )
    }))
}

/// Username + password login check.
///
/// # Errors
///
/// Returns a database error if the lookup fails.
pub async fn authenticate(pool: &PgPool, username: &str, password: &str) -> Result<Option<User>, sqlx::Error> {
    let Some((user, hash)) = find_by_username(pool, username).await? else {
        return Ok(None);
    };
    if verify_password(password, &hash) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

// =============================================================================
// SEEDING
// =============================================================================

/// Create the guest account and its greeting message if missing. Called
/// once at startup.
///
/// # Errors
///
/// Returns a database error if any write fails.
pub async fn seed_guest_user(pool: &PgPool) -> Result<(), UserError> {
    if find_by_username(pool, "guestuser").await?.is_some() {
        return Ok(());
    }

    let guest = create(pool, "guestuser", Some("guest"), "guestuser").await?;
    info!(id = %guest.id, "guest user created");

    let greeting = crate::services::chat::ChatMessage {
        id: Uuid::new_v4(),
        creator: crate::services::chat::Creator {
            id: guest.id,
            name: guest.name.clone(),
            avatar_url: Some(guest.avatar_url.clone()),
        },
        text: "Hello friend !!".to_owned(),
        geo: None,
        created_at: time::OffsetDateTime::now_utc(),
    };
    crate::services::chat::insert_message(pool, &greeting).await.map_err(UserError::Database)?;
    info!(id = %greeting.id, "default message created");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let stored = hash_password("guestuser");
        assert!(verify_password("guestuser", &stored));
        assert!(!verify_password("wrong", &stored));
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "no-separator"));
    }

    #[test]
    fn valid_account_passes_validation() {
        assert!(validate_new_user("guestuser", "guest", "guestuser").is_empty());
    }

    #[test]
    fn username_bounds_are_enforced() {
        let violations = validate_new_user("", "guest", "pw");
        assert!(violations.iter().any(|v| v.field == "username"));

        let violations = validate_new_user(&"u".repeat(32), "guest", "pw");
        assert!(violations.iter().any(|v| v.field == "username"));

        assert!(validate_new_user(&"u".repeat(31), "guest", "pw").is_empty());
    }

    #[test]
    fn name_and_password_bounds_are_enforced() {
        let violations = validate_new_user("user", &"n".repeat(64), &"p".repeat(64));
        assert!(violations.iter().any(|v| v.field == "name"));
        assert!(violations.iter().any(|v| v.field == "password"));
    }
}
