//! Chat relay — append-only message feed.
//!
//! DESIGN
//! ======
//! `post_message` validates, persists, then broadcasts. There is no revert
//! path: a persistence failure fails the request before anything became
//! visible to other clients. The issuing client recognizes its own message
//! in the broadcast by creator id and may skip re-rendering it.
//!
//! Presentation (relative age bucketing, location string, footer) lives here
//! so both the broadcast view and the HTTP response carry the same rendering.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::event::Event;
use crate::services::geo::GeoInfo;
use crate::services::{FieldViolation, broadcast};
use crate::state::AppState;

/// Longest accepted message text, in characters.
pub const MAX_TEXT_LEN: usize = 255;

/// Longest accepted geo field, in characters.
const MAX_GEO_FIELD_LEN: usize = 255;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Stored message shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub creator: Creator,
    pub text: String,
    pub geo: Option<GeoInfo>,
    pub created_at: OffsetDateTime,
}

/// Message plus its rendered footer, as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageView {
    pub id: Uuid,
    pub creator: Creator,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoInfo>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub footer: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message validation failed")]
    Validation(Vec<FieldViolation>),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Check a message before any mutation. Text must be 1..=255 characters
/// after trimming; geo fields are each capped at 255 characters.
#[must_use]
pub fn validate_message(text: &str, geo: Option<&GeoInfo>) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    let len = text.chars().count();
    if len == 0 {
        violations.push(FieldViolation::new("text", "a text is required"));
    } else if len > MAX_TEXT_LEN {
        violations.push(FieldViolation::new(
            "text",
            format!("text must be at most {MAX_TEXT_LEN} characters, got {len}"),
        ));
    }

    if let Some(geo) = geo {
        let fields: [(&'static str, Option<&String>); 4] = [
            ("geo.country_name", geo.country_name.as_ref()),
            ("geo.region_name", geo.region_name.as_ref()),
            ("geo.city", geo.city.as_ref()),
            ("geo.time_zone", geo.time_zone.as_ref()),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                if value.chars().count() > MAX_GEO_FIELD_LEN {
                    violations.push(FieldViolation::new(field, "value too long"));
                }
            }
        }
    }

    violations
}

// =============================================================================
// POST / LIST
// =============================================================================

/// Validate, persist, broadcast. On success the returned view has already
/// been fanned out to every connected client as a `chat.message` event.
///
/// # Errors
///
/// Returns `Validation` for bad input (no persistence, no broadcast) and
/// `Database` if the insert fails (no broadcast).
pub async fn post_message(
    state: &AppState,
    creator: Creator,
    text: &str,
    geo: Option<GeoInfo>,
) -> Result<ChatMessageView, ChatError> {
    let text = text.trim();
    let violations = validate_message(text, geo.as_ref());
    if !violations.is_empty() {
        return Err(ChatError::Validation(violations));
    }

    let message = ChatMessage {
        id: Uuid::new_v4(),
        creator,
        text: text.to_owned(),
        geo,
        created_at: OffsetDateTime::now_utc(),
    };

    insert_message(&state.pool, &message).await?;

    let view = render(&message, OffsetDateTime::now_utc());
    broadcast::broadcast(state, &Event::ChatMessage(view.clone()), None).await;
    tracing::info!(id = %view.id, creator = %view.creator.name, "chat message posted");

    Ok(view)
}

/// Recent history for bootstrap, oldest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_recent(pool: &sqlx::PgPool, limit: i64) -> Result<Vec<ChatMessage>, sqlx::Error> {
    let rows = sqlx::query_as::<
        _,
        (Uuid, Uuid, String, Option<String>, String, Option<serde_json::Value>, OffsetDateTime),
    >(
        "SELECT id, creator_id, creator_name, creator_avatar_url, text, geo, created_at
         FROM messages
         ORDER BY created_at DESC
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut messages: Vec<ChatMessage> = rows
        .into_iter()
        .map(|(id, creator_id, creator_name, creator_avatar_url, text, geo, created_at)| ChatMessage {
            id,
            creator: Creator { id: creator_id, name: creator_name, avatar_url: creator_avatar_url },
            text,
            geo: geo.and_then(|v| serde_json::from_value(v).ok()),
            created_at,
        })
        .collect();
    messages.reverse();
    Ok(messages)
}

pub(crate) async fn insert_message(pool: &sqlx::PgPool, message: &ChatMessage) -> Result<(), sqlx::Error> {
    let geo = message
        .geo
        .as_ref()
        .map(|g| serde_json::to_value(g).unwrap_or_default());

    sqlx::query(
        "INSERT INTO messages (id, creator_id, creator_name, creator_avatar_url, text, geo, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(message.id)
    .bind(message.creator.id)
    .bind(&message.creator.name)
    .bind(&message.creator.avatar_url)
    .bind(&message.text)
    .bind(geo)
    .bind(message.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

// =============================================================================
// PRESENTATION
// =============================================================================

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Human-relative age of a timestamp, bucketed.
#[must_use]
pub fn relative_age(created_at: OffsetDateTime, now: OffsetDateTime) -> String {
    let delta = (now - created_at).whole_seconds().max(0);

    if delta < 30 {
        "just now".to_owned()
    } else if delta < MINUTE {
        format!("{delta} seconds ago")
    } else if delta < 2 * MINUTE {
        "a minute ago".to_owned()
    } else if delta < HOUR {
        format!("{} minutes ago", delta / MINUTE)
    } else if delta / HOUR == 1 {
        "1 hour ago".to_owned()
    } else if delta < DAY {
        format!("{} hours ago", delta / HOUR)
    } else if delta < 2 * DAY {
        "yesterday".to_owned()
    } else if delta < WEEK {
        format!("{} days ago", delta / DAY)
    } else {
        "a long time ago".to_owned()
    }
}

/// Location string: prefer `time_zone`, else `city/country_name` when both
/// are present and non-empty, else nothing.
#[must_use]
pub fn location(geo: Option<&GeoInfo>) -> Option<String> {
    let geo = geo?;
    if let Some(tz) = &geo.time_zone {
        if !tz.is_empty() {
            return Some(tz.clone());
        }
    }
    match (&geo.city, &geo.country_name) {
        (Some(city), Some(country)) if !city.is_empty() && !country.is_empty() => {
            Some(format!("{city}/{country}"))
        }
        _ => None,
    }
}

/// Footer: `"age, location"`, or just the age when no location is known.
#[must_use]
pub fn footer(message: &ChatMessage, now: OffsetDateTime) -> String {
    let age = relative_age(message.created_at, now);
    match location(message.geo.as_ref()) {
        Some(loc) => format!("{age}, {loc}"),
        None => age,
    }
}

/// Attach the rendered footer to a message.
#[must_use]
pub fn render(message: &ChatMessage, now: OffsetDateTime) -> ChatMessageView {
    ChatMessageView {
        id: message.id,
        creator: message.creator.clone(),
        text: message.text.clone(),
        geo: message.geo.clone(),
        created_at: message.created_at,
        footer: footer(message, now),
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
