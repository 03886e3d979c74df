//! Domain services used by the HTTP routes and the websocket event stream.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers can stay focused on protocol translation and auth plumbing.

pub mod broadcast;
pub mod canvas;
pub mod chat;
pub mod geo;
pub mod image;
pub mod session;
pub mod user;

use serde::Serialize;

/// One field-level validation failure. Entities are checked by a typed
/// validation function before any mutation is attempted; all violations are
/// collected and returned together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}
