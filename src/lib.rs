//! Pixelboard — a shared collaborative pixel canvas with a chat feed.
//!
//! ARCHITECTURE
//! ============
//! The server owns one canonical `PixelGrid` ("GlobalCanvas"). Clients mutate
//! it through HTTP paint requests and observe it through a per-connection
//! WebSocket event stream. Every committed paint fans out as a `canvas.diff`
//! event; a paint whose persistence fails fans out as a `canvas.revert` so
//! every mirror rolls back to the durably stored state. Chat messages follow
//! the same fan-out path without a revert (append-only).
//!
//! The client-side half of the reconciliation protocol lives in [`mirror`]:
//! mirrors apply diffs idempotently and honor reverts only for cells whose
//! value has not been superseded by a later paint.

pub mod db;
pub mod event;
pub mod grid;
pub mod mirror;
pub mod paint;
pub mod routes;
pub mod services;
pub mod state;
