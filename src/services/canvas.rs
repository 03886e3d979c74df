//! Canvas session — server-side paint orchestration.
//!
//! DESIGN
//! ======
//! Per paint request: validate and apply the fill under the grid mutex,
//! persist the new snapshot, then broadcast. The mutex is held across the
//! persistence call, so two overlapping paints can never interleave and
//! broadcasts go out in the order mutations were committed.
//!
//! ERROR HANDLING
//! ==============
//! An invalid region fails before any mutation, with no broadcast. A failed
//! or timed-out persistence rolls the in-memory grid back from the captured
//! prior values and broadcasts a revert; the requester gets the error,
//! everyone else gets the compensating event.

use tracing::{error, info, warn};

use crate::event::Event;
use crate::grid::{Pixel, PixelGrid};
use crate::paint::{self, Diff, FillOutcome, PaintError, Region};
use crate::services::{broadcast, image};
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error(transparent)]
    Paint(#[from] PaintError),
    #[error("canvas persistence failed: {0}")]
    Persistence(String),
}

/// Apply a paint request against the canonical grid.
///
/// On success the diff has already been broadcast to every connected client,
/// the requester included (mirrors apply diffs idempotently, so a client
/// that rendered optimistically converges on the same state).
///
/// # Errors
///
/// Returns `Paint` for an invalid region (nothing mutated, nothing sent) and
/// `Persistence` when the store rejected the write or timed out (grid rolled
/// back, revert broadcast).
pub async fn paint(state: &AppState, pixel: Pixel, region: Region) -> Result<Diff, CanvasError> {
    let mut grid = state.canvas.lock().await;

    let FillOutcome { diff, prior } = paint::apply_fill(&mut grid, pixel, region)?;

    let save = tokio::time::timeout(state.persist_timeout, image::save_global_canvas(&state.pool, &grid)).await;
    let failure = match save {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e.to_string()),
        Err(_) => Some(format!("timed out after {:?}", state.persist_timeout)),
    };

    match failure {
        None => {
            broadcast::broadcast(state, &Event::CanvasDiff(diff.clone()), None).await;
            info!(cells = diff.indices.len(), "canvas paint committed");
            Ok(diff)
        }
        Some(reason) => {
            // Roll the canonical grid back so future reads stay consistent
            // with what was durably stored.
            if let Err(e) = paint::restore(&mut grid, &prior) {
                error!(error = %e, "canvas rollback failed");
            }
            broadcast::broadcast(state, &Event::CanvasRevert(diff.to_revert()), None).await;
            warn!(cells = diff.indices.len(), reason, "canvas paint reverted");
            Err(CanvasError::Persistence(reason))
        }
    }
}

/// Full copy of the canonical grid, used to bootstrap new mirrors.
pub async fn snapshot(state: &AppState) -> PixelGrid {
    state.canvas.lock().await.clone()
}

#[cfg(test)]
#[path = "canvas_test.rs"]
mod tests;
