//! Image store — durable home of the canonical canvas.
//!
//! The pixel buffer is stored as a JSONB column keyed by the canvas name;
//! saves rewrite the whole buffer. At 32x32 RGBA this is a few kilobytes,
//! so a full-snapshot write per committed paint keeps the durable copy
//! trivially consistent with memory.

use sqlx::PgPool;
use tracing::info;

use crate::grid::{Pixel, PixelGrid};

/// Name of the one canonical canvas row.
pub const GLOBAL_CANVAS_NAME: &str = "GlobalCanvas";

#[derive(Debug, thiserror::Error)]
pub enum ImageStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored canvas is corrupt: {0}")]
    Corrupt(String),
}

/// Fetch the canonical canvas, if it has ever been created.
///
/// # Errors
///
/// Returns `Corrupt` if the stored row does not decode into a grid.
pub async fn get_global_canvas(pool: &PgPool) -> Result<Option<PixelGrid>, ImageStoreError> {
    let row = sqlx::query_as::<_, (i64, i64, serde_json::Value)>(
        "SELECT width, height, pixels FROM images WHERE name = $1",
    )
    .bind(GLOBAL_CANVAS_NAME)
    .fetch_optional(pool)
    .await?;

    let Some((width, height, pixels)) = row else {
        return Ok(None);
    };

    let width = u32::try_from(width).map_err(|_| ImageStoreError::Corrupt(format!("width {width}")))?;
    let height = u32::try_from(height).map_err(|_| ImageStoreError::Corrupt(format!("height {height}")))?;
    let pixels: Vec<Pixel> =
        serde_json::from_value(pixels).map_err(|e| ImageStoreError::Corrupt(e.to_string()))?;

    let grid = PixelGrid::from_parts(width, height, pixels).map_err(|e| ImageStoreError::Corrupt(e.to_string()))?;
    Ok(Some(grid))
}

/// Insert the canonical canvas row.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn create_global_canvas(pool: &PgPool, grid: &PixelGrid) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO images (name, width, height, pixels) VALUES ($1, $2, $3, $4)")
        .bind(GLOBAL_CANVAS_NAME)
        .bind(i64::from(grid.width()))
        .bind(i64::from(grid.height()))
        .bind(serde_json::to_value(grid.pixels()).unwrap_or_default())
        .execute(pool)
        .await?;
    Ok(())
}

/// Persist the current grid snapshot.
///
/// # Errors
///
/// Returns a database error if the write fails or touches no row.
pub async fn save_global_canvas(pool: &PgPool, grid: &PixelGrid) -> Result<(), sqlx::Error> {
    let result = sqlx::query("UPDATE images SET pixels = $1, updated_at = now() WHERE name = $2")
        .bind(serde_json::to_value(grid.pixels()).unwrap_or_default())
        .bind(GLOBAL_CANVAS_NAME)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(sqlx::Error::RowNotFound);
    }
    Ok(())
}

/// Load the canonical canvas, creating it white at the given dimensions if
/// absent. Called once at startup.
///
/// # Errors
///
/// Returns a database error if the lookup or the initial insert fails.
pub async fn ensure_global_canvas(pool: &PgPool, width: u32, height: u32) -> Result<PixelGrid, ImageStoreError> {
    if let Some(grid) = get_global_canvas(pool).await? {
        info!(width = grid.width(), height = grid.height(), "global canvas already exists");
        return Ok(grid);
    }

    let grid = PixelGrid::new(width, height);
    create_global_canvas(pool, &grid).await?;
    info!(width, height, "global canvas created");
    Ok(grid)
}
