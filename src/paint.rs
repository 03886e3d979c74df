//! Paint engine — rectangular fills against the canonical grid.
//!
//! DESIGN
//! ======
//! `apply_fill` validates the region against the grid bounds before touching
//! any cell, so a failed call leaves the grid untouched and the caller never
//! observes a partial rectangle. A successful call returns the [`Diff`] to
//! broadcast plus the [`PriorValues`] needed to roll the fill back if
//! persistence fails.
//!
//! Out-of-bounds regions are rejected, never clamped.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::grid::{GridError, Pixel, PixelGrid};

// =============================================================================
// TYPES
// =============================================================================

/// Half-open paint rectangle: covers `start_x..end_x` by `start_y..end_y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub start_x: u32,
    pub start_y: u32,
    pub end_x: u32,
    pub end_y: u32,
}

impl Region {
    /// Number of cells covered. Zero for degenerate rectangles.
    #[must_use]
    pub fn area(&self) -> usize {
        let w = self.end_x.saturating_sub(self.start_x) as usize;
        let h = self.end_y.saturating_sub(self.start_y) as usize;
        w * h
    }
}

/// "These cells were set to this single color."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    pub pixel: Pixel,
    pub indices: Vec<usize>,
}

/// Compensating event undoing a [`Diff`]. `pixel` is the color that must
/// still be present at an index for the rollback to apply there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revert {
    pub pixel: Pixel,
    pub indices: Vec<usize>,
}

impl Diff {
    /// Build the revert for this diff. Mirrors restore their own recorded
    /// prior values; the guard color is the color this diff painted.
    #[must_use]
    pub fn to_revert(&self) -> Revert {
        Revert { pixel: self.pixel, indices: self.indices.clone() }
    }
}

/// Per-index snapshot of a cell's value immediately before its last paint.
pub type PriorValues = HashMap<usize, Pixel>;

#[derive(Debug, thiserror::Error)]
pub enum PaintError {
    #[error(
        "invalid paint region ({start_x},{start_y})-({end_x},{end_y}) for {width}x{height} grid"
    )]
    InvalidRegion { start_x: u32, start_y: u32, end_x: u32, end_y: u32, width: u32, height: u32 },
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Result of a successful fill: the diff to broadcast and the prior values
/// needed to build its revert.
#[derive(Debug)]
pub struct FillOutcome {
    pub diff: Diff,
    pub prior: PriorValues,
}

// =============================================================================
// FILL
// =============================================================================

/// Apply a uniform rectangular fill.
///
/// Cells are visited in row-major order; each cell's current value is
/// captured into the prior map before it is overwritten (first capture wins
/// within one call).
///
/// # Errors
///
/// Returns `InvalidRegion` if the rectangle is empty, inverted, or extends
/// past the grid bounds. No cell is mutated on error.
pub fn apply_fill(grid: &mut PixelGrid, pixel: Pixel, region: Region) -> Result<FillOutcome, PaintError> {
    if region.start_x >= region.end_x
        || region.start_y >= region.end_y
        || region.end_x > grid.width()
        || region.end_y > grid.height()
    {
        return Err(PaintError::InvalidRegion {
            start_x: region.start_x,
            start_y: region.start_y,
            end_x: region.end_x,
            end_y: region.end_y,
            width: grid.width(),
            height: grid.height(),
        });
    }

    let mut indices = Vec::with_capacity(region.area());
    let mut prior = PriorValues::with_capacity(region.area());

    for y in region.start_y..region.end_y {
        for x in region.start_x..region.end_x {
            let index = grid.index(x, y);
            prior.entry(index).or_insert(grid.get(index)?);
            grid.set(index, pixel)?;
            indices.push(index);
        }
    }

    Ok(FillOutcome { diff: Diff { pixel, indices }, prior })
}

/// Write prior values back into the grid (revert path).
///
/// # Errors
///
/// Returns `IndexOutOfRange` if a prior entry does not fit the grid; cannot
/// happen for priors captured from the same grid.
pub fn restore(grid: &mut PixelGrid, prior: &PriorValues) -> Result<(), GridError> {
    for (&index, &pixel) in prior {
        grid.set(index, pixel)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "paint_test.rs"]
mod tests;
