//! Client-side canvas mirror.
//!
//! DESIGN
//! ======
//! A mirror holds an independent copy of the canonical grid and reconciles
//! it against the server's event stream. Diffs are applied idempotently;
//! reverts are honored per index only while the painted color is still
//! present, so a revert can never undo a later paint that superseded it.
//!
//! Rendering is behind the [`CellPainter`] seam: the mirror computes the
//! on-screen rectangle for each logical cell from a fixed display scale and
//! hands the painter a 24-bit hex fill color (alpha is not used for fills).

use tracing::warn;

use crate::grid::{Pixel, PixelGrid};
use crate::paint::{Diff, PriorValues, Revert};

/// On-screen rectangle for one logical cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rendering seam. Implementors draw one filled cell rectangle.
pub trait CellPainter {
    fn paint_cell(&mut self, rect: CellRect, color: &str);
}

/// `#rrggbb` fill color from the RGB channels.
#[must_use]
pub fn rgb_hex(pixel: Pixel) -> String {
    format!("#{:02x}{:02x}{:02x}", pixel.r, pixel.g, pixel.b)
}

/// Local copy of the canonical grid plus the prior values needed to honor
/// reverts.
pub struct CanvasMirror<P> {
    grid: PixelGrid,
    prev: PriorValues,
    cell_width: f64,
    cell_height: f64,
    painter: P,
}

impl<P: CellPainter> CanvasMirror<P> {
    /// Initialize from a full snapshot and render every cell. Initial
    /// rendering records no prior values; there is nothing to revert to yet.
    pub fn new(grid: PixelGrid, display_width: f64, display_height: f64, painter: P) -> Self {
        let cell_width = display_width / f64::from(grid.width().max(1));
        let cell_height = display_height / f64::from(grid.height().max(1));
        let mut mirror = Self { grid, prev: PriorValues::new(), cell_width, cell_height, painter };
        for index in 0..mirror.grid.len() {
            mirror.render_cell(index);
        }
        mirror
    }

    /// Apply a diff: per index, record the current value, overwrite with the
    /// diff color, repaint. Applying the same diff twice is safe.
    pub fn apply_diff(&mut self, diff: &Diff) {
        for &index in &diff.indices {
            let Ok(current) = self.grid.get(index) else {
                warn!(index, "mirror: diff index out of range, skipping");
                continue;
            };
            self.prev.insert(index, current);
            // Bounds already checked by the `get` above.
            let _ = self.grid.set(index, diff.pixel);
            self.render_cell(index);
        }
    }

    /// Apply a revert: per index, restore the recorded prior value only if
    /// the cell still holds the reverted color. Cells overwritten by a later
    /// paint, and cells with no recorded prior, are skipped.
    pub fn apply_revert(&mut self, revert: &Revert) {
        for &index in &revert.indices {
            let Ok(current) = self.grid.get(index) else {
                warn!(index, "mirror: revert index out of range, skipping");
                continue;
            };
            if current != revert.pixel {
                continue;
            }
            let Some(&prior) = self.prev.get(&index) else {
                continue;
            };
            let _ = self.grid.set(index, prior);
            self.render_cell(index);
        }
    }

    /// The mirror's current view of the grid.
    #[must_use]
    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    #[must_use]
    pub fn painter(&self) -> &P {
        &self.painter
    }

    fn render_cell(&mut self, index: usize) {
        let Ok(pixel) = self.grid.get(index) else {
            return;
        };
        let x = index % (self.grid.width() as usize);
        let y = index / (self.grid.width() as usize);
        #[allow(clippy::cast_precision_loss)]
        let rect = CellRect {
            x: x as f64 * self.cell_width,
            y: y as f64 * self.cell_height,
            width: self.cell_width,
            height: self.cell_height,
        };
        self.painter.paint_cell(rect, &rgb_hex(pixel));
    }
}

#[cfg(test)]
#[path = "mirror_test.rs"]
mod tests;
