//! Pixel grid — the canonical raster.
//!
//! DESIGN
//! ======
//! Fixed dimensions set at creation, never resized. Cells are addressed by a
//! row-major index: `index(x, y) = x + y * width`. The grid carries no
//! concurrency control of its own; the canvas service serializes access.

use serde::{Deserialize, Serialize};

/// One RGBA cell. All four channels are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// Default cell color at grid creation: opaque white.
    pub const WHITE: Pixel = Pixel { r: 255, g: 255, b: 255, a: 255 };

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("pixel index {index} out of range for grid with {len} cells")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("pixel buffer length {len} does not match {width}x{height}")]
    DimensionMismatch { width: u32, height: u32, len: usize },
}

/// Fixed-size 2D array of RGBA pixels stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl PixelGrid {
    /// Create a grid filled with opaque white.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self { width, height, pixels: vec![Pixel::WHITE; len] }
    }

    /// Rebuild a grid from stored parts, enforcing `len == width * height`.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the pixel buffer does not cover the
    /// declared dimensions exactly.
    pub fn from_parts(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self, GridError> {
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(GridError::DimensionMismatch { width, height, len: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total cell count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Row-major index for a cell coordinate.
    #[must_use]
    pub fn index(&self, x: u32, y: u32) -> usize {
        (x as usize) + (y as usize) * (self.width as usize)
    }

    /// Read the cell at `index`.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` for an index past the last cell.
    pub fn get(&self, index: usize) -> Result<Pixel, GridError> {
        self.pixels
            .get(index)
            .copied()
            .ok_or(GridError::IndexOutOfRange { index, len: self.pixels.len() })
    }

    /// Overwrite the cell at `index`.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` for an index past the last cell.
    pub fn set(&mut self, index: usize, pixel: Pixel) -> Result<(), GridError> {
        let len = self.pixels.len();
        let cell = self
            .pixels
            .get_mut(index)
            .ok_or(GridError::IndexOutOfRange { index, len })?;
        *cell = pixel;
        Ok(())
    }

    #[must_use]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_opaque_white() {
        let grid = PixelGrid::new(4, 3);
        assert_eq!(grid.len(), 12);
        assert!(grid.pixels().iter().all(|p| *p == Pixel::WHITE));
    }

    #[test]
    fn index_is_row_major() {
        let grid = PixelGrid::new(5, 4);
        assert_eq!(grid.index(0, 0), 0);
        assert_eq!(grid.index(4, 0), 4);
        assert_eq!(grid.index(0, 1), 5);
        assert_eq!(grid.index(2, 3), 17);
    }

    #[test]
    fn get_set_round_trip() {
        let mut grid = PixelGrid::new(2, 2);
        let red = Pixel::rgba(255, 0, 0, 255);
        grid.set(3, red).unwrap();
        assert_eq!(grid.get(3).unwrap(), red);
        assert_eq!(grid.get(0).unwrap(), Pixel::WHITE);
    }

    #[test]
    fn out_of_range_access_fails() {
        let mut grid = PixelGrid::new(2, 2);
        assert!(matches!(grid.get(4), Err(GridError::IndexOutOfRange { index: 4, len: 4 })));
        assert!(grid.set(100, Pixel::WHITE).is_err());
    }

    #[test]
    fn from_parts_enforces_dimensions() {
        let ok = PixelGrid::from_parts(2, 2, vec![Pixel::WHITE; 4]);
        assert!(ok.is_ok());

        let bad = PixelGrid::from_parts(2, 2, vec![Pixel::WHITE; 3]);
        assert!(matches!(bad, Err(GridError::DimensionMismatch { len: 3, .. })));
    }

    #[test]
    fn grid_serde_round_trip() {
        let mut grid = PixelGrid::new(2, 2);
        grid.set(1, Pixel::rgba(1, 2, 3, 4)).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let restored: PixelGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, grid);
    }
}
