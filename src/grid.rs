//! Grid storage, coordinate mapping and cell access.
//!
//! The grid is a row-major `cols * rows` buffer of `0`/`1` cells plus a
//! scratch buffer of the same shape that the simulation writes the next
//! generation into before the two are swapped.

use rand::Rng;

use crate::config::validate_density;
use crate::error::{LifeError, Result};

/// Two equally sized cell buffers and their dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<u8>, // 0 = dead, 1 = alive
    scratch: Vec<u8>,
}

impl Grid {
    /// Allocates an all-dead grid.
    ///
    /// # Arguments
    ///
    /// * `cols` - Number of columns, must be positive
    /// * `rows` - Number of rows, must be positive
    ///
    /// # Returns
    ///
    /// A grid whose current and scratch buffers both hold `cols * rows` dead cells.
    ///
    /// # Errors
    ///
    /// [`LifeError::InvalidDimensions`] if either dimension is not positive.
    pub fn new(cols: i32, rows: i32) -> Result<Grid> {
        if cols <= 0 || rows <= 0 {
            return Err(LifeError::InvalidDimensions { cols, rows });
        }
        let (cols, rows) = (cols as usize, rows as usize);
        let size = cols * rows;
        Ok(Grid {
            cols,
            rows,
            cells: vec![0; size],
            scratch: vec![0; size],
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Linear index of an in-range coordinate.
    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        y * self.cols + x
    }

    /// Whether `(x, y)` lies inside `[0, cols) x [0, rows)`.
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.cols && (y as usize) < self.rows
    }

    /// Reads a cell without wrapping.
    ///
    /// # Arguments
    ///
    /// * `x` - Column, in `0..cols`
    /// * `y` - Row, in `0..rows`
    ///
    /// # Returns
    ///
    /// `1` for a live cell, `0` for a dead one.
    ///
    /// # Errors
    ///
    /// [`LifeError::OutOfBounds`] when the coordinate is outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Result<u8> {
        if !self.in_bounds(x, y) {
            return Err(LifeError::OutOfBounds { x, y });
        }
        Ok(self.cells[self.index_of(x as usize, y as usize)])
    }

    /// Lenient read for renderers: anything outside the grid is dead.
    pub fn cell_at(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map(|c| c == 1).unwrap_or(false)
    }

    /// Reads a cell on the torus; any coordinate maps back into range.
    ///
    /// # Arguments
    ///
    /// * `x` - Column, may be negative or past the right edge
    /// * `y` - Row, may be negative or past the bottom edge
    ///
    /// # Returns
    ///
    /// The state (`0` or `1`) of the cell at `(x mod cols, y mod rows)`.
    #[inline]
    pub fn get_wrapped(&self, x: i32, y: i32) -> u8 {
        self.cells[wrapped_index(self.cols, self.rows, x, y)]
    }

    /// Writes a cell. Out-of-range coordinates are ignored.
    ///
    /// # Arguments
    ///
    /// * `x` - Column of the cell
    /// * `y` - Row of the cell
    /// * `alive` - Any non-zero value makes the cell alive
    pub fn set(&mut self, x: i32, y: i32, alive: u8) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = self.index_of(x as usize, y as usize);
        self.cells[idx] = if alive != 0 { 1 } else { 0 };
    }

    pub fn clear(&mut self) {
        self.cells.fill(0);
    }

    /// Sets each cell alive independently with probability `density`.
    ///
    /// # Arguments
    ///
    /// * `density` - Probability of each cell being alive
    /// * `rng` - Random source; a seeded one gives a reproducible grid
    ///
    /// # Errors
    ///
    /// [`LifeError::InvalidDensity`] if `density` is not within `0..=1`.
    pub fn randomize<R: Rng + ?Sized>(&mut self, density: f64, rng: &mut R) -> Result<()> {
        validate_density(density)?;
        for cell in self.cells.iter_mut() {
            *cell = u8::from(rng.gen_bool(density));
        }
        Ok(())
    }

    /// Number of live cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }

    /// The settled generation, row-major.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// One row of the settled generation.
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Current generation (read-only) and scratch buffer (writable), borrowed together.
    pub(crate) fn split_buffers(&mut self) -> (&[u8], &mut [u8]) {
        (&self.cells, &mut self.scratch)
    }

    /// Publishes the scratch buffer as the current generation.
    pub(crate) fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.cells, &mut self.scratch);
    }
}

/// Maps a possibly out-of-range coordinate onto the torus and returns its index.
#[inline]
pub(crate) fn wrapped_index(cols: usize, rows: usize, x: i32, y: i32) -> usize {
    let wx = (x as i64).rem_euclid(cols as i64) as usize;
    let wy = (y as i64).rem_euclid(rows as i64) as usize;
    wy * cols + wx
}
