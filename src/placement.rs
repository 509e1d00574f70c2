//! Choosing anchors for patterns and stamping them into a grid.

use rand::Rng;

use crate::grid::Grid;
use crate::patterns::Pattern;

/// Extent of a pattern's offsets as `(min_dx, min_dy, max_dx, max_dy)`.
pub fn compute_bounds(pattern: &Pattern) -> (i32, i32, i32, i32) {
    pattern.bounds()
}

/// Picks an anchor that keeps every cell of `pattern` inside a `cols x rows` grid.
///
/// When the grid is too small for the pattern the candidate range collapses to a
/// single anchor at its lower end, so a placement is still returned and stamping
/// simply drops whatever does not fit.
pub fn random_spawn_anchor<R: Rng + ?Sized>(
    pattern: &Pattern,
    cols: usize,
    rows: usize,
    rng: &mut R,
) -> (i32, i32) {
    let (min_dx, min_dy, max_dx, max_dy) = compute_bounds(pattern);
    let x = pick_in_range(-min_dx, cols as i32 - 1 - max_dx, rng);
    let y = pick_in_range(-min_dy, rows as i32 - 1 - max_dy, rng);
    (x, y)
}

fn pick_in_range<R: Rng + ?Sized>(lo: i32, hi: i32, rng: &mut R) -> i32 {
    let width = (hi - lo + 1).max(1);
    lo + rng.gen_range(0..width)
}

/// Writes every cell of `pattern` alive relative to the anchor.
///
/// Cells falling outside the grid are dropped; partial stamps near an edge are allowed.
/// Returns how many cells landed inside the grid.
pub fn stamp(grid: &mut Grid, pattern: &Pattern, anchor_x: i32, anchor_y: i32) -> usize {
    let mut landed = 0;
    for &(dx, dy) in pattern.cells {
        let (x, y) = (anchor_x + dx, anchor_y + dy);
        if grid.in_bounds(x, y) {
            landed += 1;
        }
        grid.set(x, y, 1);
    }
    landed
}
