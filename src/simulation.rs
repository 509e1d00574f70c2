//! Generation stepping under Conway's rules on a torus.

use rayon::prelude::*;

use crate::grid::{wrapped_index, Grid};

/// Grids with at least this many cells compute rows in parallel.
const PARALLEL_CELL_THRESHOLD: usize = 128 * 128;

/// Running totals about the simulation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Current generation number
    pub generation: u64,
    /// Total number of cells born since the last reset
    pub cells_created: u64,
    /// Total number of cells that died since the last reset
    pub cells_destroyed: u64,
    /// Current number of living cells
    pub current_population: u64,
}

impl Stats {
    /// Zeroed counters for a grid holding `population` live cells.
    pub fn new(population: usize) -> Stats {
        Stats {
            current_population: population as u64,
            ..Stats::default()
        }
    }

    pub fn record(&mut self, outcome: StepOutcome) {
        self.generation += 1;
        self.cells_created += outcome.born;
        self.cells_destroyed += outcome.died;
        self.current_population = self.current_population + outcome.born - outcome.died;
    }

    pub fn birth_rate(&self) -> f64 {
        self.cells_created as f64 / self.generation.max(1) as f64
    }

    pub fn death_rate(&self) -> f64 {
        self.cells_destroyed as f64 / self.generation.max(1) as f64
    }
}

/// Births and deaths produced by one tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub born: u64,
    pub died: u64,
}

impl StepOutcome {
    fn merge(self, other: StepOutcome) -> StepOutcome {
        StepOutcome {
            born: self.born + other.born,
            died: self.died + other.died,
        }
    }
}

/// Next state of one cell:
///
/// * a live cell with two or three live neighbours survives
/// * a dead cell with exactly three live neighbours is born
/// * every other cell is dead in the next generation
#[inline]
pub fn next_state(alive: bool, live_neighbors: u8) -> bool {
    matches!((alive, live_neighbors), (true, 2) | (true, 3) | (false, 3))
}

/// Counts the live cells in the Moore neighbourhood of `(x, y)`, wrapping at the edges.
pub fn count_neighbors(grid: &Grid, x: i32, y: i32) -> u8 {
    neighbors_in(grid.cells(), grid.cols(), grid.rows(), x, y)
}

fn neighbors_in(cells: &[u8], cols: usize, rows: usize, x: i32, y: i32) -> u8 {
    let mut count = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            count += cells[wrapped_index(cols, rows, x + dx, y + dy)];
        }
    }
    count
}

/// Fills one row of the next generation from the current one.
fn compute_row(cells: &[u8], cols: usize, rows: usize, y: usize, out: &mut [u8]) -> StepOutcome {
    let mut outcome = StepOutcome::default();
    for (x, slot) in out.iter_mut().enumerate() {
        let alive = cells[y * cols + x] == 1;
        let n = neighbors_in(cells, cols, rows, x as i32, y as i32);
        let next = next_state(alive, n);
        match (alive, next) {
            (false, true) => outcome.born += 1,
            (true, false) => outcome.died += 1,
            _ => {}
        }
        *slot = u8::from(next);
    }
    outcome
}

/// Advances the grid by one generation.
///
/// The whole next generation is written into the scratch buffer from a single
/// snapshot of the current one, then the buffers are swapped.
pub fn step(grid: &mut Grid) -> StepOutcome {
    let (cols, rows) = (grid.cols(), grid.rows());
    let (cells, scratch) = grid.split_buffers();

    let outcome = if cells.len() >= PARALLEL_CELL_THRESHOLD {
        scratch
            .par_chunks_mut(cols)
            .enumerate()
            .map(|(y, out)| compute_row(cells, cols, rows, y, out))
            .reduce(StepOutcome::default, StepOutcome::merge)
    } else {
        scratch
            .chunks_mut(cols)
            .enumerate()
            .map(|(y, out)| compute_row(cells, cols, rows, y, out))
            .fold(StepOutcome::default(), StepOutcome::merge)
    };

    grid.swap_buffers();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_cells(grid: &Grid) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..grid.rows() {
            for x in 0..grid.cols() {
                if grid.cell_at(x as i32, y as i32) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_next_state_table() {
        for n in 0..=8u8 {
            assert_eq!(next_state(true, n), n == 2 || n == 3, "live with {n}");
            assert_eq!(next_state(false, n), n == 3, "dead with {n}");
        }
    }

    #[test]
    fn test_lonely_cell_dies() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.set(1, 1, 1);
        let outcome = step(&mut grid);
        assert_eq!(grid.population(), 0);
        assert_eq!(outcome, StepOutcome { born: 0, died: 1 });
    }

    #[test]
    fn test_block_is_still_life() {
        let mut grid = Grid::new(6, 6).unwrap();
        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
            grid.set(x, y, 1);
        }
        let before = live_cells(&grid);
        for _ in 0..10 {
            assert_eq!(step(&mut grid), StepOutcome::default());
        }
        assert_eq!(live_cells(&grid), before);
    }

    #[test]
    fn test_neighbors_wrap_across_edges() {
        let mut grid = Grid::new(5, 4).unwrap();
        grid.set(4, 0, 1);
        grid.set(0, 3, 1);
        grid.set(4, 3, 1);
        assert_eq!(count_neighbors(&grid, 0, 0), 3);
    }

    #[test]
    fn test_births_across_the_seam() {
        // A vertical blinker straddling the right edge turns horizontal around x = 0.
        let mut grid = Grid::new(8, 8).unwrap();
        for y in 3..=5 {
            grid.set(0, y, 1);
        }
        step(&mut grid);
        assert_eq!(live_cells(&grid), vec![(0, 4), (1, 4), (7, 4)]);
    }

    #[test]
    fn test_parallel_path_matches_rule() {
        let mut grid = Grid::new(160, 130).unwrap();
        for x in 99..=101 {
            grid.set(x, 64, 1);
        }
        step(&mut grid);
        assert_eq!(live_cells(&grid), vec![(100, 63), (100, 64), (100, 65)]);
        step(&mut grid);
        assert_eq!(live_cells(&grid), vec![(99, 64), (100, 64), (101, 64)]);
    }

    #[test]
    fn test_stats_record() {
        let mut stats = Stats::new(10);
        stats.record(StepOutcome { born: 3, died: 5 });
        stats.record(StepOutcome { born: 1, died: 0 });
        assert_eq!(stats.generation, 2);
        assert_eq!(stats.current_population, 9);
        assert_eq!(stats.cells_created, 4);
        assert_eq!(stats.cells_destroyed, 5);
        assert_eq!(stats.birth_rate(), 2.0);
        assert_eq!(stats.death_rate(), 2.5);
    }
}
