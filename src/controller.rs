//! The engine object: grid, run state, placement mode, paint gestures and the
//! fixed-timestep loop that turns frame time into simulation ticks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace};

use crate::config::{validate_speed, SimConfig};
use crate::error::Result;
use crate::grid::Grid;
use crate::patterns::{self, Pattern};
use crate::placement;
use crate::simulation::{self, Stats, StepOutcome};

/// Slack, as a fraction of one tick, allowed when converting accumulated time
/// into ticks so that float rounding in the frame deltas never loses a tick.
const TICK_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Paused,
    Running,
}

/// Whether the next pointer-down paints or drops a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementMode {
    Idle,
    AwaitingClickFor(&'static Pattern),
}

/// One pointer-down-to-up gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PaintState {
    active: bool,
    value: u8,
    last: Option<(i32, i32)>,
}

/// Owns the grid and every piece of interactive state around it.
///
/// All methods are synchronous and meant to be called from whatever drives
/// input events and frame callbacks.
#[derive(Debug)]
pub struct Engine<R = StdRng> {
    grid: Grid,
    run_state: RunState,
    placement: PlacementMode,
    paint: PaintState,
    speed: f64,
    accumulator: f64,
    config: SimConfig,
    stats: Stats,
    rng: R,
}

impl Engine<StdRng> {
    /// Creates a paused engine with an empty grid, seeding the random source
    /// from `config.seed` or OS entropy.
    ///
    /// # Arguments
    ///
    /// * `cols` - Width of the grid in cells
    /// * `rows` - Height of the grid in cells
    /// * `config` - Speed, densities, frame cap and seed
    ///
    /// # Errors
    ///
    /// Invalid dimensions or an invalid `config`.
    pub fn new(cols: i32, rows: i32, config: SimConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Engine::with_rng(cols, rows, config, rng)
    }
}

impl<R: Rng> Engine<R> {
    /// Creates a paused engine with an empty grid and the given random source.
    ///
    /// # Arguments
    ///
    /// * `rng` - Source for reseeding and random spawns
    pub fn with_rng(cols: i32, rows: i32, config: SimConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(cols, rows)?;
        info!(cols, rows, speed = config.speed, "engine created");
        Ok(Engine {
            grid,
            run_state: RunState::Paused,
            placement: PlacementMode::Idle,
            paint: PaintState::default(),
            speed: config.speed,
            accumulator: 0.0,
            config,
            stats: Stats::default(),
            rng,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cell_at(&self, x: i32, y: i32) -> bool {
        self.grid.cell_at(x, y)
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn placement_mode(&self) -> PlacementMode {
        self.placement
    }

    pub fn is_painting(&self) -> bool {
        self.paint.active
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Elapsed time not yet converted into ticks.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Settings the engine was built with; speed changes are tracked by
    /// [`Engine::speed`].
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn set_running(&mut self, running: bool) {
        self.run_state = if running {
            RunState::Running
        } else {
            RunState::Paused
        };
        debug!(state = ?self.run_state, "run state changed");
    }

    pub fn toggle_running(&mut self) {
        self.set_running(!self.is_running());
    }

    /// Changes the simulation rate in ticks per second.
    ///
    /// # Arguments
    ///
    /// * `speed` - New rate; takes effect on the next `advance`
    ///
    /// # Errors
    ///
    /// [`LifeError::InvalidSpeed`](crate::LifeError::InvalidSpeed) for zero,
    /// negative or non-finite values; the old speed is kept.
    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        validate_speed(speed)?;
        self.speed = speed;
        debug!(speed, "speed changed");
        Ok(())
    }

    /// Starts placing the named pattern.
    ///
    /// With `place_on_click` the engine waits for the next pointer-down and
    /// returns `None`. Otherwise the pattern is stamped right away at a random
    /// anchor that keeps it inside the grid, and that anchor is returned.
    ///
    /// # Arguments
    ///
    /// * `name` - Catalog name, matched case-insensitively
    /// * `place_on_click` - Wait for a pointer-down instead of spawning now
    ///
    /// # Returns
    ///
    /// The anchor used for an immediate spawn, or `None` while awaiting a click.
    pub fn begin_placing(
        &mut self,
        name: &str,
        place_on_click: bool,
    ) -> Result<Option<(i32, i32)>> {
        let pattern = patterns::find(name)?;
        if place_on_click {
            self.placement = PlacementMode::AwaitingClickFor(pattern);
            debug!(pattern = pattern.name, "awaiting click for pattern");
            return Ok(None);
        }
        let (x, y) =
            placement::random_spawn_anchor(pattern, self.cols(), self.rows(), &mut self.rng);
        self.stamp(pattern, x, y);
        Ok(Some((x, y)))
    }

    pub fn cancel_placing(&mut self) {
        if self.placement != PlacementMode::Idle {
            debug!("placement cancelled");
        }
        self.placement = PlacementMode::Idle;
    }

    /// Stamps the named pattern with its anchor at `(x, y)`.
    ///
    /// # Arguments
    ///
    /// * `name` - Catalog name, matched case-insensitively
    /// * `x` - Anchor column
    /// * `y` - Anchor row
    ///
    /// # Returns
    ///
    /// How many of the pattern's cells landed inside the grid.
    ///
    /// # Errors
    ///
    /// [`LifeError::UnknownPattern`](crate::LifeError::UnknownPattern) if `name` is not in the catalog.
    pub fn stamp_pattern(&mut self, name: &str, x: i32, y: i32) -> Result<usize> {
        let pattern = patterns::find(name)?;
        Ok(self.stamp(pattern, x, y))
    }

    /// A random anchor for the named pattern on the current grid.
    pub fn random_spawn_anchor(&mut self, name: &str) -> Result<(i32, i32)> {
        let pattern = patterns::find(name)?;
        Ok(placement::random_spawn_anchor(
            pattern,
            self.cols(),
            self.rows(),
            &mut self.rng,
        ))
    }

    fn stamp(&mut self, pattern: &Pattern, x: i32, y: i32) -> usize {
        let landed = placement::stamp(&mut self.grid, pattern, x, y);
        self.refresh_population();
        debug!(pattern = pattern.name, x, y, landed, "pattern stamped");
        landed
    }

    /// Sets a single cell; out-of-range coordinates are ignored.
    pub fn paint_cell(&mut self, x: i32, y: i32, alive: bool) {
        self.grid.set(x, y, u8::from(alive));
        self.refresh_population();
    }

    /// Pointer pressed on grid cell `(x, y)`.
    ///
    /// While a pattern is armed this drops it at `(x, y)` and returns to idle.
    /// Otherwise it opens a paint gesture: the pressed cell is toggled, or set
    /// alive when `force_alive` is held, and that value is used for the rest of
    /// the gesture. A gesture left open by a missed pointer-up is closed first.
    ///
    /// # Arguments
    ///
    /// * `x` - Grid column under the pointer, may lie outside the grid
    /// * `y` - Grid row under the pointer, may lie outside the grid
    /// * `force_alive` - Paint alive instead of toggling the pressed cell
    pub fn handle_pointer_down(&mut self, x: i32, y: i32, force_alive: bool) {
        if self.paint.active {
            debug!("closing stale paint gesture");
            self.paint = PaintState::default();
        }

        if let PlacementMode::AwaitingClickFor(pattern) = self.placement {
            self.stamp(pattern, x, y);
            self.placement = PlacementMode::Idle;
            return;
        }

        let value = match self.grid.get(x, y) {
            _ if force_alive => 1,
            Ok(current) => 1 - current,
            Err(_) => 1,
        };
        self.paint = PaintState {
            active: true,
            value,
            last: Some((x, y)),
        };
        self.grid.set(x, y, value);
        self.refresh_population();
    }

    /// Pointer moved to `(x, y)`; paints every cell crossed since the last position.
    pub fn handle_pointer_move(&mut self, x: i32, y: i32) {
        if !self.paint.active {
            return;
        }
        let from = self.paint.last.unwrap_or((x, y));
        if let Some((start, end)) = clip_to_grid(from, (x, y), self.cols(), self.rows()) {
            for (cx, cy) in line_cells(start, end) {
                self.grid.set(cx as i32, cy as i32, self.paint.value);
            }
        }
        self.paint.last = Some((x, y));
        self.refresh_population();
    }

    pub fn handle_pointer_up(&mut self) {
        self.paint = PaintState::default();
    }

    pub fn handle_pointer_cancel(&mut self) {
        self.handle_pointer_up();
    }

    /// Feeds one frame's elapsed time into the fixed-timestep loop.
    ///
    /// Nothing happens while paused. The frame time is capped by
    /// `max_frame_seconds` so a stalled caller does not trigger a long burst of
    /// catch-up ticks.
    ///
    /// # Arguments
    ///
    /// * `frame_seconds` - Time since the previous frame; negative or non-finite
    ///   values count as zero
    ///
    /// # Returns
    ///
    /// The number of ticks that ran, `floor(accumulated / tick)`.
    pub fn advance(&mut self, frame_seconds: f64) -> usize {
        if self.run_state == RunState::Paused {
            return 0;
        }
        let mut dt = if frame_seconds.is_finite() {
            frame_seconds.max(0.0)
        } else {
            0.0
        };
        if let Some(cap) = self.config.max_frame_seconds {
            dt = dt.min(cap);
        }
        self.accumulator += dt;

        let tick = 1.0 / self.speed;
        let due = ((self.accumulator + tick * TICK_TOLERANCE) / tick).floor();
        let ticks = due as usize;
        for _ in 0..ticks {
            self.tick();
        }
        self.accumulator = (self.accumulator - due * tick).max(0.0);
        ticks
    }

    /// Advances by `frame_seconds`, then hands the settled engine to `render`.
    pub fn frame<T>(&mut self, frame_seconds: f64, render: impl FnOnce(&Self) -> T) -> T {
        let ticks = self.advance(frame_seconds);
        trace!(ticks, generation = self.stats.generation, "frame settled");
        render(self)
    }

    /// Runs exactly one tick regardless of run state.
    pub fn step_once(&mut self) -> StepOutcome {
        self.tick()
    }

    fn tick(&mut self) -> StepOutcome {
        let outcome = simulation::step(&mut self.grid);
        self.stats.record(outcome);
        outcome
    }

    /// Reallocates the grid at the new size and reseeds it.
    ///
    /// Run state, speed and placement mode carry over; an open paint gesture is
    /// dropped since its coordinates no longer mean anything.
    ///
    /// # Arguments
    ///
    /// * `cols` - New width in cells
    /// * `rows` - New height in cells
    ///
    /// # Errors
    ///
    /// [`LifeError::InvalidDimensions`](crate::LifeError::InvalidDimensions);
    /// the previous grid is kept.
    pub fn on_resize(&mut self, cols: i32, rows: i32) -> Result<()> {
        let mut grid = Grid::new(cols, rows)?;
        grid.randomize(self.config.reseed_density, &mut self.rng)?;
        self.grid = grid;
        self.paint = PaintState::default();
        self.stats = Stats::new(self.grid.population());
        info!(cols, rows, population = self.stats.current_population, "grid resized");
        Ok(())
    }

    pub fn clear(&mut self) {
        self.grid.clear();
        self.stats = Stats::default();
    }

    /// Reseeds the grid with the configured random density.
    pub fn randomize(&mut self) -> Result<()> {
        self.grid.randomize(self.config.random_density, &mut self.rng)?;
        self.stats = Stats::new(self.grid.population());
        Ok(())
    }

    fn refresh_population(&mut self) {
        self.stats.current_population = self.grid.population() as u64;
    }
}

/// Clips the segment `from -> to` to the cell rectangle of a `cols x rows` grid
/// (Liang-Barsky). Returns `None` when the segment misses the grid entirely.
fn clip_to_grid(
    from: (i32, i32),
    to: (i32, i32),
    cols: usize,
    rows: usize,
) -> Option<((i64, i64), (i64, i64))> {
    let (x0, y0) = (f64::from(from.0), f64::from(from.1));
    let (dx, dy) = (f64::from(to.0) - x0, f64::from(to.1) - y0);
    let (x_max, y_max) = ((cols - 1) as f64, (rows - 1) as f64);

    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [(-dx, x0), (dx, x_max - x0), (-dy, y0), (dy, y_max - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| {
        let x = (x0 + t * dx).round().clamp(0.0, x_max) as i64;
        let y = (y0 + t * dy).round().clamp(0.0, y_max) as i64;
        (x, y)
    };
    Some((at(t0), at(t1)))
}

/// Cells on the Bresenham line from `from` to `to`, both ends included.
fn line_cells(from: (i64, i64), to: (i64, i64)) -> Vec<(i64, i64)> {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut cells = Vec::with_capacity((dx - dy) as usize + 1);
    loop {
        cells.push((x, y));
        if (x, y) == to {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    cells
}
