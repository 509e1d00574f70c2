//! # Torus Life
//!
//! A terminal front-end for the `torus_life` engine using `ratatui` for
//! drawing and `crossterm` for terminal and mouse input.
//!
//! ## Controls
//!
//! * Space: Play/Pause the simulation
//! * Enter: Step forward one generation (when paused)
//! * r / c: Randomize / clear the grid
//! * + / -: Change speed
//! * 1-4: Spawn blinker, toad, beacon or glider
//! * p: Toggle between random spawning and click-to-place
//! * Esc: Cancel a pending placement
//! * Mouse drag: Paint cells (Shift forces alive)
//! * q: Quit

mod ui;

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Mutex,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use sysinfo::{System, SystemExt};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use torus_life::{
    config::{DEFAULT_RANDOM_DENSITY, DEFAULT_SPEED},
    Engine, SimConfig, PATTERNS,
};

use ui::Hud;

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const MEMORY_REFRESH: Duration = Duration::from_secs(1);
const MIN_SPEED: f64 = 1.0;
const MAX_SPEED: f64 = 60.0;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Generations per second.
    #[arg(long, default_value_t = DEFAULT_SPEED)]
    speed: f64,
    /// Seed for every random choice, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
    /// Live-cell probability used by the `r` key.
    #[arg(long, default_value_t = DEFAULT_RANDOM_DENSITY)]
    density: f64,
    /// Fixed grid size instead of following the terminal, e.g. 80x40.
    #[arg(long, value_name = "COLSxROWS")]
    size: Option<GridSize>,
    /// Write logs to this file (the terminal is owned by the UI).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Grid dimensions parsed from a COLSxROWS argument.
#[derive(Debug, Clone, Copy)]
struct GridSize {
    cols: i32,
    rows: i32,
}

impl FromStr for GridSize {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (cols, rows) = value
            .split_once(['x', 'X'])
            .ok_or_else(|| "expected format COLSxROWS".to_string())?;
        let parse = |s: &str| match s.trim().parse::<i32>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(format!("`{s}` is not a positive integer")),
        };
        Ok(GridSize {
            cols: parse(cols)?,
            rows: parse(rows)?,
        })
    }
}

impl Cli {
    fn sim_config(&self) -> SimConfig {
        SimConfig {
            speed: self.speed,
            random_density: self.density,
            seed: self.seed,
            ..SimConfig::default()
        }
    }
}

/// Front-end state around the engine.
struct App {
    engine: Engine,
    sys: System,
    hud: Hud,
    /// Whether `--size` pinned the grid dimensions.
    pinned: bool,
    /// Where grid cells were last drawn, for mapping mouse positions.
    grid_area: Rect,
}

impl App {
    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.kind != KeyEventKind::Press {
            return Ok(true);
        }
        match key.code {
            KeyCode::Char('q') => return Ok(false),
            KeyCode::Char(' ') => self.engine.toggle_running(),
            KeyCode::Enter => {
                if !self.engine.is_running() {
                    self.engine.step_once();
                }
            }
            KeyCode::Char('r') => self.engine.randomize()?,
            KeyCode::Char('c') => self.engine.clear(),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let speed = (self.engine.speed() + 1.0).min(MAX_SPEED);
                self.engine.set_speed(speed)?;
            }
            KeyCode::Char('-') => {
                let speed = (self.engine.speed() - 1.0).max(MIN_SPEED);
                self.engine.set_speed(speed)?;
            }
            KeyCode::Char('p') => self.hud.place_on_click = !self.hud.place_on_click,
            KeyCode::Char(c @ '1'..='4') => {
                let pattern = &PATTERNS[c as usize - '1' as usize];
                self.engine
                    .begin_placing(pattern.name, self.hud.place_on_click)?;
            }
            KeyCode::Esc => self.engine.cancel_placing(),
            _ => {}
        }
        Ok(true)
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let area = self.grid_area;
        let x = mouse.column as i32 - area.x as i32;
        let y = mouse.row as i32 - area.y as i32;
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let inside = mouse.column >= area.x
                    && mouse.column < area.x + area.width
                    && mouse.row >= area.y
                    && mouse.row < area.y + area.height;
                if inside {
                    let force_alive = mouse.modifiers.contains(KeyModifiers::SHIFT);
                    self.engine.handle_pointer_down(x, y, force_alive);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => self.engine.handle_pointer_move(x, y),
            MouseEventKind::Up(MouseButton::Left) => self.engine.handle_pointer_up(),
            _ => {}
        }
    }

    fn handle_resize(&mut self, width: u16, height: u16) {
        self.engine.handle_pointer_cancel();
        if self.pinned {
            return;
        }
        let area = ui::grid_area(Rect::new(0, 0, width, height));
        if let Err(e) = self.engine.on_resize(area.width as i32, area.height as i32) {
            warn!("ignoring resize to {width}x{height}: {e}");
        }
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("torus_life=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Main entry point.
///
/// Sets up the terminal, builds the engine sized to the terminal (or `--size`)
/// and runs the event loop until `q` is pressed. The terminal is restored even
/// when the loop fails.
fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }
    let config = cli.sim_config();
    config.validate()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &cli, config);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cli: &Cli,
    config: SimConfig,
) -> Result<()> {
    let screen = terminal.size()?;
    let grid_area = ui::grid_area(screen);
    let (cols, rows) = match cli.size {
        Some(size) => (size.cols, size.rows),
        None => (grid_area.width.max(1) as i32, grid_area.height.max(1) as i32),
    };

    let mut engine = Engine::new(cols, rows, config)?;
    // Initial seeding goes through the resize path, same as any later resize.
    engine.on_resize(cols, rows)?;
    info!(cols, rows, "starting");

    let mut app = App {
        engine,
        sys: System::new_all(),
        hud: Hud {
            place_on_click: false,
        },
        pinned: cli.size.is_some(),
        grid_area,
    };

    let mut last_frame = Instant::now();
    let mut last_memory_refresh = Instant::now();

    loop {
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;

        if last_memory_refresh.elapsed() >= MEMORY_REFRESH {
            app.sys.refresh_memory();
            last_memory_refresh = Instant::now();
        }

        let App {
            engine,
            sys,
            hud,
            grid_area,
            ..
        } = &mut app;
        engine.frame(dt, |engine| {
            terminal
                .draw(|f| *grid_area = ui::draw(f, engine, sys, *hud))
                .map(|_| ())
        })?;

        let timeout = FRAME_INTERVAL
            .checked_sub(last_frame.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if !app.handle_key(key)? {
                        break;
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(width, height) => app.handle_resize(width, height),
                Event::FocusLost => app.engine.handle_pointer_cancel(),
                _ => {}
            }
        }
    }

    Ok(())
}
