//! Terminal drawing for the engine.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use sysinfo::{System, SystemExt};
use torus_life::{Engine, PlacementMode};

const LIVE: char = '█';
const DEAD: char = ' ';

/// Front-end state that is shown but not owned by the engine.
#[derive(Debug, Clone, Copy)]
pub struct Hud {
    pub place_on_click: bool,
}

fn split(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)].as_ref())
        .split(area);
    (chunks[0], chunks[1])
}

/// The terminal cells the grid is drawn into for a screen of `area`.
pub fn grid_area(area: Rect) -> Rect {
    let (left, _) = split(area);
    Block::default().borders(Borders::ALL).inner(left)
}

/// Draws the whole screen and returns where grid cells landed.
pub fn draw(f: &mut Frame, engine: &Engine, sys: &System, hud: Hud) -> Rect {
    let (left, right) = split(f.size());
    draw_grid(f, engine, left);
    draw_stats(f, engine, sys, hud, right);
    grid_area(f.size())
}

/// Draws the settled generation, one terminal cell per grid cell.
fn draw_grid(f: &mut Frame, engine: &Engine, area: Rect) {
    let title = match engine.placement_mode() {
        PlacementMode::AwaitingClickFor(pattern) => {
            format!("Game of Life [click to drop {} | Esc: cancel]", pattern.name)
        }
        PlacementMode::Idle => {
            "Game of Life [Space: Play/Pause | Enter: Step | q: Quit]".to_string()
        }
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let grid = engine.grid();
    let mut cells = String::with_capacity((grid.cols() + 1) * grid.rows());
    for y in 0..grid.rows() {
        for &cell in grid.row(y) {
            cells.push(if cell == 1 { LIVE } else { DEAD });
        }
        cells.push('\n');
    }

    let paragraph = Paragraph::new(cells)
        .style(Style::default().fg(Color::White))
        .block(block);

    f.render_widget(paragraph, area);
}

fn draw_stats(f: &mut Frame, engine: &Engine, sys: &System, hud: Hud, area: Rect) {
    let stats = engine.stats();
    let memory_used = sys.used_memory() / 1024;
    let memory_total = sys.total_memory() / 1024;
    let placement = match engine.placement_mode() {
        PlacementMode::Idle => "idle".to_string(),
        PlacementMode::AwaitingClickFor(pattern) => format!("awaiting click ({})", pattern.name),
    };

    let stats_text = format!(
        "Statistics:\n\
        Generation: {}\n\
        Current Population: {}\n\
        Cells Created: {}\n\
        Cells Destroyed: {}\n\
        Birth Rate: {:.2}/gen\n\
        Death Rate: {:.2}/gen\n\
        Grid: {}x{}\n\
        Speed: {:.0} gen/s\n\
        Random Density: {:.2}\n\
        Memory Usage: {}KB/{:.2}MB\n\
        Status: {}\n\
        Placement: {}\n\
        Spawn mode: {}\n\
        \n\
        Keys:\n\
        r random, c clear\n\
        +/- speed\n\
        1-4 blinker/toad/beacon/glider\n\
        p toggle click placement\n\
        Shift+drag paints alive\n",
        stats.generation,
        stats.current_population,
        stats.cells_created,
        stats.cells_destroyed,
        stats.birth_rate(),
        stats.death_rate(),
        engine.cols(),
        engine.rows(),
        engine.speed(),
        engine.config().random_density,
        memory_used,
        memory_total as f64 / 1024.0,
        if engine.is_running() { "Running" } else { "Paused" },
        placement,
        if hud.place_on_click { "on click" } else { "random" },
    );

    let stats_widget = Paragraph::new(stats_text)
        .block(Block::default().borders(Borders::ALL).title("Statistics"))
        .wrap(Wrap { trim: true });

    f.render_widget(stats_widget, area);
}
