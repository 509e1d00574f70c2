use rand::rngs::StdRng;
use rand::SeedableRng;

use torus_life::placement::{compute_bounds, random_spawn_anchor, stamp};
use torus_life::simulation::{count_neighbors, step};
use torus_life::{patterns, Engine, Grid, SimConfig, PATTERNS};

fn live_cells(grid: &Grid) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    for y in 0..grid.rows() as i32 {
        for x in 0..grid.cols() as i32 {
            if grid.cell_at(x, y) {
                out.push((x, y));
            }
        }
    }
    out
}

fn running_engine(speed: f64, cap: Option<f64>) -> Engine {
    let config = SimConfig::default()
        .with_seed(42)
        .with_speed(speed)
        .with_max_frame_seconds(cap);
    let mut engine = Engine::new(16, 16, config).unwrap();
    engine.set_running(true);
    engine
}

#[test]
fn test_single_cell_dies_on_3x3() {
    let mut grid = Grid::new(3, 3).unwrap();
    grid.set(1, 1, 1);
    step(&mut grid);
    assert!(live_cells(&grid).is_empty());
}

#[test]
fn test_block_is_stable() {
    let mut grid = Grid::new(8, 8).unwrap();
    for (x, y) in [(3, 3), (4, 3), (3, 4), (4, 4)] {
        grid.set(x, y, 1);
    }
    let start = live_cells(&grid);
    for _ in 0..50 {
        step(&mut grid);
        assert_eq!(live_cells(&grid), start);
    }
}

#[test]
fn test_blinker_has_period_two() {
    let mut grid = Grid::new(11, 11).unwrap();
    stamp(&mut grid, patterns::find("blinker").unwrap(), 5, 5);
    let start = live_cells(&grid);

    step(&mut grid);
    assert_eq!(live_cells(&grid), vec![(5, 4), (5, 5), (5, 6)]);
    step(&mut grid);
    assert_eq!(live_cells(&grid), start);
}

#[test]
fn test_toad_and_beacon_have_period_two() {
    for name in ["toad", "beacon"] {
        let mut grid = Grid::new(12, 12).unwrap();
        stamp(&mut grid, patterns::find(name).unwrap(), 5, 5);
        let start = live_cells(&grid);
        step(&mut grid);
        assert_ne!(live_cells(&grid), start, "{name} should change");
        step(&mut grid);
        assert_eq!(live_cells(&grid), start, "{name} should return");
    }
}

#[test]
fn test_glider_moves_up_right() {
    let mut grid = Grid::new(20, 20).unwrap();
    stamp(&mut grid, patterns::find("glider").unwrap(), 8, 8);
    let start = live_cells(&grid);

    for _ in 0..4 {
        step(&mut grid);
    }

    let mut expected: Vec<(i32, i32)> = start.iter().map(|&(x, y)| (x + 1, y - 1)).collect();
    expected.sort_by_key(|&(x, y)| (y, x));
    assert_eq!(live_cells(&grid), expected);
}

#[test]
fn test_glider_crosses_the_seam() {
    // After 4 * 10 ticks on a 10x10 torus the glider is back where it started.
    let mut grid = Grid::new(10, 10).unwrap();
    stamp(&mut grid, patterns::find("glider").unwrap(), 2, 2);
    let start = live_cells(&grid);
    for _ in 0..40 {
        step(&mut grid);
    }
    assert_eq!(live_cells(&grid), start);
}

#[test]
fn test_wrapped_neighbors_but_strict_access() {
    let (n, m) = (7, 5);
    let mut grid = Grid::new(n, m).unwrap();
    grid.set(0, 0, 1);
    grid.set(n - 1, 0, 1);
    grid.set(0, m - 1, 1);

    assert_eq!(grid.get_wrapped(-1, 0), 1);
    assert_eq!(grid.get_wrapped(0, -1), 1);
    assert_eq!(count_neighbors(&grid, 0, 0), 2);
    assert_eq!(count_neighbors(&grid, n - 1, 0), 2);
    assert_eq!(count_neighbors(&grid, 0, m - 1), 2);

    assert!(grid.get(n, 0).is_err());
    grid.set(n, 0, 1);
    assert_eq!(grid.population(), 3);
    assert_eq!(grid.get(0, 0), Ok(1));
}

#[test]
fn test_fixed_timestep_ten_even_frames() {
    let mut engine = running_engine(10.0, None);
    let ticks: usize = (0..10).map(|_| engine.advance(0.1)).sum();
    assert_eq!(ticks, 10);
    assert_eq!(engine.stats().generation, 10);
}

#[test]
fn test_fixed_timestep_one_big_frame() {
    let mut engine = running_engine(10.0, None);
    assert_eq!(engine.advance(1.0), 10);
    assert!(engine.accumulator() < 0.1);
}

#[test]
fn test_fixed_timestep_ragged_frames() {
    let mut engine = running_engine(10.0, None);
    let frames = [0.3, 0.25, 0.013, 0.137, 0.2, 0.07, 0.03];
    assert!((frames.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    let ticks: usize = frames.iter().map(|&dt| engine.advance(dt)).sum();
    assert_eq!(ticks, 10);
}

#[test]
fn test_fixed_timestep_with_frame_cap() {
    // Every frame is under the cap, so the cap never discards time.
    let mut engine = running_engine(10.0, Some(0.05));
    let mut frames = vec![0.05; 17];
    frames.extend([0.01, 0.04, 0.03, 0.02, 0.016, 0.034]);
    assert!((frames.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    let ticks: usize = frames.iter().map(|&dt| engine.advance(dt)).sum();
    assert_eq!(ticks, 10);
}

#[test]
fn test_random_spawn_stays_in_bounds() {
    let mut rng = StdRng::seed_from_u64(2024);
    for pattern in PATTERNS {
        for _ in 0..1000 {
            let (ax, ay) = random_spawn_anchor(pattern, 20, 20, &mut rng);
            for &(dx, dy) in pattern.cells {
                let (x, y) = (ax + dx, ay + dy);
                assert!((0..20).contains(&x) && (0..20).contains(&y), "{}", pattern.name);
            }
        }
    }
}

#[test]
fn test_random_spawn_covers_whole_range() {
    let mut rng = StdRng::seed_from_u64(8);
    let blinker = patterns::find("blinker").unwrap();
    let (min_dx, _, max_dx, _) = compute_bounds(blinker);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..2000 {
        seen.insert(random_spawn_anchor(blinker, 6, 3, &mut rng).0);
    }
    let expected: std::collections::HashSet<i32> = (-min_dx..=5 - max_dx).collect();
    assert_eq!(seen, expected);
}

#[test]
fn test_clear_stays_dead() {
    let mut engine = running_engine(10.0, None);
    engine.randomize().unwrap();
    engine.clear();
    for _ in 0..20 {
        engine.step_once();
        assert_eq!(engine.grid().population(), 0);
    }
}

#[test]
fn test_engine_random_spawn_fits() {
    let config = SimConfig::default().with_seed(5);
    let mut engine = Engine::new(20, 20, config).unwrap();
    for pattern in PATTERNS {
        engine.clear();
        let (x, y) = engine.begin_placing(pattern.name, false).unwrap().unwrap();
        assert_eq!(engine.grid().population(), pattern.cells.len());
        let (min_dx, min_dy, max_dx, max_dy) = compute_bounds(pattern);
        assert!(x + min_dx >= 0 && x + max_dx < 20);
        assert!(y + min_dy >= 0 && y + max_dy < 20);
    }
}
