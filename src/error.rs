//! Error types for the simulation core.

/// Everything that can go wrong while driving the engine.
///
/// Painting, stamping, stepping and advancing are total; only construction,
/// strict reads and configuration changes can fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LifeError {
    #[error("invalid grid dimensions {cols}x{rows}: both must be positive")]
    InvalidDimensions { cols: i32, rows: i32 },

    #[error("cell ({x}, {y}) is outside the grid")]
    OutOfBounds { x: i32, y: i32 },

    #[error("invalid speed {0}: ticks per second must be a positive number")]
    InvalidSpeed(f64),

    #[error("invalid density {0}: expected a probability in 0..=1")]
    InvalidDensity(f64),

    #[error("unknown pattern: {0}")]
    UnknownPattern(String),
}

pub type Result<T> = std::result::Result<T, LifeError>;
