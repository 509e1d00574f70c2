//! Tunables for the engine.

use crate::error::{LifeError, Result};

/// Density used to reseed the grid after a resize.
pub const DEFAULT_RESEED_DENSITY: f64 = 0.18;
/// Density used by the explicit "randomize" command.
pub const DEFAULT_RANDOM_DENSITY: f64 = 0.2;
/// Default simulation speed in ticks per second.
pub const DEFAULT_SPEED: f64 = 12.0;
/// Longest frame the loop will account for before dropping time.
pub const DEFAULT_MAX_FRAME_SECONDS: f64 = 0.05;

/// Settings the engine is constructed with.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Simulation rate in ticks per second.
    pub speed: f64,
    /// Probability of a live cell when reseeding after a resize.
    pub reseed_density: f64,
    /// Probability of a live cell for [`Engine::randomize`](crate::Engine::randomize).
    pub random_density: f64,
    /// Per-frame cap on elapsed time; `None` disables the cap.
    pub max_frame_seconds: Option<f64>,
    /// Seed for the random source. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            speed: DEFAULT_SPEED,
            reseed_density: DEFAULT_RESEED_DENSITY,
            random_density: DEFAULT_RANDOM_DENSITY,
            max_frame_seconds: Some(DEFAULT_MAX_FRAME_SECONDS),
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_max_frame_seconds(mut self, cap: Option<f64>) -> Self {
        self.max_frame_seconds = cap;
        self
    }

    /// Checks that every value is usable by the engine.
    pub fn validate(&self) -> Result<()> {
        validate_speed(self.speed)?;
        validate_density(self.reseed_density)?;
        validate_density(self.random_density)?;
        Ok(())
    }
}

pub(crate) fn validate_speed(speed: f64) -> Result<()> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(LifeError::InvalidSpeed(speed))
    }
}

pub(crate) fn validate_density(density: f64) -> Result<()> {
    if (0.0..=1.0).contains(&density) {
        Ok(())
    } else {
        Err(LifeError::InvalidDensity(density))
    }
}
