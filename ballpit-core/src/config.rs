//! Simulation configuration
//!
//! Every option has a default matching the classic bouncing-balls page:
//! ten bodies at start, ten more every two seconds, ~30 ticks per second.
//! A config can be loaded from JSON; missing fields fall back to defaults.
//!
//! ```json
//! {
//!   "initial_count": 10,
//!   "spawn_batch": 10,
//!   "spawn_interval_ms": 2000,
//!   "tick_interval_ms": 33,
//!   "velocity_range": { "min": -5.0, "max": 5.0 },
//!   "radius_range": { "min": 0.0, "max": 20.0 },
//!   "population_cap": 500,
//!   "seed": 42
//! }
//! ```

use crate::scheduler::LatePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while building a simulation. Stepping never fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("arena bounds must be positive and finite, got {width} x {height}")]
    InvalidBounds { width: f64, height: f64 },

    #[error("{name} range [{min}, {max}) is invalid: {reason}")]
    InvalidRange {
        name: &'static str,
        min: f64,
        max: f64,
        reason: &'static str,
    },

    #[error("{0} interval must be greater than zero")]
    ZeroInterval(&'static str),

    #[error("max_catch_up must be at least 1")]
    InvalidCatchUp,

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Half-open interval `[min, max)` used for uniform draws
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub(crate) fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        let err = |reason| ConfigError::InvalidRange {
            name,
            min: self.min,
            max: self.max,
            reason,
        };
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(err("bounds must be finite"));
        }
        if self.min >= self.max {
            return Err(err("min must be below max"));
        }
        // uniform sampling scales by the width, which must itself be finite
        if !(self.max - self.min).is_finite() {
            return Err(err("range width overflows"));
        }
        Ok(())
    }
}

/// Radius draws share the range checks and must not go negative
pub(crate) fn validate_radius_range(range: &ValueRange) -> Result<(), ConfigError> {
    range.validate("radius")?;
    if range.min < 0.0 {
        return Err(ConfigError::InvalidRange {
            name: "radius",
            min: range.min,
            max: range.max,
            reason: "radius cannot be negative",
        });
    }
    Ok(())
}

pub(crate) fn validate_interval(name: &'static str, period: Duration) -> Result<(), ConfigError> {
    if period.is_zero() {
        return Err(ConfigError::ZeroInterval(name));
    }
    Ok(())
}

pub(crate) fn validate_catch_up(max_catch_up: u32) -> Result<(), ConfigError> {
    if max_catch_up == 0 {
        return Err(ConfigError::InvalidCatchUp);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    /// Bodies spawned at construction
    pub initial_count: usize,
    /// Bodies added per spawn tick
    pub spawn_batch: usize,
    /// Spawn tick period
    pub spawn_interval_ms: u64,
    /// Simulation tick period
    pub tick_interval_ms: u64,
    /// Per-axis velocity draw
    pub velocity_range: ValueRange,
    /// Radius draw, min may be 0
    pub radius_range: ValueRange,
    /// Truncate radius draws to whole numbers
    pub integral_radius: bool,
    /// `None` keeps the population unbounded
    pub population_cap: Option<usize>,
    /// `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// What to do with missed ticks
    pub late_policy: LatePolicy,
    /// Firings per timer per advance under `CatchUp`
    pub max_catch_up: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            initial_count: 10,
            spawn_batch: 10,
            spawn_interval_ms: 2000,
            tick_interval_ms: 33,
            velocity_range: ValueRange::new(-5.0, 5.0),
            radius_range: ValueRange::new(0.0, 20.0),
            integral_radius: false,
            population_cap: None,
            seed: None,
            late_policy: LatePolicy::CatchUp,
            max_catch_up: 10,
        }
    }
}

impl SimConfig {
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_json_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.velocity_range.validate("velocity")?;
        validate_radius_range(&self.radius_range)?;
        validate_interval("tick", self.tick_interval())?;
        validate_interval("spawn", self.spawn_interval())?;
        validate_catch_up(self.max_catch_up)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }
}
