use crate::arena::Arena;
use crate::body::{Body, Color};
use crate::config::{self, ConfigError, SimConfig, ValueRange};
use glam::DVec2;
use rand::Rng;

/// Draw parameters for newly spawned bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    pub velocity: ValueRange,
    pub radius: ValueRange,
    pub integral_radius: bool,
    pub population_cap: Option<usize>,
}

impl SpawnParams {
    /// Same range checks as [`SimConfig::validate`]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.velocity.validate("velocity")?;
        config::validate_radius_range(&self.radius)
    }
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self::from(&SimConfig::default())
    }
}

impl From<&SimConfig> for SpawnParams {
    fn from(config: &SimConfig) -> Self {
        Self {
            velocity: config.velocity_range,
            radius: config.radius_range,
            integral_radius: config.integral_radius,
            population_cap: config.population_cap,
        }
    }
}

/// Appends randomly parameterized bodies to an arena
///
/// The random source is owned so a seeded generator gives a reproducible
/// population.
#[derive(Debug)]
pub struct Spawner<R> {
    params: SpawnParams,
    rng: R,
}

impl<R: Rng> Spawner<R> {
    pub fn new(params: SpawnParams, rng: R) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params, rng })
    }

    /// Append up to `count` bodies and return how many were added
    ///
    /// Fewer than `count` are added only when a population cap is set.
    pub fn spawn(&mut self, arena: &mut Arena, count: usize) -> usize {
        let room = match self.params.population_cap {
            Some(cap) => cap.saturating_sub(arena.len()),
            None => usize::MAX,
        };
        let added = count.min(room);
        if added < count {
            log::warn!(
                "population cap {:?} reached, dropping {} of {} new bodies",
                self.params.population_cap,
                count - added,
                count
            );
        }

        for _ in 0..added {
            let body = self.draw_body(arena.bounds().width(), arena.bounds().height());
            arena.push(body);
        }

        log::debug!("spawned {} bodies, population now {}", added, arena.len());
        added
    }

    /// Draw one body inside `[0, width) x [0, height)`
    pub fn draw_body(&mut self, width: f64, height: f64) -> Body {
        let p = &self.params;
        let pos = DVec2::new(
            self.rng.gen_range(0.0..width),
            self.rng.gen_range(0.0..height),
        );
        let vel = DVec2::new(
            self.rng.gen_range(p.velocity.min..p.velocity.max),
            self.rng.gen_range(p.velocity.min..p.velocity.max),
        );
        let mut radius = self.rng.gen_range(p.radius.min..p.radius.max);
        if p.integral_radius {
            radius = radius.trunc();
        }
        let color = Color::random(&mut self.rng);

        Body::new(pos, vel, radius).with_color(color)
    }
}
