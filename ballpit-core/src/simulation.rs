use crate::arena::{Arena, StepReport};
use crate::body::Bounds;
use crate::config::{ConfigError, SimConfig};
use crate::scheduler::{Activity, Scheduler};
use crate::spawner::{SpawnParams, Spawner};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::Serialize;
use std::time::Duration;

/// Read-only view of a body for a renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyState {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: String,
}

/// What one call to [`Simulation::advance`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    pub ticks: usize,
    pub spawned: usize,
    pub step: StepReport,
}

impl AdvanceReport {
    pub fn merge(&mut self, other: AdvanceReport) {
        self.ticks += other.ticks;
        self.spawned += other.spawned;
        self.step.merge(other.step);
    }
}

/// Arena, spawner and scheduler bundled behind the driver entry points
#[derive(Debug)]
pub struct Simulation<R = ChaCha12Rng> {
    arena: Arena,
    spawner: Spawner<R>,
    scheduler: Scheduler,
    spawn_batch: usize,
    tick_count: u64,
}

impl Simulation<ChaCha12Rng> {
    /// Build from config, seeding from `config.seed` or OS entropy
    pub fn new(config: &SimConfig, bounds: Bounds) -> Result<Self, ConfigError> {
        let rng = match config.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::from_entropy(),
        };
        Self::with_rng(config, bounds, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Build with an injected random source. `config.seed` is ignored.
    pub fn with_rng(config: &SimConfig, bounds: Bounds, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut arena = Arena::new(bounds);
        let mut spawner = Spawner::new(SpawnParams::from(config), rng)?;
        spawner.spawn(&mut arena, config.initial_count);

        log::info!(
            "simulation started: {} x {} arena, {} bodies, tick {:?}, spawn {} every {:?}",
            bounds.width(),
            bounds.height(),
            arena.len(),
            config.tick_interval(),
            config.spawn_batch,
            config.spawn_interval()
        );

        Ok(Self {
            arena,
            spawner,
            scheduler: Scheduler::from_config(config)?,
            spawn_batch: config.spawn_batch,
            tick_count: 0,
        })
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn bounds(&self) -> &Bounds {
        self.arena.bounds()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Run one simulation step
    pub fn tick(&mut self) -> StepReport {
        self.tick_count += 1;
        self.arena.step()
    }

    /// Add one spawn batch, returning how many bodies were added
    pub fn spawn_tick(&mut self) -> usize {
        self.spawner.spawn(&mut self.arena, self.spawn_batch)
    }

    /// Report elapsed wall time and run whatever fell due, in order
    pub fn advance(&mut self, elapsed: Duration) -> AdvanceReport {
        self.run_due(elapsed, None)
    }

    /// Like [`Simulation::advance`], but stops once `tick_count` reaches
    /// `tick_limit`. Activities still due at that point are discarded.
    pub fn advance_until(&mut self, elapsed: Duration, tick_limit: u64) -> AdvanceReport {
        self.run_due(elapsed, Some(tick_limit))
    }

    fn run_due(&mut self, elapsed: Duration, tick_limit: Option<u64>) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        for activity in self.scheduler.advance(elapsed) {
            if matches!(tick_limit, Some(n) if self.tick_count >= n) {
                break;
            }
            match activity {
                Activity::Tick => {
                    report.step.merge(self.tick());
                    report.ticks += 1;
                }
                Activity::Spawn => report.spawned += self.spawn_tick(),
            }
        }
        report
    }

    pub fn body_states(&self) -> Vec<BodyState> {
        self.arena
            .bodies()
            .iter()
            .map(|b| BodyState {
                x: b.pos.x,
                y: b.pos.y,
                radius: b.radius,
                color: b.color.to_hex(),
            })
            .collect()
    }
}
