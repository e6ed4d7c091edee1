pub mod arena;
pub mod body;
pub mod collision;
pub mod config;
pub mod integrator;
pub mod scheduler;
pub mod simulation;
pub mod spawner;

pub use arena::{Arena, StepReport};
pub use body::{Body, Bounds, Color};
pub use collision::{overlaps, resolve, resolve_pair, Resolution};
pub use config::{ConfigError, SimConfig, ValueRange};
pub use integrator::advance;
pub use scheduler::{Activity, LatePolicy, Scheduler};
pub use simulation::{AdvanceReport, BodyState, Simulation};
pub use spawner::{SpawnParams, Spawner};
