use crate::body::{Body, Bounds};
use crate::collision::{self, Resolution};
use crate::integrator;

/// Counters from one simulation step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub pairs_checked: usize,
    pub collisions: usize,
    pub degenerate: usize,
}

impl StepReport {
    pub fn merge(&mut self, other: StepReport) {
        self.pairs_checked += other.pairs_checked;
        self.collisions += other.collisions;
        self.degenerate += other.degenerate;
    }
}

/// The bounded rectangle and the bodies moving inside it
#[derive(Debug, Clone)]
pub struct Arena {
    bounds: Bounds,
    bodies: Vec<Body>,
}

impl Arena {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            bodies: Vec::new(),
        }
    }

    pub fn with_bodies(bounds: Bounds, bodies: Vec<Body>) -> Self {
        Self { bounds, bodies }
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Append a body. The population never shrinks.
    pub fn push(&mut self, body: Body) {
        self.bodies.push(body);
    }

    /// Advance every body one tick, then resolve colliding pairs
    ///
    /// Pairs are visited once each in `(i, j)`, `i < j` order. A pair sees
    /// whatever earlier pairs in the same pass did to its bodies, and no pair
    /// is revisited after resolution.
    pub fn step(&mut self) -> StepReport {
        for body in self.bodies.iter_mut() {
            integrator::advance(body, &self.bounds);
        }

        let mut report = StepReport::default();
        let n = self.bodies.len();
        for i in 0..n {
            for j in (i + 1)..n {
                report.pairs_checked += 1;
                match collision::resolve_pair(&mut self.bodies, i, j) {
                    Some(Resolution::Resolved) => report.collisions += 1,
                    Some(Resolution::Degenerate) => report.degenerate += 1,
                    None => {}
                }
            }
        }

        log::trace!(
            "step: {} bodies, {} pairs, {} collisions, {} degenerate",
            n,
            report.pairs_checked,
            report.collisions,
            report.degenerate
        );
        report
    }
}
