//! Pairwise collision detection and elastic response
//!
//! Bodies are treated as discs whose radius stands in for mass. Response
//! works in the frame of the collision normal (the line through both
//! centres): the normal components exchange momentum by the 1-D elastic
//! formula, the tangential components pass through untouched, and the pair
//! is then pushed apart so the discs just touch.

use crate::body::Body;
use glam::DVec2;

/// Combined radius below which a pair has no usable mass weight
pub const MIN_COMBINED_RADIUS: f64 = 1e-12;

/// Outcome of [`resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Velocities and positions of both bodies were updated
    Resolved,
    /// The combined radius was (near) zero, so the pair was left untouched
    Degenerate,
}

/// True iff the discs overlap. Touching exactly does not count.
pub fn overlaps(a: &Body, b: &Body) -> bool {
    a.pos.distance(b.pos) < a.radius + b.radius
}

/// Angle of the collision normal, pointing from `b` towards `a`
///
/// Coincident centres have no direction; they use angle 0 (the +x axis).
pub fn normal_angle(a: &Body, b: &Body) -> f64 {
    let d = a.pos - b.pos;
    if d == DVec2::ZERO {
        return 0.0;
    }
    d.y.atan2(d.x)
}

/// Post-collision normal speeds for two bodies with normal speeds `u1`, `u2`
/// and mass weights `r1`, `r2`
fn elastic_1d(u1: f64, u2: f64, r1: f64, r2: f64) -> (f64, f64) {
    let total = r1 + r2;
    let v1 = ((r1 - r2) * u1 + 2.0 * r2 * u2) / total;
    let v2 = (2.0 * r1 * u1 + (r2 - r1) * u2) / total;
    (v1, v2)
}

/// Apply elastic response and overlap correction to a pair already known to
/// overlap
pub fn resolve(a: &mut Body, b: &mut Body) -> Resolution {
    let r1 = a.radius;
    let r2 = b.radius;
    if r1 + r2 < MIN_COMBINED_RADIUS {
        log::debug!(
            "skipping collision with combined radius {} at ({}, {})",
            r1 + r2,
            a.pos.x,
            a.pos.y
        );
        return Resolution::Degenerate;
    }

    if a.pos == b.pos {
        log::debug!("coincident centres at ({}, {}), using +x normal", a.pos.x, a.pos.y);
    }
    let angle = normal_angle(a, b);

    // Normal axis and the axis a quarter turn from it
    let normal = DVec2::from_angle(angle);
    let tangent = normal.perp();

    let (u1, t1) = (a.vel.dot(normal), a.vel.dot(tangent));
    let (u2, t2) = (b.vel.dot(normal), b.vel.dot(tangent));

    let (v1, v2) = elastic_1d(u1, u2, r1, r2);

    a.vel = normal * v1 + tangent * t1;
    b.vel = normal * v2 + tangent * t2;

    let overlap = r1 + r2 - a.pos.distance(b.pos);
    let correction = normal * (overlap / 2.0);
    a.pos += correction;
    b.pos -= correction;

    Resolution::Resolved
}

/// Check and, if needed, resolve bodies `i` and `j` of a slice in place
///
/// Returns `None` when the pair does not overlap. Panics if `i == j` or
/// either index is out of range.
pub fn resolve_pair(bodies: &mut [Body], i: usize, j: usize) -> Option<Resolution> {
    assert_ne!(i, j, "a body cannot collide with itself");
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    let (head, tail) = bodies.split_at_mut(hi);
    let (first, second) = (&mut head[lo], &mut tail[0]);

    if !overlaps(first, second) {
        return None;
    }
    // Keep the caller's (i, j) orientation so the normal points from j to i
    if i < j {
        Some(resolve(first, second))
    } else {
        Some(resolve(second, first))
    }
}
