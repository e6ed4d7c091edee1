use crate::body::{Body, Bounds};

/// Advance a body by one tick of explicit Euler motion, then reflect off walls
///
/// The body is not pushed back inside: a body that crossed a wall keeps its
/// position and only has the velocity component flipped.
pub fn advance(body: &mut Body, bounds: &Bounds) {
    body.pos += body.vel;
    reflect_walls(body, bounds);
}

/// Negate each velocity component whose axis has a leading or trailing edge
/// past the bounds. The two axes are checked independently.
pub fn reflect_walls(body: &mut Body, bounds: &Bounds) {
    let r = body.radius;

    if body.pos.x + r > bounds.width() || body.pos.x - r < 0.0 {
        body.vel.x = -body.vel.x;
    }

    // y grows downward, so height is the bottom edge
    if body.pos.y + r > bounds.height() || body.pos.y - r < 0.0 {
        body.vel.y = -body.vel.y;
    }
}
