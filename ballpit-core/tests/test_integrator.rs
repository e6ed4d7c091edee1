//! Unit tests for motion integration and wall reflection

use ballpit_core::integrator::advance;
use ballpit_core::tests::test_helpers::{approx_eq_vec, body, bounds};
use glam::DVec2;

#[test]
fn test_moves_by_velocity_inside_bounds() {
    let b = bounds(100.0, 100.0);
    let mut ball = body((50.0, 50.0), (3.0, -2.0), 5.0);

    advance(&mut ball, &b);

    assert_eq!(ball.pos, DVec2::new(53.0, 48.0));
    assert_eq!(ball.vel, DVec2::new(3.0, -2.0));
}

#[test]
fn test_reflects_off_right_wall() {
    let b = bounds(100.0, 100.0);
    let mut ball = body((85.0, 50.0), (6.0, 0.0), 10.0);

    advance(&mut ball, &b);

    // leading edge at 101 crossed the wall; position is not clamped
    assert_eq!(ball.pos.x, 91.0);
    assert_eq!(ball.vel.x, -6.0);
}

#[test]
fn test_reflects_off_left_wall() {
    let b = bounds(100.0, 100.0);
    let mut ball = body((12.0, 50.0), (-3.0, 0.0), 10.0);

    advance(&mut ball, &b);

    assert_eq!(ball.pos.x, 9.0);
    assert_eq!(ball.vel.x, 3.0);
}

#[test]
fn test_reflects_off_top_and_bottom() {
    let b = bounds(100.0, 80.0);

    let mut top = body((50.0, 6.0), (0.0, -2.0), 5.0);
    advance(&mut top, &b);
    assert_eq!(top.vel.y, 2.0);

    let mut bottom = body((50.0, 74.0), (0.0, 2.0), 5.0);
    advance(&mut bottom, &b);
    assert_eq!(bottom.vel.y, -2.0);
}

#[test]
fn test_axes_reflect_independently() {
    let b = bounds(100.0, 100.0);

    // corner: both axes cross
    let mut corner = body((96.0, 96.0), (2.0, 2.0), 5.0);
    advance(&mut corner, &b);
    assert_eq!(corner.vel, DVec2::new(-2.0, -2.0));

    // only x crosses
    let mut side = body((96.0, 50.0), (2.0, 2.0), 5.0);
    advance(&mut side, &b);
    assert_eq!(side.vel, DVec2::new(-2.0, 2.0));
}

#[test]
fn test_touching_wall_does_not_reflect() {
    let b = bounds(100.0, 100.0);
    let mut ball = body((88.0, 50.0), (2.0, 0.0), 10.0);

    advance(&mut ball, &b);

    // right edge lands exactly on the wall
    assert_eq!(ball.pos.x + ball.radius, 100.0);
    assert_eq!(ball.vel.x, 2.0);
}

#[test]
fn test_position_changes_by_pre_move_velocity() {
    let b = bounds(50.0, 50.0);
    let cases = [
        ((25.0, 25.0), (1.5, -0.5), 3.0),
        ((47.0, 3.0), (2.0, -2.0), 2.0),
        ((4.0, 46.0), (-4.5, 4.5), 3.5),
    ];

    for (pos, vel, radius) in cases {
        let mut ball = body(pos, vel, radius);
        let before = ball.pos;
        let v = ball.vel;

        advance(&mut ball, &b);

        assert!(approx_eq_vec(ball.pos - before, v, 1e-12));
        // each component either kept or flipped sign, magnitude unchanged
        assert_eq!(ball.vel.x.abs(), v.x.abs());
        assert_eq!(ball.vel.y.abs(), v.y.abs());
    }
}

#[test]
fn test_oversized_body_jitters() {
    // radius larger than half the arena: both edges are out every tick
    let b = bounds(20.0, 20.0);
    let mut ball = body((10.0, 10.0), (1.0, 0.0), 15.0);

    advance(&mut ball, &b);
    assert_eq!(ball.vel.x, -1.0);

    advance(&mut ball, &b);
    assert_eq!(ball.vel.x, 1.0);

    advance(&mut ball, &b);
    assert_eq!(ball.vel.x, -1.0);
}
