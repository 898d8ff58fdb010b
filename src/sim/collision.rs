//! Obstacle/ship collision test
//!
//! A center-distance overlap check whose half-extents come from the ship's
//! size only, scaled by a tolerance factor. It is deliberately looser than an
//! exact edge-to-edge overlap, and the obstacle's own size plays no part.

use glam::Vec2;

use super::lane::Rect;
use crate::consts::COLLISION_TOLERANCE;

/// True when `a` (the obstacle) overlaps `b` (the ship)
///
/// Hit iff `|dx| < 0.6 * b.width` and `|dy| < 0.6 * b.height`. The reach is
/// computed in f64 so a distance of exactly `0.6 * size` is a miss.
#[inline]
pub fn collides(a_center: Vec2, a_size: Vec2, b_center: Vec2, b_size: Vec2) -> bool {
    collides_with_tolerance(a_center, a_size, b_center, b_size, COLLISION_TOLERANCE)
}

/// [`collides`] with an explicit tolerance factor
// TODO: product review whether the tolerance should also scale with the obstacle size
pub fn collides_with_tolerance(
    a_center: Vec2,
    _a_size: Vec2,
    b_center: Vec2,
    b_size: Vec2,
    tolerance: f64,
) -> bool {
    let delta = (a_center.as_dvec2() - b_center.as_dvec2()).abs();
    let reach = b_size.as_dvec2() * tolerance;
    delta.x < reach.x && delta.y < reach.y
}

/// Rectangle form used by the fall tick
#[inline]
pub fn rects_collide(obstacle: &Rect, ship: &Rect, tolerance: f64) -> bool {
    collides_with_tolerance(
        obstacle.center(),
        obstacle.size,
        ship.center(),
        ship.size,
        tolerance,
    )
}
