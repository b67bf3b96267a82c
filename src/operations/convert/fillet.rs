use std::f64::consts::PI;

use tracing::debug;

use crate::geometry::{Arc, Bezier};
use crate::math::arc_2d::polar_angle;
use crate::math::{cross, try_unit, Point2, Vector2, ANGLE_TOLERANCE};

/// Unit directions from the corner `p1` towards `p0` and `p2`, and the
/// interior angle between them.
///
/// `None` when a leg has zero length or the corner is straight or folded
/// back onto itself.
fn corner(p0: &Point2, p1: &Point2, p2: &Point2) -> Option<(Vector2, Vector2, f64)> {
    let d0 = try_unit(&(p0 - p1))?;
    let d1 = try_unit(&(p2 - p1))?;
    let theta = cross(&d0, &d1).abs().atan2(d0.dot(&d1));
    if theta < ANGLE_TOLERANCE || PI - theta < ANGLE_TOLERANCE {
        debug!(theta, "corner is straight or folded, no fillet");
        return None;
    }
    Some((d0, d1, theta))
}

/// Distance from the corner to the tangent point of a fillet of `radius`,
/// or `None` when it does not fit on the leg of length `leg`.
///
/// The only slack is a few ulps relative to the leg, enough for a tangent
/// point that lands exactly on the leg end to survive `tan` rounding.
fn tangent_length(radius: f64, theta: f64, leg: f64) -> Option<f64> {
    let len = radius / (theta / 2.0).tan();
    if len > leg * (1.0 + 4.0 * f64::EPSILON) {
        debug!(radius, len, leg, "fillet tangent length exceeds the segment");
        return None;
    }
    Some(len)
}

/// Rounds the corner `p1` of the path `p0 -> p1 -> p2` with a circular arc
/// of `radius` tangent to both legs.
///
/// The arc runs from the tangent point on `p0 -> p1` to the tangent point on
/// `p1 -> p2`, in the turning direction of the path. Returns `None` when
/// `radius <= 0`, the points are degenerate, or the tangent points would
/// fall beyond either leg.
#[must_use]
pub fn angle_to_arc(p0: &Point2, p1: &Point2, p2: &Point2, radius: f64) -> Option<Arc> {
    if radius.is_nan() || radius <= 0.0 {
        return None;
    }
    let (d0, d1, theta) = corner(p0, p1, p2)?;
    let len = tangent_length(radius, theta, (p0 - p1).norm())?;
    tangent_length(radius, theta, (p2 - p1).norm())?;

    let t0 = p1 + d0 * len;
    let t1 = p1 + d1 * len;
    let bisector = try_unit(&(d0 + d1))?;
    let center = p1 + bisector * (radius / (theta / 2.0).sin());
    let is_cw = cross(&(p1 - p0), &(p2 - p1)) < 0.0;
    Arc::from_center(
        center,
        radius,
        polar_angle(&center, &t0),
        polar_angle(&center, &t1),
        is_cw,
    )
    .ok()
}

/// Rounds the corner `p1` with a single cubic whose tangent lengths follow
/// the two radii `r0` (on the `p0` leg) and `r1` (on the `p2` leg).
///
/// With equal radii the cubic is the standard one-piece approximation of
/// the circular fillet. Fails under the same conditions as [`angle_to_arc`].
#[must_use]
pub fn angle_to_bezier(p0: &Point2, p1: &Point2, p2: &Point2, r0: f64, r1: f64) -> Option<Bezier> {
    if r0.is_nan() || r1.is_nan() || r0 <= 0.0 || r1 <= 0.0 {
        return None;
    }
    let (d0, d1, theta) = corner(p0, p1, p2)?;
    let len0 = tangent_length(r0, theta, (p0 - p1).norm())?;
    let len1 = tangent_length(r1, theta, (p2 - p1).norm())?;

    let turn = PI - theta;
    let handle = 4.0 / 3.0 * (turn / 4.0).tan() / (turn / 2.0).tan();
    let t0 = p1 + d0 * len0;
    let t1 = p1 + d1 * len1;
    Some(Bezier::from_segments(
        3,
        vec![t0, t0 - d0 * (handle * len0), t1 - d1 * (handle * len1), t1],
    ))
}
