//! Circular-arc angle math.
//!
//! Angles are in radians. Sweeps are measured as positive magnitudes in the
//! direction of travel (counter-clockwise unless `is_cw`).
use std::f64::consts::{PI, TAU};

use super::{cross, Point2, TOLERANCE};

/// Smallest angular step used when flattening arcs and circles.
pub const MIN_ARC_STEP: f64 = PI / 4096.0;

/// Largest angular step used when flattening arcs and circles.
pub const MAX_ARC_STEP: f64 = PI / 32.0;

/// Normalizes an angle to `[0, 2*pi)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Angular travel from `start` to `end` in the given direction, in `(0, 2*pi]`.
#[must_use]
pub fn directed_sweep(start: f64, end: f64, is_cw: bool) -> f64 {
    let raw = if is_cw { start - end } else { end - start };
    let sweep = normalize_angle(raw);
    if sweep <= TOLERANCE {
        TAU
    } else {
        sweep
    }
}

/// Checks whether `angle` lies on the arc from `start` travelling `sweep`
/// radians in the given direction (inclusive, with `eps` slack).
#[must_use]
pub fn angle_in_sweep(angle: f64, start: f64, sweep: f64, is_cw: bool, eps: f64) -> bool {
    if sweep >= TAU - eps {
        return true;
    }
    let delta = if is_cw {
        normalize_angle(start - angle)
    } else {
        normalize_angle(angle - start)
    };
    delta <= sweep + eps || delta >= TAU - eps
}

/// Adaptive flattening step for a circle of the given radius.
///
/// `asin(1 / r)` clamped to `[pi/4096, pi/32]`; radii at or below one
/// use the coarsest step.
#[must_use]
pub fn adaptive_step(radius: f64) -> f64 {
    if radius <= 1.0 {
        return MAX_ARC_STEP;
    }
    (1.0 / radius).asin().clamp(MIN_ARC_STEP, MAX_ARC_STEP)
}

/// Circle through three points, as `(center, radius)`.
///
/// Returns `None` when the points are collinear or coincident.
#[must_use]
pub fn circle_from_three_points(p0: &Point2, p1: &Point2, p2: &Point2) -> Option<(Point2, f64)> {
    let a = p1 - p0;
    let b = p2 - p0;
    let d = 2.0 * cross(&a, &b);
    if d.abs() < TOLERANCE * a.norm().max(1.0) * b.norm().max(1.0) {
        return None;
    }
    let a_sq = a.norm_squared();
    let b_sq = b.norm_squared();
    let ux = (b.y * a_sq - a.y * b_sq) / d;
    let uy = (a.x * b_sq - b.x * a_sq) / d;
    let center = Point2::new(p0.x + ux, p0.y + uy);
    Some((center, (p0 - center).norm()))
}

/// Evaluates the point on a circle at the given angle.
#[must_use]
pub fn arc_point_at(center: &Point2, radius: f64, angle: f64) -> Point2 {
    let (s, c) = angle.sin_cos();
    Point2::new(center.x + radius * c, center.y + radius * s)
}

/// Polar angle of `p` around `center` in `[0, 2*pi)`.
#[must_use]
pub fn polar_angle(center: &Point2, p: &Point2) -> f64 {
    normalize_angle((p.y - center.y).atan2(p.x - center.x))
}
