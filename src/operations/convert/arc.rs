use std::f64::consts::FRAC_PI_2;

use crate::geometry::{Arc, Bezier, Curve, Polyline};
use crate::math::arc_2d::{adaptive_step, arc_point_at};
use crate::math::Vector2;

/// Flattens an arc at the radius-adaptive angular step.
///
/// The first and last points are the arc's own endpoints.
#[must_use]
pub fn arc_to_polyline(arc: &Arc) -> Polyline {
    let n = steps(arc.sweep(), adaptive_step(arc.radius()));
    let mut points = Vec::with_capacity(n + 1);
    points.push(arc.start());
    for i in 1..n {
        #[allow(clippy::cast_precision_loss)]
        points.push(arc.point_at(i as f64 / n as f64));
    }
    points.push(arc.end());
    Polyline::new(points)
}

/// Converts an arc into cubic Bézier segments of at most a quarter turn each.
///
/// Each piece of angle `phi` uses handles of length `4/3 * tan(phi / 4) * r`
/// along the end tangents. The curve starts and ends exactly on the arc's
/// endpoints.
#[must_use]
pub fn arc_to_bezier(arc: &Arc) -> Bezier {
    let sweep = arc.sweep();
    // A hair over a quarter turn from rounding still fits one piece.
    let n = steps(sweep - 1e-9, FRAC_PI_2);
    #[allow(clippy::cast_precision_loss)]
    let piece = sweep / n as f64;
    let k = 4.0 / 3.0 * (piece / 4.0).tan() * arc.radius();
    let direction = |angle: f64| {
        let (s, c) = angle.sin_cos();
        if arc.is_cw() {
            Vector2::new(s, -c)
        } else {
            Vector2::new(-s, c)
        }
    };

    let mut points = Vec::with_capacity(3 * n + 1);
    points.push(arc.start());
    for i in 0..n {
        #[allow(clippy::cast_precision_loss)]
        let a0 = arc.angle_at(i as f64 / n as f64);
        #[allow(clippy::cast_precision_loss)]
        let a1 = arc.angle_at((i + 1) as f64 / n as f64);
        let p0 = arc_point_at(arc.center(), arc.radius(), a0);
        let p3 = if i + 1 == n {
            arc.end()
        } else {
            arc_point_at(arc.center(), arc.radius(), a1)
        };
        points.push(p0 + direction(a0) * k);
        points.push(p3 - direction(a1) * k);
        points.push(p3);
    }
    Bezier::from_segments(3, points)
}

/// Number of pieces of at most `step` needed to cover `span` (at least one).
pub(super) fn steps(span: f64, step: f64) -> usize {
    if span.is_nan() || span <= 0.0 {
        return 1;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (span / step).ceil() as usize;
    n.max(1)
}
