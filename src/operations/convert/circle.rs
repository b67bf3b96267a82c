use std::f64::consts::TAU;

use crate::geometry::{Bezier, Circle, Polygon};
use crate::math::arc_2d::{adaptive_step, arc_point_at};
use crate::math::simplify::down_sample_closed;
use crate::math::{Point2, Vector2};

use super::arc::steps;

/// Handle length of a quarter-circle cubic, as a fraction of the radius.
pub const QUARTER_KAPPA: f64 = 0.552_284_749_830_793_4;

/// Samples the circle at the radius-adaptive angular step, starting at
/// angle `0` and running counter-clockwise.
///
/// A positive `down_sampling` tolerance thins the vertices afterwards; all
/// remaining vertices still lie on the circle.
#[must_use]
pub fn circle_to_polygon(circle: &Circle, down_sampling: f64) -> Polygon {
    let n = steps(TAU, adaptive_step(circle.radius()));
    let vertices: Vec<Point2> = (0..n)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = TAU * i as f64 / n as f64;
            arc_point_at(circle.center(), circle.radius(), angle)
        })
        .collect();
    Polygon::new(down_sample_closed(&vertices, down_sampling))
}

/// Four cubic segments, one per quadrant, starting at angle `0`.
#[must_use]
pub fn circle_to_bezier(circle: &Circle) -> Bezier {
    let r = circle.radius();
    Bezier::from_segments(3, quadrant_cubics(circle.center(), r, r, 0.0))
}

/// Control points of a four-segment cubic ellipse with semi-axes `a`, `b`
/// rotated by `angle`, starting at the end of the `a` axis.
pub(super) fn quadrant_cubics(center: &Point2, a: f64, b: f64, angle: f64) -> Vec<Point2> {
    let (ka, kb) = (QUARTER_KAPPA * a, QUARTER_KAPPA * b);
    let local = [
        (a, 0.0),
        (a, kb),
        (ka, b),
        (0.0, b),
        (-ka, b),
        (-a, kb),
        (-a, 0.0),
        (-a, -kb),
        (-ka, -b),
        (0.0, -b),
        (ka, -b),
        (a, -kb),
        (a, 0.0),
    ];
    let (s, c) = angle.sin_cos();
    local
        .iter()
        .map(|&(x, y)| center + Vector2::new(x * c - y * s, x * s + y * c))
        .collect()
}
