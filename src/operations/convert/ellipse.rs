use std::f64::consts::{FRAC_PI_2, PI};

use tracing::debug;

use crate::geometry::{Bezier, BezierSegment, Curve, Ellipse, Polygon, Polyline};
use crate::math::arc_2d::adaptive_step;
use crate::math::simplify::{down_sample, down_sample_closed};
use crate::math::Point2;
use crate::operations::solver::{CurveParam, FootPoint};

use super::arc::steps;
use super::circle::quadrant_cubics;

/// Parameters this close to a segment end are snapped onto it.
const SNAP: f64 = 1e-9;

fn sample_params(ellipse: &Ellipse) -> (f64, f64, usize) {
    let dom = ellipse.domain();
    let n = steps(dom.width(), adaptive_step(ellipse.a().max(ellipse.b())));
    (dom.t_min, dom.width(), n)
}

/// Samples a full ellipse as a polygon, or an elliptical arc as the polygon
/// closed by its chord.
///
/// The angular step adapts to the larger semi-axis; a positive
/// `down_sampling` thins the result.
#[must_use]
pub fn ellipse_to_polygon(ellipse: &Ellipse, down_sampling: f64) -> Polygon {
    let (t0, width, n) = sample_params(ellipse);
    let count = if ellipse.is_arc() { n + 1 } else { n };
    let vertices: Vec<Point2> = (0..count)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = t0 + width * i as f64 / n as f64;
            ellipse.point_at(t)
        })
        .collect();
    Polygon::new(down_sample_closed(&vertices, down_sampling))
}

/// Samples an ellipse as an open chain from its start to its end point.
///
/// For a full ellipse the start point is repeated at the end.
#[must_use]
pub fn ellipse_to_polyline(ellipse: &Ellipse, down_sampling: f64) -> Polyline {
    let (t0, width, n) = sample_params(ellipse);
    let mut points = Vec::with_capacity(n + 1);
    points.push(ellipse.start());
    for i in 1..n {
        #[allow(clippy::cast_precision_loss)]
        points.push(ellipse.point_at(t0 + width * i as f64 / n as f64));
    }
    points.push(if ellipse.is_arc() {
        ellipse.end()
    } else {
        ellipse.start()
    });
    Polyline::new(down_sample(&points, down_sampling))
}

/// Converts an ellipse into cubic Bézier segments.
///
/// A full ellipse becomes four quadrant segments. An elliptical arc is cut
/// out of those: the arc ends are projected onto the full curve to find the
/// split parameters, the end segments are split with de Casteljau, and the
/// result is snapped to the exact arc endpoints.
#[must_use]
pub fn ellipse_to_bezier(ellipse: &Ellipse) -> Bezier {
    let full = Bezier::from_segments(
        3,
        quadrant_cubics(ellipse.center(), ellipse.a(), ellipse.b(), ellipse.angle()),
    );
    let Some((arc0, arc1)) = ellipse.arc() else {
        return full;
    };

    let (mut s0, mut u0) = locate(&full, ellipse, arc0);
    let (mut s1, mut u1) = locate(&full, ellipse, arc1);
    if u0 > 1.0 - SNAP {
        (s0, u0) = ((s0 + 1) % 4, 0.0);
    }
    if u1 < SNAP {
        (s1, u1) = ((s1 + 3) % 4, 1.0);
    }

    let segment = |i: usize| -> Vec<Point2> {
        full.segment(i)
            .map(|s| s.points().to_vec())
            .unwrap_or_default()
    };

    let mut pieces: Vec<Vec<Point2>> = Vec::new();
    if s0 == s1 && u0 < u1 && ellipse.sweep() < PI {
        let tail = split_after(&segment(s0), u0);
        pieces.push(split_before(&tail, (u1 - u0) / (1.0 - u0)));
    } else {
        pieces.push(split_after(&segment(s0), u0));
        let middle = if s0 == s1 { 3 } else { (s1 + 4 - s0 - 1) % 4 };
        for k in 1..=middle {
            pieces.push(segment((s0 + k) % 4));
        }
        pieces.push(split_before(&segment(s1), u1));
    }

    let mut points = Vec::with_capacity(3 * pieces.len() + 1);
    for (i, piece) in pieces.iter().enumerate() {
        points.extend(piece.iter().skip(usize::from(i > 0)));
    }
    if let Some(first) = points.first_mut() {
        *first = ellipse.start();
    }
    if let Some(last) = points.last_mut() {
        *last = ellipse.end();
    }
    Bezier::from_segments(3, points)
}

/// Segment and local parameter on the four-segment curve nearest to the
/// ellipse point at parameter `t`.
fn locate(full: &Bezier, ellipse: &Ellipse, t: f64) -> (usize, f64) {
    let target = ellipse.point_at(t);
    let nearest = FootPoint::new(target)
        .on_bezier(full)
        .into_iter()
        .min_by(|a, b| (a.0 - target).norm().total_cmp(&(b.0 - target).norm()));
    if let Some((_, CurveParam { segment, t: u })) = nearest {
        return (segment, u);
    }
    debug!(t, "no foot on ellipse cubic, using quadrant estimate");
    let quarter = t / FRAC_PI_2;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let segment = (quarter.floor() as usize).min(3);
    #[allow(clippy::cast_precision_loss)]
    let u = (quarter - segment as f64).clamp(0.0, 1.0);
    (segment, u)
}

/// Part of the cubic from `u` to its end.
fn split_after(points: &[Point2], u: f64) -> Vec<Point2> {
    BezierSegment::from_points(points).map_or_else(Vec::new, |s| s.split(u).1)
}

/// Part of the cubic from its start to `u`.
fn split_before(points: &[Point2], u: f64) -> Vec<Point2> {
    BezierSegment::from_points(points).map_or_else(Vec::new, |s| s.split(u).0)
}
