//! Foot-point and tangency solving from an external point onto curves.
//!
//! Béziers and B-splines go through a fixed-step sign-change scan followed
//! by bisection, so the cost per segment is proportional to
//! `1 / SCAN_STEP`. Circles and ellipses are solved in closed form or with
//! the one-variable root search of [`crate::math::nonlinear`].

mod bisection;
mod foot_point;
mod tangency_point;

pub use bisection::SCAN_STEP;
pub use foot_point::FootPoint;
pub use tangency_point::TangencyPoint;

use crate::geometry::{BSpline, Bezier, Circle, Ellipse};
use crate::math::{Point2, TOLERANCE};

/// Where on a curve a solution lies: the segment index (always `0` for
/// single-piece curves) and the parameter within it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParam {
    pub segment: usize,
    pub t: f64,
}

impl CurveParam {
    #[must_use]
    pub fn new(segment: usize, t: f64) -> Self {
        Self { segment, t }
    }
}

/// Curves accepted by [`foot_point`] and [`tangency_point`].
#[derive(Debug, Clone, Copy)]
pub enum SolverCurve<'a> {
    Bezier(&'a Bezier),
    BSpline(&'a BSpline),
    Circle(&'a Circle),
    Ellipse(&'a Ellipse),
}

impl<'a> From<&'a Bezier> for SolverCurve<'a> {
    fn from(b: &'a Bezier) -> Self {
        Self::Bezier(b)
    }
}

impl<'a> From<&'a BSpline> for SolverCurve<'a> {
    fn from(s: &'a BSpline) -> Self {
        Self::BSpline(s)
    }
}

impl<'a> From<&'a Circle> for SolverCurve<'a> {
    fn from(c: &'a Circle) -> Self {
        Self::Circle(c)
    }
}

impl<'a> From<&'a Ellipse> for SolverCurve<'a> {
    fn from(e: &'a Ellipse) -> Self {
        Self::Ellipse(e)
    }
}

/// Drops hits that repeat an earlier point, such as a root found at the
/// shared end of two neighbouring segments.
fn dedup_hits(hits: Vec<(Point2, CurveParam)>) -> Vec<(Point2, CurveParam)> {
    let mut out: Vec<(Point2, CurveParam)> = Vec::with_capacity(hits.len());
    for hit in hits {
        if out.iter().all(|(p, _)| (p - hit.0).norm() > TOLERANCE) {
            out.push(hit);
        }
    }
    out
}

fn write_out(
    hits: Vec<(Point2, CurveParam)>,
    points: &mut Vec<Point2>,
    params: Option<&mut Vec<CurveParam>>,
) -> usize {
    let count = hits.len();
    match params {
        Some(params) => {
            for (p, c) in hits {
                points.push(p);
                params.push(c);
            }
        }
        None => points.extend(hits.into_iter().map(|(p, _)| p)),
    }
    count
}

/// Appends every foot of the perpendicular from `point` onto `curve` to
/// `points`, and the matching parameters to `params` when given.
///
/// Returns the number of feet found.
pub fn foot_point<'a>(
    point: &Point2,
    curve: impl Into<SolverCurve<'a>>,
    points: &mut Vec<Point2>,
    params: Option<&mut Vec<CurveParam>>,
) -> usize {
    let hits = FootPoint::new(*point).execute(curve.into());
    write_out(hits, points, params)
}

/// Appends every point of `curve` whose tangent line passes through `point`.
///
/// Returns the number of tangency points found.
pub fn tangency_point<'a>(
    point: &Point2,
    curve: impl Into<SolverCurve<'a>>,
    points: &mut Vec<Point2>,
    params: Option<&mut Vec<CurveParam>>,
) -> usize {
    let hits = TangencyPoint::new(*point).execute(curve.into());
    write_out(hits, points, params)
}
