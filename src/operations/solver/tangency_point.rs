use crate::geometry::{Arc, BSpline, Bezier, Circle, Curve, Ellipse, Shape};
use crate::math::arc_2d::{normalize_angle, polar_angle};
use crate::math::distance_2d::side_of_line;
use crate::math::{Point2, EPSILON, TOLERANCE};

use super::bisection::{self, Mode, SCAN_STEP};
use super::{dedup_hits, CurveParam, SolverCurve};

/// Finds the points where a line through an external point touches a curve.
pub struct TangencyPoint {
    point: Point2,
}

impl TangencyPoint {
    /// Creates a new `TangencyPoint` query for the external `point`.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self { point }
    }

    #[must_use]
    pub fn execute(&self, curve: SolverCurve<'_>) -> Vec<(Point2, CurveParam)> {
        match curve {
            SolverCurve::Bezier(b) => self.on_bezier(b),
            SolverCurve::BSpline(s) => self.on_bspline(s),
            SolverCurve::Circle(c) => self.on_circle(c),
            SolverCurve::Ellipse(e) => self.on_ellipse(e),
        }
    }

    #[must_use]
    pub fn on_bezier(&self, bezier: &Bezier) -> Vec<(Point2, CurveParam)> {
        let mut hits = Vec::new();
        for (index, segment) in bezier.segments().enumerate() {
            for t in bisection::solve(&segment, &self.point, Mode::Tangency, SCAN_STEP) {
                hits.push((segment.point_at(t), CurveParam::new(index, t)));
            }
        }
        dedup_hits(hits)
    }

    #[must_use]
    pub fn on_bspline(&self, spline: &BSpline) -> Vec<(Point2, CurveParam)> {
        let hits = bisection::solve(spline, &self.point, Mode::Tangency, SCAN_STEP)
            .into_iter()
            .map(|u| (spline.point_at(u), CurveParam::new(0, u)))
            .collect();
        dedup_hits(hits)
    }

    /// Two touch points from outside, the point itself when it lies on the
    /// circle, none from inside.
    #[must_use]
    pub fn on_circle(&self, circle: &Circle) -> Vec<(Point2, CurveParam)> {
        circle_tangent_angles(&self.point, circle.center(), circle.radius())
            .into_iter()
            .map(|t| (circle.point_at(t), CurveParam::new(0, t)))
            .collect()
    }

    /// Solves `b x cos t + a y sin t = a b` in the ellipse frame.
    #[must_use]
    pub fn on_ellipse(&self, ellipse: &Ellipse) -> Vec<(Point2, CurveParam)> {
        let local = ellipse.to_local(&self.point);
        let (a, b) = (ellipse.a(), ellipse.b());
        let (u, v) = (b * local.x, a * local.y);
        let r = u.hypot(v);
        let ab = a * b;
        if r < ab * (1.0 - TOLERANCE) {
            return Vec::new();
        }
        let phi = v.atan2(u);
        let params = if r <= ab * (1.0 + TOLERANCE) {
            vec![phi]
        } else {
            let delta = (ab / r).acos();
            vec![phi + delta, phi - delta]
        };
        params
            .into_iter()
            .map(normalize_angle)
            .filter(|&t| ellipse.contains_param(t))
            .map(|t| (ellipse.point_at(t), CurveParam::new(0, t)))
            .collect()
    }

    /// Circle tangency restricted to the arc; the parameter is the fraction
    /// of the sweep.
    #[must_use]
    pub fn on_arc(&self, arc: &Arc) -> Vec<(Point2, CurveParam)> {
        circle_tangent_angles(&self.point, arc.center(), arc.radius())
            .into_iter()
            .filter(|&angle| arc.contains_angle(angle))
            .map(|angle| {
                let delta = if arc.is_cw() {
                    normalize_angle(arc.start_angle() - angle)
                } else {
                    normalize_angle(angle - arc.start_angle())
                };
                let t = (delta / arc.sweep()).min(1.0);
                (arc.point_at(t), CurveParam::new(0, t))
            })
            .collect()
    }

    /// Dispatches on any shape.
    ///
    /// For shapes made of straight edges the touch points are the vertices
    /// whose neighbours both stay on one side of the line from the query
    /// point; the parameter's segment is the vertex index.
    #[must_use]
    pub fn on_shape(&self, shape: &Shape) -> Vec<(Point2, CurveParam)> {
        match shape {
            Shape::Bezier(b) => self.on_bezier(b),
            Shape::BSpline(s) => self.on_bspline(s),
            Shape::Circle(c) => self.on_circle(c),
            Shape::Ellipse(e) => self.on_ellipse(e),
            Shape::Arc(a) => self.on_arc(a),
            Shape::Segment(s) => self.support_vertices(&[s.start, s.end], false),
            Shape::Polyline(l) => self.support_vertices(l.points(), false),
            Shape::Polygon(p) => self.support_vertices(p.vertices(), true),
            Shape::Triangle(t) => self.support_vertices(&[t.a, t.b, t.c], true),
            Shape::Rect(r) => self.support_vertices(&r.corners(), true),
        }
    }

    fn support_vertices(&self, points: &[Point2], closed: bool) -> Vec<(Point2, CurveParam)> {
        let n = points.len();
        let mut hits = Vec::new();
        for (i, v) in points.iter().enumerate() {
            if (v - self.point).norm() <= EPSILON {
                continue;
            }
            let prev = if i > 0 {
                Some(points[i - 1])
            } else if closed {
                Some(points[n - 1])
            } else {
                None
            };
            let next = if i + 1 < n {
                Some(points[i + 1])
            } else if closed {
                Some(points[0])
            } else {
                None
            };
            let sides: Vec<f64> = prev
                .iter()
                .chain(next.iter())
                .map(|q| side_of_line(q, &self.point, v))
                .collect();
            let touches = sides.iter().all(|&s| s >= -EPSILON) || sides.iter().all(|&s| s <= EPSILON);
            if !sides.is_empty() && touches {
                hits.push((*v, CurveParam::new(i, 0.0)));
            }
        }
        hits
    }
}

/// Polar angles of the touch points on a circle seen from `point`.
fn circle_tangent_angles(point: &Point2, center: &Point2, radius: f64) -> Vec<f64> {
    let d = (point - center).norm();
    if d < radius * (1.0 - TOLERANCE) {
        return Vec::new();
    }
    let phi = polar_angle(center, point);
    if d <= radius * (1.0 + TOLERANCE) {
        return vec![phi];
    }
    let delta = (radius / d).acos();
    vec![normalize_angle(phi + delta), normalize_angle(phi - delta)]
}
