mod polygon;

use crate::geometry::{Arc, Circle, Curve, Ellipse, Shape, Triangle};
use crate::math::arc_2d::polar_angle;
use crate::math::distance_2d::{is_on_polyline, is_on_segment, side_of_line};
use crate::math::{Point2, EPSILON, TOLERANCE};
use crate::operations::solver::FootPoint;

use polygon::PolygonContainment;

/// Tests whether a point lies inside a shape.
///
/// `coincide` decides whether a point on the boundary counts as inside.
/// Open curves (segment, polyline, Bézier, B-spline) enclose nothing, so
/// only boundary contact can make them report `true`.
pub struct IsInside {
    point: Point2,
    coincide: bool,
    aabb_test: bool,
}

impl IsInside {
    /// Creates a new `IsInside` query.
    #[must_use]
    pub fn new(point: Point2, coincide: bool) -> Self {
        Self {
            point,
            coincide,
            aabb_test: true,
        }
    }

    /// Skips the bounding-box rejection for polygons, for callers that have
    /// already bounded the search.
    #[must_use]
    pub fn without_aabb_test(mut self) -> Self {
        self.aabb_test = false;
        self
    }

    /// Runs the test against `shape`.
    #[must_use]
    pub fn execute(&self, shape: &Shape) -> bool {
        let p = &self.point;
        match shape {
            Shape::Segment(s) => self.coincide && is_on_segment(p, &s.start, &s.end),
            Shape::Polyline(l) => self.coincide && is_on_polyline(p, l.points(), EPSILON),
            Shape::Polygon(poly) => {
                PolygonContainment::new(poly, self.aabb_test).contains(p, self.coincide)
            }
            Shape::Rect(r) => {
                if self.coincide {
                    r.contains(p)
                } else {
                    r.contains_strict(p)
                }
            }
            Shape::Triangle(t) => self.in_triangle(t),
            Shape::Circle(c) => self.in_circle(c),
            Shape::Ellipse(e) => self.in_ellipse(e),
            Shape::Arc(a) => self.in_arc(a),
            Shape::Bezier(_) | Shape::BSpline(_) => self.coincide && self.touches_spline(shape),
        }
    }

    /// Boundary contact with the exact curve: the point must coincide with
    /// one of its feet on the curve or with an end.
    fn touches_spline(&self, shape: &Shape) -> bool {
        let p = &self.point;
        if !shape
            .bounding_rect()
            .is_some_and(|r| r.inflated(TOLERANCE).contains(p))
        {
            return false;
        }
        let finder = FootPoint::new(*p);
        let (feet, ends) = match shape {
            Shape::Bezier(b) => (finder.on_bezier(b), [b.start(), b.end()]),
            Shape::BSpline(s) => {
                let dom = s.domain();
                (finder.on_bspline(s), [s.point_at(dom.t_min), s.point_at(dom.t_max)])
            }
            _ => return false,
        };
        feet.iter()
            .map(|(q, _)| q)
            .chain(ends.iter())
            .any(|q| (p - q).norm() <= TOLERANCE)
    }

    fn in_triangle(&self, t: &Triangle) -> bool {
        let p = &self.point;
        let edges = [(&t.a, &t.b), (&t.b, &t.c), (&t.c, &t.a)];
        if edges.iter().any(|(a, b)| is_on_segment(p, a, b)) {
            return self.coincide;
        }
        let sides = edges.map(|(a, b)| side_of_line(p, a, b));
        sides.iter().all(|&s| s > 0.0) || sides.iter().all(|&s| s < 0.0)
    }

    fn in_circle(&self, c: &Circle) -> bool {
        let d = (self.point - c.center()).norm() - c.radius();
        if d.abs() <= EPSILON * c.radius().max(1.0) {
            return self.coincide;
        }
        d < 0.0
    }

    /// Full ellipse, or the region bounded by an elliptical arc and its chord.
    fn in_ellipse(&self, e: &Ellipse) -> bool {
        let p = &self.point;
        let v = e.implicit_value(p);
        let on_curve = (v - 1.0).abs() <= TOLERANCE;
        let Some((t0, _)) = e.arc() else {
            if on_curve {
                return self.coincide;
            }
            return v < 1.0;
        };

        let (start, end) = (e.start(), e.end());
        if (on_curve && e.contains_param(e.param_of(p))) || is_on_segment(p, &start, &end) {
            return self.coincide;
        }
        if v >= 1.0 {
            return false;
        }
        let mid = e.point_at(t0 + 0.5 * e.sweep());
        on_arc_side(p, &start, &end, &mid)
    }

    /// Region bounded by the arc and its chord.
    fn in_arc(&self, a: &Arc) -> bool {
        let p = &self.point;
        let d = (p - a.center()).norm() - a.radius();
        let tol = EPSILON * a.radius().max(1.0);
        let (start, end) = (a.start(), a.end());
        if (d.abs() <= tol && a.contains_angle(polar_angle(a.center(), p)))
            || is_on_segment(p, &start, &end)
        {
            return self.coincide;
        }
        if d >= 0.0 {
            return false;
        }
        let mid = a.control_points()[1];
        if (end - start).norm() <= EPSILON {
            return true;
        }
        on_arc_side(p, &start, &end, &mid)
    }
}

/// Whether `p` is strictly on the same side of chord `start`-`end` as `mid`.
fn on_arc_side(p: &Point2, start: &Point2, end: &Point2, mid: &Point2) -> bool {
    let side = side_of_line(mid, start, end);
    let s = side_of_line(p, start, end);
    if side.abs() <= EPSILON {
        return false;
    }
    s * side > 0.0
}

/// Whether `point` lies inside `shape`; see [`IsInside`].
#[must_use]
pub fn is_inside(point: &Point2, shape: &Shape, coincide: bool) -> bool {
    IsInside::new(*point, coincide).execute(shape)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{AabbRect, BSpline, Bezier, Polygon, Polyline, Segment};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn square_polygon_cases() {
        let sq: Shape = Polygon::new(vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)]).into();
        assert!(is_inside(&p(2.0, 2.0), &sq, true));
        assert!(is_inside(&p(4.0, 2.0), &sq, true));
        assert!(!is_inside(&p(4.0, 2.0), &sq, false));
        assert!(!is_inside(&p(5.0, 2.0), &sq, true));
        assert!(!is_inside(&p(5.0, 2.0), &sq, false));
        assert!(IsInside::new(p(1.0, 1.0), false).without_aabb_test().execute(&sq));
    }

    #[test]
    fn empty_shapes_contain_nothing() {
        let empty: Shape = Polygon::new(vec![p(0.0, 0.0), p(1.0, 0.0)]).into();
        assert!(!is_inside(&p(0.5, 0.0), &empty, true));
        assert!(!is_inside(&p(0.0, 0.0), &Polyline::default().into(), true));
    }

    #[test]
    fn open_curves_only_touch() {
        let seg: Shape = Segment::new(p(0.0, 0.0), p(2.0, 2.0)).into();
        assert!(is_inside(&p(1.0, 1.0), &seg, true));
        assert!(!is_inside(&p(1.0, 1.0), &seg, false));
        assert!(!is_inside(&p(1.0, 1.5), &seg, true));

        let line: Shape = Polyline::new(vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0)]).into();
        assert!(is_inside(&p(2.0, 1.0), &line, true));
        assert!(!is_inside(&p(1.0, 1.0), &line, true));
    }

    #[test]
    fn rect_boundary() {
        let r: Shape = AabbRect::new(p(0.0, 0.0), p(2.0, 1.0)).into();
        assert!(is_inside(&p(2.0, 0.5), &r, true));
        assert!(!is_inside(&p(2.0, 0.5), &r, false));
        assert!(is_inside(&p(1.0, 0.5), &r, false));
    }

    #[test]
    fn triangle_either_orientation() {
        let ccw: Shape = Triangle::new(p(0.0, 0.0), p(4.0, 0.0), p(0.0, 4.0)).unwrap().into();
        let cw: Shape = Triangle::new(p(0.0, 0.0), p(0.0, 4.0), p(4.0, 0.0)).unwrap().into();
        for t in [&ccw, &cw] {
            assert!(is_inside(&p(1.0, 1.0), t, false));
            assert!(!is_inside(&p(3.0, 3.0), t, true));
            assert!(is_inside(&p(2.0, 2.0), t, true));
            assert!(!is_inside(&p(2.0, 2.0), t, false));
        }
    }

    #[test]
    fn circle_boundary() {
        let c: Shape = Circle::new(p(1.0, 1.0), 2.0).unwrap().into();
        assert!(is_inside(&p(1.0, 1.0), &c, false));
        assert!(is_inside(&p(3.0, 1.0), &c, true));
        assert!(!is_inside(&p(3.0, 1.0), &c, false));
        assert!(!is_inside(&p(3.1, 1.0), &c, true));
    }

    #[test]
    fn full_and_arc_ellipse() {
        let e = Ellipse::new(p(0.0, 0.0), 2.0, 1.0, 0.0).unwrap();
        assert!(is_inside(&p(1.5, 0.0), &e.into(), false));
        assert!(is_inside(&p(2.0, 0.0), &e.into(), true));
        assert!(!is_inside(&p(2.0, 0.0), &e.into(), false));
        assert!(!is_inside(&p(0.0, 1.1), &e.into(), true));

        // Upper half: region between the arc and the major axis.
        let upper: Shape = e.with_arc(0.0, PI).into();
        assert!(is_inside(&p(0.5, 0.5), &upper, false));
        assert!(!is_inside(&p(0.5, -0.5), &upper, true));
        assert!(is_inside(&p(0.5, 0.0), &upper, true));
        assert!(!is_inside(&p(0.5, 0.0), &upper, false));
        assert!(is_inside(&p(0.0, 1.0), &upper, true));
    }

    #[test]
    fn major_arc_region() {
        // Three quarters of the unit circle, missing the first quadrant.
        let a: Shape = Arc::from_center(p(0.0, 0.0), 1.0, FRAC_PI_2, 0.0, false)
            .unwrap()
            .into();
        assert!(is_inside(&p(-0.5, -0.5), &a, false));
        assert!(is_inside(&p(0.1, 0.1), &a, false));
        assert!(!is_inside(&p(0.6, 0.6), &a, true));
        assert!(is_inside(&p(0.5, 0.5), &a, true));
        assert!(is_inside(&p(-1.0, 0.0), &a, true));
    }

    #[test]
    fn bezier_touch_only() {
        let b = Bezier::new(1, vec![p(0.0, 0.0), p(2.0, 0.0)]).unwrap();
        let shape: Shape = b.into();
        assert!(is_inside(&p(1.0, 0.0), &shape, true));
        assert!(!is_inside(&p(1.0, 0.0), &shape, false));
        assert!(!is_inside(&p(1.0, 0.5), &shape, true));
    }

    #[test]
    fn points_on_curved_bezier_touch() {
        let b = Bezier::new(3, vec![p(0.0, 0.0), p(1.0, 2.0), p(3.0, 2.0), p(4.0, 0.0)]).unwrap();
        let seg = b.segment(0).unwrap();
        let shape: Shape = b.clone().into();
        for i in 0..40 {
            let on = seg.point_at((f64::from(i) + 0.5) / 40.0);
            assert!(is_inside(&on, &shape, true), "{on}");
            assert!(!is_inside(&on, &shape, false));
        }
        assert!(is_inside(&p(4.0, 0.0), &shape, true));
        // Just off the arch, and below it inside the control hull.
        let top = seg.point_at(0.5);
        assert!(!is_inside(&p(top.x, top.y - 1e-6), &shape, true));
        assert!(!is_inside(&p(2.0, 0.5), &shape, true));
    }

    #[test]
    fn points_on_bspline_touch() {
        let controls = vec![p(0.0, 0.0), p(1.0, 3.0), p(3.0, 3.0), p(4.0, 0.0), p(6.0, -1.0)];
        let s = BSpline::clamped_uniform(controls, true).unwrap();
        let shape: Shape = s.clone().into();
        for u in [0.0, 0.137, 0.5, 0.81, 1.0] {
            assert!(is_inside(&s.point_at(u), &shape, true), "{u}");
        }
        assert!(!is_inside(&p(2.0, 1.0), &shape, true));
    }
}
