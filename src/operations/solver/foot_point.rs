use crate::geometry::{BSpline, Bezier, Circle, Curve, Ellipse, Segment};
use crate::math::nonlinear::ellipse_foot_params;
use crate::math::{try_unit, Point2, TOLERANCE};

use super::bisection::{self, Mode, SCAN_STEP};
use super::{dedup_hits, CurveParam, SolverCurve};

/// Finds the feet of the perpendiculars from a point onto a curve.
///
/// A curve may have any number of feet; each is returned with its segment
/// index and local parameter.
pub struct FootPoint {
    point: Point2,
}

impl FootPoint {
    /// Creates a new `FootPoint` query for the external `point`.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self { point }
    }

    /// Dispatches on the curve kind.
    #[must_use]
    pub fn execute(&self, curve: SolverCurve<'_>) -> Vec<(Point2, CurveParam)> {
        match curve {
            SolverCurve::Bezier(b) => self.on_bezier(b),
            SolverCurve::BSpline(s) => self.on_bspline(s),
            SolverCurve::Circle(c) => self.on_circle(c),
            SolverCurve::Ellipse(e) => self.on_ellipse(e),
        }
    }

    /// Bisection over every segment of a Bézier curve.
    #[must_use]
    pub fn on_bezier(&self, bezier: &Bezier) -> Vec<(Point2, CurveParam)> {
        let mut hits = Vec::new();
        for (index, segment) in bezier.segments().enumerate() {
            for t in bisection::solve(&segment, &self.point, Mode::Foot, SCAN_STEP) {
                hits.push((segment.point_at(t), CurveParam::new(index, t)));
            }
        }
        dedup_hits(hits)
    }

    /// Bisection over the whole B-spline domain.
    #[must_use]
    pub fn on_bspline(&self, spline: &BSpline) -> Vec<(Point2, CurveParam)> {
        let hits = bisection::solve(spline, &self.point, Mode::Foot, SCAN_STEP)
            .into_iter()
            .map(|u| (spline.point_at(u), CurveParam::new(0, u)))
            .collect();
        dedup_hits(hits)
    }

    /// Nearest and farthest points of the circle along the line through its
    /// center. A point at the center has no defined foot.
    #[must_use]
    pub fn on_circle(&self, circle: &Circle) -> Vec<(Point2, CurveParam)> {
        let Some(dir) = try_unit(&(self.point - circle.center())) else {
            return Vec::new();
        };
        let near = dir.y.atan2(dir.x);
        [near, near + std::f64::consts::PI]
            .into_iter()
            .map(|angle| {
                let t = crate::math::arc_2d::normalize_angle(angle);
                (circle.point_at(t), CurveParam::new(0, t))
            })
            .collect()
    }

    /// Feet on an ellipse (or elliptical arc) from the one-variable foot
    /// equation in the ellipse frame.
    #[must_use]
    pub fn on_ellipse(&self, ellipse: &Ellipse) -> Vec<(Point2, CurveParam)> {
        let local = ellipse.to_local(&self.point);
        let (a, b) = (ellipse.a(), ellipse.b());
        let (ca, cb, cc) = (b * local.y, -a * local.x, a * a - b * b);
        // Center of a circle: every point is a foot.
        if ca.abs() + cb.abs() + cc.abs() < TOLERANCE {
            return Vec::new();
        }
        let hits = ellipse_foot_params(ca, cb, cc)
            .into_iter()
            .filter(|&t| ellipse.contains_param(t))
            .map(|t| (ellipse.point_at(t), CurveParam::new(0, t)))
            .collect();
        dedup_hits(hits)
    }

    /// Perpendicular projection onto a segment, if it falls within it.
    #[must_use]
    pub fn on_segment(&self, segment: &Segment) -> Option<(Point2, f64)> {
        let d = segment.direction();
        let len_sq = d.norm_squared();
        if len_sq < TOLERANCE * TOLERANCE {
            return None;
        }
        let t = (self.point - segment.start).dot(&d) / len_sq;
        (0.0..=1.0).contains(&t).then(|| (segment.point_at(t), t))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{cross, signed_angle, ANGLE_TOLERANCE};
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn assert_perpendicular(chord: crate::math::Vector2, tangent: crate::math::Vector2) {
        if chord.norm() < TOLERANCE {
            return;
        }
        let v = signed_angle(&tangent, &chord).abs();
        assert!((v - FRAC_PI_2).abs() < ANGLE_TOLERANCE, "angle {v}");
    }

    #[test]
    fn symmetric_arch_has_one_foot_on_axis() {
        let arch = Bezier::new(3, vec![p(0.0, 0.0), p(1.0, 2.0), p(3.0, 2.0), p(4.0, 0.0)]).unwrap();
        let feet = FootPoint::new(p(2.0, 5.0)).on_bezier(&arch);
        assert_eq!(feet.len(), 1);
        let (pt, param) = feet[0];
        assert!((pt - p(2.0, 1.5)).norm() < 1e-9);
        assert_eq!(param.segment, 0);
        assert!((param.t - 0.5).abs() < 1e-9);
    }

    #[test]
    fn joint_root_reported_once() {
        // Two mirrored arches meeting at (4, 0) with a horizontal joint tangent.
        let b = Bezier::new(
            3,
            vec![
                p(0.0, 0.0),
                p(1.0, -2.0),
                p(3.0, 0.0),
                p(4.0, 0.0),
                p(5.0, 0.0),
                p(7.0, -2.0),
                p(8.0, 0.0),
            ],
        )
        .unwrap();
        let feet = FootPoint::new(p(4.0, 3.0)).on_bezier(&b);
        let at_joint = feet.iter().filter(|(pt, _)| (pt - p(4.0, 0.0)).norm() < 1e-9).count();
        assert_eq!(at_joint, 1);
    }

    #[test]
    fn bspline_feet_are_perpendicular() {
        let s = BSpline::clamped_uniform(
            vec![p(0.0, 0.0), p(1.0, 3.0), p(3.0, 3.0), p(5.0, 0.0), p(6.0, 2.0)],
            true,
        )
        .unwrap();
        let target = p(2.5, 0.5);
        let feet = FootPoint::new(target).on_bspline(&s);
        assert!(!feet.is_empty());
        for (pt, param) in feet {
            assert_perpendicular(target - pt, s.tangent_at(param.t));
        }
    }

    #[test]
    fn circle_feet() {
        let c = Circle::new(p(1.0, 1.0), 2.0).unwrap();
        let feet = FootPoint::new(p(4.0, 1.0)).on_circle(&c);
        assert_eq!(feet.len(), 2);
        assert!((feet[0].0 - p(3.0, 1.0)).norm() < 1e-12);
        assert!((feet[1].0 - p(-1.0, 1.0)).norm() < 1e-12);
        assert!(FootPoint::new(p(1.0, 1.0)).on_circle(&c).is_empty());
    }

    #[test]
    fn ellipse_feet_from_inside() {
        let e = Ellipse::new(p(0.0, 0.0), 3.0, 1.0, 0.0).unwrap();
        // Off-center point on the major axis inside the evolute: four feet.
        let feet = FootPoint::new(p(0.5, 0.0)).on_ellipse(&e);
        assert_eq!(feet.len(), 4);
        for (pt, param) in &feet {
            assert!((e.implicit_value(pt) - 1.0).abs() < 1e-9);
            assert_perpendicular(p(0.5, 0.0) - pt, e.tangent_at(param.t));
        }
        let upper = e.with_arc(0.0, PI);
        let upper_feet = FootPoint::new(p(0.5, 0.0)).on_ellipse(&upper);
        assert!(upper_feet.iter().all(|(pt, _)| pt.y >= -1e-12));
        assert!(upper_feet.len() < feet.len());
    }

    #[test]
    fn segment_projection() {
        let s = Segment::new(p(0.0, 0.0), p(4.0, 0.0));
        let (pt, t) = FootPoint::new(p(1.0, 2.0)).on_segment(&s).unwrap();
        assert!((pt - p(1.0, 0.0)).norm() < 1e-15);
        assert!((t - 0.25).abs() < 1e-15);
        assert!(FootPoint::new(p(5.0, 2.0)).on_segment(&s).is_none());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn cubic_feet_are_perpendicular(
            ctrl in proptest::array::uniform8(-10.0f64..10.0),
            qx in -10.0f64..10.0,
            qy in -10.0f64..10.0,
        ) {
            let pts: Vec<Point2> = ctrl.chunks(2).map(|c| p(c[0], c[1])).collect();
            let b = Bezier::new(3, pts).unwrap();
            let seg = b.segment(0).unwrap();
            let q = p(qx, qy);
            for (pt, param) in FootPoint::new(q).on_bezier(&b) {
                let chord = q - pt;
                let tangent = seg.tangent_at(param.t);
                if chord.norm() >= TOLERANCE && tangent.norm() > 0.0 {
                    let sin = cross(&tangent, &chord).abs() / (tangent.norm() * chord.norm());
                    let cos = tangent.dot(&chord).abs() / (tangent.norm() * chord.norm());
                    prop_assert!(cos < ANGLE_TOLERANCE, "cos {} sin {}", cos, sin);
                }
            }
        }
    }
}
