use tracing::debug;

use crate::geometry::{BSpline, Bezier, Polyline};
use crate::math::EPSILON;

/// Re-expresses a quadratic or cubic Bézier chain as a clamped B-spline.
///
/// Every joint becomes an interior knot of multiplicity equal to the degree,
/// so the Bézier control points are the B-spline control points unchanged
/// and the segment `i` of `n` maps to the knot span `[i/n, (i+1)/n]`.
/// Returns `None` for other orders.
#[must_use]
pub fn bezier_to_bspline(bezier: &Bezier) -> Option<BSpline> {
    let p = bezier.order();
    if !(2..=3).contains(&p) {
        debug!(order = p, "only quadratic and cubic Béziers convert to B-splines");
        return None;
    }
    let n = bezier.segment_count();
    let mut knots = Vec::with_capacity(bezier.points().len() + p + 1);
    knots.resize(p + 1, 0.0);
    for i in 1..n {
        #[allow(clippy::cast_precision_loss)]
        let u = i as f64 / n as f64;
        knots.resize(knots.len() + p, u);
    }
    knots.resize(knots.len() + p + 1, 1.0);
    BSpline::new(bezier.points().to_vec(), knots, p == 3).ok()
}

/// Splits a clamped B-spline into Bézier segments, one per non-empty knot
/// span.
///
/// Each interior knot is raised to multiplicity equal to the degree by knot
/// insertion, after which the control polygon is a Bézier chain. Returns
/// `None` when the spline is not clamped with end multiplicity exactly
/// `degree + 1`, or when an interior knot already exceeds the degree.
#[must_use]
pub fn bspline_to_bezier(spline: &BSpline) -> Option<Bezier> {
    let p = spline.degree();
    let knots = spline.knots();
    let (first, last) = (knots[0], knots[knots.len() - 1]);
    if !spline.is_clamped()
        || spline.multiplicity(first) != p + 1
        || spline.multiplicity(last) != p + 1
    {
        debug!("B-spline is not clamped, cannot split into Béziers");
        return None;
    }

    let mut interior: Vec<f64> = Vec::new();
    for &u in &knots[p + 1..knots.len() - p - 1] {
        if interior.last().is_none_or(|&prev| u - prev > EPSILON) {
            interior.push(u);
        }
    }

    let mut refined = spline.clone();
    for &u in &interior {
        let m = refined.multiplicity(u);
        if m > p {
            debug!(u, multiplicity = m, "interior knot exceeds the degree");
            return None;
        }
        for _ in m..p {
            refined = refined.insert_knot(u);
        }
    }
    Bezier::new(p, refined.controls().to_vec()).ok()
}

/// Flattens a Bézier chain through its cached shape polyline.
#[must_use]
pub fn bezier_to_polyline(bezier: &Bezier) -> Polyline {
    Polyline::new(bezier.shape().to_vec())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Curve;
    use crate::math::Point2;
    use proptest::prelude::*;

    fn two_cubics() -> Bezier {
        Bezier::new(
            3,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 2.0),
                Point2::new(3.0, 2.0),
                Point2::new(4.0, 0.0),
                Point2::new(5.0, -2.0),
                Point2::new(7.0, -1.0),
                Point2::new(8.0, 1.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn bezier_knots_repeat_per_joint() {
        let s = bezier_to_bspline(&two_cubics()).unwrap();
        assert!(s.is_cubic());
        assert_eq!(s.knots(), &[0.0, 0.0, 0.0, 0.0, 0.5, 0.5, 0.5, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(s.controls().len(), 7);
    }

    #[test]
    fn bspline_matches_bezier_shape() {
        let b = two_cubics();
        let s = bezier_to_bspline(&b).unwrap();
        for i in 0..=10 {
            let t = f64::from(i) / 10.0;
            let on_first = b.point_at(0, t).unwrap();
            let on_second = b.point_at(1, t).unwrap();
            assert!((s.point_at(0.5 * t) - on_first).norm() < 1e-12);
            assert!((s.point_at(0.5 + 0.5 * t) - on_second).norm() < 1e-12);
        }
    }

    #[test]
    fn linear_bezier_is_rejected() {
        let b = Bezier::new(1, vec![Point2::origin(), Point2::new(1.0, 1.0)]).unwrap();
        assert!(bezier_to_bspline(&b).is_none());
    }

    #[test]
    fn uniform_bspline_splits_per_span() {
        let controls = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 3.0),
            Point2::new(3.0, 3.0),
            Point2::new(4.0, 0.0),
            Point2::new(6.0, -1.0),
            Point2::new(7.0, 2.0),
        ];
        let s = BSpline::clamped_uniform(controls, true).unwrap();
        let b = bspline_to_bezier(&s).unwrap();
        // Three spans: knots 1/3 and 2/3 are interior.
        assert_eq!(b.segment_count(), 3);
        assert_eq!(b.start(), Point2::new(0.0, 0.0));
        assert_eq!(b.end(), Point2::new(7.0, 2.0));
        for (k, seg) in b.segments().enumerate() {
            for i in 0..=8 {
                let t = f64::from(i) / 8.0;
                #[allow(clippy::cast_precision_loss)]
                let u = (k as f64 + t) / 3.0;
                assert!((seg.point_at(t) - s.point_at(u)).norm() < 1e-9);
            }
        }
    }

    #[test]
    fn unclamped_bspline_is_rejected() {
        let controls = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 0.0),
            Point2::new(3.0, 1.0),
        ];
        let knots = (0..8).map(f64::from).collect();
        let s = BSpline::new(controls, knots, true).unwrap();
        assert!(bspline_to_bezier(&s).is_none());
    }

    #[test]
    fn polyline_follows_shape() {
        let b = two_cubics();
        let line = bezier_to_polyline(&b);
        assert_eq!(line.points(), b.shape());
        assert_eq!(line.points()[0], b.start());
    }

    proptest! {
        #[test]
        fn bezier_round_trips_through_bspline(
            coords in prop::collection::vec(-10.0f64..10.0, 14),
            cubic in any::<bool>(),
        ) {
            let order = if cubic { 3 } else { 2 };
            // Seven points form whole segments at both orders.
            let points: Vec<Point2> = coords
                .chunks(2)
                .map(|c| Point2::new(c[0], c[1]))
                .collect();
            let b = Bezier::new(order, points).unwrap();
            let back = bspline_to_bezier(&bezier_to_bspline(&b).unwrap()).unwrap();
            prop_assert_eq!(back.order(), b.order());
            prop_assert_eq!(back.points().len(), b.points().len());
            for (p, q) in back.points().iter().zip(b.points()) {
                prop_assert!((p - q).norm() < 1e-12);
            }
        }
    }
}
