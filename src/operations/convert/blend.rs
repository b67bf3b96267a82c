use tracing::debug;

use crate::geometry::Bezier;
use crate::math::intersect_2d::line_line_intersect_2d;
use crate::math::{approx_eq, try_unit, Point2, TOLERANCE};

/// Smooth cubic transition from `p0` to `p1` that continues the incoming
/// direction `before0 -> p0` and leaves along `p1 -> after1`.
///
/// When the two tangent lines meet ahead of `p0` and behind `p1`, the cubic
/// is the degree elevation of the quadratic through their intersection.
/// Otherwise both handles are a third of the gap between `p0` and `p1`.
/// Returns `None` if adjacent points coincide.
#[must_use]
pub fn blend(before0: &Point2, p0: &Point2, p1: &Point2, after1: &Point2) -> Option<Bezier> {
    if approx_eq(p0, p1, TOLERANCE) {
        debug!("blend endpoints coincide");
        return None;
    }
    let d0 = try_unit(&(p0 - before0))?;
    let d1 = try_unit(&(after1 - p1))?;

    let (h0, h1) = match line_line_intersect_2d(p0, &d0, p1, &(-d1)) {
        Some((s, u)) if s > 0.0 && u > 0.0 => (s * 2.0 / 3.0, u * 2.0 / 3.0),
        _ => {
            let third = (p1 - p0).norm() / 3.0;
            (third, third)
        }
    };
    Some(Bezier::from_segments(
        3,
        vec![*p0, p0 + d0 * h0, p1 - d1 * h1, *p1],
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn meets_at_tangent_intersection() {
        let b = blend(
            &Point2::new(-1.0, 0.0),
            &Point2::origin(),
            &Point2::new(2.0, 2.0),
            &Point2::new(2.0, 3.0),
        )
        .unwrap();
        let pts = b.points();
        assert!((pts[1] - Point2::new(4.0 / 3.0, 0.0)).norm() < 1e-12);
        assert!((pts[2] - Point2::new(2.0, 2.0 / 3.0)).norm() < 1e-12);
        assert_eq!(pts[0], Point2::origin());
        assert_eq!(pts[3], Point2::new(2.0, 2.0));
    }

    #[test]
    fn parallel_directions_use_thirds() {
        let b = blend(
            &Point2::new(-1.0, 0.0),
            &Point2::origin(),
            &Point2::new(3.0, 1.0),
            &Point2::new(4.0, 1.0),
        )
        .unwrap();
        let third = 10f64.sqrt() / 3.0;
        let pts = b.points();
        assert!((pts[1] - Point2::new(third, 0.0)).norm() < 1e-12);
        assert!((pts[2] - Point2::new(3.0 - third, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn tangents_match_neighbours() {
        let b = blend(
            &Point2::new(0.0, -2.0),
            &Point2::new(1.0, 0.0),
            &Point2::new(5.0, 1.0),
            &Point2::new(7.0, 0.0),
        )
        .unwrap();
        let start = b.tangent_at(0, 0.0).unwrap().normalize();
        let end = b.tangent_at(0, 1.0).unwrap().normalize();
        assert!((start - Point2::new(1.0, 2.0).coords.normalize()).norm() < 1e-12);
        assert!((end - Point2::new(2.0, -1.0).coords.normalize()).norm() < 1e-12);
    }

    #[test]
    fn degenerate_neighbours_fail() {
        let p0 = Point2::origin();
        let p1 = Point2::new(1.0, 1.0);
        assert!(blend(&p0, &p0, &p1, &Point2::new(2.0, 1.0)).is_none());
        assert!(blend(&Point2::new(-1.0, 0.0), &p0, &p1, &p1).is_none());
        assert!(blend(&Point2::new(-1.0, 0.0), &p0, &p0, &p1).is_none());
    }
}
