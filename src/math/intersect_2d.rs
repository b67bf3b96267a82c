use super::{cross, Point2, Vector2, EPSILON, TOLERANCE};

/// Parametric 2D line-line intersection.
///
/// Given lines `p1 + t * d1` and `p2 + u * d2`, returns `(t, u)` if not parallel.
#[must_use]
pub fn line_line_intersect_2d(
    p1: &Point2,
    d1: &Vector2,
    p2: &Point2,
    d2: &Vector2,
) -> Option<(f64, f64)> {
    let denom = cross(d1, d2);
    if denom.abs() < TOLERANCE * d1.norm() * d2.norm() {
        return None;
    }
    let dp = p2 - p1;
    let t = cross(&dp, d2) / denom;
    let u = cross(&dp, d1) / denom;
    Some((t, u))
}

/// Crossing of the horizontal line `y = y0` with the segment `a`-`b`.
///
/// Returns the crossing x, or `None` when the segment does not reach the
/// line or lies on it. Endpoints on the line report their own x exactly.
#[must_use]
pub fn horizontal_crossing(y0: f64, a: &Point2, b: &Point2) -> Option<f64> {
    let a_on = (a.y - y0).abs() <= EPSILON;
    let b_on = (b.y - y0).abs() <= EPSILON;
    match (a_on, b_on) {
        (true, true) => None,
        (true, false) => Some(a.x),
        (false, true) => Some(b.x),
        (false, false) => {
            if (a.y < y0) == (b.y < y0) {
                return None;
            }
            Some(a.x + (y0 - a.y) * (b.x - a.x) / (b.y - a.y))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn line_line_perpendicular() {
        let p1 = Point2::new(0.0, 0.0);
        let d1 = Vector2::new(1.0, 0.0);
        let p2 = Point2::new(0.5, -1.0);
        let d2 = Vector2::new(0.0, 1.0);
        let (t, u) = line_line_intersect_2d(&p1, &d1, &p2, &d2).unwrap();
        assert!((t - 0.5).abs() < TOLERANCE);
        assert!((u - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn line_line_parallel_returns_none() {
        let d = Vector2::new(1.0, 0.0);
        assert!(line_line_intersect_2d(&Point2::origin(), &d, &Point2::new(0.0, 1.0), &d).is_none());
    }

    #[test]
    fn horizontal_crossing_cases() {
        let x = horizontal_crossing(1.0, &Point2::new(0.0, 0.0), &Point2::new(2.0, 2.0));
        assert_eq!(x, Some(1.0));
        // Endpoint on the line reports the endpoint exactly.
        let x = horizontal_crossing(2.0, &Point2::new(0.0, 0.0), &Point2::new(3.0, 2.0));
        assert_eq!(x, Some(3.0));
        // Collinear and missing segments.
        assert!(horizontal_crossing(0.0, &Point2::new(0.0, 0.0), &Point2::new(3.0, 0.0)).is_none());
        assert!(horizontal_crossing(5.0, &Point2::new(0.0, 0.0), &Point2::new(3.0, 2.0)).is_none());
    }
}
