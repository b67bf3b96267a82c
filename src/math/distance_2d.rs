use super::{cross, Point2, EPSILON};

/// Returns the closest point to `p` on the segment `a`-`b` and its
/// parameter in `[0, 1]`.
#[must_use]
pub fn closest_point_on_segment(p: &Point2, a: &Point2, b: &Point2) -> (Point2, f64) {
    let d = b - a;
    let len_sq = d.norm_squared();

    if len_sq < 1e-20 {
        // Degenerate segment (zero length).
        return (*a, 0.0);
    }

    // Project point onto the infinite line, clamp to [0, 1].
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    (a + d * t, t)
}

/// Returns the minimum distance from `p` to the line segment `a`-`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let (closest, _) = closest_point_on_segment(p, a, b);
    (p - closest).norm()
}

/// Returns `true` if `p` lies on the segment `a`-`b` within `EPSILON`.
#[must_use]
pub fn is_on_segment(p: &Point2, a: &Point2, b: &Point2) -> bool {
    point_to_segment_dist(p, a, b) <= EPSILON
}

/// Returns `true` if `p` lies on any segment of the open point chain.
#[must_use]
pub fn is_on_polyline(p: &Point2, points: &[Point2], tol: f64) -> bool {
    points
        .windows(2)
        .any(|w| point_to_segment_dist(p, &w[0], &w[1]) <= tol)
}

/// Signed side of `p` relative to the directed line `a -> b`.
///
/// Positive on the left, negative on the right, zero on the line.
#[must_use]
pub fn side_of_line(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    cross(&(b - a), &(p - a))
}
