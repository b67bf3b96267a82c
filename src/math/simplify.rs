use super::distance_2d::point_to_segment_dist;
use super::Point2;

/// Down-samples an open point chain with the Ramer-Douglas-Peucker algorithm.
///
/// Both endpoints are always kept. A non-positive `tolerance` disables
/// down-sampling and returns the input unchanged.
#[must_use]
pub fn down_sample(points: &[Point2], tolerance: f64) -> Vec<Point2> {
    if tolerance <= 0.0 || points.len() <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;
    rdp_mark(points, tolerance, 0, points.len() - 1, &mut keep);

    points
        .iter()
        .zip(&keep)
        .filter_map(|(p, &k)| k.then_some(*p))
        .collect()
}

/// Down-samples a closed ring of points (no repeated closing point).
///
/// The ring is split at the vertex farthest from the first one so that the
/// two halves are simplified independently; at least three vertices survive.
#[must_use]
pub fn down_sample_closed(points: &[Point2], tolerance: f64) -> Vec<Point2> {
    if tolerance <= 0.0 || points.len() <= 3 {
        return points.to_vec();
    }

    let first = points[0];
    let far = points
        .iter()
        .enumerate()
        .skip(1)
        .max_by(|(_, a), (_, b)| (*a - first).norm().total_cmp(&(*b - first).norm()))
        .map_or(points.len() / 2, |(i, _)| i);

    let mut front = down_sample(&points[..=far], tolerance);
    let mut back_chain = points[far..].to_vec();
    back_chain.push(first);
    let back = down_sample(&back_chain, tolerance);

    // Drop the shared split vertex and the closing repeat of `first`.
    front.extend_from_slice(&back[1..back.len() - 1]);
    if front.len() < 3 {
        return points.to_vec();
    }
    front
}

fn rdp_mark(points: &[Point2], tolerance: f64, start: usize, end: usize, keep: &mut [bool]) {
    if end <= start + 1 {
        return;
    }

    let mut max_idx = start;
    let mut max_distance = -1.0;
    for (i, p) in points.iter().enumerate().take(end).skip(start + 1) {
        let d = point_to_segment_dist(p, &points[start], &points[end]);
        if d > max_distance {
            max_distance = d;
            max_idx = i;
        }
    }

    if max_distance > tolerance {
        keep[max_idx] = true;
        rdp_mark(points, tolerance, start, max_idx, keep);
        rdp_mark(points, tolerance, max_idx, end, keep);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn collinear_points_collapse() {
        let pts: Vec<Point2> = (0..10).map(|i| Point2::new(f64::from(i), 0.0)).collect();
        let out = down_sample(&pts, 1e-6);
        assert_eq!(out, vec![pts[0], pts[9]]);
    }

    #[test]
    fn corner_is_kept() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(2.0, 2.0),
        ];
        let out = down_sample(&pts, 0.01);
        assert_eq!(out.len(), 3);
        assert_eq!(out[1], Point2::new(2.0, 0.0));
    }

    #[test]
    fn zero_tolerance_is_identity() {
        let pts = vec![Point2::new(0.0, 0.0), Point2::new(0.5, 0.1), Point2::new(1.0, 0.0)];
        assert_eq!(down_sample(&pts, 0.0), pts);
    }

    #[test]
    fn closed_square_with_midpoints() {
        let pts = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 1.0),
            Point2::new(2.0, 2.0),
            Point2::new(1.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(0.0, 1.0),
        ];
        let out = down_sample_closed(&pts, 1e-6);
        assert_eq!(out.len(), 4, "out={out:?}");
    }
}
