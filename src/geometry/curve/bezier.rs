use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::sampling::{SamplingParams, ShapeCache};
use crate::math::simplify::down_sample;
use crate::math::{Point2, Vector2};

use super::{Curve, CurveDomain};

/// A piecewise Bézier curve of arbitrary order.
///
/// Control points are stored flat, with adjacent segments sharing their
/// joining point: segment `i` uses `points[i * order ..= (i + 1) * order]`,
/// so a curve of `n` segments holds `order * n + 1` points.
///
/// The polyline approximation returned by [`Bezier::shape`] is cached and
/// invalidated by every mutator.
#[derive(Debug, Clone)]
pub struct Bezier {
    order: usize,
    points: Vec<Point2>,
    sampling: SamplingParams,
    shape: ShapeCache,
}

impl Bezier {
    /// Creates a Bézier curve of the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if `order` is zero or the number of points is not
    /// `order * n + 1` for some `n >= 1`.
    pub fn new(order: usize, points: Vec<Point2>) -> Result<Self> {
        if order == 0 {
            return Err(GeometryError::Degenerate("Bézier order must be at least 1".into()).into());
        }
        if points.len() < order + 1 || (points.len() - 1) % order != 0 {
            return Err(GeometryError::Degenerate(format!(
                "{} control points do not form whole segments of order {order}",
                points.len()
            ))
            .into());
        }
        Ok(Self {
            order,
            points,
            sampling: SamplingParams::default(),
            shape: ShapeCache::default(),
        })
    }

    /// Builds a curve from points that already form whole segments.
    pub(crate) fn from_segments(order: usize, points: Vec<Point2>) -> Self {
        debug_assert!(order >= 1 && points.len() > order && (points.len() - 1) % order == 0);
        Self {
            order,
            points,
            sampling: SamplingParams::default(),
            shape: ShapeCache::default(),
        }
    }

    #[must_use]
    pub fn order(&self) -> usize {
        self.order
    }

    /// All control points.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        (self.points.len() - 1) / self.order
    }

    /// The `index`-th segment as a borrowed view.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<BezierSegment<'_>> {
        let start = index * self.order;
        self.points
            .get(start..=start + self.order)
            .map(|points| BezierSegment { points })
    }

    /// Iterates over all segments.
    pub fn segments(&self) -> impl Iterator<Item = BezierSegment<'_>> {
        (0..self.segment_count()).filter_map(|i| self.segment(i))
    }

    /// Evaluates segment `index` at `t`.
    #[must_use]
    pub fn point_at(&self, index: usize, t: f64) -> Option<Point2> {
        self.segment(index).map(|s| s.point_at(t))
    }

    /// Derivative of segment `index` at `t`.
    #[must_use]
    pub fn tangent_at(&self, index: usize, t: f64) -> Option<Vector2> {
        self.segment(index).map(|s| s.tangent_at(t))
    }

    /// Splits the chain at parameter `t` of segment `index` into the part
    /// before and the part after that point.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a segment index past the end
    /// and `GeometryError::ParameterOutOfRange` if `t` is outside `[0, 1]`.
    pub fn split(&self, index: usize, t: f64) -> Result<(Bezier, Bezier)> {
        let segment = self.segment(index).ok_or_else(|| {
            OperationError::InvalidInput(format!(
                "segment {index} of a {}-segment Bézier",
                self.segment_count()
            ))
        })?;
        if !(0.0..=1.0).contains(&t) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "t",
                value: t,
                min: 0.0,
                max: 1.0,
            }
            .into());
        }
        let (head, tail) = segment.split(t);
        let start = index * self.order;
        let mut left = self.points[..start].to_vec();
        left.extend(head);
        let mut right = tail;
        right.extend_from_slice(&self.points[start + self.order + 1..]);

        let mut before = Self::from_segments(self.order, left);
        let mut after = Self::from_segments(self.order, right);
        before.sampling = self.sampling;
        after.sampling = self.sampling;
        Ok((before, after))
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        self.points[0]
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        self.points[self.points.len() - 1]
    }

    #[must_use]
    pub fn sampling(&self) -> SamplingParams {
        self.sampling
    }

    /// Changes the sampling parameters, invalidating the cached shape.
    pub fn set_sampling(&mut self, sampling: SamplingParams) {
        if self.sampling != sampling {
            self.sampling = sampling;
            self.shape.invalidate();
        }
    }

    /// Moves one control point, invalidating the cached shape.
    ///
    /// Returns `false` if `index` is out of range.
    pub fn set_point(&mut self, index: usize, point: Point2) -> bool {
        match self.points.get_mut(index) {
            Some(p) => {
                *p = point;
                self.shape.invalidate();
                true
            }
            None => false,
        }
    }

    /// Appends a segment continuing from the current end point.
    ///
    /// `points` holds the `order` new control points (the shared start is implied).
    ///
    /// # Errors
    ///
    /// Returns an error if `points.len() != order`.
    pub fn push_segment(&mut self, points: &[Point2]) -> Result<()> {
        if points.len() != self.order {
            return Err(GeometryError::Degenerate(format!(
                "expected {} control points for a new segment, got {}",
                self.order,
                points.len()
            ))
            .into());
        }
        self.points.extend_from_slice(points);
        self.shape.invalidate();
        Ok(())
    }

    /// Applies `f` to every control point, invalidating the cached shape.
    pub fn transform<F>(&mut self, f: F)
    where
        F: Fn(&Point2) -> Point2,
    {
        for p in &mut self.points {
            *p = f(p);
        }
        self.shape.invalidate();
    }

    /// Whether the cached polyline is up to date.
    #[must_use]
    pub fn is_shape_valid(&self) -> bool {
        self.shape.is_valid()
    }

    /// Polyline approximation of the whole curve, computed on first use.
    #[must_use]
    pub fn shape(&self) -> &[Point2] {
        self.shape.get_or_compute(|| self.flatten())
    }

    fn flatten(&self) -> Vec<Point2> {
        let n = self.sampling.intervals(1.0);
        let mut pts = Vec::with_capacity(self.segment_count() * n + 1);
        pts.push(self.start());
        for seg in self.segments() {
            for i in 1..n {
                #[allow(clippy::cast_precision_loss)]
                pts.push(seg.point_at(i as f64 / n as f64));
            }
            pts.push(seg.end());
        }
        down_sample(&pts, self.sampling.down_sampling)
    }
}

/// `a * (1 - t) + b * t`, exact at both ends.
fn lerp(a: &Point2, b: &Point2, t: f64) -> Point2 {
    Point2::from(a.coords * (1.0 - t) + b.coords * t)
}

/// A single Bézier segment borrowed from a [`Bezier`] (or any control slice).
#[derive(Debug, Clone, Copy)]
pub struct BezierSegment<'a> {
    points: &'a [Point2],
}

impl<'a> BezierSegment<'a> {
    /// Wraps a control-point slice (at least one point).
    #[must_use]
    pub fn from_points(points: &'a [Point2]) -> Option<Self> {
        (!points.is_empty()).then_some(Self { points })
    }

    #[must_use]
    pub fn points(&self) -> &'a [Point2] {
        self.points
    }

    #[must_use]
    pub fn order(&self) -> usize {
        self.points.len() - 1
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        self.points[0]
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        self.points[self.points.len() - 1]
    }

    /// Runs de Casteljau down to `levels_left + 1` points.
    fn reduce(&self, t: f64, levels_left: usize) -> Vec<Point2> {
        let mut level = self.points.to_vec();
        while level.len() > levels_left + 1 {
            for i in 0..level.len() - 1 {
                level[i] = lerp(&level[i], &level[i + 1], t);
            }
            level.pop();
        }
        level
    }

    /// Splits the segment at `t` into two segments of the same order.
    #[must_use]
    pub fn split(&self, t: f64) -> (Vec<Point2>, Vec<Point2>) {
        let n = self.points.len();
        let mut left = Vec::with_capacity(n);
        let mut right = Vec::with_capacity(n);
        let mut level = self.points.to_vec();
        left.push(level[0]);
        right.push(level[level.len() - 1]);
        while level.len() > 1 {
            for i in 0..level.len() - 1 {
                level[i] = lerp(&level[i], &level[i + 1], t);
            }
            level.pop();
            left.push(level[0]);
            right.push(level[level.len() - 1]);
        }
        right.reverse();
        (left, right)
    }
}

impl Curve for BezierSegment<'_> {
    fn point_at(&self, t: f64) -> Point2 {
        self.reduce(t, 0)[0]
    }

    /// Head/tail difference of the last de Casteljau level, scaled by the order.
    fn tangent_at(&self, t: f64) -> Vector2 {
        if self.points.len() < 2 {
            return Vector2::zeros();
        }
        let last = self.reduce(t, 1);
        #[allow(clippy::cast_precision_loss)]
        let d = (last[1] - last[0]) * self.order() as f64;
        if d.norm_squared() > 0.0 {
            return d;
        }
        // Coincident inner control points at an end: fall back to the chord.
        self.end() - self.start()
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }

    fn is_closed(&self) -> bool {
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn s_curve() -> Bezier {
        Bezier::new(
            3,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 2.0),
                Point2::new(3.0, 2.0),
                Point2::new(4.0, 0.0),
                Point2::new(5.0, -2.0),
                Point2::new(7.0, -2.0),
                Point2::new(8.0, 0.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_partial_segments() {
        assert!(Bezier::new(3, vec![Point2::origin(); 5]).is_err());
        assert!(Bezier::new(0, vec![Point2::origin(); 2]).is_err());
        assert!(Bezier::new(2, vec![Point2::origin(); 5]).is_ok());
    }

    #[test]
    fn segments_share_endpoints() {
        let b = s_curve();
        assert_eq!(b.segment_count(), 2);
        let s0 = b.segment(0).unwrap();
        let s1 = b.segment(1).unwrap();
        assert_eq!(s0.end(), s1.start());
        assert!(b.segment(2).is_none());
    }

    #[test]
    fn cubic_midpoint() {
        let b = s_curve();
        let p = b.point_at(0, 0.5).unwrap();
        assert_abs_diff_eq!(p.x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 1.5, epsilon = 1e-12);
    }

    #[test]
    fn tangent_at_ends_follows_control_polygon() {
        let b = s_curve();
        let t0 = b.tangent_at(0, 0.0).unwrap();
        assert_abs_diff_eq!(t0.x, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t0.y, 6.0, epsilon = 1e-12);
        let t1 = b.tangent_at(0, 1.0).unwrap();
        assert_abs_diff_eq!(t1.x, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t1.y, -6.0, epsilon = 1e-12);
    }

    #[test]
    fn split_preserves_curve() {
        let b = s_curve();
        let seg = b.segment(0).unwrap();
        let (left, right) = seg.split(0.3);
        let l = BezierSegment::from_points(&left).unwrap();
        let r = BezierSegment::from_points(&right).unwrap();
        assert!((l.end() - seg.point_at(0.3)).norm() < 1e-12);
        assert!((r.start() - seg.point_at(0.3)).norm() < 1e-12);
        for i in 0..=10 {
            let u = f64::from(i) / 10.0;
            assert!((l.point_at(u) - seg.point_at(0.3 * u)).norm() < 1e-12);
            assert!((r.point_at(u) - seg.point_at(0.3 + 0.7 * u)).norm() < 1e-12);
        }
    }

    #[test]
    fn chain_split_at_second_segment() {
        let b = s_curve();
        let (before, after) = b.split(1, 0.5).unwrap();
        assert_eq!(before.segment_count(), 2);
        assert_eq!(after.segment_count(), 1);
        let mid = b.point_at(1, 0.5).unwrap();
        assert!((before.end() - mid).norm() < 1e-12);
        assert_eq!(before.end(), after.start());
        assert_eq!(before.points()[..4], b.points()[..4]);
        assert_eq!(after.end(), b.end());

        assert!(matches!(
            b.split(2, 0.5),
            Err(crate::error::KernelError::Operation(_))
        ));
        assert!(matches!(
            b.split(0, 1.5),
            Err(crate::error::KernelError::Geometry(
                GeometryError::ParameterOutOfRange { .. }
            ))
        ));
    }

    #[test]
    fn quadratic_evaluation() {
        let b = Bezier::new(
            2,
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 2.0), Point2::new(2.0, 0.0)],
        )
        .unwrap();
        let p = b.point_at(0, 0.5).unwrap();
        assert_abs_diff_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn shape_cache_invalidation() {
        let mut b = s_curve();
        assert!(!b.is_shape_valid());
        let n = b.shape().len();
        assert_eq!(n, 2 * 100 + 1);
        assert!(b.is_shape_valid());

        assert!(b.set_point(3, Point2::new(4.0, 1.0)));
        assert!(!b.is_shape_valid());
        assert!((b.shape()[100] - Point2::new(4.0, 1.0)).norm() < 1e-12);

        b.set_sampling(SamplingParams {
            step: 0.25,
            down_sampling: 0.0,
        });
        assert!(!b.is_shape_valid());
        assert_eq!(b.shape().len(), 2 * 4 + 1);

        b.push_segment(&[Point2::new(9.0, 0.0), Point2::new(10.0, 0.0), Point2::new(11.0, 0.0)])
            .unwrap();
        assert!(!b.is_shape_valid());
        assert_eq!(b.shape().len(), 3 * 4 + 1);
    }

    #[test]
    fn down_sampled_shape_of_straight_curve() {
        let mut b = Bezier::new(
            3,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(3.0, 0.0),
            ],
        )
        .unwrap();
        b.set_sampling(SamplingParams {
            step: 0.01,
            down_sampling: 1e-9,
        });
        assert_eq!(b.shape().len(), 2);
    }

    #[test]
    fn transform_moves_all_points() {
        let mut b = s_curve();
        b.transform(|p| Point2::new(p.x + 1.0, p.y));
        assert_eq!(b.start(), Point2::new(1.0, 0.0));
        assert_eq!(b.end(), Point2::new(9.0, 0.0));
    }
}
