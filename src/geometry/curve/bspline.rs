use crate::error::{GeometryError, Result};
use crate::geometry::sampling::{SamplingParams, ShapeCache};
use crate::math::simplify::down_sample;
use crate::math::{Point2, Vector2, EPSILON};

use super::{Curve, CurveDomain};

/// A non-rational B-spline of degree 2 or 3.
///
/// Invariant: `knots.len() == controls.len() + degree + 1` and the knot
/// vector is non-decreasing. The valid parameter range is
/// `[knots[degree], knots[controls.len()]]`.
#[derive(Debug, Clone)]
pub struct BSpline {
    controls: Vec<Point2>,
    knots: Vec<f64>,
    is_cubic: bool,
    sampling: SamplingParams,
    shape: ShapeCache,
}

impl BSpline {
    /// Creates a B-spline from control points and knots.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidKnots` if the knot count does not match,
    /// and `GeometryError::Degenerate` for too few control points, decreasing
    /// knots, or an empty parameter range.
    pub fn new(controls: Vec<Point2>, knots: Vec<f64>, is_cubic: bool) -> Result<Self> {
        let degree = if is_cubic { 3 } else { 2 };
        if controls.len() < degree + 1 {
            return Err(GeometryError::Degenerate(format!(
                "a degree {degree} B-spline needs at least {} control points",
                degree + 1
            ))
            .into());
        }
        let expected = controls.len() + degree + 1;
        if knots.len() != expected {
            return Err(GeometryError::InvalidKnots {
                expected,
                actual: knots.len(),
            }
            .into());
        }
        if knots.windows(2).any(|w| w[1] < w[0] || w[0].is_nan()) {
            return Err(GeometryError::Degenerate("knot vector must be non-decreasing".into()).into());
        }
        if knots[controls.len()] - knots[degree] <= 0.0 {
            return Err(GeometryError::Degenerate("B-spline parameter range is empty".into()).into());
        }
        Ok(Self {
            controls,
            knots,
            is_cubic,
            sampling: SamplingParams::default(),
            shape: ShapeCache::default(),
        })
    }

    /// Clamped B-spline with uniformly spaced interior knots over `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if there are too few control points for the degree.
    pub fn clamped_uniform(controls: Vec<Point2>, is_cubic: bool) -> Result<Self> {
        let degree = if is_cubic { 3 } else { 2 };
        let n = controls.len();
        if n < degree + 1 {
            return Self::new(controls, Vec::new(), is_cubic);
        }
        let spans = n - degree;
        let mut knots = vec![0.0; degree + 1];
        for i in 1..spans {
            #[allow(clippy::cast_precision_loss)]
            knots.push(i as f64 / spans as f64);
        }
        knots.resize(knots.len() + degree + 1, 1.0);
        Self::new(controls, knots, is_cubic)
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        if self.is_cubic {
            3
        } else {
            2
        }
    }

    #[must_use]
    pub fn is_cubic(&self) -> bool {
        self.is_cubic
    }

    #[must_use]
    pub fn controls(&self) -> &[Point2] {
        &self.controls
    }

    #[must_use]
    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    /// Whether the first and last `degree + 1` knots are repeated, so the
    /// curve interpolates its first and last control points.
    #[must_use]
    pub fn is_clamped(&self) -> bool {
        let p = self.degree();
        let k = &self.knots;
        let n = k.len();
        k[..=p].iter().all(|&u| (u - k[0]).abs() <= EPSILON)
            && k[n - p - 1..].iter().all(|&u| (u - k[n - 1]).abs() <= EPSILON)
    }

    /// Multiplicity of the knot value `u` (within `EPSILON`).
    #[must_use]
    pub fn multiplicity(&self, u: f64) -> usize {
        self.knots.iter().filter(|&&k| (k - u).abs() <= EPSILON).count()
    }

    /// Index `k` of the non-empty knot span with `knots[k] <= u < knots[k + 1]`,
    /// clamped to the valid range so the domain end maps to the last span.
    fn find_span(&self, u: f64) -> usize {
        let p = self.degree();
        let n = self.controls.len();
        if u >= self.knots[n] {
            let mut k = n - 1;
            while k > p && self.knots[k] >= self.knots[n] {
                k -= 1;
            }
            return k;
        }
        let mut k = p;
        while k < n - 1 && self.knots[k + 1] <= u {
            k += 1;
        }
        k
    }

    /// de Boor recursion on span `k`, stopping after `levels` steps.
    fn de_boor(&self, k: usize, u: f64, levels: usize) -> Vec<Point2> {
        let p = self.degree();
        let mut d: Vec<Point2> = (0..=p).map(|j| self.controls[j + k - p]).collect();
        for r in 1..=levels {
            for j in (r..=p).rev() {
                let i = j + k - p;
                let denom = self.knots[i + p + 1 - r] - self.knots[i];
                let alpha = if denom.abs() < EPSILON {
                    0.0
                } else {
                    (u - self.knots[i]) / denom
                };
                d[j] = d[j - 1] + (d[j] - d[j - 1]) * alpha;
            }
        }
        d
    }

    /// Returns a copy with `u` inserted once into the knot vector (Boehm).
    ///
    /// The curve shape is unchanged; one control point is added.
    #[must_use]
    pub fn insert_knot(&self, u: f64) -> Self {
        let p = self.degree();
        let k = self.find_span(u);
        let n = self.controls.len();

        let mut controls = Vec::with_capacity(n + 1);
        for i in 0..=n {
            let q = if i + p <= k {
                self.controls[i]
            } else if i > k {
                self.controls[i - 1]
            } else {
                let denom = self.knots[i + p] - self.knots[i];
                let a = if denom.abs() < EPSILON {
                    0.0
                } else {
                    (u - self.knots[i]) / denom
                };
                self.controls[i - 1] + (self.controls[i] - self.controls[i - 1]) * a
            };
            controls.push(q);
        }

        let mut knots = self.knots.clone();
        knots.insert(k + 1, u);

        Self {
            controls,
            knots,
            is_cubic: self.is_cubic,
            sampling: self.sampling,
            shape: ShapeCache::default(),
        }
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
    pub fn set_control(&mut self, index: usize, point: Point2) -> bool {
        match self.controls.get_mut(index) {
            Some(p) => {
                *p = point;
                self.shape.invalidate();
                true
            }
            None => false,
        }
    }

    /// Whether the cached polyline is up to date.
    #[must_use]
    pub fn is_shape_valid(&self) -> bool {
        self.shape.is_valid()
    }

    /// Polyline approximation over the whole domain, computed on first use.
    ///
    /// The sampling step is applied to the domain normalized to unit width.
    #[must_use]
    pub fn shape(&self) -> &[Point2] {
        self.shape.get_or_compute(|| {
            let dom = self.domain();
            let n = self.sampling.intervals(1.0);
            let pts: Vec<Point2> = (0..=n)
                .map(|i| {
                    #[allow(clippy::cast_precision_loss)]
                    let u = dom.t_min + dom.width() * (i as f64 / n as f64);
                    self.point_at(u)
                })
                .collect();
            down_sample(&pts, self.sampling.down_sampling)
        })
    }
}

impl Curve for BSpline {
    fn point_at(&self, u: f64) -> Point2 {
        let dom = self.domain();
        let u = u.clamp(dom.t_min, dom.t_max);
        let k = self.find_span(u);
        self.de_boor(k, u, self.degree())[self.degree()]
    }

    /// `p / (knots[k+1] - knots[k])` times the difference of the two points
    /// left before the last de Boor step.
    fn tangent_at(&self, u: f64) -> Vector2 {
        let dom = self.domain();
        let u = u.clamp(dom.t_min, dom.t_max);
        let p = self.degree();
        let k = self.find_span(u);
        let d = self.de_boor(k, u, p - 1);
        let span = self.knots[k + 1] - self.knots[k];
        if span.abs() < EPSILON {
            return Vector2::zeros();
        }
        #[allow(clippy::cast_precision_loss)]
        let scale = p as f64 / span;
        (d[p] - d[p - 1]) * scale
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(self.knots[self.degree()], self.knots[self.controls.len()])
    }

    fn is_closed(&self) -> bool {
        (self.point_at(self.domain().t_min) - self.point_at(self.domain().t_max)).norm() <= EPSILON
    }
}
