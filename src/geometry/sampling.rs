use std::sync::OnceLock;

use crate::math::Point2;

/// Parameters controlling how curves are flattened into polylines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    /// Parametric step per curve segment (Bézier) or per knot domain (B-spline).
    pub step: f64,
    /// Down-sampling tolerance applied to the flattened points; `0` disables it.
    pub down_sampling: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            step: 0.01,
            down_sampling: 0.0,
        }
    }
}

impl SamplingParams {
    /// Number of sampling intervals needed to cover a parameter span of `width`.
    #[must_use]
    pub fn intervals(&self, width: f64) -> usize {
        if self.step.is_nan() || self.step <= 0.0 || width.is_nan() || width <= 0.0 {
            return 1;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let n = (width / self.step).ceil() as usize;
        n.max(1)
    }
}

/// Lazily computed polyline approximation of a curve.
///
/// Owners must call [`ShapeCache::invalidate`] whenever the inputs of the
/// approximation (control points or sampling parameters) change.
#[derive(Debug, Clone, Default)]
pub struct ShapeCache {
    cell: OnceLock<Vec<Point2>>,
}

impl ShapeCache {
    /// Returns the cached points, computing them with `compute` if stale.
    pub fn get_or_compute<F>(&self, compute: F) -> &[Point2]
    where
        F: FnOnce() -> Vec<Point2>,
    {
        self.cell.get_or_init(compute)
    }

    /// Marks the cached points as stale.
    pub fn invalidate(&mut self) {
        self.cell = OnceLock::new();
    }

    /// Whether a computed approximation is currently held.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.cell.get().is_some()
    }
}
