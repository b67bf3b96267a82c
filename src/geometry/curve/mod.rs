mod arc;
mod bezier;
mod bspline;
mod circle;
mod ellipse;
mod segment;

pub use arc::Arc;
pub use bezier::{Bezier, BezierSegment};
pub use bspline::BSpline;
pub use circle::Circle;
pub use ellipse::Ellipse;
pub use segment::Segment;

use crate::math::{Point2, Vector2};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// Width of the parameter range.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.t_max - self.t_min
    }
}

/// Trait for parametric curves in the plane.
pub trait Curve {
    /// Evaluates the curve at parameter `t`.
    fn point_at(&self, t: f64) -> Point2;

    /// Derivative direction at parameter `t` (not normalized; may be zero
    /// at degenerate control configurations).
    fn tangent_at(&self, t: f64) -> Vector2;

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Returns whether the curve is closed.
    fn is_closed(&self) -> bool;
}
