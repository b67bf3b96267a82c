use crate::math::{Point2, Vector2};

use super::{Curve, CurveDomain};

/// A straight line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2,
    pub end: Point2,
}

impl Segment {
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    #[must_use]
    pub fn direction(&self) -> Vector2 {
        self.end - self.start
    }
}

impl Curve for Segment {
    fn point_at(&self, t: f64) -> Point2 {
        self.start + self.direction() * t
    }

    fn tangent_at(&self, _t: f64) -> Vector2 {
        self.direction()
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }

    fn is_closed(&self) -> bool {
        false
    }
}
