use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::arc_2d::arc_point_at;
use crate::math::{Point2, Vector2, TOLERANCE};

use super::{Curve, CurveDomain};

/// A full circle in the plane.
///
/// `P(t) = center + radius * (cos t, sin t)` over `[0, 2*pi)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Point2,
    radius: f64,
}

impl Circle {
    /// Creates a new circle.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive.
    pub fn new(center: Point2, radius: f64) -> Result<Self> {
        if radius.is_nan() || radius < TOLERANCE {
            return Err(
                GeometryError::Degenerate("circle radius must be positive".into()).into(),
            );
        }
        Ok(Self { center, radius })
    }

    /// Returns the center of the circle.
    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    /// Returns the radius of the circle.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Curve for Circle {
    fn point_at(&self, t: f64) -> Point2 {
        arc_point_at(&self.center, self.radius, t)
    }

    fn tangent_at(&self, t: f64) -> Vector2 {
        let (s, c) = t.sin_cos();
        Vector2::new(-self.radius * s, self.radius * c)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, TAU)
    }

    fn is_closed(&self) -> bool {
        true
    }
}
