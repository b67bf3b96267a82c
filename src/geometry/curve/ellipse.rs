use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::arc_2d::{angle_in_sweep, directed_sweep, normalize_angle};
use crate::math::{rotate_vec, Point2, Vector2, TOLERANCE};

use super::{Curve, CurveDomain};

/// An ellipse (or elliptical arc) in the plane.
///
/// `P(t) = center + R(angle) * (a cos t, b sin t)`, where `t` is the
/// eccentric anomaly. An arc sub-range runs counter-clockwise from
/// `arc_angle0` to `arc_angle1`, both in parameter space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    center: Point2,
    a: f64,
    b: f64,
    angle: f64,
    arc: Option<(f64, f64)>,
}

impl Ellipse {
    /// Creates a full ellipse from its center, semi-axes and rotation.
    ///
    /// # Errors
    ///
    /// Returns an error if either semi-axis is non-positive.
    pub fn new(center: Point2, a: f64, b: f64, angle: f64) -> Result<Self> {
        if a.is_nan() || a < TOLERANCE {
            return Err(GeometryError::Degenerate("semi-axis a must be positive".into()).into());
        }
        if b.is_nan() || b < TOLERANCE {
            return Err(GeometryError::Degenerate("semi-axis b must be positive".into()).into());
        }
        Ok(Self {
            center,
            a,
            b,
            angle,
            arc: None,
        })
    }

    /// Creates a full ellipse from its center and the endpoints of its two axes.
    ///
    /// The rotation follows the first axis; the second only contributes its length.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` if the first axis endpoint coincides
    /// with the center, and `GeometryError::Degenerate` for a zero second axis.
    pub fn from_axes(center: Point2, axis0_end: Point2, axis1_end: Point2) -> Result<Self> {
        let d0 = axis0_end - center;
        if d0.norm() < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        let angle = d0.y.atan2(d0.x);
        Self::new(center, d0.norm(), (axis1_end - center).norm(), angle)
    }

    /// Restricts the ellipse to the counter-clockwise parameter range `[arc0, arc1]`.
    #[must_use]
    pub fn with_arc(mut self, arc0: f64, arc1: f64) -> Self {
        self.arc = Some((normalize_angle(arc0), normalize_angle(arc1)));
        self
    }

    /// Copy of this ellipse placed in another frame, keeping axes and arc range.
    #[must_use]
    pub(crate) fn with_frame(&self, center: Point2, angle: f64) -> Self {
        Self {
            center,
            angle,
            ..*self
        }
    }

    /// Returns the center of the ellipse.
    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    /// Semi-axis along the rotated x direction.
    #[must_use]
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Semi-axis along the rotated y direction.
    #[must_use]
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Rotation of the `a` axis from the world x axis.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// The arc parameter range, if this is an elliptical arc.
    #[must_use]
    pub fn arc(&self) -> Option<(f64, f64)> {
        self.arc
    }

    #[must_use]
    pub fn is_arc(&self) -> bool {
        self.arc.is_some()
    }

    /// Parameter sweep covered by the curve (`2*pi` for a full ellipse).
    #[must_use]
    pub fn sweep(&self) -> f64 {
        match self.arc {
            Some((t0, t1)) => directed_sweep(t0, t1, false),
            None => TAU,
        }
    }

    /// Expresses a world point in the ellipse frame (center at origin, `a` along x).
    #[must_use]
    pub fn to_local(&self, p: &Point2) -> Vector2 {
        rotate_vec(&(p - self.center), -self.angle)
    }

    /// Maps a vector in the ellipse frame back to a world point.
    #[must_use]
    pub fn to_world(&self, v: &Vector2) -> Point2 {
        self.center + rotate_vec(v, self.angle)
    }

    /// Eccentric-anomaly parameter of the point, in `[0, 2*pi)`.
    #[must_use]
    pub fn param_of(&self, p: &Point2) -> f64 {
        let v = self.to_local(p);
        normalize_angle((v.y / self.b).atan2(v.x / self.a))
    }

    /// Whether parameter `t` lies on the (arc-restricted) curve.
    #[must_use]
    pub fn contains_param(&self, t: f64) -> bool {
        match self.arc {
            Some((t0, _)) => angle_in_sweep(t, t0, self.sweep(), false, 1e-12),
            None => true,
        }
    }

    /// First point of the curve (parameter `0` for a full ellipse).
    #[must_use]
    pub fn start(&self) -> Point2 {
        self.point_at(self.arc.map_or(0.0, |(t0, _)| t0))
    }

    /// Last point of the curve.
    #[must_use]
    pub fn end(&self) -> Point2 {
        self.point_at(self.arc.map_or(TAU, |(_, t1)| t1))
    }

    /// Implicit value `(x/a)^2 + (y/b)^2` of a world point; `1` on the curve.
    #[must_use]
    pub fn implicit_value(&self, p: &Point2) -> f64 {
        let v = self.to_local(p);
        (v.x / self.a).powi(2) + (v.y / self.b).powi(2)
    }
}

impl Curve for Ellipse {
    fn point_at(&self, t: f64) -> Point2 {
        let (s, c) = t.sin_cos();
        self.to_world(&Vector2::new(self.a * c, self.b * s))
    }

    fn tangent_at(&self, t: f64) -> Vector2 {
        let (s, c) = t.sin_cos();
        rotate_vec(&Vector2::new(-self.a * s, self.b * c), self.angle)
    }

    fn domain(&self) -> CurveDomain {
        match self.arc {
            Some((t0, _)) => CurveDomain::new(t0, t0 + self.sweep()),
            None => CurveDomain::new(0.0, TAU),
        }
    }

    fn is_closed(&self) -> bool {
        self.arc.is_none()
    }
}
