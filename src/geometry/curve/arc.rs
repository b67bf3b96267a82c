use crate::error::{GeometryError, Result};
use crate::math::arc_2d::{
    angle_in_sweep, arc_point_at, circle_from_three_points, directed_sweep, normalize_angle,
    polar_angle,
};
use crate::math::{cross, Point2, Vector2, TOLERANCE};

use super::{Curve, CurveDomain};

/// A circular arc defined by three control points.
///
/// The control points are the start, a point on the arc between the two
/// ends, and the end. Center, radius, angles and orientation are derived
/// from them. Curve parameter `t` runs over `[0, 1]` along the sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    points: [Point2; 3],
    center: Point2,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    is_cw: bool,
}

impl Arc {
    /// Creates the arc passing through `start`, `mid` and `end` in that order.
    ///
    /// # Errors
    ///
    /// Returns an error if the points are collinear or coincident.
    pub fn from_three_points(start: Point2, mid: Point2, end: Point2) -> Result<Self> {
        let (center, radius) = circle_from_three_points(&start, &mid, &end).ok_or_else(|| {
            GeometryError::Degenerate("arc control points are collinear".into())
        })?;
        let is_cw = cross(&(mid - start), &(end - mid)) < 0.0;
        Ok(Self {
            points: [start, mid, end],
            center,
            radius,
            start_angle: polar_angle(&center, &start),
            end_angle: polar_angle(&center, &end),
            is_cw,
        })
    }

    /// Creates an arc from its center, radius, angular range and orientation.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is non-positive.
    pub fn from_center(
        center: Point2,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        is_cw: bool,
    ) -> Result<Self> {
        if radius.is_nan() || radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        let start_angle = normalize_angle(start_angle);
        let end_angle = normalize_angle(end_angle);
        let sweep = directed_sweep(start_angle, end_angle, is_cw);
        let mid_angle = if is_cw {
            start_angle - sweep * 0.5
        } else {
            start_angle + sweep * 0.5
        };
        Ok(Self {
            points: [
                arc_point_at(&center, radius, start_angle),
                arc_point_at(&center, radius, mid_angle),
                arc_point_at(&center, radius, end_angle),
            ],
            center,
            radius,
            start_angle,
            end_angle,
            is_cw,
        })
    }

    /// The three control points (start, mid, end).
    #[must_use]
    pub fn control_points(&self) -> &[Point2; 3] {
        &self.points
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        self.points[0]
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        self.points[2]
    }

    #[must_use]
    pub fn center(&self) -> &Point2 {
        &self.center
    }

    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Polar angle of the start point, in `[0, 2*pi)`.
    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// Polar angle of the end point, in `[0, 2*pi)`.
    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    /// Whether the arc runs clockwise from start to end.
    #[must_use]
    pub fn is_cw(&self) -> bool {
        self.is_cw
    }

    /// Angular travel from start to end, in `(0, 2*pi]`.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        directed_sweep(self.start_angle, self.end_angle, self.is_cw)
    }

    /// Polar angle reached after travelling `t` of the sweep.
    #[must_use]
    pub fn angle_at(&self, t: f64) -> f64 {
        let delta = self.sweep() * t;
        if self.is_cw {
            self.start_angle - delta
        } else {
            self.start_angle + delta
        }
    }

    /// Whether the polar angle lies on the arc.
    #[must_use]
    pub fn contains_angle(&self, angle: f64) -> bool {
        angle_in_sweep(angle, self.start_angle, self.sweep(), self.is_cw, 1e-12)
    }
}

impl Curve for Arc {
    fn point_at(&self, t: f64) -> Point2 {
        arc_point_at(&self.center, self.radius, self.angle_at(t))
    }

    fn tangent_at(&self, t: f64) -> Vector2 {
        let (s, c) = self.angle_at(t).sin_cos();
        let speed = self.radius * self.sweep();
        if self.is_cw {
            Vector2::new(s, -c) * speed
        } else {
            Vector2::new(-s, c) * speed
        }
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }

    fn is_closed(&self) -> bool {
        false
    }
}
