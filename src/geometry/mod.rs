pub mod aabb;
pub mod curve;
pub mod polygon;
pub mod sampling;

pub use aabb::AabbRect;
pub use curve::{Arc, BSpline, Bezier, BezierSegment, Circle, Curve, CurveDomain, Ellipse, Segment};
pub use polygon::{Polygon, Polyline, Triangle};
pub use sampling::{SamplingParams, ShapeCache};

use std::f64::consts::{FRAC_PI_2, PI};

use crate::math::arc_2d::{arc_point_at, normalize_angle};
use crate::math::Point2;

/// Any primitive the kernel can test or convert.
///
/// Dispatch over shape kinds is an exhaustive `match` on this enum.
#[derive(Debug, Clone)]
pub enum Shape {
    Segment(Segment),
    Polyline(Polyline),
    Polygon(Polygon),
    Rect(AabbRect),
    Triangle(Triangle),
    Circle(Circle),
    Ellipse(Ellipse),
    Arc(Arc),
    Bezier(Bezier),
    BSpline(BSpline),
}

impl Shape {
    /// Axis-aligned bounds of the shape.
    ///
    /// Conics are bounded exactly; splines by their control hull. Returns
    /// `None` for an empty point sequence.
    #[must_use]
    pub fn bounding_rect(&self) -> Option<AabbRect> {
        match self {
            Self::Segment(s) => Some(AabbRect::new(s.start, s.end)),
            Self::Polyline(p) => p.bounding_rect(),
            Self::Polygon(p) => p.bounding_rect(),
            Self::Rect(r) => Some(*r),
            Self::Triangle(t) => Some(t.bounding_rect()),
            Self::Circle(c) => {
                let r = c.radius();
                let center = c.center();
                Some(AabbRect::new(
                    Point2::new(center.x - r, center.y - r),
                    Point2::new(center.x + r, center.y + r),
                ))
            }
            Self::Ellipse(e) => Some(ellipse_bounds(e)),
            Self::Arc(a) => Some(arc_bounds(a)),
            Self::Bezier(b) => AabbRect::from_points(b.points()),
            Self::BSpline(s) => AabbRect::from_points(s.controls()),
        }
    }
}

fn ellipse_bounds(e: &Ellipse) -> AabbRect {
    if e.is_arc() {
        // Extremes of x and y over the full ellipse, kept when on the arc.
        let (s, c) = e.angle().sin_cos();
        let tx = (-e.b() * s).atan2(e.a() * c);
        let ty = (e.b() * c).atan2(e.a() * s);
        let mut rect = AabbRect::new(e.start(), e.end());
        for t in [tx, tx + PI, ty, ty + PI] {
            let t = normalize_angle(t);
            if e.contains_param(t) {
                rect = rect.expanded(&e.point_at(t));
            }
        }
        return rect;
    }
    let (s, c) = e.angle().sin_cos();
    let hx = (e.a() * c).hypot(e.b() * s);
    let hy = (e.a() * s).hypot(e.b() * c);
    let center = e.center();
    AabbRect::new(
        Point2::new(center.x - hx, center.y - hy),
        Point2::new(center.x + hx, center.y + hy),
    )
}

fn arc_bounds(a: &Arc) -> AabbRect {
    let mut rect = AabbRect::new(a.start(), a.end());
    for k in 0..4 {
        let angle = FRAC_PI_2 * f64::from(k);
        if a.contains_angle(angle) {
            rect = rect.expanded(&arc_point_at(a.center(), a.radius(), angle));
        }
    }
    rect
}

impl From<Segment> for Shape {
    fn from(s: Segment) -> Self {
        Self::Segment(s)
    }
}

impl From<Polyline> for Shape {
    fn from(p: Polyline) -> Self {
        Self::Polyline(p)
    }
}

impl From<Polygon> for Shape {
    fn from(p: Polygon) -> Self {
        Self::Polygon(p)
    }
}

impl From<AabbRect> for Shape {
    fn from(r: AabbRect) -> Self {
        Self::Rect(r)
    }
}

impl From<Triangle> for Shape {
    fn from(t: Triangle) -> Self {
        Self::Triangle(t)
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Self::Circle(c)
    }
}

impl From<Ellipse> for Shape {
    fn from(e: Ellipse) -> Self {
        Self::Ellipse(e)
    }
}

impl From<Arc> for Shape {
    fn from(a: Arc) -> Self {
        Self::Arc(a)
    }
}

impl From<Bezier> for Shape {
    fn from(b: Bezier) -> Self {
        Self::Bezier(b)
    }
}

impl From<BSpline> for Shape {
    fn from(s: BSpline) -> Self {
        Self::BSpline(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rotated_ellipse_bounds() {
        let e = Ellipse::new(Point2::new(1.0, 1.0), 3.0, 1.0, FRAC_PI_2).unwrap();
        let r = Shape::from(e).bounding_rect().unwrap();
        assert!((r.min - Point2::new(0.0, -2.0)).norm() < 1e-12);
        assert!((r.max - Point2::new(2.0, 4.0)).norm() < 1e-12);
    }

    #[test]
    fn half_ellipse_bounds() {
        let e = Ellipse::new(Point2::origin(), 2.0, 1.0, 0.0)
            .unwrap()
            .with_arc(0.0, PI);
        let r = Shape::from(e).bounding_rect().unwrap();
        assert!((r.min - Point2::new(-2.0, 0.0)).norm() < 1e-12);
        assert!((r.max - Point2::new(2.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn arc_bounds_include_axis_extremes() {
        let arc = Arc::from_center(Point2::origin(), 1.0, 0.0, PI, false).unwrap();
        let r = Shape::from(arc).bounding_rect().unwrap();
        assert!((r.min - Point2::new(-1.0, 0.0)).norm() < 1e-12);
        assert!((r.max - Point2::new(1.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn empty_polyline_has_no_bounds() {
        assert!(Shape::from(Polyline::default()).bounding_rect().is_none());
    }
}
