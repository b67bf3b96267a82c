use crate::error::{GeometryError, Result};
use crate::math::{cross, Point2, EPSILON};

use super::AabbRect;

/// An open chain of points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    points: Vec<Point2>,
}

impl Polyline {
    /// Creates a polyline from its ordered points.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// A polyline needs at least two points to describe any segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.len() < 2
    }

    /// Iterates over the segments as point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (&Point2, &Point2)> {
        self.points.windows(2).map(|w| (&w[0], &w[1]))
    }

    /// Total length of all segments.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| (b - a).norm()).sum()
    }

    #[must_use]
    pub fn bounding_rect(&self) -> Option<AabbRect> {
        AabbRect::from_points(&self.points)
    }
}

/// A closed polygon.
///
/// The closing edge from the last vertex back to the first is implicit; a
/// trailing vertex equal to the first one is dropped on construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point2>,
}

impl Polygon {
    /// Creates a polygon from its ordered vertices.
    #[must_use]
    pub fn new(mut vertices: Vec<Point2>) -> Self {
        if vertices.len() > 1 {
            let first = vertices[0];
            if vertices
                .last()
                .is_some_and(|last| (last - first).norm() <= EPSILON)
            {
                vertices.pop();
            }
        }
        Self { vertices }
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    /// A polygon needs at least three vertices to enclose anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Iterates over all edges including the closing one.
    pub fn edges(&self) -> impl Iterator<Item = (&Point2, &Point2)> {
        let n = self.vertices.len();
        (0..n).map(move |i| (&self.vertices[i], &self.vertices[(i + 1) % n]))
    }

    /// Signed area (shoelace formula).
    ///
    /// Positive for counter-clockwise, negative for clockwise.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
            * 0.5
    }

    #[must_use]
    pub fn bounding_rect(&self) -> Option<AabbRect> {
        AabbRect::from_points(&self.vertices)
    }

    /// The vertices followed by a repeat of the first one.
    #[must_use]
    pub fn to_closed_points(&self) -> Vec<Point2> {
        let mut pts = self.vertices.clone();
        if let Some(first) = self.vertices.first() {
            pts.push(*first);
        }
        pts
    }
}

/// A triangle given by its three corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Point2,
    pub b: Point2,
    pub c: Point2,
}

impl Triangle {
    /// Creates a triangle, rejecting collinear corners.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::Degenerate` if the corners are collinear.
    pub fn new(a: Point2, b: Point2, c: Point2) -> Result<Self> {
        let t = Self { a, b, c };
        if t.signed_area().abs() <= EPSILON {
            return Err(GeometryError::Degenerate("triangle corners are collinear".into()).into());
        }
        Ok(t)
    }

    /// Signed area, positive for counter-clockwise corners.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        0.5 * cross(&(self.b - self.a), &(self.c - self.a))
    }

    #[must_use]
    pub fn bounding_rect(&self) -> AabbRect {
        AabbRect::new(self.a, self.b).expanded(&self.c)
    }
}
