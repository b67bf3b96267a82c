//! Ray-cast polygon containment with correction for rays that pass through
//! vertices or run along edges.
//!
//! A horizontal ray is cast from the query point towards `+x`. Every place
//! the boundary meets the ray becomes a [`MarkedPoint`] inserted into the
//! vertex sequence, carrying the direction in which its edge crosses the
//! ray. Coincident marks are merged and marks joined by a stretch of
//! boundary lying on the ray are resolved pairwise, after which the number
//! of surviving non-zero marks decides containment.

use tracing::trace;

use crate::geometry::{AabbRect, Polygon};
use crate::math::distance_2d::is_on_segment;
use crate::math::intersect_2d::horizontal_crossing;
use crate::math::{Point2, EPSILON};

/// A vertex or ray crossing in the marked boundary sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct MarkedPoint {
    pub point: Point2,
    /// Winding contribution: `+1` for an upward crossing, `-1` downward,
    /// `0` for a plain vertex. Merged marks carry the sum.
    pub value: i32,
    /// Whether a polygon vertex is part of this mark.
    pub original: bool,
}

impl MarkedPoint {
    fn vertex(point: Point2) -> Self {
        Self {
            point,
            value: 0,
            original: true,
        }
    }

    fn crossing(point: Point2, value: i32) -> Self {
        Self {
            point,
            value,
            original: false,
        }
    }

    fn is_intersection(&self) -> bool {
        self.value != 0 || !self.original
    }

    fn on_ray_line(&self, y: f64) -> bool {
        (self.point.y - y).abs() <= EPSILON
    }
}

/// Polygon containment query.
pub(crate) struct PolygonContainment<'a> {
    polygon: &'a Polygon,
    aabb_test: bool,
}

impl<'a> PolygonContainment<'a> {
    pub(crate) fn new(polygon: &'a Polygon, aabb_test: bool) -> Self {
        Self { polygon, aabb_test }
    }

    pub(crate) fn contains(&self, point: &Point2, coincide: bool) -> bool {
        if self.polygon.is_empty() {
            return false;
        }
        if self.aabb_test {
            match AabbRect::from_points(self.polygon.vertices()) {
                Some(rect) if rect.contains(point) => {}
                _ => return false,
            }
        }
        if self.polygon.edges().any(|(a, b)| is_on_segment(point, a, b)) {
            return coincide;
        }

        let Some(marks) = mark_crossings(self.polygon.vertices(), point) else {
            return false;
        };
        let mut marks = merge_coincident(marks);
        resolve_collinear(&mut marks, point.y);

        let count = marks.iter().filter(|m| m.value != 0).count();
        trace!(count, "polygon ray crossings");
        count % 2 == 1
    }
}

/// Builds the vertex sequence with ray crossings inserted after the start
/// vertex of their edge.
///
/// The sequence starts at a vertex off the ray line so that no run of
/// on-line boundary wraps around its ends. Returns `None` when every vertex
/// lies on the ray line.
pub(crate) fn mark_crossings(vertices: &[Point2], point: &Point2) -> Option<Vec<MarkedPoint>> {
    let start = vertices
        .iter()
        .position(|v| (v.y - point.y).abs() > EPSILON)?;
    let n = vertices.len();

    let mut marks = Vec::with_capacity(n * 2);
    for i in 0..n {
        let a = vertices[(start + i) % n];
        let b = vertices[(start + i + 1) % n];
        marks.push(MarkedPoint::vertex(a));

        let Some(x) = horizontal_crossing(point.y, &a, &b) else {
            continue;
        };
        if x <= point.x {
            continue;
        }
        let value = if b.y > a.y { 1 } else { -1 };
        marks.push(MarkedPoint::crossing(Point2::new(x, point.y), value));
    }
    Some(marks)
}

/// Collapses each run of consecutive coincident marks that contains a
/// crossing into one mark with the summed value.
///
/// A run whose values cancel keeps only its polygon vertex, with value `0`;
/// a cancelled run without a vertex disappears.
pub(crate) fn merge_coincident(marks: Vec<MarkedPoint>) -> Vec<MarkedPoint> {
    let mut merged: Vec<MarkedPoint> = Vec::with_capacity(marks.len());
    let mut run: Vec<MarkedPoint> = Vec::new();

    for mark in marks {
        if run
            .last()
            .is_some_and(|last| (last.point - mark.point).norm() > EPSILON)
        {
            flush_run(&mut run, &mut merged);
        }
        run.push(mark);
    }
    flush_run(&mut run, &mut merged);
    merged
}

fn flush_run(run: &mut Vec<MarkedPoint>, out: &mut Vec<MarkedPoint>) {
    if run.len() > 1 && run.iter().any(MarkedPoint::is_intersection) {
        let value: i32 = run.iter().map(|m| m.value).sum();
        let original = run.iter().any(|m| m.original);
        if value != 0 || original {
            out.push(MarkedPoint {
                point: run[0].point,
                value,
                original,
            });
        }
        run.clear();
    } else {
        out.append(run);
    }
}

/// Resolves pairs of consecutive non-zero marks joined by boundary lying on
/// the ray line: equal signs keep the first mark, opposite signs drop both.
pub(crate) fn resolve_collinear(marks: &mut [MarkedPoint], ray_y: f64) {
    let mut prev: Option<usize> = None;
    for j in 0..marks.len() {
        if marks[j].value == 0 {
            continue;
        }
        if let Some(i) = prev {
            let joined = marks[i..=j].iter().all(|m| m.on_ray_line(ray_y));
            if joined {
                if marks[i].value.signum() == marks[j].value.signum() {
                    marks[j].value = 0;
                } else {
                    marks[i].value = 0;
                    marks[j].value = 0;
                }
                prev = None;
                continue;
            }
        }
        prev = Some(j);
    }
}
