pub mod arc_2d;
pub mod distance_2d;
pub mod intersect_2d;
pub mod linalg;
pub mod nonlinear;
pub mod simplify;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 2x2 matrix, used for Jacobians of two-unknown systems.
pub type Matrix2 = nalgebra::Matrix2<f64>;

/// Residual threshold for the numeric solvers and coincidence of computed points.
pub const EPSILON: f64 = 1e-14;

/// Angular acceptance tolerance (radians) for bisection-located roots.
pub const ANGLE_TOLERANCE: f64 = 1e-4;

/// Iteration cap of the two-unknown Newton solver.
pub const MAX_ITERATION: usize = 10;

/// Tolerance for validating constructor input (radii, axis lengths, directions).
pub const TOLERANCE: f64 = 1e-10;

/// 2D cross product (z component of `a x b`).
#[inline]
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Rotates a vector by 90° counter-clockwise.
#[inline]
#[must_use]
pub fn perp(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// Rotates a vector by `angle` radians counter-clockwise.
#[must_use]
pub fn rotate_vec(v: &Vector2, angle: f64) -> Vector2 {
    let (s, c) = angle.sin_cos();
    Vector2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Rotates `point` about `pivot` by `angle` radians counter-clockwise.
#[must_use]
pub fn rotate_about(point: &Point2, pivot: &Point2, angle: f64) -> Point2 {
    pivot + rotate_vec(&(point - pivot), angle)
}

/// Signed angle from `from` to `to` in `(-pi, pi]`.
#[must_use]
pub fn signed_angle(from: &Vector2, to: &Vector2) -> f64 {
    cross(from, to).atan2(from.dot(to))
}

/// Normalizes `v`, returning `None` for (near) zero-length vectors.
#[must_use]
pub fn try_unit(v: &Vector2) -> Option<Vector2> {
    let len = v.norm();
    if len < TOLERANCE {
        None
    } else {
        Some(v / len)
    }
}

/// Returns `true` when the two points coincide within `tol`.
#[inline]
#[must_use]
pub fn approx_eq(a: &Point2, b: &Point2, tol: f64) -> bool {
    (a - b).norm() <= tol
}
