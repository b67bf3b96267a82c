//! Nonlinear root solvers.
//!
//! - [`NewtonSolver2`]: Newton iteration for two equations in two unknowns
//!   with an analytic Jacobian, used for conic-conic intersection.
//! - [`find_roots_on_circle`]: scan-and-refine root search for periodic
//!   scalar functions of an angle, used for ellipse foot points.
use std::f64::consts::TAU;

use tracing::{debug, trace};

use super::{Matrix2, Point2, Vector2, EPSILON, MAX_ITERATION};
use crate::geometry::{Curve, Ellipse};

/// Angular scan step for [`find_roots_on_circle`] (about one degree).
pub const ELLIPSE_SCAN_STEP: f64 = 0.0175;

/// Residual bound for accepting a Newton iterate as a conic intersection.
const INTERSECTION_RESIDUAL: f64 = 1e-9;

/// Result of a two-unknown Newton solve.
#[derive(Debug, Clone, Copy)]
pub struct NewtonOutcome {
    /// The last iterate.
    pub point: Vector2,
    /// Residual norm at `point`.
    pub residual: f64,
    /// Number of Newton steps taken.
    pub iterations: usize,
    /// Whether the residual dropped below the tolerance.
    pub converged: bool,
}

/// Newton solver for `F(x) = 0` with `F: R^2 -> R^2`.
///
/// The residual and Jacobian are supplied as closures, so any context the
/// equations need is captured by value instead of being passed around.
pub struct NewtonSolver2<F, J> {
    residual: F,
    jacobian: J,
    max_iterations: usize,
    tolerance: f64,
}

impl<F, J> NewtonSolver2<F, J>
where
    F: Fn(&Vector2) -> Vector2,
    J: Fn(&Vector2) -> Matrix2,
{
    /// Creates a solver with the kernel's fixed iteration cap and tolerance.
    #[must_use]
    pub fn new(residual: F, jacobian: J) -> Self {
        Self {
            residual,
            jacobian,
            max_iterations: MAX_ITERATION,
            tolerance: EPSILON,
        }
    }

    /// Iterates from `init`.
    ///
    /// Non-convergence is not an error: the last iterate is returned with
    /// `converged == false`, and the caller must validate it.
    pub fn solve(&self, init: Vector2) -> NewtonOutcome {
        let mut x = init;
        let mut r = (self.residual)(&x);
        let mut iterations = 0;

        while iterations < self.max_iterations && r.norm() >= self.tolerance {
            let Some(inv) = (self.jacobian)(&x).try_inverse() else {
                trace!(x = x.x, y = x.y, "singular Jacobian, stopping Newton iteration");
                break;
            };
            x -= inv * r;
            r = (self.residual)(&x);
            iterations += 1;
        }

        let residual = r.norm();
        let converged = residual < self.tolerance;
        if !converged {
            debug!(residual, iterations, "Newton solver did not converge");
        }
        NewtonOutcome {
            point: x,
            residual,
            iterations,
            converged,
        }
    }
}

/// Implicit conic `a x^2 + b xy + c y^2 + d x + e y + f = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conic {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Conic {
    /// Creates a conic from its six coefficients.
    #[must_use]
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Implicit equation of a full ellipse in world coordinates.
    #[must_use]
    pub fn from_ellipse(ellipse: &Ellipse) -> Self {
        let (s, c) = ellipse.angle().sin_cos();
        let ia = 1.0 / (ellipse.a() * ellipse.a());
        let ib = 1.0 / (ellipse.b() * ellipse.b());
        let h = ellipse.center().x;
        let k = ellipse.center().y;

        let qa = c * c * ia + s * s * ib;
        let qb = 2.0 * c * s * (ia - ib);
        let qc = s * s * ia + c * c * ib;
        Self {
            a: qa,
            b: qb,
            c: qc,
            d: -2.0 * qa * h - qb * k,
            e: -qb * h - 2.0 * qc * k,
            f: qa * h * h + qb * h * k + qc * k * k - 1.0,
        }
    }

    /// Evaluates the implicit function at `(x, y)`.
    #[must_use]
    pub fn value(&self, x: f64, y: f64) -> f64 {
        self.a * x * x + self.b * x * y + self.c * y * y + self.d * x + self.e * y + self.f
    }

    /// Gradient of the implicit function at `(x, y)`.
    #[must_use]
    pub fn gradient(&self, x: f64, y: f64) -> Vector2 {
        Vector2::new(
            2.0 * self.a * x + self.b * y + self.d,
            self.b * x + 2.0 * self.c * y + self.e,
        )
    }
}

/// Solves the intersection of two conics from an initial guess.
///
/// Returns the last Newton iterate, converged or not; the caller is
/// responsible for checking it lies on both conics.
#[must_use]
pub fn solve_ellipse_ellipse_intersection(params: &[Conic; 2], init_x: f64, init_y: f64) -> Point2 {
    let p = newton_on_conics(*params, Vector2::new(init_x, init_y)).point;
    Point2::from(p)
}

fn newton_on_conics(params: [Conic; 2], init: Vector2) -> NewtonOutcome {
    let [q0, q1] = params;
    let solver = NewtonSolver2::new(
        move |v: &Vector2| Vector2::new(q0.value(v.x, v.y), q1.value(v.x, v.y)),
        move |v: &Vector2| {
            let g0 = q0.gradient(v.x, v.y);
            let g1 = q1.gradient(v.x, v.y);
            Matrix2::new(g0.x, g0.y, g1.x, g1.y)
        },
    );
    solver.solve(init)
}

/// All transversal intersection points of two ellipses (arc ranges honoured).
///
/// Both conics are expressed in the local frame of `e0` for conditioning.
/// Seeds come from sign changes of the first conic sampled along the second
/// ellipse; every Newton result is checked against both curves. Tangential
/// contacts without a sign change are not reported.
#[must_use]
pub fn ellipse_ellipse_intersections(e0: &Ellipse, e1: &Ellipse) -> Vec<Point2> {
    let local0 = e0.with_frame(Point2::origin(), 0.0);
    let c1 = e0.to_local(e1.center());
    let local1 = e1.with_frame(Point2::from(c1), e1.angle() - e0.angle());
    let q0 = Conic::from_ellipse(&local0);
    let q1 = Conic::from_ellipse(&local1);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (TAU / ELLIPSE_SCAN_STEP).ceil() as usize;
    #[allow(clippy::cast_precision_loss)]
    let step = TAU / n as f64;

    let sample = |i: usize| {
        #[allow(clippy::cast_precision_loss)]
        let p = local1.point_at(i as f64 * step);
        (p, q0.value(p.x, p.y))
    };

    let mut found: Vec<Point2> = Vec::new();
    let (mut prev_p, mut prev_v) = sample(0);
    for i in 1..=n {
        let (p, v) = sample(i % n);
        if prev_v == 0.0 || prev_v * v < 0.0 {
            let seed = if prev_v == 0.0 {
                prev_p.coords
            } else {
                (prev_p.coords + p.coords) * 0.5
            };
            let outcome = newton_on_conics([q0, q1], seed);
            let candidate = Point2::from(outcome.point);
            let on_both = q0.value(candidate.x, candidate.y).abs() < INTERSECTION_RESIDUAL
                && q1.value(candidate.x, candidate.y).abs() < INTERSECTION_RESIDUAL;
            if on_both {
                let world = e0.to_world(&candidate.coords);
                let duplicate = found.iter().any(|q| (q - world).norm() < 1e-9);
                if !duplicate
                    && e0.contains_param(e0.param_of(&world))
                    && e1.contains_param(e1.param_of(&world))
                {
                    found.push(world);
                }
            } else {
                trace!(residual = outcome.residual, "rejected ellipse intersection seed");
            }
        }
        prev_p = p;
        prev_v = v;
    }
    found
}

/// Finds the roots of a `2*pi`-periodic function on `[0, 2*pi)`.
///
/// Brackets are found by sampling at [`ELLIPSE_SCAN_STEP`]; each bracket is
/// refined by Newton steps that fall back to bisection whenever a step
/// leaves the bracket. Brackets without a sign change yield nothing.
pub fn find_roots_on_circle<F, D>(f: F, df: D) -> Vec<f64>
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = (TAU / ELLIPSE_SCAN_STEP).ceil() as usize;
    #[allow(clippy::cast_precision_loss)]
    let step = TAU / n as f64;

    let mut roots = Vec::new();
    let mut t0 = 0.0;
    let mut v0 = f(t0);
    for i in 1..=n {
        #[allow(clippy::cast_precision_loss)]
        let t1 = if i == n { TAU } else { i as f64 * step };
        let v1 = if i == n { f(0.0) } else { f(t1) };
        if v0 == 0.0 {
            roots.push(t0);
        } else if v0 * v1 < 0.0 {
            let root = refine_bracket(&f, &df, t0, t1, v0);
            roots.push(if root >= TAU { root - TAU } else { root });
        }
        t0 = t1;
        v0 = v1;
    }
    roots
}

/// Safeguarded Newton refinement inside a sign-changing bracket.
fn refine_bracket<F, D>(f: &F, df: &D, lo: f64, hi: f64, f_lo: f64) -> f64
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = (lo, hi);
    let lo_negative = f_lo < 0.0;
    let mut x = 0.5 * (lo + hi);

    for _ in 0..100 {
        let fx = f(x);
        if fx == 0.0 {
            return x;
        }
        if (fx < 0.0) == lo_negative {
            lo = x;
        } else {
            hi = x;
        }
        if hi - lo < EPSILON {
            break;
        }

        let slope = df(x);
        let newton = x - fx / slope;
        x = if slope != 0.0 && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };
    }
    x
}

/// Parameters `t` solving `a cos t + b sin t + c sin t cos t = 0`.
///
/// This is the foot-point condition on an axis-aligned ellipse.
#[must_use]
pub fn ellipse_foot_params(a: f64, b: f64, c: f64) -> Vec<f64> {
    find_roots_on_circle(
        |t| {
            let (s, co) = t.sin_cos();
            a * co + b * s + c * s * co
        },
        |t| {
            let (s, co) = t.sin_cos();
            -a * s + b * co + c * (co * co - s * s)
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn unit_circles() -> [Conic; 2] {
        [
            Conic::new(1.0, 0.0, 1.0, 0.0, 0.0, -1.0),
            Conic::new(1.0, 0.0, 1.0, -2.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn newton_two_unit_circles() {
        let p = solve_ellipse_ellipse_intersection(&unit_circles(), 0.5, 0.8);
        assert_abs_diff_eq!(p.x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 3f64.sqrt() / 2.0, epsilon = 1e-12);
        let [q0, q1] = unit_circles();
        assert!(q0.value(p.x, p.y).abs() < 1e-13);
        assert!(q1.value(p.x, p.y).abs() < 1e-13);
    }

    #[test]
    fn newton_lower_branch() {
        let p = solve_ellipse_ellipse_intersection(&unit_circles(), 0.5, -0.8);
        assert_abs_diff_eq!(p.y, -(3f64.sqrt()) / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn newton_reports_non_convergence_without_failing() {
        // Disjoint circles: no real solution, iteration just stops.
        let params = [
            Conic::new(1.0, 0.0, 1.0, 0.0, 0.0, -1.0),
            Conic::new(1.0, 0.0, 1.0, -10.0, 0.0, 24.0),
        ];
        let [q0, q1] = params;
        let outcome = newton_on_conics(params, Vector2::new(0.5, 0.5));
        assert!(!outcome.converged);
        assert!(outcome.iterations <= MAX_ITERATION);
        let p = solve_ellipse_ellipse_intersection(&params, 0.5, 0.5);
        assert!(q0.value(p.x, p.y).abs() > EPSILON || q1.value(p.x, p.y).abs() > EPSILON);
    }

    #[test]
    fn conic_from_rotated_ellipse() {
        let e = Ellipse::new(Point2::new(1.0, -2.0), 3.0, 1.5, 0.7).unwrap();
        let q = Conic::from_ellipse(&e);
        for i in 0..16 {
            let t = f64::from(i) * TAU / 16.0;
            let p = e.point_at(t);
            assert!(q.value(p.x, p.y).abs() < 1e-12, "t={t}");
        }
        assert!(q.value(1.0, -2.0) < 0.0);
    }

    #[test]
    fn two_ellipses_cross_four_times() {
        let e0 = Ellipse::new(Point2::origin(), 2.0, 1.0, 0.0).unwrap();
        let e1 = Ellipse::new(Point2::origin(), 2.0, 1.0, FRAC_PI_2).unwrap();
        let pts = ellipse_ellipse_intersections(&e0, &e1);
        assert_eq!(pts.len(), 4, "pts={pts:?}");
        let expected = 2.0 / 5f64.sqrt();
        for p in &pts {
            assert_abs_diff_eq!(p.x.abs(), expected, epsilon = 1e-9);
            assert_abs_diff_eq!(p.y.abs(), expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn disjoint_ellipses_do_not_intersect() {
        let e0 = Ellipse::new(Point2::origin(), 1.0, 0.5, 0.0).unwrap();
        let e1 = Ellipse::new(Point2::new(10.0, 0.0), 1.0, 0.5, 0.3).unwrap();
        assert!(ellipse_ellipse_intersections(&e0, &e1).is_empty());
    }

    #[test]
    fn periodic_roots_of_cosine() {
        let roots = find_roots_on_circle(f64::cos, |t| -t.sin());
        assert_eq!(roots.len(), 2);
        assert_abs_diff_eq!(roots[0], FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(roots[1], 3.0 * FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn no_sign_change_no_root() {
        let roots = find_roots_on_circle(|t| 2.0 + t.sin(), f64::cos);
        assert!(roots.is_empty());
    }

    #[test]
    fn foot_params_on_axis() {
        // Point (5, 0) relative to ellipse a=3, b=2: A = b*py = 0, B = -a*px = -15, C = a^2-b^2 = 5.
        // -15 sin t + 5 sin t cos t = sin t (5 cos t - 15) => roots at 0 and pi.
        let roots = ellipse_foot_params(0.0, -15.0, 5.0);
        assert_eq!(roots.len(), 2, "roots={roots:?}");
        assert!(roots[0].abs() < 1e-12);
        assert_abs_diff_eq!(roots[1], PI, epsilon = 1e-12);
    }
}
