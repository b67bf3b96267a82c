//! Sign-change bisection on the angle between a curve's chord to an
//! external point and its tangent.

use std::f64::consts::PI;

use tracing::trace;

use crate::geometry::Curve;
use crate::math::{perp, signed_angle, Point2, ANGLE_TOLERANCE, EPSILON, TOLERANCE};

/// Parametric scan step used to bracket roots on Bézier segments and B-splines.
pub const SCAN_STEP: f64 = 1e-3;

/// What the predicate measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Chord perpendicular to the tangent.
    Foot,
    /// Chord parallel to the tangent.
    Tangency,
}

/// Signed angle in `(-pi, pi]` between the reference direction and the chord
/// from the curve point at `t` to `target`.
///
/// The reference direction is the tangent, turned by 90° in foot mode, so a
/// root lies wherever the value crosses `0` or jumps across `±pi`.
fn predicate<C: Curve>(curve: &C, target: &Point2, t: f64, mode: Mode) -> f64 {
    let chord = target - curve.point_at(t);
    let tangent = curve.tangent_at(t);
    let reference = match mode {
        Mode::Foot => perp(&tangent),
        Mode::Tangency => tangent,
    };
    signed_angle(&reference, &chord)
}

fn accept<C: Curve>(curve: &C, target: &Point2, t: f64, mode: Mode) -> bool {
    if (target - curve.point_at(t)).norm() < TOLERANCE {
        return true;
    }
    let v = predicate(curve, target, t, mode).abs();
    v.min(PI - v) < ANGLE_TOLERANCE
}

/// Narrows a sign-changing bracket until it is narrower than `EPSILON`,
/// cannot be split further, or hits an exact zero.
fn bisect<C: Curve>(curve: &C, target: &Point2, mode: Mode, lo: f64, hi: f64, v_lo: f64) -> f64 {
    let (mut lo, mut hi) = (lo, hi);
    let lo_negative = v_lo < 0.0;
    while hi - lo >= EPSILON {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        let v = predicate(curve, target, mid, mode);
        if v.is_nan() {
            break;
        }
        if v == 0.0 {
            return mid;
        }
        if (v < 0.0) == lo_negative {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Parameters on `curve` where the predicate of `mode` vanishes.
///
/// The domain is scanned at `step`; each sign change between neighbouring
/// samples is bisected, and a root is kept only if its final angle is within
/// [`ANGLE_TOLERANCE`] of `0` or `pi`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn solve<C: Curve>(curve: &C, target: &Point2, mode: Mode, step: f64) -> Vec<f64> {
    let dom = curve.domain();
    let width = dom.width();
    if width <= 0.0 || step <= 0.0 {
        return Vec::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let n = ((width / step).ceil() as usize).max(1);

    let sample = |i: usize| {
        if i == n {
            dom.t_max
        } else {
            dom.t_min + width * (i as f64 / n as f64)
        }
    };

    let mut roots = Vec::new();
    let mut push = |t: f64| {
        if accept(curve, target, t, mode) {
            roots.push(t);
        } else {
            trace!(t, ?mode, "discarding bisection root outside angular tolerance");
        }
    };

    let mut t0 = sample(0);
    let mut v0 = predicate(curve, target, t0, mode);
    for i in 1..=n {
        let t1 = sample(i);
        let v1 = predicate(curve, target, t1, mode);
        if v0 == 0.0 {
            push(t0);
        } else if v0 * v1 < 0.0 {
            push(bisect(curve, target, mode, t0, t1, v0));
        }
        t0 = t1;
        v0 = v1;
    }
    if v0 == 0.0 {
        push(t0);
    }
    roots
}
