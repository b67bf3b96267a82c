//! A 2D computational-geometry kernel.
//!
//! Point containment over every primitive shape, foot-point and tangency
//! solving on curves, ellipse-ellipse intersection, small dense linear
//! algebra and conversions between shape kinds.

pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;

pub use error::{KernelError, Result};
pub use geometry::Shape;
pub use math::nonlinear::{ellipse_ellipse_intersections, solve_ellipse_ellipse_intersection, Conic};
pub use operations::convert;
pub use operations::{foot_point, is_inside, tangency_point, CurveParam};
