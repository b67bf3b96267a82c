//! Conversions between shape kinds: flattening conics and splines into
//! point chains, cubic Bézier approximations, spline basis changes and
//! corner rounding.

mod arc;
mod blend;
mod circle;
mod ellipse;
mod fillet;
mod spline;

pub use arc::{arc_to_bezier, arc_to_polyline};
pub use blend::blend;
pub use circle::{circle_to_bezier, circle_to_polygon, QUARTER_KAPPA};
pub use ellipse::{ellipse_to_bezier, ellipse_to_polygon, ellipse_to_polyline};
pub use fillet::{angle_to_arc, angle_to_bezier};
pub use spline::{bezier_to_bspline, bezier_to_polyline, bspline_to_bezier};
