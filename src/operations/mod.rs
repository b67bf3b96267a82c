pub mod containment;
pub mod convert;
pub mod solver;

pub use containment::{is_inside, IsInside};
pub use solver::{foot_point, tangency_point, CurveParam, FootPoint, SolverCurve, TangencyPoint};
