use thiserror::Error;

/// Top-level error type for the planekit geometry kernel.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

/// Errors raised while constructing or querying primitives.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("invalid knot vector: expected {expected} knots, got {actual}")]
    InvalidKnots { expected: usize, actual: usize },

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to kernel operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Errors from the dense linear algebra helpers.
#[derive(Debug, Error)]
pub enum LinalgError {
    #[error("matrix is singular")]
    Singular,

    #[error("dimension mismatch: expected {expected} values, got {actual}")]
    Dimension { expected: usize, actual: usize },
}

/// Convenience type alias for results using [`KernelError`].
pub type Result<T> = std::result::Result<T, KernelError>;
