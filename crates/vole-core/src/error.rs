use crate::op::OpReq;
use crate::shape::Shape;

/// All errors that can occur within Vole.
///
/// Every failure mode is structural: invalid configuration, conflicting
/// shapes, or an unsupported request. They are all detected before (or at the
/// very start of) a kernel call — there is no partial-failure mode to recover
/// from mid-computation, and none of these is transient.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid static configuration (e.g. `input_dim = 0`).
    #[error("invalid configuration: {name} must be >= 1, got {value}")]
    Config { name: &'static str, value: usize },

    /// Shape mismatch between a declared/previously-fixed shape and the
    /// shape required by the operator.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: Shape, got: Shape },

    /// Operation requires a specific rank (number of dimensions).
    #[error("rank mismatch: expected rank {expected}, got {got}")]
    RankMismatch { expected: usize, got: usize },

    /// Element count mismatch when creating a matrix view over a slice.
    #[error("element count mismatch: shape {shape} requires {expected} elements, got {got}")]
    ElementCountMismatch {
        shape: Shape,
        expected: usize,
        got: usize,
    },

    /// The caller asked for a write mode the operand does not support
    /// (e.g. accumulating into the forward output, which is overwrite-only).
    #[error("unsupported write mode for '{operand}': {req:?}")]
    UnsupportedWriteMode { operand: &'static str, req: OpReq },

    /// The caller requested a gradient that is undefined for this operand
    /// (the index vector is categorical, not differentiable).
    #[error("gradient with respect to '{operand}' is not defined")]
    UnsupportedGradient { operand: &'static str },

    /// An index value fell outside the embedding table.
    #[error("index out of bounds: index {index} at position {pos}, table has {bound} rows")]
    IndexOutOfBounds {
        index: u32,
        pos: usize,
        bound: usize,
    },

    /// Generic message for cases not covered above.
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an error from any string message.
    pub fn msg(s: impl Into<String>) -> Self {
        Error::Msg(s.into())
    }
}

/// Convenience Result type used throughout Vole.
pub type Result<T> = std::result::Result<T, Error>;

/// Macro for early return with a formatted error message.
/// Usage: `bail!("something went wrong: {}", detail)`
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::Msg(format!($($arg)*)))
    };
}
