//! Error taxonomy for the inference engine.
//!
//! Input validation failures (`InvalidParameter`, `EmptyInput`) are raised
//! before any computation begins. `DegenerateWeights` is a computation-level
//! failure: the inputs were well-formed but the posterior carries no mass.
//! None of these are transient, so retrying with the same inputs is pointless.

use thiserror::Error;

/// Errors produced by the H0 inference engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    /// A parameter or data shape is out of its valid domain.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Which parameter was rejected and why.
        message: String,
    },

    /// A required collection was empty.
    #[error("empty input: no {what} provided")]
    EmptyInput {
        /// Name of the empty collection (e.g. "lenses").
        what: &'static str,
    },

    /// Every importance weight underflowed to zero.
    #[error("degenerate weights: total weight is zero, posterior is uninformative")]
    DegenerateWeights,
}

impl InferenceError {
    /// Shorthand for building an [`InferenceError::InvalidParameter`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// True for failures caused by malformed inputs.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. } | Self::EmptyInput { .. })
    }

    /// True for failures that arise from valid but statistically inconsistent inputs.
    ///
    /// Callers may treat these as "no informative posterior" rather than aborting.
    pub fn is_computation_error(&self) -> bool {
        matches!(self, Self::DegenerateWeights)
    }
}

/// Result alias used across the core crate.
pub type Result<T> = core::result::Result<T, InferenceError>;
