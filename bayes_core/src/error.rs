//! Error types for the classification engine
//!
//! All parsing, training, inference, and codec failures surface through a
//! single [`BayesError`] enum so callers can translate them into user-facing
//! messages without the core printing anything itself.

use std::fmt;

/// Result type alias for classification engine operations
pub type BayesResult<T> = Result<T, BayesError>;

/// Comprehensive error type for classification engine operations
#[derive(Debug, Clone, PartialEq)]
pub enum BayesError {
    /// Malformed corpus stream or model document structure
    Format { context: String },

    /// Non-uniform image geometry, or an image that does not match the
    /// dimensions a model was trained with
    DimensionMismatch {
        expected: usize,
        got: usize,
        context: String,
    },

    /// Pixel character or shading code outside the configured alphabet
    UnknownSymbol { symbol: String, context: String },

    /// Corpus label absent from a trained model during evaluation
    UnknownLabel { label: char },

    /// Inference attempted on a model with no trained classes
    UntrainedModel { operation: String },

    /// Invalid parameter value
    InvalidParameter {
        parameter: String,
        value: String,
        constraint: String,
    },
}

impl fmt::Display for BayesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BayesError::Format { context } => {
                write!(f, "Malformed input: {}", context)
            }
            BayesError::DimensionMismatch {
                expected,
                got,
                context,
            } => {
                write!(
                    f,
                    "Dimension mismatch in {}: expected {}, got {}",
                    context, expected, got
                )
            }
            BayesError::UnknownSymbol { symbol, context } => {
                write!(f, "Unknown symbol '{}' in {}", symbol, context)
            }
            BayesError::UnknownLabel { label } => {
                write!(f, "Label '{}' is not known to the trained model", label)
            }
            BayesError::UntrainedModel { operation } => {
                write!(
                    f,
                    "Operation '{}' requires a trained model. Call train() or load a model document first.",
                    operation
                )
            }
            BayesError::InvalidParameter {
                parameter,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}' = '{}': must satisfy {}",
                    parameter, value, constraint
                )
            }
        }
    }
}

impl std::error::Error for BayesError {}

// Convenience constructors for common error patterns
impl BayesError {
    /// Create a malformed-input error
    pub fn format(context: impl Into<String>) -> Self {
        BayesError::Format {
            context: context.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, got: usize, context: impl Into<String>) -> Self {
        BayesError::DimensionMismatch {
            expected,
            got,
            context: context.into(),
        }
    }

    /// Create an unknown symbol error
    pub fn unknown_symbol(symbol: impl Into<String>, context: impl Into<String>) -> Self {
        BayesError::UnknownSymbol {
            symbol: symbol.into(),
            context: context.into(),
        }
    }

    /// Create an unknown label error
    pub fn unknown_label(label: char) -> Self {
        BayesError::UnknownLabel { label }
    }

    /// Create an untrained model error
    pub fn untrained_model(operation: impl Into<String>) -> Self {
        BayesError::UntrainedModel {
            operation: operation.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(
        parameter: impl Into<String>,
        value: impl Into<String>,
        constraint: impl Into<String>,
    ) -> Self {
        BayesError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            constraint: constraint.into(),
        }
    }
}
