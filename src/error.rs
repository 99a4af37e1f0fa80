//! Error types for building and evaluating interpolant grids.

use thiserror::Error;

/// Errors that can occur while fitting or evaluating interpolants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpError {
    /// Invalid order/smoothness/monotone combination for the domain dimension,
    /// or a malformed derivative, point set or data shape.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A nonzero derivative was requested from a strategy that has none.
    #[error(
        "Derivatives are not supported for domain dimension {dim_domain} (requested {derivative:?})"
    )]
    DerivativeUnsupported {
        dim_domain: usize,
        derivative: Vec<usize>,
    },

    /// Numeric failure while fitting or evaluating that is not a configuration problem.
    #[error("Evaluation failed: {0}")]
    Evaluation(String),
}

impl InterpError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}

/// Result type for interpolation operations
pub type Result<T> = std::result::Result<T, InterpError>;
