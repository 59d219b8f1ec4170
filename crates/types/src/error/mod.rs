// Path: crates/types/src/error/mod.rs
//! Core error types for the T81 engine.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// Errors returned by the ternary arithmetic engine.
///
/// Every public operation either succeeds or returns exactly one of these
/// kinds; results are never silently truncated.
#[derive(Debug, Error)]
pub enum TernaryError {
    /// An operand was malformed (bad trit character, empty text, invalid trit array).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A heap allocation for limb storage could not be satisfied.
    #[error("Memory allocation failed: {0}")]
    Memory(String),
    /// Creating, sizing or mapping a file-backed limb buffer failed.
    #[error("Memory mapping failed while {context}: {source}")]
    Mapping {
        /// The step of the mapped allocation that failed.
        context: &'static str,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The divisor's magnitude was zero.
    #[error("Division by zero")]
    DivideByZero,
    /// An operand was too large for a bounded operation.
    #[error("Overflow detected: {0}")]
    Overflow(String),
    /// A negative operand was given where only non-negative values are defined.
    #[error("Negative input: {0}")]
    NegativeInput(String),
    /// The engine configuration was rejected.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TernaryError {
    /// Convenience constructor for [`TernaryError::Mapping`].
    pub fn mapping(context: &'static str, source: std::io::Error) -> Self {
        Self::Mapping { context, source }
    }
}

impl ErrorCode for TernaryError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "TERNARY_INVALID_INPUT",
            Self::Memory(_) => "TERNARY_MEMORY",
            Self::Mapping { .. } => "TERNARY_MAPPING",
            Self::DivideByZero => "TERNARY_DIVIDE_BY_ZERO",
            Self::Overflow(_) => "TERNARY_OVERFLOW",
            Self::NegativeInput(_) => "TERNARY_NEGATIVE_INPUT",
            Self::Config(_) => "TERNARY_CONFIG",
        }
    }
}

impl From<std::collections::TryReserveError> for TernaryError {
    fn from(e: std::collections::TryReserveError) -> Self {
        TernaryError::Memory(e.to_string())
    }
}
