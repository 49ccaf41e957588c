//! Error types for the Stride evaluator.

use stride_types::StructuredError;
use thiserror::Error;

/// Lookup failures raised by the [`Environment`](crate::scope::Environment).
///
/// The evaluator attaches a source span and turns these into
/// [`StructuredError`]s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    #[error("variable '{0}' is not declared")]
    VariableNotDeclared(String),
    #[error("function '{0}' is not declared")]
    FunctionNotDeclared(String),
}

impl ScopeError {
    /// The name that could not be found.
    pub fn name(&self) -> &str {
        match self {
            Self::VariableNotDeclared(name) | Self::FunctionNotDeclared(name) => name,
        }
    }
}

/// Result alias for evaluator operations. Every runtime fault is fatal to
/// the run, so there is nothing finer-grained than a [`StructuredError`].
pub type EvalResult<T> = Result<T, StructuredError>;
