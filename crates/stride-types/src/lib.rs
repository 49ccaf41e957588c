//! Shared types for Stride.
//!
//! This crate defines the AST node types, source spans, the structured error
//! taxonomy and the locale templates used across the lexer, parser and
//! evaluator.

mod error;
mod span;
pub mod ast;
pub mod locale;
pub mod printer;

pub use error::{ErrorCategory, ErrorKind, ErrorParam, StructuredError};
pub use locale::{Locale, Translator};
pub use span::Span;

/// Result type used throughout the Stride front end.
pub type Result<T> = std::result::Result<T, StructuredError>;
