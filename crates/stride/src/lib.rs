//! Stride interpreter: orchestrates the full pipeline.
//!
//! ```text
//! Stride Source → Lexer → Parser → AST → Evaluator → Timeline of Frames
//! ```
//!
//! Syntax errors stop the pipeline before anything runs, so their result
//! carries no timeline. Runtime faults end the timeline with one `ERROR`
//! frame.

mod config;
pub mod reference;

pub use config::{Error, InterpretConfig};

pub use stride_eval::{
    Arity, ExternalFunction, ExternalFunctions, Frame, FrameStatus, Timeline, Value,
};
pub use stride_types::ast::Stmt;
pub use stride_types::{ErrorCategory, ErrorKind, Locale, StructuredError, Translator};

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Stride language version.
pub const STRIDE_LANGUAGE_VERSION: &str = "0.1.0";

/// Everything a run needs besides the source: settings and host functions.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub config: InterpretConfig,
    pub external_functions: ExternalFunctions,
}

impl Context {
    pub fn new(config: InterpretConfig) -> Self {
        Self {
            config,
            external_functions: ExternalFunctions::new(),
        }
    }

    /// Register a host function (builder form).
    pub fn with_function(mut self, function: ExternalFunction) -> Self {
        self.external_functions.register(function);
        self
    }
}

/// Result of [`interpret`], ready to be serialized for a host.
#[derive(Debug, Clone, Serialize)]
pub struct InterpretResult {
    /// `SUCCESS` unless a syntax error or a runtime fault occurred.
    pub status: FrameStatus,
    /// Absent when the program failed to parse.
    pub timeline: Option<Timeline>,
    /// The syntax error, or a copy of the runtime fault on the last frame.
    pub error: Option<StructuredError>,
    /// Text of every executed `log`, in order.
    pub logs: Vec<String>,
    /// SHA-256 hex digest of the source text.
    pub source_hash: String,
}

impl InterpretResult {
    pub fn is_success(&self) -> bool {
        self.status == FrameStatus::Success
    }
}

/// Lex and parse `source`, rendering errors in English.
pub fn parse(source: &str) -> Result<Vec<Stmt>, StructuredError> {
    stride_parser::parse_source(source, &Translator::default())
}

/// Syntax-check `source` without running it. Returns the first syntax error,
/// rendered in `locale`.
pub fn check(source: &str, locale: &str) -> Option<StructuredError> {
    stride_parser::parse_source(source, &Translator::for_code(locale)).err()
}

/// Run `source` through the full pipeline.
pub fn interpret(source: &str, context: &Context) -> InterpretResult {
    let source_hash = source_hash(source);
    let translator = context.config.translator();
    tracing::info!(
        hash = %source_hash,
        locale = %translator.locale(),
        "interpreting program"
    );

    let program = match stride_parser::parse_source(source, &translator) {
        Ok(program) => program,
        Err(error) => {
            tracing::debug!(kind = %error.kind, line = error.line(), "syntax error");
            return InterpretResult {
                status: FrameStatus::Error,
                timeline: None,
                error: Some(error),
                logs: Vec::new(),
                source_hash,
            };
        }
    };

    let outcome = stride_eval::evaluate(
        &program,
        &context.external_functions,
        context.config.eval_config(),
    );
    InterpretResult {
        status: outcome.timeline.status(),
        error: outcome.error().cloned(),
        timeline: Some(outcome.timeline),
        logs: outcome.logs,
        source_hash,
    }
}

/// Hex SHA-256 of the program text.
pub fn source_hash(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}
