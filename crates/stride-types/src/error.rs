use crate::locale::{Locale, Translator};
use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error category, derived from the error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    /// Raised by the lexer or parser; no timeline is produced.
    Syntax,
    /// Raised while evaluating; terminates the timeline with an error frame.
    Runtime,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Runtime => write!(f, "runtime"),
        }
    }
}

/// The closed error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    // ── Syntax ──
    UnknownCharacter,
    UnterminatedString,
    MalformedNumber,
    UnexpectedToken,
    UnexpectedEndOfFile,
    NestingTooDeep,

    // ── Runtime ──
    VariableNotDeclared,
    FunctionNotDeclared,
    TypeMismatch,
    DivisionByZero,
    WrongNumberOfArguments,
    ReturnOutsideFunction,
    LoopBudgetExceeded,
    RecursionLimitExceeded,
    ExternalFunctionFailed,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: &'static [ErrorKind] = &[
        ErrorKind::UnknownCharacter,
        ErrorKind::UnterminatedString,
        ErrorKind::MalformedNumber,
        ErrorKind::UnexpectedToken,
        ErrorKind::UnexpectedEndOfFile,
        ErrorKind::NestingTooDeep,
        ErrorKind::VariableNotDeclared,
        ErrorKind::FunctionNotDeclared,
        ErrorKind::TypeMismatch,
        ErrorKind::DivisionByZero,
        ErrorKind::WrongNumberOfArguments,
        ErrorKind::ReturnOutsideFunction,
        ErrorKind::LoopBudgetExceeded,
        ErrorKind::RecursionLimitExceeded,
        ErrorKind::ExternalFunctionFailed,
    ];

    /// Get the category for this kind.
    pub fn category(self) -> ErrorCategory {
        match self {
            Self::UnknownCharacter
            | Self::UnterminatedString
            | Self::MalformedNumber
            | Self::UnexpectedToken
            | Self::UnexpectedEndOfFile
            | Self::NestingTooDeep => ErrorCategory::Syntax,
            Self::VariableNotDeclared
            | Self::FunctionNotDeclared
            | Self::TypeMismatch
            | Self::DivisionByZero
            | Self::WrongNumberOfArguments
            | Self::ReturnOutsideFunction
            | Self::LoopBudgetExceeded
            | Self::RecursionLimitExceeded
            | Self::ExternalFunctionFailed => ErrorCategory::Runtime,
        }
    }

    /// The stable identifier used by the `system` locale.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UnknownCharacter => "UnknownCharacter",
            Self::UnterminatedString => "UnterminatedString",
            Self::MalformedNumber => "MalformedNumber",
            Self::UnexpectedToken => "UnexpectedToken",
            Self::UnexpectedEndOfFile => "UnexpectedEndOfFile",
            Self::NestingTooDeep => "NestingTooDeep",
            Self::VariableNotDeclared => "VariableNotDeclared",
            Self::FunctionNotDeclared => "FunctionNotDeclared",
            Self::TypeMismatch => "TypeMismatch",
            Self::DivisionByZero => "DivisionByZero",
            Self::WrongNumberOfArguments => "WrongNumberOfArguments",
            Self::ReturnOutsideFunction => "ReturnOutsideFunction",
            Self::LoopBudgetExceeded => "LoopBudgetExceeded",
            Self::RecursionLimitExceeded => "RecursionLimitExceeded",
            Self::ExternalFunctionFailed => "ExternalFunctionFailed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named context parameter of an error, kept in the order it was raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorParam {
    pub name: String,
    pub value: String,
}

/// A structured Stride error.
///
/// The kind and params are the contract; `message` is only the rendering of
/// them in one locale. Consumers must not parse the message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredError {
    pub kind: ErrorKind,
    /// Derived from `kind`.
    pub category: ErrorCategory,
    pub params: Vec<ErrorParam>,
    /// Human-readable message in the locale it was rendered with.
    pub message: String,
    /// Source location.
    #[serde(flatten)]
    pub span: Span,
}

impl StructuredError {
    /// Create a new error, rendering its message with `translator`.
    pub fn new<K, V>(
        kind: ErrorKind,
        params: impl IntoIterator<Item = (K, V)>,
        span: Span,
        translator: &Translator,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let params: Vec<ErrorParam> = params
            .into_iter()
            .map(|(name, value)| ErrorParam {
                name: name.into(),
                value: value.into(),
            })
            .collect();
        let message = translator.render(kind, &params);
        Self {
            kind,
            category: kind.category(),
            params,
            message,
            span,
        }
    }

    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// The source line the error is attributed to.
    pub fn line(&self) -> u32 {
        self.span.line()
    }

    /// Re-render the message in another locale. Kind, params and span are
    /// left untouched.
    pub fn localized(mut self, locale: Locale) -> Self {
        self.message = Translator::new(locale).render(self.kind, &self.params);
        self
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [{}] {}", self.span, self.category, self.message)
    }
}

impl std::error::Error for StructuredError {}
