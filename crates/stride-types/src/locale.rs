//! Message templates and the per-run translator.
//!
//! A [`Translator`] is an ordinary value handed to each lexer, parser and
//! evaluator run. Nothing here is global, so two runs with different locales
//! never observe each other.

use crate::error::{ErrorKind, ErrorParam};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported message locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Machine-readable rendering: `Kind: param: value, ...`.
    System,
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "nl")]
    Dutch,
}

impl Locale {
    /// Resolve a locale code such as `"en"`, `"nl-BE"` or `"system"`.
    ///
    /// Unknown codes fall back to [`Locale::English`].
    pub fn from_code(code: &str) -> Locale {
        let code = code.trim().to_ascii_lowercase();
        let primary = code.split(['-', '_']).next().unwrap_or("");
        match primary {
            "system" => Locale::System,
            "nl" => Locale::Dutch,
            _ => Locale::English,
        }
    }

    /// The canonical code for this locale.
    pub fn code(self) -> &'static str {
        match self {
            Locale::System => "system",
            Locale::English => "en",
            Locale::Dutch => "nl",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Renders error kinds into text for one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Translator {
    locale: Locale,
}

impl Translator {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Shorthand for `Translator::new(Locale::from_code(code))`.
    pub fn for_code(code: &str) -> Self {
        Self::new(Locale::from_code(code))
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Render `kind` with its params.
    pub fn render(&self, kind: ErrorKind, params: &[ErrorParam]) -> String {
        match self.locale {
            Locale::System => render_system(kind, params),
            Locale::English => fill(english(kind), params),
            Locale::Dutch => fill(dutch(kind), params),
        }
    }
}

fn render_system(kind: ErrorKind, params: &[ErrorParam]) -> String {
    if params.is_empty() {
        return kind.as_str().to_string();
    }
    let rendered: Vec<String> = params
        .iter()
        .map(|p| format!("{}: {}", p.name, p.value))
        .collect();
    format!("{}: {}", kind.as_str(), rendered.join(", "))
}

/// Substitute `{name}` placeholders. Placeholders without a matching param
/// are left as written.
fn fill(template: &str, params: &[ErrorParam]) -> String {
    let mut out = template.to_string();
    for p in params {
        out = out.replace(&format!("{{{}}}", p.name), &p.value);
    }
    out
}

fn english(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::UnknownCharacter => "Unknown character '{character}'.",
        ErrorKind::UnterminatedString => "This string is missing its closing quote.",
        ErrorKind::MalformedNumber => "'{lexeme}' is not a valid number.",
        ErrorKind::UnexpectedToken => "Expected {expected} but found {found}.",
        ErrorKind::UnexpectedEndOfFile => {
            "The program ended unexpectedly. Expected {expected}."
        }
        ErrorKind::NestingTooDeep => {
            "This code is nested more than {max_depth} levels deep. Try splitting it up."
        }
        ErrorKind::VariableNotDeclared => {
            "Did you forget to declare a variable called '{name}'?"
        }
        ErrorKind::FunctionNotDeclared => "There is no function called '{name}'.",
        ErrorKind::TypeMismatch => "'{operation}' expected {expected} but got {found}.",
        ErrorKind::DivisionByZero => "You can't divide by zero.",
        ErrorKind::WrongNumberOfArguments => {
            "'{name}' expects {expected} argument(s) but received {received}."
        }
        ErrorKind::ReturnOutsideFunction => "You can only use 'return' inside a function.",
        ErrorKind::LoopBudgetExceeded => {
            "Your program ran for more than {max_steps} steps. Is there an infinite loop?"
        }
        ErrorKind::RecursionLimitExceeded => {
            "Functions called each other more than {max_depth} levels deep."
        }
        ErrorKind::ExternalFunctionFailed => "The function '{name}' failed: {message}",
    }
}

fn dutch(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::UnknownCharacter => "Onbekend teken '{character}'.",
        ErrorKind::UnterminatedString => "Deze tekst mist een afsluitend aanhalingsteken.",
        ErrorKind::MalformedNumber => "'{lexeme}' is geen geldig getal.",
        ErrorKind::UnexpectedToken => "Verwachtte {expected} maar vond {found}.",
        ErrorKind::UnexpectedEndOfFile => {
            "Het programma eindigde onverwacht. Verwachtte {expected}."
        }
        ErrorKind::NestingTooDeep => {
            "Deze code is meer dan {max_depth} niveaus diep genest. Probeer hem op te splitsen."
        }
        ErrorKind::VariableNotDeclared => {
            "Ben je vergeten een variabele '{name}' te declareren?"
        }
        ErrorKind::FunctionNotDeclared => "Er is geen functie met de naam '{name}'.",
        ErrorKind::TypeMismatch => "'{operation}' verwachtte {expected} maar kreeg {found}.",
        ErrorKind::DivisionByZero => "Je kunt niet door nul delen.",
        ErrorKind::WrongNumberOfArguments => {
            "'{name}' verwacht {expected} argument(en) maar kreeg er {received}."
        }
        ErrorKind::ReturnOutsideFunction => "Je kunt 'return' alleen in een functie gebruiken.",
        ErrorKind::LoopBudgetExceeded => {
            "Je programma liep langer dan {max_steps} stappen. Is er een oneindige lus?"
        }
        ErrorKind::RecursionLimitExceeded => {
            "Functies riepen elkaar meer dan {max_depth} niveaus diep aan."
        }
        ErrorKind::ExternalFunctionFailed => "De functie '{name}' is mislukt: {message}",
    }
}
