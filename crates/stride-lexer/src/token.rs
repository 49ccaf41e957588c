//! Token types for the Stride lexer.
//!
//! Defines [`TokenKind`] covering every lexeme of the language and
//! [`Token`], which pairs a kind with a source [`Span`].

use stride_types::Span;
use std::fmt;

/// All reserved words. They cannot be used as variable or function names.
pub const ALL_KEYWORDS: &[&str] = &[
    // Statements
    "set", "to", "function", "with", "do", "end", "if", "else", "repeat", "times",
    "forever", "for", "each", "in", "return", "log",
    // Expressions
    "true", "false", "null", "and", "or", "not", "equals",
];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns `true` if this token is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every kind of token in the Stride language.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────
    /// Numeric literal: `42`, `3.14`
    Number(f64),
    /// String literal with escapes resolved: `"hello"`
    String(String),
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,

    // ── Identifiers ──────────────────────────────────────────
    /// User-defined name: `total`, `draw_house`
    Identifier(String),

    // ── Statement Keywords ───────────────────────────────────
    Set,
    To,
    Function,
    With,
    Do,
    End,
    If,
    Else,
    Repeat,
    Times,
    Forever,
    For,
    Each,
    In,
    Return,
    Log,

    // ── Expression Keywords ──────────────────────────────────
    /// `and`
    And,
    /// `or`
    Or,
    /// `not`
    Not,
    /// `equals` (same as `==`)
    Equals,

    // ── Operators ────────────────────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `!`
    Bang,
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,

    // ── Punctuation ──────────────────────────────────────────
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,

    // ── Special ──────────────────────────────────────────────
    /// Newline (statement separator)
    Newline,
    /// End of file
    Eof,
}

impl TokenKind {
    /// Look up a reserved word. Returns `None` for user identifiers.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "set" => TokenKind::Set,
            "to" => TokenKind::To,
            "function" => TokenKind::Function,
            "with" => TokenKind::With,
            "do" => TokenKind::Do,
            "end" => TokenKind::End,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "repeat" => TokenKind::Repeat,
            "times" => TokenKind::Times,
            "forever" => TokenKind::Forever,
            "for" => TokenKind::For,
            "each" => TokenKind::Each,
            "in" => TokenKind::In,
            "return" => TokenKind::Return,
            "log" => TokenKind::Log,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "equals" => TokenKind::Equals,
            _ => return None,
        })
    }

    /// Returns `true` for reserved words.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Set
                | TokenKind::To
                | TokenKind::Function
                | TokenKind::With
                | TokenKind::Do
                | TokenKind::End
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::Repeat
                | TokenKind::Times
                | TokenKind::Forever
                | TokenKind::For
                | TokenKind::Each
                | TokenKind::In
                | TokenKind::Return
                | TokenKind::Log
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::Equals
        )
    }

    /// Returns `true` for tokens that close a statement.
    pub fn ends_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Newline | TokenKind::Eof | TokenKind::End | TokenKind::Else
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Number(n) => return write!(f, "{n}"),
            TokenKind::String(s) => return write!(f, "\"{s}\""),
            TokenKind::Identifier(name) => return write!(f, "{name}"),
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Set => "set",
            TokenKind::To => "to",
            TokenKind::Function => "function",
            TokenKind::With => "with",
            TokenKind::Do => "do",
            TokenKind::End => "end",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Repeat => "repeat",
            TokenKind::Times => "times",
            TokenKind::Forever => "forever",
            TokenKind::For => "for",
            TokenKind::Each => "each",
            TokenKind::In => "in",
            TokenKind::Return => "return",
            TokenKind::Log => "log",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::Equals => "equals",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::EqEq => "==",
            TokenKind::BangEq => "!=",
            TokenKind::Bang => "!",
            TokenKind::Less => "<",
            TokenKind::LessEq => "<=",
            TokenKind::Greater => ">",
            TokenKind::GreaterEq => ">=",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Newline => "end of line",
            TokenKind::Eof => "end of file",
        };
        f.write_str(s)
    }
}
