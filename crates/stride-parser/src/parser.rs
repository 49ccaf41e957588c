//! Core parser infrastructure: token cursor, error reporting, helpers.

use stride_lexer::token::{Token, TokenKind};
use stride_types::ast::{Ident, Stmt};
use stride_types::{ErrorKind, Result, Span, StructuredError, Translator};

/// How deeply blocks and expressions may nest before the parse is rejected.
pub const MAX_NESTING_DEPTH: usize = 64;

/// The Stride parser.
///
/// Consumes a token stream produced by the lexer and builds an AST.
/// Stops at the first error; there is no recovery.
pub struct Parser {
    /// The token stream, always ending with `Eof`.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Renders error messages.
    translator: Translator,
    /// Current block and expression nesting depth.
    depth: usize,
}

impl Parser {
    /// Create a new parser from a token stream.
    pub fn new(mut tokens: Vec<Token>, translator: Translator) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let span = tokens.last().map(|t| t.span).unwrap_or(Span::point(1, 1));
            tokens.push(Token::new(TokenKind::Eof, span));
        }
        Self {
            tokens,
            pos: 0,
            translator,
            depth: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// Returns the current token without advancing.
    pub(crate) fn peek(&self) -> &Token {
        // `new` guarantees a trailing Eof, and `advance` never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Returns the previously consumed token's span.
    pub(crate) fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::point(1, 1)
        }
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Returns `true` if the current token is `Eof`.
    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ── Newline Handling ──────────────────────────────────────────────────────

    /// Skip all consecutive newline tokens.
    pub(crate) fn skip_newlines(&mut self) {
        while self.check(&TokenKind::Newline) {
            self.advance();
        }
    }

    /// A statement must be followed by a newline, `end`, `else` or the end of
    /// the file. Only newlines are consumed.
    pub(crate) fn expect_statement_end(&mut self) -> Result<()> {
        if self.check(&TokenKind::Newline) {
            self.skip_newlines();
            Ok(())
        } else if self.peek_kind().ends_statement() {
            Ok(())
        } else {
            Err(self.error_at_current("end of line"))
        }
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind and return it.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Result<Token> {
        if self.check(expected) {
            Ok(self.advance())
        } else {
            Err(self.error_at_current(&format!("'{expected}'")))
        }
    }

    /// Expect an identifier token.
    pub(crate) fn expect_identifier(&mut self) -> Result<Ident> {
        match self.peek_kind() {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Ok(Ident::new(name, span))
            }
            _ => Err(self.error_at_current("identifier")),
        }
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Build the error for a token that does not fit `expected`.
    ///
    /// Running out of tokens is reported as `UnexpectedEndOfFile`, anything
    /// else as `UnexpectedToken`.
    pub(crate) fn error_at_current(&self, expected: &str) -> StructuredError {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            StructuredError::new(
                ErrorKind::UnexpectedEndOfFile,
                [("expected", expected)],
                token.span,
                &self.translator,
            )
        } else {
            StructuredError::new(
                ErrorKind::UnexpectedToken,
                [("expected", expected.to_string()), ("found", token.kind.to_string())],
                token.span,
                &self.translator,
            )
        }
    }

    /// Run `parse` one nesting level deeper. Past [`MAX_NESTING_DEPTH`] the
    /// parse stops with `NestingTooDeep` instead of recursing further.
    pub(crate) fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(StructuredError::new(
                ErrorKind::NestingTooDeep,
                [("max_depth", MAX_NESTING_DEPTH.to_string())],
                self.current_span(),
                &self.translator,
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the token stream into the program's top-level statements.
    pub fn parse(mut self) -> Result<Vec<Stmt>> {
        let program = self.parse_program();
        match &program {
            Ok(stmts) => tracing::debug!(statements = stmts.len(), "parsed program"),
            Err(err) => tracing::debug!(kind = %err.kind, line = err.line(), "parse failed"),
        }
        program
    }
}
