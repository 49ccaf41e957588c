//! Core Stride lexer: converts source text to a token stream.
//!
//! - Newline-separated statements: `\n` is a token, other whitespace is not
//! - Single-line comments (`//`) are stripped
//! - Stops at the first fault; there is no recovery
//! - Columns count characters, not bytes

use stride_types::{ErrorKind, Result, Span, StructuredError, Translator};

use crate::token::{Token, TokenKind};

/// The Stride lexer.
pub struct Lexer<'src> {
    /// The full source text.
    text: &'src str,
    /// The same text as bytes.
    source: &'src [u8],
    /// Current byte offset into `source`.
    pos: usize,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    col: u32,
    /// Renders error messages.
    translator: Translator,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(text: &'src str, translator: Translator) -> Self {
        Self {
            text,
            source: text.as_bytes(),
            pos: 0,
            line: 1,
            col: 1,
            translator,
        }
    }

    /// Lex the entire source into a token stream ending with
    /// [`TokenKind::Eof`].
    pub fn lex(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.source.get(self.pos).copied()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else if ch & 0xC0 != 0x80 {
            // UTF-8 continuation bytes don't start a new column
            self.col += 1;
        }
        Some(ch)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn error<K, V>(
        &self,
        kind: ErrorKind,
        params: impl IntoIterator<Item = (K, V)>,
        span: Span,
    ) -> StructuredError
    where
        K: Into<String>,
        V: Into<String>,
    {
        StructuredError::new(kind, params, span, &self.translator)
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip spaces, tabs, carriage returns and `//` comments (NOT newlines).
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r') => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(ch) = self.peek() {
                        if ch == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Result<Token> {
        self.skip_trivia();

        let start_line = self.line;
        let start_col = self.col;
        let start = self.pos;
        let Some(ch) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, Span::point(self.line, self.col)));
        };

        let kind = match ch {
            b'\n' => TokenKind::Newline,
            b'"' => return self.scan_string(start_line, start_col),
            b'0'..=b'9' => return self.scan_number(start, start_line, start_col),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                return Ok(self.scan_identifier(start, start_line, start_col))
            }

            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b',' => TokenKind::Comma,

            b'=' if self.peek() == Some(b'=') => {
                self.advance();
                TokenKind::EqEq
            }
            b'!' if self.peek() == Some(b'=') => {
                self.advance();
                TokenKind::BangEq
            }
            b'!' => TokenKind::Bang,
            b'<' if self.peek() == Some(b'=') => {
                self.advance();
                TokenKind::LessEq
            }
            b'<' => TokenKind::Less,
            b'>' if self.peek() == Some(b'=') => {
                self.advance();
                TokenKind::GreaterEq
            }
            b'>' => TokenKind::Greater,

            _ => {
                // Report the whole character, not just its first byte
                let character = self.text[start..].chars().next().unwrap_or('\u{FFFD}');
                for _ in 1..character.len_utf8() {
                    self.advance();
                }
                let span = self.span_from(start_line, start_col);
                return Err(self.error(
                    ErrorKind::UnknownCharacter,
                    [("character", character.to_string())],
                    span,
                ));
            }
        };

        Ok(Token::new(kind, self.span_from(start_line, start_col)))
    }

    // ─────────────────────────────────────────────────────────────
    // Number literals
    // ─────────────────────────────────────────────────────────────

    fn scan_number(&mut self, start: usize, start_line: u32, start_col: u32) -> Result<Token> {
        // We already consumed the first digit
        while let Some(b'0'..=b'9') = self.peek() {
            self.advance();
        }

        if self.peek() == Some(b'.') {
            self.advance(); // consume '.'
            let mut fraction_digits = 0;
            while let Some(b'0'..=b'9') = self.peek() {
                self.advance();
                fraction_digits += 1;
            }
            if fraction_digits == 0 {
                return Err(self.malformed_number(start, start_line, start_col));
            }
        }

        // `1.2.3`, `12abc`
        if matches!(
            self.peek(),
            Some(b'.' | b'_' | b'a'..=b'z' | b'A'..=b'Z')
        ) {
            return Err(self.malformed_number(start, start_line, start_col));
        }

        let text = &self.text[start..self.pos];
        let span = self.span_from(start_line, start_col);
        // Literals too large for an f64 parse to infinity.
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Token::new(TokenKind::Number(value), span)),
            _ => Err(self.error(ErrorKind::MalformedNumber, [("lexeme", text)], span)),
        }
    }

    /// Consume the rest of a bad number so the error covers all of it.
    fn malformed_number(&mut self, start: usize, start_line: u32, start_col: u32) -> StructuredError {
        while matches!(
            self.peek(),
            Some(b'.' | b'_' | b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z')
        ) {
            self.advance();
        }
        let span = self.span_from(start_line, start_col);
        self.error(
            ErrorKind::MalformedNumber,
            [("lexeme", &self.text[start..self.pos])],
            span,
        )
    }

    // ─────────────────────────────────────────────────────────────
    // Identifiers & keywords
    // ─────────────────────────────────────────────────────────────

    fn scan_identifier(&mut self, start: usize, start_line: u32, start_col: u32) -> Token {
        // First character was already consumed
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == b'_' {
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.text[start..self.pos];
        let kind = TokenKind::from_keyword(text)
            .unwrap_or_else(|| TokenKind::Identifier(text.to_string()));
        Token::new(kind, self.span_from(start_line, start_col))
    }

    // ─────────────────────────────────────────────────────────────
    // String literals
    // ─────────────────────────────────────────────────────────────

    /// Scan a string literal starting after the opening `"`.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> Result<Token> {
        let mut buf: Vec<u8> = Vec::new();

        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    let span = self.span_from(start_line, start_col);
                    return Err(self.error(
                        ErrorKind::UnterminatedString,
                        Vec::<(&str, &str)>::new(),
                        span,
                    ));
                }
                Some(b'"') => {
                    self.advance();
                    // Only split at ASCII bytes, so the buffer stays valid UTF-8
                    let value = String::from_utf8_lossy(&buf).into_owned();
                    return Ok(Token::new(
                        TokenKind::String(value),
                        self.span_from(start_line, start_col),
                    ));
                }
                Some(b'\\') => {
                    self.advance();
                    match self.peek() {
                        Some(b'"') => buf.push(b'"'),
                        Some(b'\\') => buf.push(b'\\'),
                        Some(b'n') => buf.push(b'\n'),
                        Some(b't') => buf.push(b'\t'),
                        // Unknown escapes are kept literally
                        Some(b'\n') | None => continue,
                        Some(other) => {
                            buf.push(b'\\');
                            buf.push(other);
                        }
                    }
                    self.advance();
                }
                Some(ch) => {
                    self.advance();
                    buf.push(ch);
                }
            }
        }
    }
}
