//! Stride parser: converts a token stream into an AST.
//!
//! Statements are parsed by recursive descent, expressions by one function
//! per precedence level. The first malformed construct stops the parse.

mod parse_expr;
mod parse_stmt;
mod parser;

pub use parser::{Parser, MAX_NESTING_DEPTH};

use stride_lexer::Lexer;
use stride_types::ast::Stmt;
use stride_types::{Result, Translator};

/// Lex and parse `source` in one go.
pub fn parse_source(source: &str, translator: &Translator) -> Result<Vec<Stmt>> {
    let tokens = Lexer::new(source, *translator).lex()?;
    Parser::new(tokens, *translator).parse()
}
