//! Expression parsing with full operator precedence.
//!
//! Precedence (lowest → highest):
//! 7. `or`
//! 6. `and`
//! 5. `==`, `!=`, `equals`
//! 4. `<`, `>`, `<=`, `>=`
//! 3. `+`, `-`
//! 2. `*`, `/`, `%`
//! 1. unary `-`, `not`, `!`
//! 0. `name(...)` calls and primaries
//!
//! Every binary level is left-associative.

use stride_lexer::token::TokenKind;
use stride_types::ast::*;
use stride_types::Result;

use crate::parser::Parser;

impl Parser {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr> {
        self.nested(Self::parse_or)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `OrExpr = AndExpr { "or" AndExpr }`
    fn parse_or(&mut self) -> Result<Expr> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            left = logical(left, LogicalOp::Or, right);
        }
        Ok(left)
    }

    /// `AndExpr = EqualityExpr { "and" EqualityExpr }`
    fn parse_and(&mut self) -> Result<Expr> {
        let mut left = self.parse_equality()?;
        while self.eat(&TokenKind::And) {
            let right = self.parse_equality()?;
            left = logical(left, LogicalOp::And, right);
        }
        Ok(left)
    }

    /// `EqualityExpr = CompExpr { ("==" | "!=" | "equals") CompExpr }`
    fn parse_equality(&mut self) -> Result<Expr> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq | TokenKind::Equals => BinOp::Eq,
                TokenKind::BangEq => BinOp::NotEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_comparison()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    /// `CompExpr = AddExpr { CompOp AddExpr }`
    fn parse_comparison(&mut self) -> Result<Expr> {
        let mut left = self.parse_add()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Less => BinOp::Less,
                TokenKind::Greater => BinOp::Greater,
                TokenKind::LessEq => BinOp::LessEq,
                TokenKind::GreaterEq => BinOp::GreaterEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_add()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    /// `AddExpr = MulExpr { ("+" | "-") MulExpr }`
    fn parse_add(&mut self) -> Result<Expr> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_mul()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    /// `MulExpr = UnaryExpr { ("*" | "/" | "%") UnaryExpr }`
    fn parse_mul(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    /// `UnaryExpr = ( "-" | "not" | "!" ) UnaryExpr | CallExpr`
    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.peek_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Not | TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_call(),
        };
        let start = self.advance().span;
        let operand = self.nested(Self::parse_unary)?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// `CallExpr = IDENT "(" [ args ] ")" | Primary`
    fn parse_call(&mut self) -> Result<Expr> {
        let TokenKind::Identifier(name) = self.peek_kind() else {
            return self.parse_primary();
        };
        let callee = Ident::new(name.clone(), self.current_span());
        self.advance();

        if !self.eat(&TokenKind::LParen) {
            let span = callee.span;
            return Ok(Expr::new(ExprKind::Variable(callee), span));
        }
        let args = self.parse_comma_list(&TokenKind::RParen)?;
        let span = callee.span.merge(self.previous_span());
        Ok(Expr::new(ExprKind::Call { callee, args }, span))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> Result<Expr> {
        let start = self.current_span();
        let literal = match self.peek_kind() {
            TokenKind::Number(n) => Literal::Number(*n),
            TokenKind::String(s) => Literal::String(s.clone()),
            TokenKind::True => Literal::Bool(true),
            TokenKind::False => Literal::Bool(false),
            TokenKind::Null => Literal::Null,
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                let span = start.merge(self.previous_span());
                return Ok(Expr::new(ExprKind::Grouping(Box::new(inner)), span));
            }
            TokenKind::LBracket => {
                self.advance();
                let items = self.parse_comma_list(&TokenKind::RBracket)?;
                let span = start.merge(self.previous_span());
                return Ok(Expr::new(ExprKind::List(items), span));
            }
            _ => return Err(self.error_at_current("expression")),
        };
        self.advance();
        Ok(Expr::new(ExprKind::Literal(literal), start))
    }

    /// Comma-separated expressions up to and including `close`. Newlines are
    /// allowed between items so long lists can span lines.
    fn parse_comma_list(&mut self, close: &TokenKind) -> Result<Vec<Expr>> {
        let mut items = Vec::new();
        self.skip_newlines();
        if self.eat(close) {
            return Ok(items);
        }
        loop {
            items.push(self.parse_expression()?);
            self.skip_newlines();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            self.skip_newlines();
        }
        self.expect(close)?;
        Ok(items)
    }
}

fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}

fn logical(left: Expr, op: LogicalOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Logical {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}
