//! Statement parsing.

use crate::parser::Parser;
use stride_lexer::token::TokenKind;
use stride_types::ast::*;
use stride_types::Result;

impl Parser {
    /// `program = { NEWLINE } { statement { NEWLINE } } EOF`
    pub(crate) fn parse_program(&mut self) -> Result<Vec<Stmt>> {
        self.skip_newlines();
        let mut stmts = Vec::new();
        while !self.at_end() {
            // `end` and `else` close blocks; at the top level they are stray.
            if matches!(self.peek_kind(), TokenKind::End | TokenKind::Else) {
                return Err(self.error_at_current("statement"));
            }
            stmts.push(self.parse_statement()?);
        }
        Ok(stmts)
    }

    /// Parse statements up to (but not including) `end` or `else`.
    pub(crate) fn parse_block(&mut self) -> Result<Block> {
        self.nested(Self::parse_block_body)
    }

    fn parse_block_body(&mut self) -> Result<Block> {
        let start = self.current_span();
        self.skip_newlines();
        let mut stmts = Vec::new();
        while !matches!(self.peek_kind(), TokenKind::End | TokenKind::Else) {
            if self.at_end() {
                return Err(self.error_at_current("'end'"));
            }
            stmts.push(self.parse_statement()?);
        }
        let span = match (stmts.first(), stmts.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => start,
        };
        Ok(Block { stmts, span })
    }

    /// Parse a single statement, including its terminating newline.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt> {
        let start = self.current_span();
        let kind = match self.peek_kind() {
            TokenKind::Set => self.parse_set()?,
            TokenKind::If => {
                self.advance(); // eat `if`
                let if_stmt = self.parse_if_tail()?;
                self.expect(&TokenKind::End)?;
                StmtKind::If(if_stmt)
            }
            TokenKind::Repeat => self.parse_repeat()?,
            TokenKind::For => self.parse_foreach()?,
            TokenKind::Function => self.parse_function()?,
            TokenKind::Return => {
                self.advance(); // eat `return`
                let value = if self.peek_kind().ends_statement() {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                StmtKind::Return(ReturnStmt { value })
            }
            TokenKind::Log => {
                self.advance(); // eat `log`
                StmtKind::Log(self.parse_expression()?)
            }
            _ => StmtKind::Expression(self.parse_expression()?),
        };
        let span = start.merge(self.previous_span());
        self.expect_statement_end()?;
        Ok(Stmt::new(kind, span))
    }

    /// `set name to value`
    fn parse_set(&mut self) -> Result<StmtKind> {
        self.advance(); // eat `set`
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::To)?;
        let value = self.parse_expression()?;
        Ok(StmtKind::Set(SetStmt { name, value }))
    }

    /// Everything after `if` up to the closing `end`, which is left for the
    /// caller. `else if` recurses here, so a whole chain shares one `end`.
    fn parse_if_tail(&mut self) -> Result<IfStmt> {
        let condition = self.parse_expression()?;
        self.expect(&TokenKind::Do)?;
        let then_block = self.parse_block()?;

        let else_branch = if self.eat(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                let start = self.advance().span;
                let nested = self.nested(Self::parse_if_tail)?;
                let span = start.merge(self.previous_span());
                Some(ElseBranch::ElseIf(Box::new(Stmt::new(
                    StmtKind::If(nested),
                    span,
                ))))
            } else {
                Some(ElseBranch::Block(self.parse_block()?))
            }
        } else {
            None
        };

        Ok(IfStmt {
            condition,
            then_block,
            else_branch,
        })
    }

    /// `repeat count times do ... end` or `repeat [forever] do ... end`
    fn parse_repeat(&mut self) -> Result<StmtKind> {
        self.advance(); // eat `repeat`
        if self.eat(&TokenKind::Forever) || self.check(&TokenKind::Do) {
            let body = self.parse_do_block()?;
            return Ok(StmtKind::RepeatForever(body));
        }
        let count = self.parse_expression()?;
        self.expect(&TokenKind::Times)?;
        let body = self.parse_do_block()?;
        Ok(StmtKind::Repeat(RepeatStmt { count, body }))
    }

    /// `for each name in iterable do ... end`
    fn parse_foreach(&mut self) -> Result<StmtKind> {
        self.advance(); // eat `for`
        self.expect(&TokenKind::Each)?;
        let element_name = self.expect_identifier()?;
        self.expect(&TokenKind::In)?;
        let iterable = self.parse_expression()?;
        let body = self.parse_do_block()?;
        Ok(StmtKind::Foreach(ForeachStmt {
            element_name,
            iterable,
            body,
        }))
    }

    /// `function name [with a, b] do ... end`
    fn parse_function(&mut self) -> Result<StmtKind> {
        self.advance(); // eat `function`
        let name = self.expect_identifier()?;
        let mut params = Vec::new();
        if self.eat(&TokenKind::With) {
            params.push(self.expect_identifier()?);
            while self.eat(&TokenKind::Comma) {
                params.push(self.expect_identifier()?);
            }
        }
        let body = self.parse_do_block()?;
        Ok(StmtKind::FunctionDeclaration(FunctionDecl { name, params, body }))
    }

    /// `do block end`
    fn parse_do_block(&mut self) -> Result<Block> {
        self.expect(&TokenKind::Do)?;
        let body = self.parse_block()?;
        self.expect(&TokenKind::End)?;
        Ok(body)
    }
}
