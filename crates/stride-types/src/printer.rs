//! Renders an AST back into Stride source.
//!
//! Operators are printed without added parentheses: the parser already keeps
//! every `( ... )` it saw as an explicit [`ExprKind::Grouping`], so printing a
//! parsed tree and parsing the result gives the same tree back.

use crate::ast::*;
use std::fmt::Write;

const INDENT: usize = 2;

/// Print a whole program, one top-level statement per line.
pub fn print_program(stmts: &[Stmt]) -> String {
    let mut out = String::new();
    for stmt in stmts {
        print_stmt_into(&mut out, stmt, 0);
    }
    out
}

/// Print a single statement (with a trailing newline).
pub fn print_stmt(stmt: &Stmt) -> String {
    let mut out = String::new();
    print_stmt_into(&mut out, stmt, 0);
    out
}

/// Print an expression.
pub fn print_expr(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

fn pad(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat(' ').take(indent * INDENT));
}

fn print_stmt_into(out: &mut String, stmt: &Stmt, indent: usize) {
    pad(out, indent);
    match &stmt.kind {
        StmtKind::Set(set) => {
            let _ = write!(out, "set {} to ", set.name.name);
            write_expr(out, &set.value);
            out.push('\n');
        }
        StmtKind::Foreach(foreach) => {
            let _ = write!(out, "for each {} in ", foreach.element_name.name);
            write_expr(out, &foreach.iterable);
            out.push_str(" do\n");
            print_block(out, &foreach.body, indent + 1);
            close(out, indent);
        }
        StmtKind::If(if_stmt) => {
            write_if_head(out, if_stmt, indent);
            close(out, indent);
        }
        StmtKind::Repeat(repeat) => {
            out.push_str("repeat ");
            write_expr(out, &repeat.count);
            out.push_str(" times do\n");
            print_block(out, &repeat.body, indent + 1);
            close(out, indent);
        }
        StmtKind::RepeatForever(body) => {
            out.push_str("repeat forever do\n");
            print_block(out, body, indent + 1);
            close(out, indent);
        }
        StmtKind::Return(ret) => {
            out.push_str("return");
            if let Some(value) = &ret.value {
                out.push(' ');
                write_expr(out, value);
            }
            out.push('\n');
        }
        StmtKind::FunctionDeclaration(func) => {
            let _ = write!(out, "function {}", func.name.name);
            if !func.params.is_empty() {
                let names: Vec<&str> = func.params.iter().map(|p| p.name.as_str()).collect();
                let _ = write!(out, " with {}", names.join(", "));
            }
            out.push_str(" do\n");
            print_block(out, &func.body, indent + 1);
            close(out, indent);
        }
        StmtKind::Expression(expr) => {
            write_expr(out, expr);
            out.push('\n');
        }
        StmtKind::Log(expr) => {
            out.push_str("log ");
            write_expr(out, expr);
            out.push('\n');
        }
    }
}

/// `if cond do ... [else if ... | else ...]` without the closing `end`.
fn write_if_head(out: &mut String, if_stmt: &IfStmt, indent: usize) {
    out.push_str("if ");
    write_expr(out, &if_stmt.condition);
    out.push_str(" do\n");
    print_block(out, &if_stmt.then_block, indent + 1);
    match &if_stmt.else_branch {
        None => {}
        Some(ElseBranch::Block(block)) => {
            pad(out, indent);
            out.push_str("else\n");
            print_block(out, block, indent + 1);
        }
        Some(ElseBranch::ElseIf(stmt)) => {
            pad(out, indent);
            out.push_str("else ");
            match &stmt.kind {
                StmtKind::If(nested) => write_if_head(out, nested, indent),
                // The parser only ever nests `if` here.
                _ => {
                    out.push('\n');
                    print_stmt_into(out, stmt, indent + 1);
                }
            }
        }
    }
}

fn print_block(out: &mut String, block: &Block, indent: usize) {
    for stmt in &block.stmts {
        print_stmt_into(out, stmt, indent);
    }
}

fn close(out: &mut String, indent: usize) {
    pad(out, indent);
    out.push_str("end\n");
}

fn write_expr(out: &mut String, expr: &Expr) {
    match &expr.kind {
        ExprKind::Literal(lit) => write_literal(out, lit),
        ExprKind::List(items) => {
            out.push('[');
            write_comma_separated(out, items);
            out.push(']');
        }
        ExprKind::Binary { left, op, right } => {
            write_expr(out, left);
            let _ = write!(out, " {} ", op.as_str());
            write_expr(out, right);
        }
        ExprKind::Logical { left, op, right } => {
            write_expr(out, left);
            let _ = write!(out, " {} ", op.as_str());
            write_expr(out, right);
        }
        ExprKind::Unary { op, operand } => {
            match op {
                UnaryOp::Neg => out.push('-'),
                UnaryOp::Not => out.push_str("not "),
            }
            write_expr(out, operand);
        }
        ExprKind::Variable(ident) => out.push_str(&ident.name),
        ExprKind::Call { callee, args } => {
            out.push_str(&callee.name);
            out.push('(');
            write_comma_separated(out, args);
            out.push(')');
        }
        ExprKind::Grouping(inner) => {
            out.push('(');
            write_expr(out, inner);
            out.push(')');
        }
    }
}

fn write_comma_separated(out: &mut String, exprs: &[Expr]) {
    for (i, e) in exprs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(out, e);
    }
}

fn write_literal(out: &mut String, lit: &Literal) {
    match lit {
        Literal::Number(n) => {
            let _ = write!(out, "{n}");
        }
        Literal::String(s) => {
            out.push('"');
            for ch in s.chars() {
                match ch {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\t' => out.push_str("\\t"),
                    c => out.push(c),
                }
            }
            out.push('"');
        }
        Literal::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Literal::Null => out.push_str("null"),
    }
}
