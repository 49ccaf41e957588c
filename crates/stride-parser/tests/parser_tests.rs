//! Parser tests.
//!
//! Covers: every statement form, return shapes, expression precedence,
//! one-line blocks, else-if chains, syntax errors, nesting limits,
//! print/re-parse round-trips, and determinism.

use stride_lexer::Lexer;
use stride_parser::{parse_source, Parser, MAX_NESTING_DEPTH};
use stride_types::ast::*;
use stride_types::printer::{print_expr, print_program};
use stride_types::{ErrorCategory, ErrorKind, Locale, StructuredError, Translator};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn parse(source: &str) -> Result<Vec<Stmt>, StructuredError> {
    parse_source(source, &Translator::new(Locale::System))
}

/// Parse source and return the statements, panicking on errors.
fn parse_ok(source: &str) -> Vec<Stmt> {
    parse(source).unwrap_or_else(|e| panic!("unexpected parse error: {e}"))
}

fn parse_err(source: &str) -> StructuredError {
    match parse(source) {
        Ok(stmts) => panic!("expected a parse error, got {stmts:?}"),
        Err(e) => e,
    }
}

/// Parse a single expression statement and return its expression.
fn expr(source: &str) -> Expr {
    let stmts = parse_ok(source);
    assert_eq!(stmts.len(), 1, "expected one statement in {source:?}");
    match &stmts[0].kind {
        StmtKind::Expression(e) => e.clone(),
        other => panic!("expected expression statement, got {other:?}"),
    }
}

fn stripped(stmts: &[Stmt]) -> Vec<Stmt> {
    stmts.iter().map(Stmt::strip_spans).collect()
}

fn assert_round_trip(source: &str) {
    let first = parse_ok(source);
    let printed = print_program(&first);
    let second = parse(&printed)
        .unwrap_or_else(|e| panic!("printed program does not parse: {e}\n{printed}"));
    assert_eq!(
        stripped(&first),
        stripped(&second),
        "round-trip changed the tree:\n{printed}"
    );
}

// ─────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_program() {
    assert!(parse_ok("").is_empty());
    assert!(parse_ok("\n\n// only a comment\n").is_empty());
}

#[test]
fn test_set_statement() {
    let stmts = parse_ok("set total to 5");
    let StmtKind::Set(set) = &stmts[0].kind else {
        panic!("expected set, got {:?}", stmts[0].kind);
    };
    assert_eq!(set.name.name, "total");
    assert_eq!(set.value.kind, ExprKind::Literal(Literal::Number(5.0)));
    assert_eq!(stmts[0].line(), 1);
}

#[test]
fn test_statement_lines() {
    let stmts = parse_ok("\nset a to 1\n\n\nlog a\n");
    assert_eq!(stmts.len(), 2);
    assert_eq!(stmts[0].line(), 2);
    assert_eq!(stmts[1].line(), 5);
}

#[test]
fn test_log_statement() {
    let stmts = parse_ok("log \"hi\"");
    let StmtKind::Log(value) = &stmts[0].kind else {
        panic!("expected log, got {:?}", stmts[0].kind);
    };
    assert_eq!(value.kind, ExprKind::Literal(Literal::String("hi".into())));
    assert_eq!(stmts[0].span.start_col, 1);
    assert_eq!(stmts[0].span.end_col, 8);
}

#[test]
fn test_foreach_one_line() {
    let stmts = parse_ok("for each num in [1] do echo(num) end");
    assert_eq!(stmts.len(), 1);
    let StmtKind::Foreach(foreach) = &stmts[0].kind else {
        panic!("expected foreach");
    };
    assert_eq!(foreach.element_name.name, "num");
    assert!(matches!(&foreach.iterable.kind, ExprKind::List(items) if items.len() == 1));
    assert_eq!(foreach.body.stmts.len(), 1);
    let StmtKind::Expression(call) = &foreach.body.stmts[0].kind else {
        panic!("expected call statement");
    };
    let ExprKind::Call { callee, args } = &call.kind else {
        panic!("expected call");
    };
    assert_eq!(callee.name, "echo");
    assert_eq!(args.len(), 1);
}

#[test]
fn test_foreach_multi_line_with_empty_list() {
    let stmts = parse_ok("for each x in [] do\n  log x\nend\n");
    let StmtKind::Foreach(foreach) = &stmts[0].kind else {
        panic!("expected foreach");
    };
    assert!(matches!(&foreach.iterable.kind, ExprKind::List(items) if items.is_empty()));
    assert_eq!(foreach.body.stmts[0].line(), 2);
}

#[test]
fn test_return_without_value_is_absent() {
    let stmts = parse_ok("return");
    assert_eq!(stmts[0].kind, StmtKind::Return(ReturnStmt { value: None }));

    let stmts = parse_ok("function f do\n  return\nend");
    let StmtKind::FunctionDeclaration(func) = &stmts[0].kind else {
        panic!("expected function");
    };
    assert_eq!(
        func.body.stmts[0].kind,
        StmtKind::Return(ReturnStmt { value: None })
    );
}

#[test]
fn test_return_number_literal() {
    let stmts = parse_ok("return 2");
    let StmtKind::Return(ReturnStmt { value: Some(value) }) = &stmts[0].kind else {
        panic!("expected return with value");
    };
    assert_eq!(value.kind, ExprKind::Literal(Literal::Number(2.0)));
}

#[test]
fn test_return_string_literal() {
    let stmts = parse_ok("return \"hello there!\"");
    let StmtKind::Return(ReturnStmt { value: Some(value) }) = &stmts[0].kind else {
        panic!("expected return with value");
    };
    assert_eq!(
        value.kind,
        ExprKind::Literal(Literal::String("hello there!".into()))
    );
}

#[test]
fn test_function_declaration() {
    let stmts = parse_ok("function add with a, b do\n  return a + b\nend");
    let StmtKind::FunctionDeclaration(func) = &stmts[0].kind else {
        panic!("expected function");
    };
    assert_eq!(func.name.name, "add");
    let params: Vec<&str> = func.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(params, ["a", "b"]);
    assert_eq!(func.body.stmts.len(), 1);
}

#[test]
fn test_function_without_params() {
    let stmts = parse_ok("function greet do log \"hi\" end");
    let StmtKind::FunctionDeclaration(func) = &stmts[0].kind else {
        panic!("expected function");
    };
    assert!(func.params.is_empty());
}

#[test]
fn test_repeat_times() {
    let stmts = parse_ok("repeat 3 times do\n  log 1\nend");
    let StmtKind::Repeat(repeat) = &stmts[0].kind else {
        panic!("expected repeat");
    };
    assert_eq!(repeat.count.kind, ExprKind::Literal(Literal::Number(3.0)));
    assert_eq!(repeat.body.stmts.len(), 1);
}

#[test]
fn test_repeat_forever_forms() {
    for src in ["repeat forever do\n  log 1\nend", "repeat do log 1 end"] {
        let stmts = parse_ok(src);
        assert!(
            matches!(&stmts[0].kind, StmtKind::RepeatForever(body) if body.stmts.len() == 1),
            "{src}"
        );
    }
}

#[test]
fn test_if_else() {
    let stmts = parse_ok("if x > 1 do\n  log 1\nelse\n  log 2\nend");
    let StmtKind::If(if_stmt) = &stmts[0].kind else {
        panic!("expected if");
    };
    assert_eq!(if_stmt.then_block.stmts.len(), 1);
    assert!(matches!(
        &if_stmt.else_branch,
        Some(ElseBranch::Block(b)) if b.stmts.len() == 1
    ));
}

#[test]
fn test_else_if_chain_shares_end() {
    let src = "if x == 1 do\n  log 1\nelse if x == 2 do\n  log 2\nelse\n  log 3\nend\nlog 4";
    let stmts = parse_ok(src);
    assert_eq!(stmts.len(), 2);
    let StmtKind::If(outer) = &stmts[0].kind else {
        panic!("expected if");
    };
    let Some(ElseBranch::ElseIf(nested)) = &outer.else_branch else {
        panic!("expected else-if");
    };
    let StmtKind::If(inner) = &nested.kind else {
        panic!("else-if should wrap an if");
    };
    assert!(matches!(inner.else_branch, Some(ElseBranch::Block(_))));
}

#[test]
fn test_nested_if_in_else_block_needs_own_end() {
    let src = "if a do\n  log 1\nelse\n  if b do\n    log 2\n  end\nend";
    let stmts = parse_ok(src);
    let StmtKind::If(outer) = &stmts[0].kind else {
        panic!("expected if");
    };
    let Some(ElseBranch::Block(block)) = &outer.else_branch else {
        panic!("expected else block");
    };
    assert!(matches!(block.stmts[0].kind, StmtKind::If(_)));
}

#[test]
fn test_one_line_if() {
    let stmts = parse_ok("if true do log 1 else log 2 end");
    assert!(matches!(stmts[0].kind, StmtKind::If(_)));
}

// ─────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let e = expr("f(1 + 2 * 3)");
    let ExprKind::Call { args, .. } = &e.kind else {
        panic!("expected call");
    };
    let ExprKind::Binary { op, right, .. } = &args[0].kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinOp::Add);
    assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Mul, .. }));
}

#[test]
fn test_subtraction_is_left_associative() {
    let stmts = parse_ok("log 10 - 4 - 3");
    let StmtKind::Log(e) = &stmts[0].kind else {
        panic!("expected log");
    };
    let ExprKind::Binary { left, op, .. } = &e.kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinOp::Sub);
    assert!(matches!(left.kind, ExprKind::Binary { op: BinOp::Sub, .. }));
    assert_eq!(print_expr(e), "10 - 4 - 3");
}

#[test]
fn test_logical_precedence() {
    let stmts = parse_ok("log a or b and c");
    let StmtKind::Log(e) = &stmts[0].kind else {
        panic!("expected log");
    };
    let ExprKind::Logical { op, right, .. } = &e.kind else {
        panic!("expected logical");
    };
    assert_eq!(*op, LogicalOp::Or);
    assert!(matches!(
        right.kind,
        ExprKind::Logical {
            op: LogicalOp::And,
            ..
        }
    ));
}

#[test]
fn test_equality_below_comparison() {
    let stmts = parse_ok("log 1 < 2 equals true");
    let StmtKind::Log(e) = &stmts[0].kind else {
        panic!("expected log");
    };
    let ExprKind::Binary { left, op, .. } = &e.kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinOp::Eq);
    assert!(matches!(left.kind, ExprKind::Binary { op: BinOp::Less, .. }));
}

#[test]
fn test_unary_operators() {
    let stmts = parse_ok("log not true\nlog !false\nlog --1");
    let kinds: Vec<&ExprKind> = stmts
        .iter()
        .map(|s| match &s.kind {
            StmtKind::Log(e) => &e.kind,
            other => panic!("expected log, got {other:?}"),
        })
        .collect();
    assert!(matches!(kinds[0], ExprKind::Unary { op: UnaryOp::Not, .. }));
    assert!(matches!(kinds[1], ExprKind::Unary { op: UnaryOp::Not, .. }));
    let ExprKind::Unary { op: UnaryOp::Neg, operand } = kinds[2] else {
        panic!("expected negation");
    };
    assert!(matches!(operand.kind, ExprKind::Unary { op: UnaryOp::Neg, .. }));
}

#[test]
fn test_grouping_is_kept() {
    let stmts = parse_ok("log (1 + 2) * 3");
    let StmtKind::Log(e) = &stmts[0].kind else {
        panic!("expected log");
    };
    let ExprKind::Binary { left, op, .. } = &e.kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinOp::Mul);
    assert!(matches!(left.kind, ExprKind::Grouping(_)));
}

#[test]
fn test_call_with_no_args_and_nested_calls() {
    let e = expr("outer(inner(), [1, 2], \"s\")");
    let ExprKind::Call { callee, args } = &e.kind else {
        panic!("expected call");
    };
    assert_eq!(callee.name, "outer");
    assert_eq!(args.len(), 3);
    assert!(matches!(&args[0].kind, ExprKind::Call { args, .. } if args.is_empty()));
}

#[test]
fn test_list_may_span_lines() {
    let stmts = parse_ok("set xs to [\n  1,\n  2,\n  3\n]\nlog xs");
    assert_eq!(stmts.len(), 2);
    let StmtKind::Set(set) = &stmts[0].kind else {
        panic!("expected set");
    };
    assert!(matches!(&set.value.kind, ExprKind::List(items) if items.len() == 3));
}

#[test]
fn test_literals() {
    let stmts = parse_ok("log true\nlog false\nlog null\nlog 2.5");
    let literals: Vec<&ExprKind> = stmts
        .iter()
        .map(|s| match &s.kind {
            StmtKind::Log(e) => &e.kind,
            other => panic!("expected log, got {other:?}"),
        })
        .collect();
    assert_eq!(literals[0], &ExprKind::Literal(Literal::Bool(true)));
    assert_eq!(literals[1], &ExprKind::Literal(Literal::Bool(false)));
    assert_eq!(literals[2], &ExprKind::Literal(Literal::Null));
    assert_eq!(literals[3], &ExprKind::Literal(Literal::Number(2.5)));
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_missing_to_in_set() {
    let err = parse_err("set x 5");
    assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    assert_eq!(err.category, ErrorCategory::Syntax);
    assert_eq!(err.param("expected"), Some("'to'"));
    assert_eq!(err.param("found"), Some("5"));
    assert_eq!((err.span.start_line, err.span.start_col), (1, 7));
}

#[test]
fn test_missing_end_is_end_of_file() {
    let err = parse_err("for each x in [1] do\n  log x\n");
    assert_eq!(err.kind, ErrorKind::UnexpectedEndOfFile);
    assert_eq!(err.param("expected"), Some("'end'"));
    assert_eq!(err.message, "UnexpectedEndOfFile: expected: 'end'");
}

#[test]
fn test_missing_expression() {
    let err = parse_err("set x to\nlog x");
    assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    assert_eq!(err.param("expected"), Some("expression"));
    assert_eq!(err.param("found"), Some("end of line"));
}

#[test]
fn test_two_statements_on_one_line() {
    let err = parse_err("log 1 log 2");
    assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    assert_eq!(err.param("expected"), Some("end of line"));
    assert_eq!(err.param("found"), Some("log"));
}

#[test]
fn test_stray_end_at_top_level() {
    let err = parse_err("log 1\nend");
    assert_eq!(err.kind, ErrorKind::UnexpectedToken);
    assert_eq!(err.param("found"), Some("end"));
    assert_eq!(err.line(), 2);
}

#[test]
fn test_keyword_is_not_an_identifier() {
    let err = parse_err("set end to 1");
    assert_eq!(err.param("expected"), Some("identifier"));
}

#[test]
fn test_unclosed_call() {
    let err = parse_err("echo(1, 2");
    assert_eq!(err.kind, ErrorKind::UnexpectedEndOfFile);
    assert_eq!(err.param("expected"), Some("')'"));
}

#[test]
fn test_lexer_errors_pass_through() {
    assert_eq!(parse_err("log \"open").kind, ErrorKind::UnterminatedString);
}

#[test]
fn test_error_locale() {
    let err = parse_source("set x 5", &Translator::new(Locale::English)).unwrap_err();
    assert_eq!(err.message, "Expected 'to' but found 5.");
}

// ─────────────────────────────────────────────────────────────────────
// Nesting limits
// ─────────────────────────────────────────────────────────────────────

fn assert_too_deep(source: &str) {
    let err = parse_err(source);
    assert_eq!(err.kind, ErrorKind::NestingTooDeep, "{}", err.message);
    assert_eq!(err.category, ErrorCategory::Syntax);
    assert_eq!(err.param("max_depth"), Some(MAX_NESTING_DEPTH.to_string().as_str()));
}

#[test]
fn test_deep_parentheses_are_rejected() {
    let source = format!("log {}1{}", "(".repeat(10_000), ")".repeat(10_000));
    assert_too_deep(&source);
}

#[test]
fn test_deep_unary_chains_are_rejected() {
    assert_too_deep(&format!("log {}true", "not ".repeat(10_000)));
    assert_too_deep(&format!("log {}1", "-".repeat(10_000)));
    assert_too_deep(&format!("log {}true", "!".repeat(10_000)));
}

#[test]
fn test_deep_lists_and_calls_are_rejected() {
    assert_too_deep(&format!("log {}{}", "[".repeat(10_000), "]".repeat(10_000)));
    assert_too_deep(&format!("log {}1{}", "f(".repeat(10_000), ")".repeat(10_000)));
}

#[test]
fn test_deep_blocks_are_rejected() {
    let source = format!("{}{}", "if true do\n".repeat(10_000), "end\n".repeat(10_000));
    assert_too_deep(&source);

    let source = format!(
        "{}{}",
        "repeat 2 times do\n".repeat(10_000),
        "end\n".repeat(10_000)
    );
    assert_too_deep(&source);
}

#[test]
fn test_long_else_if_chain_is_rejected() {
    let mut source = String::from("if x == 0 do log 0");
    for i in 1..10_000 {
        source.push_str(&format!(" else if x == {i} do log {i}"));
    }
    source.push_str(" end");
    assert_too_deep(&source);
}

#[test]
fn test_nesting_within_limit_parses() {
    let depth = MAX_NESTING_DEPTH / 2;
    parse_ok(&format!("log {}1{}", "(".repeat(depth), ")".repeat(depth)));
    parse_ok(&format!("log {}true", "not ".repeat(depth)));
    parse_ok(&format!("{}{}", "if true do\n".repeat(depth / 2), "end\n".repeat(depth / 2)));

    let mut source = String::from("if x == 0 do log 0");
    for i in 1..depth / 2 {
        source.push_str(&format!(" else if x == {i} do log {i}"));
    }
    source.push_str(" end");
    parse_ok(&source);
}

#[test]
fn test_nesting_message_in_english() {
    let source = format!("log {}1{}", "(".repeat(500), ")".repeat(500));
    let err = parse_source(&source, &Translator::new(Locale::English)).unwrap_err();
    assert_eq!(
        err.message,
        format!(
            "This code is nested more than {MAX_NESTING_DEPTH} levels deep. Try splitting it up."
        )
    );
}

// ─────────────────────────────────────────────────────────────────────
// Round-trip & determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_round_trip_programs() {
    let programs = [
        "set x to 1\nlog x",
        "for each num in [1, 2, 3] do echo(num) end",
        "function fib with n do\n  if n < 2 do\n    return n\n  end\n  return fib(n - 1) + fib(n - 2)\nend\nlog fib(10)",
        "if a == 1 do log 1 else if a != 2 do log 2 else log 3 end",
        "repeat 3 times do\n  set total to (total + 1) * 2\nend",
        "repeat forever do\n  return\nend",
        "log not (a and b) or -x % 2 >= 1",
        "log \"tab\\tquote\\\" slash\\\\ line\\n\"",
        "log [[], [null, true], \"x\"]",
        "function noop do\nend",
    ];
    for src in programs {
        assert_round_trip(src);
    }
}

#[test]
fn test_round_trip_largest_number() {
    assert_round_trip(&format!("set x to {}", f64::MAX));
    let printed = print_program(&parse_ok(&format!("log {}", f64::MAX)));
    assert!(!printed.contains("inf"), "{printed}");
}

#[test]
fn test_overflowing_literal_is_rejected() {
    let err = parse_err(&format!("set x to 1{}", "0".repeat(400)));
    assert_eq!(err.kind, ErrorKind::MalformedNumber);
}

#[test]
fn test_same_tokens_same_tree() {
    let source = "function add with a, b do\n  return a + b\nend\nlog add(1, 2)";
    let tokens = Lexer::new(source, Translator::default()).lex().unwrap();
    let a = Parser::new(tokens.clone(), Translator::default()).parse().unwrap();
    let b = Parser::new(tokens, Translator::default()).parse().unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_parser_determinism_100_iterations() {
    let source = "set xs to [1, 2, 3]\nfor each x in xs do\n  if x > 1 do log x end\nend";
    let first = parse_ok(source);
    for i in 0..100 {
        assert_eq!(first, parse_ok(source), "Determinism failure at iteration {i}");
    }
}
