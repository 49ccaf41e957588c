//! Core statement and expression evaluator.

use crate::error::{EvalResult, ScopeError};
use crate::external::{Arity, ExternalFunction, ExternalFunctions};
use crate::frame::{Timeline, TimelineBuilder};
use crate::scope::{Environment, ScopeKind, UserFunction};
use crate::value::Value;
use std::rc::Rc;
use stride_types::ast::*;
use stride_types::{ErrorKind, Span, StructuredError, Translator};

/// Default step budget.
pub const DEFAULT_MAX_STEPS: usize = 10_000;
/// Default limit on nested user-function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 64;
/// Ceiling on `max_call_depth`. Larger configured values are clamped to it.
pub const MAX_CALL_DEPTH_LIMIT: usize = 512;

// Grow the native stack when less than the red zone remains.
#[cfg(not(target_family = "wasm"))]
const STACK_RED_ZONE: usize = 128 * 1024;
#[cfg(not(target_family = "wasm"))]
const STACK_GROW_SIZE: usize = 4 * 1024 * 1024;

#[cfg(not(target_family = "wasm"))]
fn with_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW_SIZE, f)
}

#[cfg(target_family = "wasm")]
fn with_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

const NO_PARAMS: [(&str, &str); 0] = [];

const REPEAT_COUNT: &str = "a whole number of at least 0";

/// Per-run settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    /// Statements plus loop iterations allowed before `LoopBudgetExceeded`.
    pub max_steps: usize,
    /// Nested user calls allowed before `RecursionLimitExceeded`.
    pub max_call_depth: usize,
    /// Renders runtime error messages.
    pub translator: Translator,
}

impl EvalConfig {
    /// The call depth actually enforced: `max_call_depth`, capped at
    /// [`MAX_CALL_DEPTH_LIMIT`].
    pub fn call_depth_limit(&self) -> usize {
        self.max_call_depth.min(MAX_CALL_DEPTH_LIMIT)
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            translator: Translator::default(),
        }
    }
}

/// How a statement finished.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Normal,
    /// A `return` unwinding to the nearest call.
    Return(Value),
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct EvalOutcome {
    pub timeline: Timeline,
    /// Text of every executed `log`, in order.
    pub logs: Vec<String>,
}

impl EvalOutcome {
    /// The runtime fault that ended the run, if any.
    pub fn error(&self) -> Option<&StructuredError> {
        self.timeline.error()
    }
}

/// Run `program` to completion with a fresh evaluator.
pub fn evaluate(program: &[Stmt], externals: &ExternalFunctions, config: EvalConfig) -> EvalOutcome {
    Evaluator::new(externals, config).run(program)
}

/// The core evaluator: walks statements, mutates scopes, records frames.
///
/// One evaluator serves exactly one run.
pub struct Evaluator<'a> {
    env: Environment,
    timeline: TimelineBuilder,
    externals: &'a ExternalFunctions,
    config: EvalConfig,
    /// Steps consumed so far.
    steps: usize,
    /// Active user-function calls.
    call_depth: usize,
    logs: Vec<String>,
}

impl<'a> Evaluator<'a> {
    pub fn new(externals: &'a ExternalFunctions, config: EvalConfig) -> Self {
        Self {
            env: Environment::new(),
            timeline: TimelineBuilder::new(),
            externals,
            config,
            steps: 0,
            call_depth: 0,
            logs: Vec::new(),
        }
    }

    /// Execute the top-level statements in order. The first runtime fault
    /// becomes the timeline's final frame.
    pub fn run(mut self, program: &[Stmt]) -> EvalOutcome {
        tracing::debug!(
            statements = program.len(),
            max_steps = self.config.max_steps,
            "evaluation started"
        );
        let result = self.exec_program(program);
        let timeline = match result {
            Ok(()) => self.timeline.finish(),
            Err(error) => {
                tracing::debug!(kind = %error.kind, line = error.line(), "runtime fault");
                // Scopes are not unwound on error, so this is the fault site.
                let variables = self.env.snapshot();
                self.timeline.fail(variables, error)
            }
        };
        tracing::debug!(
            frames = timeline.len(),
            steps = self.steps,
            status = ?timeline.status(),
            "evaluation finished"
        );
        EvalOutcome {
            timeline,
            logs: self.logs,
        }
    }

    fn exec_program(&mut self, program: &[Stmt]) -> EvalResult<()> {
        for stmt in program {
            // Top-level `return` is an error, so only Normal gets here.
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Bookkeeping
    // ══════════════════════════════════════════════════════════════════════

    /// Consume one step of the budget.
    fn step(&mut self, span: Span) -> EvalResult<()> {
        self.steps += 1;
        if self.steps > self.config.max_steps {
            return Err(self.error(
                ErrorKind::LoopBudgetExceeded,
                [("max_steps", self.config.max_steps.to_string())],
                span,
            ));
        }
        Ok(())
    }

    /// Append a success frame for `stmt` with the current variables.
    fn record(&mut self, stmt: &Stmt, description: impl Into<String>) {
        let variables = self.env.snapshot();
        let time = self.timeline.push(stmt.line(), variables, description);
        tracing::trace!(time, line = stmt.line(), "frame recorded");
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
        StructuredError::new(kind, params, span, &self.config.translator)
    }

    fn scope_error(&self, err: ScopeError, span: Span) -> StructuredError {
        let kind = match err {
            ScopeError::VariableNotDeclared(_) => ErrorKind::VariableNotDeclared,
            ScopeError::FunctionNotDeclared(_) => ErrorKind::FunctionNotDeclared,
        };
        self.error(kind, [("name", err.name())], span)
    }

    fn type_mismatch(&self, operation: &str, expected: &str, found: &Value, span: Span) -> StructuredError {
        self.error(
            ErrorKind::TypeMismatch,
            [
                ("operation", operation),
                ("expected", expected),
                ("found", found.type_name()),
            ],
            span,
        )
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Completion> {
        with_stack(|| self.exec_stmt_inner(stmt))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt) -> EvalResult<Completion> {
        self.step(stmt.span)?;
        match &stmt.kind {
            StmtKind::Set(set) => {
                let value = self.eval_expr(&set.value)?;
                let description = format!("Set {} to {}", set.name.name, value.literal());
                self.env.assign(&set.name.name, value);
                self.record(stmt, description);
                Ok(Completion::Normal)
            }
            StmtKind::Log(expr) => {
                let value = self.eval_expr(expr)?;
                self.record(stmt, format!("Logged {}", value.literal()));
                self.logs.push(value.to_string());
                Ok(Completion::Normal)
            }
            StmtKind::Expression(expr) => {
                let value = self.eval_expr(expr)?;
                let description = match &expr.kind {
                    ExprKind::Call { callee, .. } => format!("Called {}", callee.name),
                    _ => format!("Evaluated to {}", value.literal()),
                };
                self.record(stmt, description);
                Ok(Completion::Normal)
            }
            StmtKind::If(if_stmt) => self.exec_if(stmt, if_stmt),
            StmtKind::Foreach(foreach) => self.exec_foreach(stmt, foreach),
            StmtKind::Repeat(repeat) => self.exec_repeat(stmt, repeat),
            StmtKind::RepeatForever(body) => self.exec_repeat_forever(stmt, body),
            StmtKind::FunctionDeclaration(decl) => {
                self.env.declare_function(Rc::new(decl.clone()));
                Ok(Completion::Normal)
            }
            StmtKind::Return(ret) => {
                if self.call_depth == 0 {
                    return Err(self.error(ErrorKind::ReturnOutsideFunction, NO_PARAMS, stmt.span));
                }
                let (value, description) = match &ret.value {
                    Some(expr) => {
                        let value = self.eval_expr(expr)?;
                        let description = format!("Returned {}", value.literal());
                        (value, description)
                    }
                    None => (Value::Null, "Returned from the function".to_string()),
                };
                self.record(stmt, description);
                Ok(Completion::Return(value))
            }
        }
    }

    fn exec_block(&mut self, block: &Block) -> EvalResult<Completion> {
        for stmt in &block.stmts {
            if let Completion::Return(value) = self.exec_stmt(stmt)? {
                return Ok(Completion::Return(value));
            }
        }
        Ok(Completion::Normal)
    }

    fn exec_if(&mut self, stmt: &Stmt, if_stmt: &IfStmt) -> EvalResult<Completion> {
        let condition = self.eval_condition(&if_stmt.condition, "if")?;
        self.record(stmt, format!("The condition is {condition}"));
        if condition {
            return self.exec_block(&if_stmt.then_block);
        }
        match &if_stmt.else_branch {
            Some(ElseBranch::ElseIf(nested)) => self.exec_stmt(nested),
            Some(ElseBranch::Block(block)) => self.exec_block(block),
            None => Ok(Completion::Normal),
        }
    }

    /// One frame per element, recorded before the loop variable is bound.
    /// Each iteration gets a fresh loop scope.
    fn exec_foreach(&mut self, stmt: &Stmt, foreach: &ForeachStmt) -> EvalResult<Completion> {
        let iterable = self.eval_expr(&foreach.iterable)?;
        let Some(items) = iterable.iter_items() else {
            return Err(self.type_mismatch(
                "for each",
                "a list or a string",
                &iterable,
                foreach.iterable.span,
            ));
        };
        if items.is_empty() {
            self.record(stmt, "There is nothing to loop over, so the body is skipped");
            return Ok(Completion::Normal);
        }

        let name = &foreach.element_name.name;
        let total = items.len();
        for (index, item) in items.into_iter().enumerate() {
            self.step(stmt.span)?;
            self.record(
                stmt,
                format!("Iteration {} of {total}: {name} becomes {}", index + 1, item.literal()),
            );
            let parent = self.env.current();
            self.env.enter(ScopeKind::Loop, parent);
            self.env.define(name, item);
            let completion = self.exec_block(&foreach.body)?;
            self.env.exit();
            if let Completion::Return(_) = completion {
                return Ok(completion);
            }
        }
        Ok(Completion::Normal)
    }

    fn exec_repeat(&mut self, stmt: &Stmt, repeat: &RepeatStmt) -> EvalResult<Completion> {
        let count = match self.eval_expr(&repeat.count)? {
            Value::Number(n) if n >= 0.0 && n.fract() == 0.0 => n as u64,
            // A number of the wrong shape is reported by value.
            Value::Number(n) => {
                return Err(self.error(
                    ErrorKind::TypeMismatch,
                    [
                        ("operation", "repeat".to_string()),
                        ("expected", REPEAT_COUNT.to_string()),
                        ("found", n.to_string()),
                    ],
                    repeat.count.span,
                ))
            }
            other => {
                return Err(self.type_mismatch("repeat", REPEAT_COUNT, &other, repeat.count.span))
            }
        };
        if count == 0 {
            self.record(stmt, "Repeat 0 times, so the body is skipped");
            return Ok(Completion::Normal);
        }
        for iteration in 1..=count {
            self.step(stmt.span)?;
            self.record(stmt, format!("Iteration {iteration} of {count}"));
            if let Completion::Return(value) = self.exec_block(&repeat.body)? {
                return Ok(Completion::Return(value));
            }
        }
        Ok(Completion::Normal)
    }

    /// Runs until a `return` or the step budget stops it.
    fn exec_repeat_forever(&mut self, stmt: &Stmt, body: &Block) -> EvalResult<Completion> {
        let mut iteration: u64 = 0;
        loop {
            iteration += 1;
            self.step(stmt.span)?;
            self.record(stmt, format!("Iteration {iteration}"));
            if let Completion::Return(value) = self.exec_block(body)? {
                return Ok(Completion::Return(value));
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an expression to a Value.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        with_stack(|| self.eval_expr_inner(expr))
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(match lit {
                Literal::Number(n) => Value::Number(*n),
                Literal::String(s) => Value::String(s.clone()),
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Null => Value::Null,
            }),
            ExprKind::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval_expr(item)?);
                }
                Ok(Value::List(values))
            }
            ExprKind::Variable(ident) => self
                .env
                .resolve(&ident.name)
                .cloned()
                .map_err(|err| self.scope_error(err, ident.span)),
            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right, expr.span),
            ExprKind::Logical { left, op, right } => self.eval_logical(left, *op, right),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand, expr.span),
            ExprKind::Call { callee, args } => self.eval_call(callee, args, expr.span),
            ExprKind::Grouping(inner) => self.eval_expr(inner),
        }
    }

    fn eval_condition(&mut self, expr: &Expr, operation: &str) -> EvalResult<bool> {
        let value = self.eval_expr(expr)?;
        value
            .as_bool()
            .ok_or_else(|| self.type_mismatch(operation, "a boolean", &value, expr.span))
    }

    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr, span: Span) -> EvalResult<Value> {
        let lv = self.eval_expr(left)?;
        let rv = self.eval_expr(right)?;

        // Equality is structural and works on every value.
        match op {
            BinOp::Eq => return Ok(Value::Bool(lv == rv)),
            BinOp::NotEq => return Ok(Value::Bool(lv != rv)),
            _ => {}
        }

        let (a, b) = match (&lv, &rv) {
            (Value::Number(a), Value::Number(b)) => (*a, *b),
            (Value::Number(_), other) | (other, _) => {
                return Err(self.type_mismatch(op.as_str(), "a number", other, span))
            }
        };

        Ok(match op {
            BinOp::Add => Value::Number(a + b),
            BinOp::Sub => Value::Number(a - b),
            BinOp::Mul => Value::Number(a * b),
            BinOp::Div | BinOp::Mod if b == 0.0 => {
                return Err(self.error(ErrorKind::DivisionByZero, NO_PARAMS, span))
            }
            BinOp::Div => Value::Number(a / b),
            BinOp::Mod => Value::Number(a % b),
            BinOp::Less => Value::Bool(a < b),
            BinOp::Greater => Value::Bool(a > b),
            BinOp::LessEq => Value::Bool(a <= b),
            BinOp::GreaterEq => Value::Bool(a >= b),
            BinOp::Eq => Value::Bool(a == b),
            BinOp::NotEq => Value::Bool(a != b),
        })
    }

    /// `and` / `or`: both sides must be booleans; the right side is skipped
    /// when the left one decides the result.
    fn eval_logical(&mut self, left: &Expr, op: LogicalOp, right: &Expr) -> EvalResult<Value> {
        let lhs = self.eval_condition(left, op.as_str())?;
        match (op, lhs) {
            (LogicalOp::And, false) => return Ok(Value::Bool(false)),
            (LogicalOp::Or, true) => return Ok(Value::Bool(true)),
            _ => {}
        }
        let rhs = self.eval_condition(right, op.as_str())?;
        Ok(Value::Bool(rhs))
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr, span: Span) -> EvalResult<Value> {
        let value = self.eval_expr(operand)?;
        match (op, &value) {
            (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
            (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (UnaryOp::Neg, _) => Err(self.type_mismatch("-", "a number", &value, span)),
            (UnaryOp::Not, _) => Err(self.type_mismatch("not", "a boolean", &value, span)),
        }
    }

    // ── Calls ────────────────────────────────────────────────────────────

    /// User functions shadow host functions of the same name.
    fn eval_call(&mut self, callee: &Ident, args: &[Expr], span: Span) -> EvalResult<Value> {
        let externals = self.externals;
        match self.env.resolve_function(&callee.name) {
            Ok(function) => self.call_user(function, args, span),
            Err(not_found) => match externals.get(&callee.name) {
                Some(external) => self.call_external(external, args, span),
                None => Err(self.scope_error(not_found, callee.span)),
            },
        }
    }

    fn check_arity(&self, name: &str, arity: Arity, received: usize, span: Span) -> EvalResult<()> {
        if arity.accepts(received) {
            return Ok(());
        }
        Err(self.error(
            ErrorKind::WrongNumberOfArguments,
            [
                ("name", name.to_string()),
                ("expected", arity.to_string()),
                ("received", received.to_string()),
            ],
            span,
        ))
    }

    fn eval_args(&mut self, args: &[Expr]) -> EvalResult<Vec<Value>> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }
        Ok(values)
    }

    /// Bind arguments in a new function scope under the declaring scope and
    /// run the body. A body that falls off the end returns `null`.
    fn call_user(&mut self, function: UserFunction, args: &[Expr], span: Span) -> EvalResult<Value> {
        let decl = &function.decl;
        self.check_arity(&decl.name.name, Arity::Exact(decl.params.len()), args.len(), span)?;
        let values = self.eval_args(args)?;
        let limit = self.config.call_depth_limit();
        if self.call_depth >= limit {
            return Err(self.error(
                ErrorKind::RecursionLimitExceeded,
                [("max_depth", limit.to_string())],
                span,
            ));
        }

        tracing::trace!(name = %decl.name.name, depth = self.call_depth + 1, "calling function");
        self.call_depth += 1;
        self.env.enter(ScopeKind::Function, function.scope);
        for (param, value) in decl.params.iter().zip(values) {
            self.env.define(&param.name, value);
        }
        let completion = self.exec_block(&decl.body)?;
        self.env.exit();
        self.call_depth -= 1;

        Ok(match completion {
            Completion::Return(value) => value,
            Completion::Normal => Value::Null,
        })
    }

    /// Host calls are opaque: no frames of their own.
    fn call_external(
        &mut self,
        external: &ExternalFunction,
        args: &[Expr],
        span: Span,
    ) -> EvalResult<Value> {
        self.check_arity(&external.name, external.arity, args.len(), span)?;
        let values = self.eval_args(args)?;
        tracing::trace!(name = %external.name, args = values.len(), "calling external function");
        external.call(&values).map_err(|message| {
            self.error(
                ErrorKind::ExternalFunctionFailed,
                [("name", external.name.clone()), ("message", message)],
                span,
            )
        })
    }
}
