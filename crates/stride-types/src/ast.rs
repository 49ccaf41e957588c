//! AST node types for the Stride language.
//!
//! Every node carries a [`Span`] so frames and errors can point back at the
//! source line that produced them. Equality deliberately compares spans too;
//! use [`crate::printer`] plus [`Stmt::strip_spans`] when comparing shapes.

use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers
// ══════════════════════════════════════════════════════════════════════════════

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// The originating source line.
    pub fn line(&self) -> u32 {
        self.span.line()
    }
}

/// The kind of statement.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `set name to value`
    Set(SetStmt),
    /// `for each item in iterable do ... end`
    Foreach(ForeachStmt),
    /// `if cond do ... [else ...] end`
    If(IfStmt),
    /// `repeat count times do ... end`
    Repeat(RepeatStmt),
    /// `repeat [forever] do ... end`
    RepeatForever(Block),
    /// `return [value]`
    Return(ReturnStmt),
    /// `function name [with a, b] do ... end`
    FunctionDeclaration(FunctionDecl),
    /// A bare expression, usually a call.
    Expression(Expr),
    /// `log value`
    Log(Expr),
}

/// `set name to value`
#[derive(Debug, Clone, PartialEq)]
pub struct SetStmt {
    pub name: Ident,
    pub value: Expr,
}

/// `for each item in iterable do body end`
#[derive(Debug, Clone, PartialEq)]
pub struct ForeachStmt {
    pub element_name: Ident,
    pub iterable: Expr,
    pub body: Block,
}

/// `if condition do then_block [else else_branch] end`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_block: Block,
    pub else_branch: Option<ElseBranch>,
}

/// The else branch of an if statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    /// `else if cond do ...`, sharing the outer `end`.
    ElseIf(Box<Stmt>),
    /// `else ...`
    Block(Block),
}

/// `repeat count times do body end`
#[derive(Debug, Clone, PartialEq)]
pub struct RepeatStmt {
    pub count: Expr,
    pub body: Block,
}

/// `return [value]`. `value` is `None` when no expression follows.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
}

/// `function name with a, b do body end`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Block,
}

/// A sequence of statements closed by `end` (or `else`).
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An expression with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn line(&self) -> u32 {
        self.span.line()
    }
}

/// The kind of expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `42`, `"hi"`, `true`, `null`
    Literal(Literal),
    /// `[expr, ...]`
    List(Vec<Expr>),
    /// `a + b`, `a == b`, ...
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    /// `a and b`, `a or b`, short-circuiting.
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
    },
    /// `-x`, `not x`
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `my_var`
    Variable(Ident),
    /// `name(args...)`
    Call { callee: Ident, args: Vec<Expr> },
    /// `(expr)`
    Grouping(Box<Expr>),
}

/// A literal value written in source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
}

// ── Operators ─────────────────────────────────────────────────────────────────

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Equality
    Eq,
    NotEq,
    // Comparison
    Less,
    Greater,
    LessEq,
    GreaterEq,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    /// Returns the operator symbol for error messages and printing.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::Greater => ">",
            BinOp::LessEq => "<=",
            BinOp::GreaterEq => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }
}

/// Short-circuiting operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `not x` / `!x`
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "not",
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Span erasure
// ══════════════════════════════════════════════════════════════════════════════

impl Stmt {
    /// Clone with every span reset, for comparing trees parsed from
    /// differently formatted sources.
    pub fn strip_spans(&self) -> Stmt {
        let kind = match &self.kind {
            StmtKind::Set(s) => StmtKind::Set(SetStmt {
                name: strip_ident(&s.name),
                value: s.value.strip_spans(),
            }),
            StmtKind::Foreach(f) => StmtKind::Foreach(ForeachStmt {
                element_name: strip_ident(&f.element_name),
                iterable: f.iterable.strip_spans(),
                body: f.body.strip_spans(),
            }),
            StmtKind::If(i) => StmtKind::If(IfStmt {
                condition: i.condition.strip_spans(),
                then_block: i.then_block.strip_spans(),
                else_branch: i.else_branch.as_ref().map(|e| match e {
                    ElseBranch::ElseIf(s) => ElseBranch::ElseIf(Box::new(s.strip_spans())),
                    ElseBranch::Block(b) => ElseBranch::Block(b.strip_spans()),
                }),
            }),
            StmtKind::Repeat(r) => StmtKind::Repeat(RepeatStmt {
                count: r.count.strip_spans(),
                body: r.body.strip_spans(),
            }),
            StmtKind::RepeatForever(b) => StmtKind::RepeatForever(b.strip_spans()),
            StmtKind::Return(r) => StmtKind::Return(ReturnStmt {
                value: r.value.as_ref().map(Expr::strip_spans),
            }),
            StmtKind::FunctionDeclaration(f) => StmtKind::FunctionDeclaration(FunctionDecl {
                name: strip_ident(&f.name),
                params: f.params.iter().map(strip_ident).collect(),
                body: f.body.strip_spans(),
            }),
            StmtKind::Expression(e) => StmtKind::Expression(e.strip_spans()),
            StmtKind::Log(e) => StmtKind::Log(e.strip_spans()),
        };
        Stmt::new(kind, Span::default())
    }
}

impl Block {
    pub fn strip_spans(&self) -> Block {
        Block {
            stmts: self.stmts.iter().map(Stmt::strip_spans).collect(),
            span: Span::default(),
        }
    }
}

impl Expr {
    pub fn strip_spans(&self) -> Expr {
        let kind = match &self.kind {
            ExprKind::Literal(l) => ExprKind::Literal(l.clone()),
            ExprKind::List(items) => ExprKind::List(items.iter().map(Expr::strip_spans).collect()),
            ExprKind::Binary { left, op, right } => ExprKind::Binary {
                left: Box::new(left.strip_spans()),
                op: *op,
                right: Box::new(right.strip_spans()),
            },
            ExprKind::Logical { left, op, right } => ExprKind::Logical {
                left: Box::new(left.strip_spans()),
                op: *op,
                right: Box::new(right.strip_spans()),
            },
            ExprKind::Unary { op, operand } => ExprKind::Unary {
                op: *op,
                operand: Box::new(operand.strip_spans()),
            },
            ExprKind::Variable(ident) => ExprKind::Variable(strip_ident(ident)),
            ExprKind::Call { callee, args } => ExprKind::Call {
                callee: strip_ident(callee),
                args: args.iter().map(Expr::strip_spans).collect(),
            },
            ExprKind::Grouping(inner) => ExprKind::Grouping(Box::new(inner.strip_spans())),
        };
        Expr::new(kind, Span::default())
    }
}

fn strip_ident(ident: &Ident) -> Ident {
    Ident::new(ident.name.clone(), Span::default())
}
