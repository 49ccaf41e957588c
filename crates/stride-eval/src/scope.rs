//! Scoped variable environment for the Stride evaluator.
//!
//! Scopes live in an arena and point at their parents by index. They are
//! entered and exited strictly LIFO, so every live scope's index is stable.

use crate::error::ScopeError;
use crate::value::Value;
use std::collections::BTreeMap;
use std::rc::Rc;
use stride_types::ast::FunctionDecl;

/// Index of a scope in the [`Environment`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The top-level scope.
    pub const GLOBAL: ScopeId = ScopeId(0);
}

/// What introduced a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    /// One iteration of a `for each` loop. `set` skips these when creating
    /// a binding, so only the loop variable dies with them.
    Loop,
}

/// A user function together with the scope it was declared in.
#[derive(Debug, Clone)]
pub struct UserFunction {
    pub decl: Rc<FunctionDecl>,
    /// Parent for the scope of every call.
    pub scope: ScopeId,
}

/// A single scope level.
#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    /// Lexical parent used for lookups.
    parent: Option<ScopeId>,
    /// Scope that was current before this one was entered.
    previous: ScopeId,
    variables: BTreeMap<String, Value>,
    functions: BTreeMap<String, UserFunction>,
}

/// Arena of scopes with a cursor on the current one.
///
/// Variables are looked up from the current scope outward along parent
/// links. `define` always creates in the current scope; `assign` updates the
/// nearest scope that has the name and otherwise creates it in the nearest
/// non-loop scope.
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Environment {
    /// Create a new environment with one global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope {
                kind: ScopeKind::Global,
                parent: None,
                previous: ScopeId::GLOBAL,
                variables: BTreeMap::new(),
                functions: BTreeMap::new(),
            }],
            current: ScopeId::GLOBAL,
        }
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    pub fn current_kind(&self) -> ScopeKind {
        self.scope(self.current).kind
    }

    /// Number of live scopes, the global one included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Enter a new scope whose lexical parent is `parent`.
    ///
    /// For loops the parent is the current scope; for calls it is the scope
    /// the function was declared in.
    pub fn enter(&mut self, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            kind,
            parent: Some(parent),
            previous: self.current,
            variables: BTreeMap::new(),
            functions: BTreeMap::new(),
        });
        self.current = id;
        id
    }

    /// Drop the innermost scope and everything bound in it. The global scope
    /// is never dropped.
    pub fn exit(&mut self) {
        if self.scopes.len() > 1 {
            if let Some(scope) = self.scopes.pop() {
                self.current = scope.previous;
            }
        }
    }

    /// Define a variable in the current scope.
    pub fn define(&mut self, name: &str, value: Value) {
        let current = self.current;
        self.scope_mut(current)
            .variables
            .insert(name.to_string(), value);
    }

    /// Rebind `name` where it already lives, or create it in the nearest
    /// non-loop scope.
    pub fn assign(&mut self, name: &str, value: Value) {
        let target = self
            .chain()
            .find(|&id| self.scope(id).variables.contains_key(name))
            .or_else(|| {
                self.chain()
                    .find(|&id| self.scope(id).kind != ScopeKind::Loop)
            })
            .unwrap_or(ScopeId::GLOBAL);
        self.scope_mut(target)
            .variables
            .insert(name.to_string(), value);
    }

    /// Look up a variable, searching from the current scope outward.
    pub fn resolve(&self, name: &str) -> Result<&Value, ScopeError> {
        self.chain()
            .find_map(|id| self.scope(id).variables.get(name))
            .ok_or_else(|| ScopeError::VariableNotDeclared(name.to_string()))
    }

    /// Declare a function in the current scope.
    pub fn declare_function(&mut self, decl: Rc<FunctionDecl>) {
        let current = self.current;
        let name = decl.name.name.clone();
        self.scope_mut(current).functions.insert(
            name,
            UserFunction {
                decl,
                scope: current,
            },
        );
    }

    /// Look up a user function, searching from the current scope outward.
    pub fn resolve_function(&self, name: &str) -> Result<UserFunction, ScopeError> {
        self.chain()
            .find_map(|id| self.scope(id).functions.get(name))
            .cloned()
            .ok_or_else(|| ScopeError::FunctionNotDeclared(name.to_string()))
    }

    /// Every variable visible from the current scope, inner bindings
    /// shadowing outer ones.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        let mut visible = BTreeMap::new();
        for id in self.chain() {
            for (name, value) in &self.scope(id).variables {
                visible
                    .entry(name.clone())
                    .or_insert_with(|| value.clone());
            }
        }
        visible
    }

    /// Scope ids from the current scope out to the global one.
    fn chain(&self) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(self.current), |&id| self.scope(id).parent)
    }

    fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
