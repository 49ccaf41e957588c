//! Host-provided functions callable from Stride programs.

use crate::value::Value;
use std::fmt;
use std::rc::Rc;

/// Signature of a host function. An `Err` message aborts the run with
/// `ExternalFunctionFailed`.
pub type HostFn = dyn Fn(&[Value]) -> Result<Value, String>;

/// How many arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Variadic,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => n == count,
            Arity::Variadic => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::Variadic => f.write_str("any number of"),
        }
    }
}

/// A named host function.
#[derive(Clone)]
pub struct ExternalFunction {
    pub name: String,
    pub arity: Arity,
    pub description: String,
    implementation: Rc<HostFn>,
}

impl ExternalFunction {
    pub fn new(
        name: impl Into<String>,
        arity: Arity,
        implementation: impl Fn(&[Value]) -> Result<Value, String> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            description: String::new(),
            implementation: Rc::new(implementation),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Invoke the host function. Arity is checked by the caller.
    pub fn call(&self, args: &[Value]) -> Result<Value, String> {
        (self.implementation)(args)
    }
}

impl fmt::Debug for ExternalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternalFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Ordered registry of host functions.
#[derive(Debug, Clone, Default)]
pub struct ExternalFunctions {
    functions: Vec<ExternalFunction>,
}

impl ExternalFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function. A later registration under the same name replaces the
    /// earlier one in place.
    pub fn register(&mut self, function: ExternalFunction) {
        match self.functions.iter_mut().find(|f| f.name == function.name) {
            Some(existing) => *existing = function,
            None => self.functions.push(function),
        }
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, function: ExternalFunction) -> Self {
        self.register(function);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ExternalFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExternalFunction> {
        self.functions.iter()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FromIterator<ExternalFunction> for ExternalFunctions {
    fn from_iter<I: IntoIterator<Item = ExternalFunction>>(iter: I) -> Self {
        let mut registry = Self::new();
        for function in iter {
            registry.register(function);
        }
        registry
    }
}
