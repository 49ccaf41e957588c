//! Generated Stride language reference and external function table.
//!
//! Produces two artifacts for a host:
//! 1. **Compact language reference** (plain text) listing the syntax plus the
//!    host functions registered for a run
//! 2. **External function table** (JSON) for tooling and documentation
//!
//! The function sections are generated from an [`ExternalFunctions`]
//! registry, so they change with it.

use serde::Serialize;
use stride_eval::{Arity, ExternalFunctions};

// ══════════════════════════════════════════════════════════════════════════════
// Reference Generation (text)
// ══════════════════════════════════════════════════════════════════════════════

/// Generate the compact Stride reference.
///
/// The FUNCTIONS section lists `externals` in registration order. All other
/// sections are static.
pub fn generate_reference(externals: &ExternalFunctions) -> String {
    let mut out = String::with_capacity(2048);
    out.push_str(REFERENCE_PREAMBLE);

    out.push_str("FUNCTIONS (provided by the host):\n");
    if externals.is_empty() {
        out.push_str("  (none)\n");
    }
    for function in externals.iter() {
        out.push_str(&format!("  {}", format_signature(&function.name, function.arity)));
        if !function.description.is_empty() {
            out.push_str(&format!(" - {}", function.description));
        }
        out.push('\n');
    }
    out.push('\n');

    out.push_str(REFERENCE_POSTAMBLE);
    out
}

/// The static part of the reference before FUNCTIONS.
const REFERENCE_PREAMBLE: &str = r#"Stride: a small language for learning to program. Every step is recorded.
Comments: // until end of line
One statement per line; blocks open with `do` and close with `end`.

STATEMENTS:
  set name to expression
  log expression
  if condition do ... else if condition do ... else ... end
  repeat 3 times do ... end
  repeat forever do ... end               // also: repeat do ... end
  for each item in list do ... end        // strings loop over characters
  function name with a, b do ... end
  return expression                       // or bare `return` (gives null)

VALUES: numbers, "strings", true, false, null, [lists]
  Strings support \n \t \" \\ escapes

OPERATORS (loosest first):
  or
  and
  == equals !=
  < > <= >=
  + -
  * / %
  - not !  (prefix)

"#;

/// The static part of the reference after FUNCTIONS.
const REFERENCE_POSTAMBLE: &str = r#"RULES:
  - Arithmetic and comparisons need numbers; `and`, `or`, `not` and conditions need booleans
  - `==` compares any two values, lists included
  - Dividing by zero is an error
  - `set` inside a loop changes the surrounding scope; the loop variable stays in the loop
  - `set` inside a function creates a local unless the name already exists outside
  - Functions see the variables where they were declared, not where they are called
  - A function must be declared before the statement that calls it runs
  - Functions without `return` give null
  - `return` outside a function is an error
"#;

// ══════════════════════════════════════════════════════════════════════════════
// External Function Table (JSON)
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Serialize)]
struct FunctionTable<'a> {
    version: &'static str,
    total_functions: usize,
    functions: Vec<FunctionEntry<'a>>,
}

#[derive(Serialize)]
struct FunctionEntry<'a> {
    name: &'a str,
    signature: String,
    /// `null` for variadic functions.
    arity: Option<usize>,
    variadic: bool,
    description: &'a str,
}

/// Generate a structured JSON table of the registered host functions.
///
/// Output format:
/// ```json
/// {
///   "version": "0.1.0",
///   "total_functions": 1,
///   "functions": [
///     { "name": "echo", "signature": "echo(a)", "arity": 1, "variadic": false, "description": "..." }
///   ]
/// }
/// ```
pub fn generate_function_table(externals: &ExternalFunctions) -> String {
    let functions: Vec<FunctionEntry<'_>> = externals
        .iter()
        .map(|function| FunctionEntry {
            name: &function.name,
            signature: format_signature(&function.name, function.arity),
            arity: match function.arity {
                Arity::Exact(n) => Some(n),
                Arity::Variadic => None,
            },
            variadic: function.arity == Arity::Variadic,
            description: &function.description,
        })
        .collect();
    let table = FunctionTable {
        version: crate::STRIDE_LANGUAGE_VERSION,
        total_functions: functions.len(),
        functions,
    };
    serde_json::to_string_pretty(&table).unwrap_or_else(|e| {
        format!(r#"{{"error":"Serialization error: {}"}}"#, e)
    })
}

/// Format a call shape as `name(a, b)` with placeholder parameter names, or
/// `name(...)` when variadic.
fn format_signature(name: &str, arity: Arity) -> String {
    match arity {
        Arity::Variadic => format!("{name}(...)"),
        Arity::Exact(n) => {
            let params: Vec<String> = (0..n)
                .map(|i| {
                    // a, b, ..., z, then p27, p28, ...
                    match u8::try_from(i).ok().filter(|&i| i < 26) {
                        Some(i) => char::from(b'a' + i).to_string(),
                        None => format!("p{}", i + 1),
                    }
                })
                .collect();
            format!("{name}({})", params.join(", "))
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════════════════════
