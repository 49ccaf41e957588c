//! Stride interpreter as a WASM module for browser environments.
//!
//! This crate exposes the Stride pipeline via `wasm-bindgen`. Everything
//! crosses the boundary as JSON strings, so the host only needs
//! `JSON.parse`.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { interpret } from 'stride-wasm';
//!
//! await init();
//!
//! const result = JSON.parse(interpret("log 1 + 2", '{"locale": "nl"}'));
//! // { status: "SUCCESS", timeline: { frames: [...] }, error: null, logs: ["3"], source_hash: "..." }
//! ```
//!
//! # Host functions
//!
//! Programs run here have no external functions: every call that is not a
//! user-defined function fails with `FunctionNotDeclared`, and the reference
//! from [`get_reference`] lists none. Hosts that need their own functions
//! embed the `stride` crate and register them on a `stride::Context`.

use serde::Serialize;
use stride::{Context, InterpretConfig, StructuredError};
use wasm_bindgen::prelude::*;

/// Run a Stride program.
///
/// `config_json` is an `InterpretConfig` (`{"locale", "max_steps",
/// "max_call_depth"}`, every field optional); an empty string means the
/// defaults. Returns a JSON `InterpretResult`. An unusable config gives
/// `{"status":"ERROR","config_error":"..."}` instead. No host functions are
/// registered.
#[wasm_bindgen]
pub fn interpret(source: &str, config_json: &str) -> String {
    let config = if config_json.trim().is_empty() {
        Ok(InterpretConfig::default())
    } else {
        InterpretConfig::from_json(config_json)
    };
    match config {
        Ok(config) => to_json(&stride::interpret(source, &Context::new(config))),
        Err(e) => config_error(&e.to_string()),
    }
}

fn config_error(message: &str) -> String {
    serde_json::json!({
        "status": "ERROR",
        "config_error": message,
    })
    .to_string()
}

#[derive(Serialize)]
struct CheckResult {
    success: bool,
    error: Option<StructuredError>,
}

/// Syntax-check a Stride program without running it.
///
/// Returns `{"success": true, "error": null}` or the first syntax error,
/// rendered in `locale`. Faster than [`interpret`] for editor diagnostics.
#[wasm_bindgen]
pub fn check(source: &str, locale: &str) -> String {
    let error = stride::check(source, locale);
    to_json(&CheckResult {
        success: error.is_none(),
        error,
    })
}

/// Return the interpreter version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Return the compact Stride language reference.
#[wasm_bindgen]
pub fn get_reference() -> String {
    stride::reference::generate_reference(&stride::ExternalFunctions::new())
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| config_error(&format!("Serialization error: {e}")))
}
