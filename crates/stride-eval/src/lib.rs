//! Stride tree-walking evaluator.
//!
//! Executes a parsed program statement by statement against an arena of
//! scopes and records every step as a [`Frame`] in a [`Timeline`]. Host
//! functions are reached through an [`ExternalFunctions`] registry.

pub mod error;
pub mod evaluator;
pub mod external;
pub mod frame;
pub mod scope;
pub mod value;

pub use error::{EvalResult, ScopeError};
pub use evaluator::{
    evaluate, Completion, EvalConfig, EvalOutcome, Evaluator, DEFAULT_MAX_CALL_DEPTH,
    DEFAULT_MAX_STEPS, MAX_CALL_DEPTH_LIMIT,
};
pub use external::{Arity, ExternalFunction, ExternalFunctions, HostFn};
pub use frame::{Frame, FrameStatus, Timeline, TimelineBuilder};
pub use scope::{Environment, ScopeId, ScopeKind};
pub use value::Value;
