//! Run configuration for the interpreter pipeline.

use serde::{Deserialize, Serialize};
use stride_eval::{EvalConfig, DEFAULT_MAX_CALL_DEPTH, DEFAULT_MAX_STEPS, MAX_CALL_DEPTH_LIMIT};
use stride_types::Translator;

/// Errors raised while assembling a run, before any Stride code executes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid interpreter config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("max_steps must be at least 1")]
    ZeroStepBudget,
    #[error("max_call_depth must be at most {max}, got {requested}")]
    CallDepthTooLarge { requested: usize, max: usize },
}

/// Per-run settings.
///
/// Missing JSON fields take their defaults, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpretConfig {
    /// Locale code for error messages (`"en"`, `"nl"`, `"system"`).
    pub locale: String,
    pub max_steps: usize,
    pub max_call_depth: usize,
}

impl Default for InterpretConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            max_steps: DEFAULT_MAX_STEPS,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl InterpretConfig {
    /// Parse and [`validate`](Self::validate) a JSON config.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: InterpretConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// The step budget must be positive and the call depth no larger than
    /// [`MAX_CALL_DEPTH_LIMIT`].
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_steps == 0 {
            return Err(Error::ZeroStepBudget);
        }
        if self.max_call_depth > MAX_CALL_DEPTH_LIMIT {
            return Err(Error::CallDepthTooLarge {
                requested: self.max_call_depth,
                max: MAX_CALL_DEPTH_LIMIT,
            });
        }
        Ok(())
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_max_call_depth(mut self, max_call_depth: usize) -> Self {
        self.max_call_depth = max_call_depth;
        self
    }

    pub fn translator(&self) -> Translator {
        Translator::for_code(&self.locale)
    }

    /// The evaluator settings for this config.
    pub fn eval_config(&self) -> EvalConfig {
        EvalConfig {
            max_steps: self.max_steps,
            max_call_depth: self.max_call_depth,
            translator: self.translator(),
        }
    }
}
