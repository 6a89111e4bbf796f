//! Surface of an in-process inference engine.

use parley_config::LocalEngineSettings;

/// Inputs to a single generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub prompt: String,
    /// `None` leaves the limit to the engine (usually unbounded).
    pub max_tokens: Option<u32>,
    pub temperature: f64,
    pub stop: Vec<String>,
}

/// Output of a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
    pub text: String,
    /// Prompt plus completion tokens, as reported by the engine.
    pub total_tokens: u64,
}

/// Fault raised by an engine. Not retried.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct EngineError(pub String);

/// A loaded model that can complete prompts synchronously.
///
/// Calls block the current thread until generation finishes.
pub trait InferenceEngine: Send + Sync {
    fn generate(&self, params: &GenerationParams) -> Result<Generation, EngineError>;
}

/// Loads model weights into an engine.
pub trait EngineLoader {
    fn load(&self, settings: &LocalEngineSettings) -> Result<Box<dyn InferenceEngine>, EngineError>;
}
