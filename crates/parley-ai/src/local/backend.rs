//! CompletionBackend over an in-process engine.

use async_trait::async_trait;
use parley_config::schema::DEFAULT_TEMPERATURE;
use parley_config::SessionConfig;
use tracing::debug;

use super::engine::{EngineError, EngineLoader, GenerationParams, InferenceEngine};
use super::prompt::render_prompt;
use crate::{AiError, CompletionBackend, CompletionRequest, CompletionResult};

/// Backend that owns a loaded model for the life of the process.
pub struct LocalBackend {
    engine: Box<dyn InferenceEngine>,
    user_name: String,
    assistant_name: String,
}

impl LocalBackend {
    pub fn new(engine: Box<dyn InferenceEngine>, config: &SessionConfig) -> Self {
        Self {
            engine,
            user_name: config.user_name.clone(),
            assistant_name: config.assistant_name.clone(),
        }
    }

    /// Load the engine described by the config's local settings.
    pub fn load(loader: &dyn EngineLoader, config: &SessionConfig) -> Result<Self, AiError> {
        let settings = &config.backend.local;
        if settings.model_path.is_none() {
            return Err(AiError::EngineFailure(EngineError(
                "model_path is not configured".into(),
            )));
        }
        debug!(
            model_path = ?settings.model_path,
            n_threads = settings.n_threads,
            n_gpu_layers = settings.n_gpu_layers,
            n_ctx = settings.n_ctx,
            "loading local model"
        );
        let engine = loader.load(settings)?;
        Ok(Self::new(engine, config))
    }

    pub(crate) fn generation_params(&self, request: &CompletionRequest) -> GenerationParams {
        GenerationParams {
            prompt: render_prompt(
                &request.system_prompt,
                request.turns(),
                &self.user_name,
                &self.assistant_name,
            ),
            max_tokens: request.max_tokens,
            temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            stop: request.stop.clone(),
        }
    }
}

#[async_trait]
impl CompletionBackend for LocalBackend {
    fn name(&self) -> &str {
        "local"
    }

    /// Runs the engine on the calling thread. Engine faults are returned
    /// as `Err` and are not retried.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, AiError> {
        let params = self.generation_params(request);
        debug!(prompt_len = params.prompt.len(), "local generation");

        let generation = self.engine.generate(&params)?;
        Ok(CompletionResult::success(
            generation.text.trim(),
            generation.total_tokens,
        ))
    }
}
