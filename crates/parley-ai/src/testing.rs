//! Scripted fakes shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use parley_config::LocalEngineSettings;
use serde_json::json;

use crate::local::{EngineError, EngineLoader, Generation, GenerationParams, InferenceEngine};
use crate::remote::ChatTransport;
use crate::{AiError, CompletionBackend, CompletionRequest, CompletionResult, TransportError};

/// Transport that replays scripted outcomes and records request bodies.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    replies: Arc<Mutex<VecDeque<Result<serde_json::Value, TransportError>>>>,
    bodies: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Result<serde_json::Value, TransportError>>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            bodies: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.bodies.lock().unwrap().len()
    }

    pub fn last_body(&self) -> serde_json::Value {
        self.bodies.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl ChatTransport for ScriptedTransport {
    async fn post(&self, body: &serde_json::Value) -> Result<serde_json::Value, TransportError> {
        self.bodies.lock().unwrap().push(body.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(TransportError::ConnectionFailed("script exhausted".into())))
    }
}

/// An OpenAI-style success body.
pub(crate) fn completion_body(text: &str, total_tokens: u64) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": text},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": total_tokens}
    })
}

/// Engine that returns a fixed generation (or fault) and records params.
#[derive(Clone)]
pub(crate) struct FakeEngine {
    reply: Result<Generation, String>,
    pub seen: Arc<Mutex<Vec<GenerationParams>>>,
}

impl FakeEngine {
    pub fn replying(text: &str, total_tokens: u64) -> Self {
        Self {
            reply: Ok(Generation {
                text: text.to_string(),
                total_tokens,
            }),
            seen: Arc::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            seen: Arc::default(),
        }
    }

    pub fn last_params(&self) -> GenerationParams {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

impl InferenceEngine for FakeEngine {
    fn generate(&self, params: &GenerationParams) -> Result<Generation, EngineError> {
        self.seen.lock().unwrap().push(params.clone());
        self.reply.clone().map_err(EngineError)
    }
}

/// Loader that hands out a clone of a prepared engine.
pub(crate) struct FakeLoader(pub FakeEngine);

impl EngineLoader for FakeLoader {
    fn load(&self, _settings: &LocalEngineSettings) -> Result<Box<dyn InferenceEngine>, EngineError> {
        Ok(Box::new(self.0.clone()))
    }
}

/// Backend that replays scripted results and records requests.
#[derive(Clone, Default)]
pub(crate) struct ScriptedBackend {
    results: Arc<Mutex<VecDeque<CompletionResult>>>,
    pub requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedBackend {
    pub fn new(results: Vec<CompletionResult>) -> Self {
        Self {
            results: Arc::new(Mutex::new(results.into())),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, AiError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| CompletionResult::failure("script exhausted")))
    }
}
