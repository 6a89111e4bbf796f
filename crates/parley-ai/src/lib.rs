//! Conversation engine for Parley.
//!
//! Provides the chat session and its completion backends:
//! - `ChatSession` owning the turn history
//! - `RemoteBackend` for HTTP chat-completion services
//! - `LocalBackend` for in-process inference engines
//! - Rate-limit retry with exponential backoff
//! - Token usage tracking
//! - Speech text preparation and viseme decoding

pub mod history;
pub mod local;
pub mod remote;
pub mod retry;
pub mod session;
pub mod speech;
pub mod token_tracker;

#[cfg(test)]
mod testing;

use async_trait::async_trait;
use parley_common::Turn;
use parley_config::SessionConfig;

pub use history::ConversationHistory;
pub use local::{EngineError, EngineLoader, Generation, GenerationParams, InferenceEngine, LocalBackend};
pub use parley_common::Role;
pub use remote::{ChatTransport, HttpTransport, RemoteBackend, RemoteConfig};
pub use retry::RetryPolicy;
pub use session::ChatSession;
pub use token_tracker::TokenTracker;

/// A completion engine that turns a request into generated text.
///
/// Ordinary failures (network errors, bad status codes, malformed bodies)
/// come back as `Ok` with a failed [`CompletionResult`]. `Err` is reserved
/// for faults the backend cannot describe as data, such as a crashed
/// local engine.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Short name used in logs and usage tracking.
    fn name(&self) -> &str;

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, AiError>;
}

/// Everything a backend needs for one exchange. Built per call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    /// Snapshot of prior turns, oldest first.
    pub history: Vec<Turn>,
    pub user_turn: Turn,
    /// `None` when the config leaves sampling to the backend.
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    /// Speaker cues, user cue first.
    pub stop: Vec<String>,
}

impl CompletionRequest {
    pub fn from_config(config: &SessionConfig, history: Vec<Turn>, user_turn: Turn) -> Self {
        Self {
            system_prompt: config.system_prompt.clone(),
            history,
            user_turn,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            stop: config.stop_sequences(),
        }
    }

    /// Only the user cue, for chat APIs that separate speakers themselves.
    pub fn user_stop(&self) -> &[String] {
        &self.stop[..self.stop.len().min(1)]
    }

    /// History followed by the new user turn, in prompt order.
    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.history.iter().chain(std::iter::once(&self.user_turn))
    }
}

/// Uniform outcome of one completion call.
///
/// `error_message` is present exactly when the call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    success: bool,
    text: String,
    token_usage: u64,
    error_message: Option<String>,
}

impl CompletionResult {
    pub fn success(text: impl Into<String>, token_usage: u64) -> Self {
        Self {
            success: true,
            text: text.into(),
            token_usage,
            error_message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            text: String::new(),
            token_usage: 0,
            error_message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn token_usage(&self) -> u64 {
        self.token_usage
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// The generated text on success, otherwise the failure reason.
    pub fn display_text(&self) -> &str {
        self.error_message.as_deref().unwrap_or(&self.text)
    }
}

impl From<TransportError> for CompletionResult {
    fn from(err: TransportError) -> Self {
        Self::failure(err.to_string())
    }
}

/// Transport-level failures of the remote backend.
///
/// `Display` is the human-readable reason surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Request failed with code 429")]
    RateLimited,
    #[error("Connection error")]
    ConnectionFailed(String),
    #[error("Connection timeout")]
    TimedOut,
    #[error("Request failed with code {0}")]
    BadStatus(u16),
    #[error("Malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("Input is empty")]
    EmptyInput,
    #[error("Inference engine failure: {0}")]
    EngineFailure(#[from] EngineError),
    #[error("Missing credential: {0}")]
    MissingCredential(String),
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_invariants() {
        let ok = CompletionResult::success("hi!", 12);
        assert!(ok.is_success());
        assert_eq!(ok.text(), "hi!");
        assert_eq!(ok.token_usage(), 12);
        assert_eq!(ok.error_message(), None);

        let failed = CompletionResult::failure("Connection timeout");
        assert!(!failed.is_success());
        assert_eq!(failed.text(), "");
        assert_eq!(failed.token_usage(), 0);
        assert_eq!(failed.error_message(), Some("Connection timeout"));
        assert_eq!(failed.display_text(), "Connection timeout");
    }

    #[test]
    fn transport_error_messages() {
        assert_eq!(
            CompletionResult::from(TransportError::ConnectionFailed("refused".into()))
                .error_message(),
            Some("Connection error")
        );
        assert_eq!(TransportError::TimedOut.to_string(), "Connection timeout");
        assert_eq!(
            TransportError::BadStatus(503).to_string(),
            "Request failed with code 503"
        );
        assert_eq!(
            TransportError::RateLimited.to_string(),
            "Request failed with code 429"
        );
    }

    #[test]
    fn request_turn_order() {
        let config = SessionConfig::new("sys", "Bob", "Aria").unwrap();
        let request = CompletionRequest::from_config(
            &config,
            vec![Turn::user("a"), Turn::assistant("b")],
            Turn::user("c"),
        );
        let contents: Vec<&str> = request.turns().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
        assert_eq!(request.stop, vec!["Bob:", "Aria:"]);
        assert_eq!(request.user_stop(), ["Bob:".to_string()]);
        assert_eq!(request.temperature, None);
    }
}
