//! The turn exchange.

use parley_common::Turn;
use tracing::{debug, warn};

use super::manager::ChatSession;
use crate::{AiError, CompletionResult};

impl ChatSession {
    /// Send one user message and return the backend's outcome.
    ///
    /// Input is trimmed; empty input is rejected with `EmptyInput` before
    /// any request is made. On success the user turn and the assistant
    /// reply are appended, in that order. On failure the history is left
    /// untouched so the next call sends the same context.
    pub async fn send_turn(&mut self, user_text: &str) -> Result<CompletionResult, AiError> {
        let text = user_text.trim();
        if text.is_empty() {
            return Err(AiError::EmptyInput);
        }

        let user_turn = Turn::user(text);
        let request = self.build_request(user_turn.clone());

        debug!(
            session = %self.id,
            backend = self.backend.name(),
            history_len = self.history.len(),
            "sending turn"
        );

        let result = self.backend.complete(&request).await?;

        if result.is_success() {
            self.tracker.record_success(result.token_usage());
            self.history.append(user_turn);
            self.history.append(Turn::assistant(result.text()));
        } else {
            self.tracker.record_failure();
            warn!(
                session = %self.id,
                error = result.error_message().unwrap_or_default(),
                "turn failed, history unchanged"
            );
        }

        Ok(result)
    }
}
