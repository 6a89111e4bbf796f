//! Session struct and conversation management.

use parley_common::Turn;
use parley_config::SessionConfig;
use uuid::Uuid;

use crate::history::ConversationHistory;
use crate::token_tracker::TokenTracker;
use crate::{CompletionBackend, CompletionRequest};

/// A conversation with one backend.
///
/// Calls are serialized by `&mut self`; share a session across tasks only
/// behind a lock.
pub struct ChatSession {
    /// Identifier attached to log events.
    pub(super) id: Uuid,
    pub(super) config: SessionConfig,
    pub(super) backend: Box<dyn CompletionBackend>,
    /// Conversation history, seeded from config.
    pub(super) history: ConversationHistory,
    pub(super) tracker: TokenTracker,
}

impl ChatSession {
    pub fn new(config: SessionConfig, backend: Box<dyn CompletionBackend>) -> Self {
        let mut history = ConversationHistory::new();
        history.seed(config.seed_messages.clone());
        Self {
            id: Uuid::new_v4(),
            config,
            backend,
            history,
            tracker: TokenTracker::new(),
        }
    }

    pub(crate) fn build_request(&self, user_turn: Turn) -> CompletionRequest {
        CompletionRequest::from_config(&self.config, self.history.snapshot(), user_turn)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn tracker(&self) -> &TokenTracker {
        &self.tracker
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}
