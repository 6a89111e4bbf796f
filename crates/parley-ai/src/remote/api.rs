//! CompletionBackend implementation for RemoteBackend.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::client::RemoteBackend;
use crate::{AiError, CompletionBackend, CompletionRequest, CompletionResult};

#[async_trait]
impl CompletionBackend for RemoteBackend {
    fn name(&self) -> &str {
        "remote"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResult, AiError> {
        let body = self.build_request_body(request);

        debug!(
            model = %self.model,
            messages = request.history.len() + 2,
            "chat completion request"
        );

        let outcome = self
            .retry
            .run(|| self.transport.post(&body))
            .await
            .and_then(|json| Self::parse_response(&json));

        Ok(match outcome {
            Ok(parsed) => {
                debug!(
                    role = %parsed.role,
                    tokens = parsed.total_tokens,
                    "chat completion succeeded"
                );
                CompletionResult::success(parsed.text, parsed.total_tokens)
            }
            Err(e) => {
                warn!(error = %e, detail = ?e, "chat completion failed");
                CompletionResult::from(e)
            }
        })
    }
}
