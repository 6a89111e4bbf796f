//! Remote backend struct, request building, and response parsing.

use serde_json::json;

use super::config::RemoteConfig;
use super::transport::{ChatTransport, HttpTransport};
use crate::retry::RetryPolicy;
use crate::{AiError, CompletionRequest, TransportError};

/// Chat-completion backend speaking the OpenAI-style JSON protocol.
pub struct RemoteBackend {
    pub(crate) model: String,
    pub(crate) transport: Box<dyn ChatTransport>,
    pub(crate) retry: RetryPolicy,
}

/// Text and usage pulled out of a successful response body.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ParsedCompletion {
    pub role: String,
    pub text: String,
    pub total_tokens: u64,
}

impl RemoteBackend {
    /// Build a backend with the production HTTP transport.
    pub fn new(config: RemoteConfig) -> Result<Self, AiError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(
            config.model,
            Box::new(transport),
            RetryPolicy::from(config.retry),
        ))
    }

    /// Build a backend over any transport.
    pub fn with_transport(
        model: impl Into<String>,
        transport: Box<dyn ChatTransport>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            model: model.into(),
            transport,
            retry,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the JSON request body.
    ///
    /// `messages` is the system prompt, then history, then the new turn.
    /// Only the user cue is sent as a stop sequence; the assistant cue
    /// would cut replies that quote it.
    pub(crate) fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        let mut messages = vec![json!({
            "role": "system",
            "content": request.system_prompt,
        })];
        messages.extend(request.turns().map(|turn| {
            json!({
                "role": turn.role.as_str(),
                "content": turn.content,
            })
        }));

        let mut body = json!({
            "model": self.model,
            "messages": messages,
            "stop": request.user_stop(),
        });

        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }

    /// Pull the first choice and the total token count out of a response.
    pub(crate) fn parse_response(
        json: &serde_json::Value,
    ) -> Result<ParsedCompletion, TransportError> {
        let message = &json["choices"][0]["message"];
        let text = message["content"].as_str().ok_or_else(|| {
            TransportError::Malformed("missing choices[0].message.content".into())
        })?;

        Ok(ParsedCompletion {
            role: message["role"].as_str().unwrap_or("assistant").to_string(),
            text: text.to_string(),
            total_tokens: json["usage"]["total_tokens"].as_u64().unwrap_or(0),
        })
    }
}
