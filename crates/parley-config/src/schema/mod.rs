//! Configuration schema types for Parley.
//!
//! [`ConfigDocument`] mirrors the on-disk document field for field, with
//! every entry optional so that missing required fields can be reported
//! by name. [`SessionConfig`] is the validated, immutable result.

mod backend;

pub use backend::*;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use parley_common::{ConfigError, Role, Turn};
use serde::{Deserialize, Serialize};

use crate::validation;

/// Sampling temperature for local engines when the document does not set one.
pub const DEFAULT_TEMPERATURE: f64 = 0.9;

/// A seed message as written in the config document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeedMessage {
    pub role: String,
    pub content: String,
}

/// Raw configuration document (JSON or TOML).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConfigDocument {
    pub system: Option<String>,
    pub user_name: Option<String>,
    pub assistant_name: Option<String>,
    pub messages: Vec<SeedMessage>,
    pub temperature: Option<f64>,
    /// Negative values mean unbounded.
    pub max_tokens: Option<i64>,
    pub proxies: BTreeMap<String, String>,
    pub backend: Option<BackendKind>,
    pub model: Option<String>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_backoff: Option<f64>,
    pub model_path: Option<PathBuf>,
    pub n_threads: Option<usize>,
    pub n_gpu_layers: Option<i32>,
    pub n_ctx: Option<u32>,
}

/// Immutable session settings, loaded once per process.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub system_prompt: String,
    pub user_name: String,
    pub assistant_name: String,
    /// `None` leaves the remote service at its own default.
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub seed_messages: Vec<Turn>,
    pub backend: BackendSettings,
}

impl SessionConfig {
    /// Build a config with defaults for everything but the persona.
    ///
    /// Fails when the participant names are empty or identical.
    pub fn new(
        system_prompt: impl Into<String>,
        user_name: impl Into<String>,
        assistant_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            system_prompt: system_prompt.into(),
            user_name: user_name.into(),
            assistant_name: assistant_name.into(),
            temperature: None,
            max_tokens: None,
            seed_messages: Vec::new(),
            backend: BackendSettings::default(),
        };
        validation::validate(&config)?;
        Ok(config)
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_seed_messages(mut self, seed: Vec<Turn>) -> Self {
        self.seed_messages = seed;
        self
    }

    pub fn with_backend(mut self, backend: BackendSettings) -> Self {
        self.backend = backend;
        self
    }

    /// Temperature handed to engines that need an explicit value.
    pub fn sampling_temperature(&self) -> f64 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// The user's speaker cue, `"<user_name>:"`.
    pub fn user_stop(&self) -> String {
        format!("{}:", self.user_name)
    }

    /// Stop sequences for transcript prompts: the user cue, then the
    /// assistant cue.
    pub fn stop_sequences(&self) -> Vec<String> {
        vec![self.user_stop(), format!("{}:", self.assistant_name)]
    }

    /// Validate a raw document and fill in defaults.
    pub fn from_document(doc: ConfigDocument) -> Result<Self, ConfigError> {
        let system_prompt = doc
            .system
            .ok_or(ConfigError::MissingRequiredField("system"))?;
        let user_name = doc
            .user_name
            .ok_or(ConfigError::MissingRequiredField("user_name"))?;
        let assistant_name = doc
            .assistant_name
            .ok_or(ConfigError::MissingRequiredField("assistant_name"))?;

        let seed_messages = doc
            .messages
            .iter()
            .map(|m| seed_turn(m, &user_name, &assistant_name))
            .collect::<Result<Vec<_>, _>>()?;

        let kind = doc.backend.unwrap_or(if doc.model_path.is_some() {
            BackendKind::Local
        } else {
            BackendKind::Remote
        });

        let local_defaults = LocalEngineSettings::default();
        let backend = BackendSettings {
            kind,
            remote: RemoteSettings {
                model: doc.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_url: doc.api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                timeout: Duration::from_secs(doc.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
                proxies: doc.proxies,
            },
            local: LocalEngineSettings {
                model_path: doc.model_path,
                n_threads: doc.n_threads.unwrap_or(local_defaults.n_threads),
                n_gpu_layers: doc.n_gpu_layers.unwrap_or(local_defaults.n_gpu_layers),
                n_ctx: doc.n_ctx.unwrap_or(local_defaults.n_ctx),
            },
            retry: RetrySettings {
                max_attempts: doc.retry_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS),
                base_delay: retry_delay(doc.retry_backoff)?,
            },
        };

        let config = Self {
            system_prompt,
            user_name,
            assistant_name,
            temperature: doc.temperature,
            max_tokens: token_limit(doc.max_tokens)?,
            seed_messages,
            backend,
        };
        validation::validate(&config)?;
        Ok(config)
    }
}

/// Negative limits are the conventional "unbounded" sentinel.
fn token_limit(max_tokens: Option<i64>) -> Result<Option<u32>, ConfigError> {
    match max_tokens {
        Some(n) if n < 0 => Ok(None),
        Some(n) => u32::try_from(n).map(Some).map_err(|_| {
            ConfigError::ValidationError(format!("max_tokens = {n} is too large"))
        }),
        None => Ok(None),
    }
}

fn retry_delay(backoff: Option<f64>) -> Result<Duration, ConfigError> {
    let secs = backoff.unwrap_or(DEFAULT_RETRY_BACKOFF_SECS);
    Duration::try_from_secs_f64(secs).map_err(|_| {
        ConfigError::ValidationError(format!("retry_backoff = {secs} is not a valid duration"))
    })
}

/// Map a document role onto a [`Role`].
///
/// Seed transcripts written for the local prompt format use participant
/// names as roles, so both spellings are accepted.
fn seed_turn(
    message: &SeedMessage,
    user_name: &str,
    assistant_name: &str,
) -> Result<Turn, ConfigError> {
    let role = match message.role.as_str() {
        "system" => Role::System,
        "user" => Role::User,
        "assistant" => Role::Assistant,
        r if r == user_name => Role::User,
        r if r == assistant_name => Role::Assistant,
        other => {
            return Err(ConfigError::ValidationError(format!(
                "unknown seed message role '{other}'"
            )))
        }
    };
    Ok(Turn::new(role, message.content.clone()))
}
