//! Backend selection and per-backend tuning.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_BACKOFF_SECS: f64 = 0.5;
pub const DEFAULT_GPU_LAYERS: i32 = 0;
/// Engine convention for offloading every layer to the GPU.
pub const ALL_GPU_LAYERS: i32 = -1;
pub const DEFAULT_CONTEXT_LENGTH: u32 = 4096;

/// Which completion backend a session talks to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Remote,
    Local,
}

/// Settings for the HTTP chat-completion backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSettings {
    pub model: String,
    pub api_url: String,
    pub timeout: Duration,
    /// Upstream proxies keyed by scheme (`http`, `https` or `all`).
    pub proxies: BTreeMap<String, String>,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            proxies: BTreeMap::new(),
        }
    }
}

/// Settings handed to a local inference engine loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalEngineSettings {
    pub model_path: Option<PathBuf>,
    pub n_threads: usize,
    /// Layers offloaded to the GPU; negative offloads all of them.
    pub n_gpu_layers: i32,
    pub n_ctx: u32,
}

impl Default for LocalEngineSettings {
    fn default() -> Self {
        Self {
            model_path: None,
            n_threads: host_thread_count(),
            n_gpu_layers: DEFAULT_GPU_LAYERS,
            n_ctx: DEFAULT_CONTEXT_LENGTH,
        }
    }
}

/// Rate-limit retry tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RETRY_ATTEMPTS,
            base_delay: Duration::from_secs_f64(DEFAULT_RETRY_BACKOFF_SECS),
        }
    }
}

/// Everything needed to construct a backend at session start.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BackendSettings {
    pub kind: BackendKind,
    pub remote: RemoteSettings,
    pub local: LocalEngineSettings,
    pub retry: RetrySettings,
}

/// Logical core count of the host, falling back to 1 when unknown.
pub fn host_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
