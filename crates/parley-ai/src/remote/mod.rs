//! Remote chat-completion backend.
//!
//! Sends `{model, messages, stop, temperature?, max_tokens?}` to an
//! OpenAI-compatible endpoint with Bearer authentication, retrying
//! rate-limited responses and mapping every other failure to a failed
//! `CompletionResult`.

mod api;
mod client;
mod config;
mod transport;


pub use client::RemoteBackend;
pub use config::{RemoteConfig, API_KEY_ENV};
pub use transport::{ChatTransport, HttpTransport};
