//! Semantic validation of a loaded [`SessionConfig`].
//!
//! Collects every problem into a single `ConfigError::ValidationError`
//! so a user can fix the document in one pass.

use parley_common::ConfigError;

use crate::schema::{BackendKind, SessionConfig};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &SessionConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_participants(&mut errors, config);
    validate_sampling(&mut errors, config);
    validate_backend(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_participants(errors: &mut Vec<String>, config: &SessionConfig) {
    let user = config.user_name.trim();
    let assistant = config.assistant_name.trim();
    if user.is_empty() {
        errors.push("user_name must not be empty".into());
    }
    if assistant.is_empty() {
        errors.push("assistant_name must not be empty".into());
    }
    if !user.is_empty() && user == assistant {
        errors.push(format!(
            "user_name and assistant_name must differ (both are '{user}')"
        ));
    }
}

fn validate_sampling(errors: &mut Vec<String>, config: &SessionConfig) {
    if let Some(t) = config.temperature {
        if !t.is_finite() || !(0.0..=2.0).contains(&t) {
            errors.push(format!("temperature = {t} is out of range [0, 2]"));
        }
    }
    if config.max_tokens == Some(0) {
        errors.push("max_tokens must be positive when set".into());
    }
}

fn validate_backend(errors: &mut Vec<String>, config: &SessionConfig) {
    let backend = &config.backend;
    if backend.retry.max_attempts == 0 {
        errors.push("retry_attempts must be at least 1".into());
    }
    if backend.remote.timeout.is_zero() {
        errors.push("timeout_secs must be positive".into());
    }
    if backend.kind == BackendKind::Local {
        if backend.local.model_path.is_none() {
            errors.push("model_path is required for the local backend".into());
        }
        if backend.local.n_threads == 0 {
            errors.push("n_threads must be positive".into());
        }
        if backend.local.n_ctx == 0 {
            errors.push("n_ctx must be positive".into());
        }
    }
}
