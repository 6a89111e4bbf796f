//! Token usage tracking for a session.

/// Tracks cumulative token usage and call outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenTracker {
    /// Tokens reported by successful calls.
    total_tokens: u64,
    successful_calls: u64,
    failed_calls: u64,
}

impl TokenTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record token usage from a successful call.
    pub fn record_success(&mut self, tokens: u64) {
        self.total_tokens = self.total_tokens.saturating_add(tokens);
        self.successful_calls += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed_calls += 1;
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub fn successful_calls(&self) -> u64 {
        self.successful_calls
    }

    pub fn failed_calls(&self) -> u64 {
        self.failed_calls
    }

    /// Get number of backend calls, successful or not.
    pub fn call_count(&self) -> u64 {
        self.successful_calls + self.failed_calls
    }

    /// Reset all counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_usage_and_outcomes() {
        let mut tracker = TokenTracker::new();
        tracker.record_success(12);
        tracker.record_success(30);
        tracker.record_failure();
        assert_eq!(tracker.total_tokens(), 42);
        assert_eq!(tracker.successful_calls(), 2);
        assert_eq!(tracker.failed_calls(), 1);
        assert_eq!(tracker.call_count(), 3);
    }

    #[test]
    fn reset_clears_counters() {
        let mut tracker = TokenTracker::new();
        tracker.record_success(5);
        tracker.reset();
        assert_eq!(tracker, TokenTracker::default());
    }
}
