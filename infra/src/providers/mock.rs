//! Mock provider for development and testing
//!
//! Logs messages instead of sending them, generates uuid message ids,
//! and can simulate unavailability or delivery failure. Tracks a send
//! counter so tests can assert exactly which adapters were invoked.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use bb_core::{mask_phone, MessageProvider, SendMessageParams, SendMessageResult};

/// Mock messaging provider
#[derive(Clone)]
pub struct MockProvider {
    name: String,
    available: bool,
    simulate_failure: bool,
    send_count: Arc<AtomicU64>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::named("mock")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            available: true,
            simulate_failure: false,
            send_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Mark the provider unavailable (as if credentials were missing)
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Make every send report a simulated delivery failure
    pub fn failing(mut self) -> Self {
        self.simulate_failure = true;
        self
    }

    /// Number of send attempts made through this provider
    pub fn send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }

    async fn send(&self, params: &SendMessageParams) -> SendMessageResult {
        self.send_count.fetch_add(1, Ordering::SeqCst);

        if self.simulate_failure {
            warn!(
                provider = %self.name,
                to = %mask_phone(&params.to),
                "mock provider simulating delivery failure"
            );
            return SendMessageResult::failed(&self.name, "simulated delivery failure");
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        info!(
            provider = %self.name,
            to = %mask_phone(&params.to),
            message_id = %message_id,
            body = %params.message,
            "mock provider delivered message"
        );
        SendMessageResult::delivered(&self.name, message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_with_mock_message_id() {
        let provider = MockProvider::new();
        let params = SendMessageParams::new("+972501234567", "hello");

        let result = provider.send(&params).await;
        assert!(result.success);
        assert_eq!(result.provider, "mock");
        assert!(result.message_id.unwrap().starts_with("mock_"));
        assert_eq!(provider.send_count(), 1);
    }

    #[tokio::test]
    async fn simulated_failure_is_in_band() {
        let provider = MockProvider::new().failing();
        let params = SendMessageParams::new("+972501234567", "hello");

        let result = provider.send(&params).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("simulated delivery failure"));
        assert_eq!(provider.send_count(), 1);
    }

    #[test]
    fn unavailable_provider_reports_it() {
        let provider = MockProvider::new().unavailable();
        assert!(!provider.is_available());
        assert_eq!(provider.send_count(), 0);
    }
}
