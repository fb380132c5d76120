//! Provider adapters
//!
//! Each adapter wraps one third-party messaging API behind the core's
//! [`MessageProvider`] contract: availability is a pure function of the
//! adapter's configuration snapshot, and every send maps provider
//! responses and transport errors to an in-band result.

use std::sync::Arc;
use std::time::Duration;

use bb_core::{MessageProvider, MessagingConfig, ProviderFactory};

pub mod mock;
pub mod vonage;
pub mod whatsapp;

pub use mock::MockProvider;
pub use vonage::VonageSmsProvider;
pub use whatsapp::WhatsAppProvider;

/// Transport-level timeout on the shared HTTP client
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds HTTP-backed adapters from a configuration snapshot
///
/// Registration order is fixed: vonage first, then whatsapp. The
/// registry's fallback sweep and `get_available_providers` both follow
/// this order.
pub struct HttpProviderFactory {
    client: reqwest::Client,
}

impl HttpProviderFactory {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(CLIENT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpProviderFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderFactory for HttpProviderFactory {
    fn build(&self, config: &MessagingConfig) -> Vec<Arc<dyn MessageProvider>> {
        let mut providers: Vec<Arc<dyn MessageProvider>> = Vec::new();

        if let Some(vonage) = &config.providers.vonage {
            providers.push(Arc::new(VonageSmsProvider::new(
                vonage.clone(),
                self.client.clone(),
            )));
        }

        if let Some(whatsapp) = &config.providers.whatsapp {
            providers.push(Arc::new(WhatsAppProvider::new(
                whatsapp.clone(),
                self.client.clone(),
            )));
        }

        tracing::debug!(registered = providers.len(), "built provider adapters");
        providers
    }
}
