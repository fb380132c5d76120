//! Provider contract
//!
//! Defines the uniform send interface every messaging provider adapter
//! implements, and the factory seam the registry uses to rebuild its
//! adapter set whenever configuration changes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::MessagingConfig;
use crate::types::{SendMessageParams, SendMessageResult};

/// Uniform contract over one third-party messaging provider
///
/// Implementations include:
/// - Vonage SMS gateway
/// - WhatsApp Business Cloud API
/// - Mock provider for development and testing
#[async_trait]
pub trait MessageProvider: Send + Sync {
    /// Stable identifier of this provider (e.g. "vonage", "whatsapp")
    fn name(&self) -> &str;

    /// Whether this adapter can currently attempt a send
    ///
    /// A pure function of the adapter's configuration snapshot: enabled
    /// flag plus presence of every credential a call requires. Must not
    /// perform network I/O.
    fn is_available(&self) -> bool;

    /// Perform exactly one provider call for `params`
    ///
    /// Provider-reported failure and transport errors are both mapped to
    /// a failed [`SendMessageResult`]; this method never panics and has
    /// no internal retries. Retry and fallback policy belong to the
    /// registry.
    async fn send(&self, params: &SendMessageParams) -> SendMessageResult;
}

/// Builds a full adapter set from a configuration snapshot
///
/// The registry discards and rebuilds all adapters through this seam on
/// every reconfiguration, so no adapter outlives a configuration change.
/// Registration order is the order of the returned vector; the fallback
/// sweep iterates it deterministically.
pub trait ProviderFactory: Send + Sync {
    fn build(&self, config: &MessagingConfig) -> Vec<Arc<dyn MessageProvider>>;
}

impl<F> ProviderFactory for F
where
    F: Fn(&MessagingConfig) -> Vec<Arc<dyn MessageProvider>> + Send + Sync,
{
    fn build(&self, config: &MessagingConfig) -> Vec<Arc<dyn MessageProvider>> {
        self(config)
    }
}

/// Mask a phone number for logging, keeping only the last 4 characters
///
/// Destinations are pass-through strings and may carry arbitrary
/// (multi-byte) characters, so the mask counts characters, never bytes.
pub fn mask_phone(phone: &str) -> String {
    let total = phone.chars().count();
    if total <= 4 {
        return "*".repeat(total);
    }

    let visible = 4;
    let last_chars: String = phone.chars().skip(total - visible).collect();

    if phone.starts_with('+') {
        format!("+{}{}", "*".repeat(total - 1 - visible), last_chars)
    } else {
        format!("{}{}", "*".repeat(total - visible), last_chars)
    }
}
