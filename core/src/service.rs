//! Messaging service (provider registry)
//!
//! Owns the configured adapter set and applies the selection + fallback
//! policy: the default provider is attempted first, and when it fails
//! with fallback enabled, the remaining available adapters are tried in
//! registration order until one succeeds or all are exhausted.
//!
//! Every code path yields a [`SendMessageResult`]; no error ever escapes
//! `send_message`, so callers branch on `result.success` rather than
//! wrapping delivery in error handling.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::{MessagingConfig, MessagingConfigUpdate, WhatsAppSettings};
use crate::provider::{mask_phone, MessageProvider, ProviderFactory};
use crate::types::{SendMessageParams, SendMessageResult};

/// Default cap on one provider attempt before it is treated as failed
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

struct RegistryState {
    config: MessagingConfig,
    /// Adapters in registration order; rebuilt wholesale on reconfigure
    providers: Vec<Arc<dyn MessageProvider>>,
}

/// Provider registry with ordered fallback
pub struct MessagingService {
    factory: Arc<dyn ProviderFactory>,
    state: RwLock<RegistryState>,
    /// Per-attempt timeout; a timed-out attempt is an ordinary failure
    /// feeding the fallback sweep
    attempt_timeout: Duration,
}

impl MessagingService {
    /// Construct the registry from a configuration snapshot
    pub fn new(config: MessagingConfig, factory: Arc<dyn ProviderFactory>) -> Self {
        Self::with_attempt_timeout(config, factory, DEFAULT_ATTEMPT_TIMEOUT)
    }

    pub fn with_attempt_timeout(
        config: MessagingConfig,
        factory: Arc<dyn ProviderFactory>,
        attempt_timeout: Duration,
    ) -> Self {
        let providers = factory.build(&config);
        info!(
            default = %config.default_provider,
            fallback = config.fallback_enabled,
            registered = providers.len(),
            "messaging service initialized"
        );

        Self {
            factory,
            state: RwLock::new(RegistryState { config, providers }),
            attempt_timeout,
        }
    }

    /// Send one message through the configured providers
    ///
    /// At most N sequential provider calls (N = registered adapters),
    /// never parallelized: racing two providers could double-send a
    /// verification code.
    pub async fn send_message(&self, params: &SendMessageParams) -> SendMessageResult {
        // Snapshot the adapter set so a concurrent reconfigure cannot
        // swap providers mid-sweep. Adapters hold only their own
        // credential copies, so finishing on a discarded set is safe.
        let (default_provider, fallback_enabled, providers) = {
            let state = self.state.read().await;
            (
                state.config.default_provider.clone(),
                state.config.fallback_enabled,
                state.providers.clone(),
            )
        };

        if let Some(primary) = providers.iter().find(|p| p.name() == default_provider) {
            if primary.is_available() {
                let result = self.attempt(primary.as_ref(), params).await;
                if result.success || !fallback_enabled {
                    return result;
                }
            } else {
                debug!(provider = %default_provider, "default provider unavailable");
            }
        } else {
            debug!(provider = %default_provider, "default provider not registered");
        }

        if fallback_enabled {
            for provider in providers.iter().filter(|p| p.name() != default_provider) {
                if !provider.is_available() {
                    continue;
                }

                info!(
                    provider = provider.name(),
                    to = %mask_phone(&params.to),
                    "trying fallback provider"
                );

                let result = self.attempt(provider.as_ref(), params).await;
                if result.success {
                    return result;
                }
            }
        }

        warn!(to = %mask_phone(&params.to), "all messaging providers exhausted");
        SendMessageResult::exhausted()
    }

    /// One timeout-wrapped provider attempt
    async fn attempt(
        &self,
        provider: &dyn MessageProvider,
        params: &SendMessageParams,
    ) -> SendMessageResult {
        match tokio::time::timeout(self.attempt_timeout, provider.send(params)).await {
            Ok(result) => {
                if !result.success {
                    warn!(
                        provider = provider.name(),
                        error = result.error.as_deref().unwrap_or("unknown"),
                        "provider attempt failed"
                    );
                }
                result
            }
            Err(_) => {
                warn!(
                    provider = provider.name(),
                    timeout_secs = self.attempt_timeout.as_secs(),
                    "provider attempt timed out"
                );
                SendMessageResult::failed(
                    provider.name(),
                    format!(
                        "provider timed out after {} seconds",
                        self.attempt_timeout.as_secs()
                    ),
                )
            }
        }
    }

    /// Provider identifiers currently passing `is_available`, in
    /// registration order
    pub async fn get_available_providers(&self) -> Vec<String> {
        let state = self.state.read().await;
        state
            .providers
            .iter()
            .filter(|p| p.is_available())
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Current configuration snapshot
    pub async fn config(&self) -> MessagingConfig {
        self.state.read().await.config.clone()
    }

    /// Apply a partial configuration change
    ///
    /// Shallow merge, then the whole adapter set is discarded and rebuilt
    /// from the resulting configuration. No adapter survives the change.
    pub async fn update_config(&self, update: MessagingConfigUpdate) {
        let mut state = self.state.write().await;
        state.config.apply(update);
        state.providers = self.factory.build(&state.config);
        info!(
            default = %state.config.default_provider,
            fallback = state.config.fallback_enabled,
            registered = state.providers.len(),
            "messaging configuration updated"
        );
    }

    /// Switch which provider is tried first
    pub async fn set_default_provider(&self, name: impl Into<String>) {
        self.update_config(MessagingConfigUpdate::default_provider(name.into()))
            .await;
    }

    /// Enable the WhatsApp provider with fresh credentials
    ///
    /// When the current default is vonage, WhatsApp also becomes the
    /// default, matching the administrative "switch to WhatsApp" flow.
    pub async fn enable_whatsapp(&self, phone_number_id: String, access_token: String) {
        let mut state = self.state.write().await;
        state.config.providers.whatsapp = Some(WhatsAppSettings {
            phone_number_id,
            access_token,
            enabled: true,
        });
        if state.config.default_provider == "vonage" {
            state.config.default_provider = "whatsapp".to_string();
        }
        state.providers = self.factory.build(&state.config);
        info!("whatsapp provider enabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ProviderSettings, VonageSettings};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scriptable in-memory provider with a send-call counter
    struct ScriptedProvider {
        name: &'static str,
        available: bool,
        succeed: bool,
        send_calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl ScriptedProvider {
        fn new(name: &'static str, available: bool, succeed: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                available,
                succeed,
                send_calls: AtomicUsize::new(0),
                delay: None,
            })
        }

        fn slow(name: &'static str, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                name,
                available: true,
                succeed: true,
                send_calls: AtomicUsize::new(0),
                delay: Some(delay),
            })
        }

        fn calls(&self) -> usize {
            self.send_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl MessageProvider for ScriptedProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn send(&self, _params: &SendMessageParams) -> SendMessageResult {
            self.send_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.succeed {
                SendMessageResult::delivered(self.name, format!("{}-msg", self.name))
            } else {
                SendMessageResult::failed(self.name, "scripted failure")
            }
        }
    }

    fn fixed_factory(providers: Vec<Arc<ScriptedProvider>>) -> Arc<dyn ProviderFactory> {
        Arc::new(move |_config: &MessagingConfig| {
            providers
                .iter()
                .map(|p| p.clone() as Arc<dyn MessageProvider>)
                .collect::<Vec<_>>()
        })
    }

    fn config(default_provider: &str, fallback_enabled: bool) -> MessagingConfig {
        MessagingConfig {
            providers: ProviderSettings {
                vonage: Some(VonageSettings {
                    api_key: "key".to_string(),
                    api_secret: "secret".to_string(),
                    sender_id: "Test".to_string(),
                    enabled: true,
                }),
                whatsapp: None,
            },
            default_provider: default_provider.to_string(),
            fallback_enabled,
        }
    }

    fn params() -> SendMessageParams {
        SendMessageParams::new("+972501234567", "your code is 123456")
    }

    #[tokio::test]
    async fn primary_success_short_circuits() {
        let vonage = ScriptedProvider::new("vonage", true, true);
        let whatsapp = ScriptedProvider::new("whatsapp", true, true);
        let service = MessagingService::new(
            config("vonage", true),
            fixed_factory(vec![vonage.clone(), whatsapp.clone()]),
        );

        let result = service.send_message(&params()).await;
        assert!(result.success);
        assert_eq!(result.provider, "vonage");
        assert_eq!(vonage.calls(), 1);
        assert_eq!(whatsapp.calls(), 0);
    }

    #[tokio::test]
    async fn fallback_disabled_returns_primary_failure() {
        let vonage = ScriptedProvider::new("vonage", true, false);
        let whatsapp = ScriptedProvider::new("whatsapp", true, true);
        let service = MessagingService::new(
            config("vonage", false),
            fixed_factory(vec![vonage.clone(), whatsapp.clone()]),
        );

        let result = service.send_message(&params()).await;
        assert!(!result.success);
        assert_eq!(result.provider, "vonage");
        // The whatsapp adapter is never invoked when fallback is off
        assert_eq!(whatsapp.calls(), 0);
    }

    #[tokio::test]
    async fn fallback_disabled_and_primary_unavailable_exhausts() {
        let vonage = ScriptedProvider::new("vonage", false, true);
        let whatsapp = ScriptedProvider::new("whatsapp", true, true);
        let service = MessagingService::new(
            config("vonage", false),
            fixed_factory(vec![vonage.clone(), whatsapp.clone()]),
        );

        let result = service.send_message(&params()).await;
        assert!(!result.success);
        assert_eq!(result.provider, "none");
        assert_eq!(result.error.as_deref(), Some("No available messaging providers"));
        assert_eq!(vonage.calls(), 0);
        assert_eq!(whatsapp.calls(), 0);
    }

    #[tokio::test]
    async fn fallback_sweeps_in_registration_order() {
        let vonage = ScriptedProvider::new("vonage", true, false);
        let first = ScriptedProvider::new("first-backup", true, false);
        let skipped = ScriptedProvider::new("unavailable-backup", false, true);
        let second = ScriptedProvider::new("second-backup", true, true);
        let third = ScriptedProvider::new("never-reached", true, true);
        let service = MessagingService::new(
            config("vonage", true),
            fixed_factory(vec![
                vonage.clone(),
                first.clone(),
                skipped.clone(),
                second.clone(),
                third.clone(),
            ]),
        );

        let result = service.send_message(&params()).await;
        assert!(result.success);
        assert_eq!(result.provider, "second-backup");
        // Every available non-default adapter before the winner is tried
        // exactly once, unavailable ones are skipped, later ones never run
        assert_eq!(vonage.calls(), 1);
        assert_eq!(first.calls(), 1);
        assert_eq!(skipped.calls(), 0);
        assert_eq!(second.calls(), 1);
        assert_eq!(third.calls(), 0);
    }

    #[tokio::test]
    async fn fallback_succeeds_via_whatsapp() {
        let vonage = ScriptedProvider::new("vonage", true, false);
        let whatsapp = ScriptedProvider::new("whatsapp", true, true);
        let service = MessagingService::new(
            config("vonage", true),
            fixed_factory(vec![vonage.clone(), whatsapp.clone()]),
        );

        let result = service.send_message(&params()).await;
        assert!(result.success);
        assert_eq!(result.provider, "whatsapp");
    }

    #[tokio::test]
    async fn no_providers_available_exhausts() {
        let vonage = ScriptedProvider::new("vonage", false, true);
        let whatsapp = ScriptedProvider::new("whatsapp", false, true);
        let service = MessagingService::new(
            config("vonage", true),
            fixed_factory(vec![vonage, whatsapp]),
        );

        let result = service.send_message(&params()).await;
        assert!(!result.success);
        assert_eq!(result.provider, "none");
        assert_eq!(result.error.as_deref(), Some("No available messaging providers"));
    }

    #[tokio::test]
    async fn all_attempts_failing_exhausts() {
        let vonage = ScriptedProvider::new("vonage", true, false);
        let whatsapp = ScriptedProvider::new("whatsapp", true, false);
        let service = MessagingService::new(
            config("vonage", true),
            fixed_factory(vec![vonage.clone(), whatsapp.clone()]),
        );

        let result = service.send_message(&params()).await;
        assert!(!result.success);
        assert_eq!(result.provider, "none");
        assert_eq!(vonage.calls(), 1);
        assert_eq!(whatsapp.calls(), 1);
    }

    #[tokio::test]
    async fn availability_queries_perform_no_sends() {
        let vonage = ScriptedProvider::new("vonage", true, true);
        let whatsapp = ScriptedProvider::new("whatsapp", false, true);
        let service = MessagingService::new(
            config("vonage", true),
            fixed_factory(vec![vonage.clone(), whatsapp.clone()]),
        );

        for _ in 0..5 {
            let available = service.get_available_providers().await;
            assert_eq!(available, vec!["vonage".to_string()]);
        }
        assert_eq!(vonage.calls(), 0);
        assert_eq!(whatsapp.calls(), 0);
    }

    #[tokio::test]
    async fn available_providers_keep_registration_order() {
        let a = ScriptedProvider::new("vonage", true, true);
        let b = ScriptedProvider::new("whatsapp", true, true);
        let c = ScriptedProvider::new("mock", true, true);
        let service = MessagingService::new(
            config("vonage", true),
            fixed_factory(vec![a, b, c]),
        );

        assert_eq!(
            service.get_available_providers().await,
            vec!["vonage", "whatsapp", "mock"]
        );
    }

    #[tokio::test]
    async fn update_config_switches_primary_in_place() {
        let vonage = ScriptedProvider::new("vonage", true, true);
        let whatsapp = ScriptedProvider::new("whatsapp", true, true);
        let service = MessagingService::new(
            config("vonage", true),
            fixed_factory(vec![vonage.clone(), whatsapp.clone()]),
        );

        service
            .update_config(MessagingConfigUpdate::default_provider("whatsapp"))
            .await;

        let result = service.send_message(&params()).await;
        assert_eq!(result.provider, "whatsapp");
        assert_eq!(vonage.calls(), 0);
    }

    #[tokio::test]
    async fn enable_whatsapp_switches_default_from_vonage() {
        let vonage = ScriptedProvider::new("vonage", true, true);
        let service = MessagingService::new(
            config("vonage", true),
            fixed_factory(vec![vonage]),
        );

        service
            .enable_whatsapp("1234567890".to_string(), "tok".to_string())
            .await;

        let config = service.config().await;
        assert_eq!(config.default_provider, "whatsapp");
        let whatsapp = config.providers.whatsapp.unwrap();
        assert!(whatsapp.enabled);
        assert_eq!(whatsapp.phone_number_id, "1234567890");
    }

    #[tokio::test]
    async fn timed_out_attempt_feeds_fallback_sweep() {
        let stuck = ScriptedProvider::slow("vonage", Duration::from_millis(200));
        let whatsapp = ScriptedProvider::new("whatsapp", true, true);
        let service = MessagingService::with_attempt_timeout(
            config("vonage", true),
            fixed_factory(vec![stuck.clone(), whatsapp.clone()]),
            Duration::from_millis(20),
        );

        let result = service.send_message(&params()).await;
        assert!(result.success);
        assert_eq!(result.provider, "whatsapp");
        assert_eq!(stuck.calls(), 1);
    }

    #[tokio::test]
    async fn timed_out_attempt_without_fallback_reports_timeout() {
        let stuck = ScriptedProvider::slow("vonage", Duration::from_millis(200));
        let service = MessagingService::with_attempt_timeout(
            config("vonage", false),
            fixed_factory(vec![stuck]),
            Duration::from_millis(20),
        );

        let result = service.send_message(&params()).await;
        assert!(!result.success);
        assert_eq!(result.provider, "vonage");
        assert!(result.error.unwrap().contains("timed out"));
    }
}
