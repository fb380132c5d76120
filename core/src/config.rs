//! Messaging configuration
//!
//! Environment-driven description of which providers exist, their
//! credentials, which provider is tried first, and whether the fallback
//! sweep runs. Loaded once at startup; changed only through an explicit
//! [`MessagingConfigUpdate`] applied by the registry.

use serde::{Deserialize, Serialize};

/// Default sender identifier shown on outbound SMS
pub const DEFAULT_SENDER_ID: &str = "BarbersBar";

/// Vonage SMS gateway credentials and enablement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VonageSettings {
    pub api_key: String,
    pub api_secret: String,
    /// Alphanumeric sender id or source number
    pub sender_id: String,
    pub enabled: bool,
}

impl VonageSettings {
    /// True when every credential a call requires is present
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

/// WhatsApp Business Cloud API credentials and enablement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatsAppSettings {
    pub phone_number_id: String,
    pub access_token: String,
    pub enabled: bool,
}

impl WhatsAppSettings {
    pub fn has_credentials(&self) -> bool {
        !self.phone_number_id.is_empty() && !self.access_token.is_empty()
    }
}

/// Per-provider configuration records
///
/// A `None` record means the provider is not configured at all and no
/// adapter is registered for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub vonage: Option<VonageSettings>,
    pub whatsapp: Option<WhatsAppSettings>,
}

/// Process-wide messaging configuration snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagingConfig {
    pub providers: ProviderSettings,
    /// Provider identifier tried first on every send
    pub default_provider: String,
    /// Whether failure of the default triggers trying the others
    pub fallback_enabled: bool,
}

impl MessagingConfig {
    /// Load configuration from environment variables
    ///
    /// Never fails: missing credentials leave the corresponding adapter
    /// unavailable rather than erroring at construction time.
    ///
    /// Recognized keys:
    /// - `VONAGE_API_KEY` / `VONAGE_API_SECRET` / `VONAGE_SENDER_ID`
    /// - `WHATSAPP_PHONE_NUMBER_ID` / `WHATSAPP_ACCESS_TOKEN`
    /// - `DEFAULT_MESSAGING_PROVIDER` (default "vonage")
    /// - `MESSAGING_FALLBACK_ENABLED` ("false" disables the sweep)
    pub fn from_env() -> Self {
        let env = |key: &str| std::env::var(key).unwrap_or_default();

        let whatsapp_token = env("WHATSAPP_ACCESS_TOKEN");

        Self {
            providers: ProviderSettings {
                vonage: Some(VonageSettings {
                    api_key: env("VONAGE_API_KEY"),
                    api_secret: env("VONAGE_API_SECRET"),
                    sender_id: std::env::var("VONAGE_SENDER_ID")
                        .unwrap_or_else(|_| DEFAULT_SENDER_ID.to_string()),
                    enabled: true,
                }),
                whatsapp: Some(WhatsAppSettings {
                    phone_number_id: env("WHATSAPP_PHONE_NUMBER_ID"),
                    // Presence of the access token auto-enables WhatsApp
                    enabled: !whatsapp_token.is_empty(),
                    access_token: whatsapp_token,
                }),
            },
            default_provider: std::env::var("DEFAULT_MESSAGING_PROVIDER")
                .unwrap_or_else(|_| "vonage".to_string()),
            fallback_enabled: std::env::var("MESSAGING_FALLBACK_ENABLED")
                .map(|v| v != "false")
                .unwrap_or(true),
        }
    }

    /// Apply a partial update, replacing each present field wholesale
    ///
    /// The merge is shallow: a `providers` update replaces the whole
    /// provider map, it is not merged record by record.
    pub fn apply(&mut self, update: MessagingConfigUpdate) {
        if let Some(providers) = update.providers {
            self.providers = providers;
        }
        if let Some(default_provider) = update.default_provider {
            self.default_provider = default_provider;
        }
        if let Some(fallback_enabled) = update.fallback_enabled {
            self.fallback_enabled = fallback_enabled;
        }
    }
}

/// Partial configuration change for [`MessagingConfig::apply`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagingConfigUpdate {
    pub providers: Option<ProviderSettings>,
    pub default_provider: Option<String>,
    pub fallback_enabled: Option<bool>,
}

impl MessagingConfigUpdate {
    /// Update that only switches the default provider
    pub fn default_provider(name: impl Into<String>) -> Self {
        Self {
            default_provider: Some(name.into()),
            ..Self::default()
        }
    }

    /// Update that only toggles the fallback sweep
    pub fn fallback_enabled(enabled: bool) -> Self {
        Self {
            fallback_enabled: Some(enabled),
            ..Self::default()
        }
    }
}
