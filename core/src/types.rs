//! Value types for the messaging send contract

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Delivery channel hint for a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageChannel {
    Sms,
    Whatsapp,
}

/// Input to one send operation
///
/// The destination is passed through to the provider as received; no
/// normalization or international-prefix handling happens in the core.
/// Metadata is opaque and forwarded untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageParams {
    /// Destination address (phone number, provider-format-agnostic)
    pub to: String,
    /// Message body text
    pub message: String,
    /// Optional channel hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<MessageChannel>,
    /// Free-form metadata, not interpreted by the core
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl SendMessageParams {
    pub fn new(to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            message: message.into(),
            channel: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_channel(mut self, channel: MessageChannel) -> Self {
        self.channel = Some(channel);
        self
    }
}

/// Error string returned when no provider could attempt or complete a send
pub const NO_PROVIDERS_ERROR: &str = "No available messaging providers";

/// Provider identifier reported when no provider produced the result
pub const PROVIDER_NONE: &str = "none";

/// Outcome of one send operation
///
/// Delivery failure is always a value, never an `Err`: the registry's
/// fallback sweep relies on adapters reporting failure in-band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResult {
    /// Whether the message was accepted by a provider
    pub success: bool,
    /// Provider-assigned message identifier, present only on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Error description, present only on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The provider that produced this result, or `"none"`
    pub provider: String,
}

impl SendMessageResult {
    /// A successful delivery reported by `provider`
    pub fn delivered(provider: impl Into<String>, message_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message_id: Some(message_id.into()),
            error: None,
            provider: provider.into(),
        }
    }

    /// A failed attempt reported by `provider`
    pub fn failed(provider: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message_id: None,
            error: Some(error.into()),
            provider: provider.into(),
        }
    }

    /// Terminal result when no provider attempted or succeeded
    pub fn exhausted() -> Self {
        Self::failed(PROVIDER_NONE, NO_PROVIDERS_ERROR)
    }
}
