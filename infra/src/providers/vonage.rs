//! Vonage SMS gateway adapter
//!
//! Sends one message per invocation through the Vonage SMS REST API and
//! maps the gateway's per-message status to the uniform send result.
//! Destination numbers are passed through exactly as received; only log
//! output is masked.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, warn};

use bb_core::config::VonageSettings;
use bb_core::{mask_phone, MessageProvider, SendMessageParams, SendMessageResult};

const PROVIDER_NAME: &str = "vonage";
const SMS_ENDPOINT: &str = "https://rest.nexmo.com/sms/json";

/// Vonage SMS API response envelope
#[derive(Debug, Deserialize)]
struct VonageSmsResponse {
    #[serde(default)]
    messages: Vec<VonageMessageStatus>,
}

#[derive(Debug, Deserialize)]
struct VonageMessageStatus {
    /// "0" means accepted; anything else is a gateway error code
    status: String,
    #[serde(rename = "message-id")]
    message_id: Option<String>,
    #[serde(rename = "error-text")]
    error_text: Option<String>,
}

/// Adapter over the Vonage SMS gateway
pub struct VonageSmsProvider {
    settings: VonageSettings,
    client: reqwest::Client,
    endpoint: String,
}

impl VonageSmsProvider {
    pub fn new(settings: VonageSettings, client: reqwest::Client) -> Self {
        Self {
            settings,
            client,
            endpoint: SMS_ENDPOINT.to_string(),
        }
    }

    /// Map the parsed gateway response to a send result
    fn result_from_response(response: VonageSmsResponse) -> SendMessageResult {
        match response.messages.first() {
            Some(message) if message.status == "0" => SendMessageResult::delivered(
                PROVIDER_NAME,
                message.message_id.clone().unwrap_or_default(),
            ),
            Some(message) => SendMessageResult::failed(
                PROVIDER_NAME,
                message
                    .error_text
                    .clone()
                    .unwrap_or_else(|| format!("gateway status {}", message.status)),
            ),
            None => SendMessageResult::failed(PROVIDER_NAME, "empty gateway response"),
        }
    }
}

#[async_trait]
impl MessageProvider for VonageSmsProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        self.settings.enabled && self.settings.has_credentials()
    }

    async fn send(&self, params: &SendMessageParams) -> SendMessageResult {
        debug!(to = %mask_phone(&params.to), "sending SMS via Vonage");

        let form = [
            ("api_key", self.settings.api_key.as_str()),
            ("api_secret", self.settings.api_secret.as_str()),
            ("to", params.to.as_str()),
            ("from", self.settings.sender_id.as_str()),
            ("text", params.message.as_str()),
        ];

        let response = match self.client.post(&self.endpoint).form(&form).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Vonage request failed");
                return SendMessageResult::failed(PROVIDER_NAME, e.to_string());
            }
        };

        let parsed: VonageSmsResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "unreadable Vonage response");
                return SendMessageResult::failed(
                    PROVIDER_NAME,
                    format!("unreadable gateway response: {}", e),
                );
            }
        };

        let result = Self::result_from_response(parsed);
        if result.success {
            info!(
                to = %mask_phone(&params.to),
                message_id = result.message_id.as_deref().unwrap_or(""),
                "SMS accepted by Vonage"
            );
        }
        result
    }
}
