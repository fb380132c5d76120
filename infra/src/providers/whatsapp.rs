//! WhatsApp Business Cloud API adapter
//!
//! Sends a plain text message through the Graph API, scoped to the
//! configured phone-number id. Success is the presence of a message id
//! in the response; Graph error objects map to failed results.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use bb_core::config::WhatsAppSettings;
use bb_core::{mask_phone, MessageProvider, SendMessageParams, SendMessageResult};

const PROVIDER_NAME: &str = "whatsapp";
const GRAPH_API_BASE: &str = "https://graph.facebook.com/v17.0";

#[derive(Debug, Serialize)]
struct WhatsAppSendRequest<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    message_type: &'static str,
    text: WhatsAppTextBody<'a>,
}

#[derive(Debug, Serialize)]
struct WhatsAppTextBody<'a> {
    body: &'a str,
}

#[derive(Debug, Deserialize)]
struct WhatsAppSendResponse {
    #[serde(default)]
    messages: Vec<WhatsAppMessageId>,
    error: Option<WhatsAppError>,
}

#[derive(Debug, Deserialize)]
struct WhatsAppMessageId {
    id: String,
}

#[derive(Debug, Deserialize)]
struct WhatsAppError {
    message: String,
}

/// Adapter over the WhatsApp Business Cloud API
pub struct WhatsAppProvider {
    settings: WhatsAppSettings,
    client: reqwest::Client,
    base_url: String,
}

impl WhatsAppProvider {
    pub fn new(settings: WhatsAppSettings, client: reqwest::Client) -> Self {
        Self {
            settings,
            client,
            base_url: GRAPH_API_BASE.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/{}/messages", self.base_url, self.settings.phone_number_id)
    }

    fn result_from_response(response: WhatsAppSendResponse) -> SendMessageResult {
        if let Some(message) = response.messages.first() {
            return SendMessageResult::delivered(PROVIDER_NAME, message.id.clone());
        }
        let error = response
            .error
            .map(|e| e.message)
            .unwrap_or_else(|| "no message id in Graph API response".to_string());
        SendMessageResult::failed(PROVIDER_NAME, error)
    }
}

#[async_trait]
impl MessageProvider for WhatsAppProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn is_available(&self) -> bool {
        self.settings.enabled && self.settings.has_credentials()
    }

    async fn send(&self, params: &SendMessageParams) -> SendMessageResult {
        debug!(to = %mask_phone(&params.to), "sending message via WhatsApp");

        let body = WhatsAppSendRequest {
            messaging_product: "whatsapp",
            to: &params.to,
            message_type: "text",
            text: WhatsAppTextBody {
                body: &params.message,
            },
        };

        let response = match self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.settings.access_token)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "WhatsApp request failed");
                return SendMessageResult::failed(PROVIDER_NAME, e.to_string());
            }
        };

        let parsed: WhatsAppSendResponse = match response.json().await {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "unreadable WhatsApp response");
                return SendMessageResult::failed(
                    PROVIDER_NAME,
                    format!("unreadable Graph API response: {}", e),
                );
            }
        };

        let result = Self::result_from_response(parsed);
        if result.success {
            info!(
                to = %mask_phone(&params.to),
                message_id = result.message_id.as_deref().unwrap_or(""),
                "message accepted by WhatsApp"
            );
        }
        result
    }
}
