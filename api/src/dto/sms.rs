//! Dispatch endpoint payloads
//!
//! Field names are camelCase on the wire to match the mobile client.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsRequest {
    /// Destination phone number; the request fails fast without it
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Message template; defaulted when absent
    pub message: Option<String>,
    /// Pre-generated verification code; generated when absent
    pub code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsResponse {
    pub success: bool,
    /// The (possibly generated) verification code
    pub code: String,
    /// Synthetic verification-session identifier, provider-prefixed
    pub verification_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Distinguishes provider/transport failure from request errors
    pub is_provider_error: bool,
    pub provider: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifySmsRequest {
    pub verification_id: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifySmsResponse {
    pub success: bool,
    pub verified: bool,
    pub message: String,
}
