//! Handler for POST /sendSMS
//!
//! One parameterized handler; the sender identity is configuration, not
//! a code fork. Provider failures surface as HTTP 500 with a
//! `isProviderError` flag instead of being masked behind a fabricated
//! development success.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use bb_core::{generate_verification_code, mask_phone, SendMessageParams};

use crate::app::AppState;
use crate::dto::sms::{
    RequestErrorResponse, SendSmsErrorResponse, SendSmsRequest, SendSmsResponse,
};

/// Send a verification message and record the code
///
/// Request body: `{phoneNumber, message?, code?}`. A missing or empty
/// `phoneNumber` fails fast with 400 before any provider call.
pub async fn send_sms(
    state: web::Data<AppState>,
    request: web::Json<SendSmsRequest>,
) -> HttpResponse {
    let request_id = Uuid::new_v4().to_string();

    let phone_number = match request
        .phone_number
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        Some(phone) => phone.to_string(),
        None => {
            log::warn!("[{}] send_sms rejected: missing phone number", request_id);
            return HttpResponse::BadRequest().json(RequestErrorResponse {
                error: "Phone number is required".to_string(),
            });
        }
    };

    // Use the caller's code when present (auth flow pre-generates one),
    // otherwise draw a fresh 6-digit code
    let code = request
        .code
        .clone()
        .unwrap_or_else(generate_verification_code);

    let template = request
        .message
        .clone()
        .unwrap_or_else(|| state.message_template.clone());
    let full_message = format!("{}{}", template, code);

    log::info!(
        "[{}] dispatching verification message to {}",
        request_id,
        mask_phone(&phone_number)
    );

    let params = SendMessageParams::new(phone_number.clone(), full_message);
    let result = state.messaging.send_message(&params).await;

    if !result.success {
        log::error!(
            "[{}] delivery failed via {}: {}",
            request_id,
            result.provider,
            result.error.as_deref().unwrap_or("unknown")
        );
        return HttpResponse::InternalServerError().json(SendSmsErrorResponse {
            success: false,
            error: "Messaging provider request failed".to_string(),
            details: result.error,
            is_provider_error: true,
            provider: result.provider,
        });
    }

    // Record the code so /verifySMS can do a real comparison later.
    // Store failure is not a delivery failure; log and keep going.
    if let Err(e) = state
        .store
        .store_code(&phone_number, &code, state.code_ttl)
        .await
    {
        log::error!("[{}] failed to record verification code: {}", request_id, e);
    }

    let verification_id = format!("{}-{}", result.provider, Utc::now().timestamp_millis());
    log::info!(
        "[{}] message accepted by {} ({})",
        request_id,
        result.provider,
        verification_id
    );

    HttpResponse::Ok().json(SendSmsResponse {
        success: true,
        code,
        verification_id,
        message: format!("SMS sent successfully via {}", result.provider),
        message_id: result.message_id,
    })
}
