//! Handler for POST /verifySMS
//!
//! Real code verification against the time-boxed store: codes are
//! single-use, expire after their TTL, and lock out after repeated
//! mismatches.

use actix_web::{web, HttpResponse};

use bb_core::{mask_phone, VerifyOutcome};

use crate::app::AppState;
use crate::dto::sms::{RequestErrorResponse, VerifySmsRequest, VerifySmsResponse};

/// Check a submitted code for a destination
///
/// Request body: `{verificationId?, code, phoneNumber}`.
pub async fn verify_sms(
    state: web::Data<AppState>,
    request: web::Json<VerifySmsRequest>,
) -> HttpResponse {
    let phone_number = match request
        .phone_number
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        Some(phone) => phone.to_string(),
        None => {
            return HttpResponse::BadRequest().json(RequestErrorResponse {
                error: "Phone number is required".to_string(),
            });
        }
    };

    let code = match request.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => code.to_string(),
        None => {
            return HttpResponse::BadRequest().json(RequestErrorResponse {
                error: "Verification code is required".to_string(),
            });
        }
    };

    log::info!(
        "verifying code for {} (session {})",
        mask_phone(&phone_number),
        request.verification_id.as_deref().unwrap_or("-")
    );

    let outcome = match state.store.verify_code(&phone_number, &code).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("verification store error: {}", e);
            return HttpResponse::InternalServerError().json(RequestErrorResponse {
                error: "Failed to verify SMS code".to_string(),
            });
        }
    };

    let (verified, message) = match outcome {
        VerifyOutcome::Verified => (true, "Code verified successfully".to_string()),
        VerifyOutcome::Mismatch { remaining_attempts } => (
            false,
            format!("Incorrect code, {} attempts remaining", remaining_attempts),
        ),
        VerifyOutcome::TooManyAttempts => {
            (false, "Too many failed attempts, request a new code".to_string())
        }
        VerifyOutcome::NotFound => {
            (false, "No active code for this number, request a new one".to_string())
        }
    };

    HttpResponse::Ok().json(VerifySmsResponse {
        success: true,
        verified,
        message,
    })
}
