//! Application state and route wiring

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{http::header, web};

use bb_core::{
    MessageProvider, MessagingConfig, MessagingService, ProviderFactory, VerificationStore,
};
use bb_infra::MockProvider;

use crate::routes::{send_sms::send_sms, verify_sms::verify_sms};

/// Default SMS text prepended to the verification code
/// ("Your verification code is: " in Hebrew, matching the client app)
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "קוד האימות שלך הוא: ";

/// Shared services available to every handler
pub struct AppState {
    pub messaging: Arc<MessagingService>,
    pub store: Arc<dyn VerificationStore>,
    /// Text prepended to the verification code when the request carries
    /// no message of its own
    pub message_template: String,
    /// How long stored codes stay valid
    pub code_ttl: Duration,
}

impl AppState {
    pub fn new(messaging: Arc<MessagingService>, store: Arc<dyn VerificationStore>) -> Self {
        Self {
            messaging,
            store,
            message_template: DEFAULT_MESSAGE_TEMPLATE.to_string(),
            code_ttl: bb_core::verification::CODE_TTL,
        }
    }
}

/// Development-mode registry: one mock adapter, registered as the
/// default provider
///
/// The mock must be the default, not just a fallback candidate: with
/// `MESSAGING_FALLBACK_ENABLED=false` the sweep never runs, and a
/// registry whose default points at an unregistered provider would fail
/// every send.
pub fn mock_messaging_service(mut config: MessagingConfig) -> MessagingService {
    config.default_provider = "mock".to_string();
    let factory: Arc<dyn ProviderFactory> = Arc::new(|_config: &MessagingConfig| {
        vec![Arc::new(MockProvider::new()) as Arc<dyn MessageProvider>]
    });
    MessagingService::new(config, factory)
}

/// Open CORS policy for the mobile client: any origin, POST plus the
/// OPTIONS preflight
pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600)
}

/// Register the dispatch endpoints
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/sendSMS").route(web::post().to(send_sms)))
        .service(web::resource("/verifySMS").route(web::post().to(verify_sms)));
}
