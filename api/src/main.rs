use std::env;
use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenvy::dotenv;
use log::info;

use bb_api::app::{configure_routes, create_cors, mock_messaging_service, AppState};
use bb_core::{MessagingConfig, MessagingService, ProviderFactory};
use bb_infra::{HttpProviderFactory, InMemoryVerificationStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting BarbersBar messaging API");

    let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = env::var("SERVER_PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .expect("SERVER_PORT must be a valid port number");
    let bind_address = format!("{}:{}", server_host, server_port);

    let config = MessagingConfig::from_env();

    // MESSAGING_PROVIDER=mock swaps in the logging provider for local
    // development; provider failures are never masked in production mode
    let messaging = if env::var("MESSAGING_PROVIDER").as_deref() == Ok("mock") {
        info!("using mock messaging provider (development mode)");
        Arc::new(mock_messaging_service(config))
    } else {
        let factory: Arc<dyn ProviderFactory> = Arc::new(HttpProviderFactory::new());
        Arc::new(MessagingService::new(config, factory))
    };
    let store = Arc::new(InMemoryVerificationStore::new());

    info!(
        "available providers: {:?}",
        messaging.get_available_providers().await
    );
    info!("server will bind to: {}", bind_address);

    let state = web::Data::new(AppState::new(messaging, store));

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .app_data(state.clone())
            .configure(configure_routes)
    })
    .bind(bind_address)?
    .run()
    .await
}
