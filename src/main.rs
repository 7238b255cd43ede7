use std::sync::Arc;

use jobdeck::app::App;
use jobdeck::config::Settings;
use jobdeck::services::{ApiClient, SessionStore};
use tracing::{error, info};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting JobDeck client...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Restore the persisted session (token + active role), if any
    let session_store = SessionStore::new(&settings.session.store_path);
    let restored = session_store.load();

    if let Some(session) = &restored {
        info!(
            "Restored session saved at {} (role: {:?})",
            session.saved_at, session.role
        );
    }

    // Initialize the API client, attaching the restored token
    let token = restored.as_ref().map(|s| s.token.clone());
    let api = Arc::new(ApiClient::new(
        settings.api.base_url.clone(),
        settings.api.timeout_secs,
        token,
    ));

    info!("API client initialized for {}", settings.api.base_url);

    App::run(settings, api, session_store, restored).await
}
