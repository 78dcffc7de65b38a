//! Storyloom API server entry point.

use std::sync::{Arc, Mutex};

use storyloom_api::config::Config;
use storyloom_api::error::AppError;
use storyloom_api::state::AppState;
use storyloom_core::rng::{DeterministicRng, OsSeededRng};
use storyloom_gemini::GeminiProvider;
use storyloom_store::file_store::JsonFileStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Storyloom API server");

    let config = Config::from_env()?;
    tracing::info!(
        text_model = config.gemini.text_model(),
        image_model = config.gemini.image_model(),
        store_path = %config.store_path.display(),
        "configuration loaded"
    );

    // Build application state.
    let provider = Arc::new(GeminiProvider::new(config.gemini)?);
    let store = Arc::new(JsonFileStore::new(config.store_path));
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(OsSeededRng::new()));
    let app_state = AppState::new(provider, store, rng);

    // TODO: Replace CorsLayer::permissive() with the deployed frontend origin.
    let app = storyloom_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
