//! Storyloom HTTP API.
//!
//! Exposes the session intents over JSON. The binary in `main.rs` wires the
//! Gemini provider, the file store and the OS-seeded RNG into [`app`].

use axum::Router;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use state::AppState;

/// Builds the full router with every context mounted under `/api/v1`.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/session", routes::session::router())
        .nest("/api/v1/character", routes::character::router())
        .with_state(state)
}
