pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, patch, post};
use axum::{middleware, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use gemini_agent::GeminiClient;
use stepwise_core::config::Config;
use stepwise_core::store::Store;

use crate::state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(routes::health::health))
        // Goals
        .route("/api/goals", get(routes::goals::list_goals))
        .route("/api/goals/generate", post(routes::goals::generate_goal))
        .route("/api/goals/{id}", delete(routes::goals::delete_goal))
        // Steps
        .route("/api/steps/{id}", patch(routes::steps::update_step))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::resolve_session,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the API server described by `config`.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let store = Store::connect(&config.database_url).await?;
    let gemini = GeminiClient::new(
        config.gemini.api_key.clone(),
        &config.gemini.model,
    )?
    .with_base_url(&config.gemini.base_url);

    let app = build_router(AppState::new(store, gemini));

    let port = config.port;
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("stepwise API listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
