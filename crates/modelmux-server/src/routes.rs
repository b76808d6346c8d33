//! Router assembly — six POST endpoints, one per task kind.

use std::sync::Arc;

use axum::routing::post;
use axum::Router;
use modelmux_providers::ProviderClient;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Build the gateway router around a shared dispatch client.
pub fn create_router(client: Arc<ProviderClient>) -> Router {
    Router::new()
        .route("/generate-chat", post(handlers::generate_chat))
        .route("/transcribe-speech", post(handlers::transcribe_speech))
        .route("/generate-speech", post(handlers::generate_speech))
        .route("/generate-image", post(handlers::generate_image))
        .route("/get-embeddings", post(handlers::get_embeddings))
        .route("/calculate-similarity", post(handlers::calculate_similarity))
        .layer(TraceLayer::new_for_http())
        .with_state(client)
}
