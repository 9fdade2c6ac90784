//! API routing module
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`products`] - product/variant catalog endpoints
//! - [`media`] - stored media file serving

pub mod health;
pub mod media;
pub mod products;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Assemble the full application router.
pub fn router(state: ServerState) -> Router {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(products::router())
        .merge(media::router(&state.config.media_public_prefix))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
