//! Media serving module
//!
//! Serves stored media bytes from under the configured public prefix.

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

/// Serve stored files under the same public prefix `MediaStore` embeds in
/// every stored URL, so a non-default `MEDIA_PUBLIC_PREFIX` keeps working.
pub fn router(public_prefix: &str) -> Router<ServerState> {
    let prefix = public_prefix.trim_end_matches('/');
    let path = if prefix.starts_with('/') {
        format!("{prefix}/{{name}}")
    } else {
        format!("/{prefix}/{{name}}")
    };
    Router::new().route(&path, get(handler::serve))
}
