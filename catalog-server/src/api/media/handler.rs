//! Media Serving Handler

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// GET {public_prefix}/:name - stream a stored media file
pub async fn serve(
    State(state): State<ServerState>,
    Path(name): Path<String>,
) -> AppResult<Response> {
    let path = state
        .media
        .resolve(&name)
        .ok_or_else(|| AppError::validation("Invalid media path"))?;

    let bytes = match tokio::fs::read(&path).await {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::not_found(format!("Media {name}")));
        }
        Err(e) => {
            return Err(AppError::storage(format!(
                "Failed to read {}: {e}",
                path.display()
            )));
        }
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, mime.as_ref().to_string())],
        bytes,
    )
        .into_response())
}
