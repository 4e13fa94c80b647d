//! Serves stored documents back when the local backend is in use.

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::content_type_for_key;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use futures::StreamExt;
use hospireg_core::AppError;
use std::sync::Arc;

/// `GET /files/{*key}`: stream an object from storage.
#[tracing::instrument(skip(state), fields(operation = "get_file"))]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response, HttpAppError> {
    let stream = state.storage.download_stream(&key).await?;

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for_key(&key))
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}
