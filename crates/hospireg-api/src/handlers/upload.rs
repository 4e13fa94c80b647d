use crate::error::HttpAppError;
use crate::services::upload::RegistrationUploadService;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use hospireg_core::UploadResponse;
use std::sync::Arc;

/// `POST /upload`: store the submitted documents and insert one registration record.
#[tracing::instrument(skip(state, multipart), fields(operation = "register_hospital"))]
pub async fn upload_registration(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let multipart = multipart?;

    let record = RegistrationUploadService::new(&state)
        .register(multipart)
        .await?;

    tracing::info!(
        registration_id = %record.id,
        documents = record.documents.present_count(),
        "Hospital registration stored"
    );

    Ok(Json(UploadResponse::inserted(record.id)))
}
