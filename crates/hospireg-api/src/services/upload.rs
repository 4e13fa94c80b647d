//! Registration upload pipeline
//!
//! extract → validate → store → persist. Every part is validated before the first storage
//! write, so a rejected submission leaves nothing behind. A database failure after the
//! writes leaves the stored objects in place.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

use axum::extract::Multipart;
use bytes::Bytes;
use chrono::Utc;
use hospireg_core::constants::{
    ADDRESS_FIELD, MSG_NAME_AND_ADDRESS_REQUIRED, MSG_NO_FILES_UPLOADED, MSG_UNEXPECTED_FIELD,
    NAME_FIELD,
};
use hospireg_core::models::{
    DocumentKind, DocumentLocations, HospitalRegistrationRecord, NewRegistration,
};
use hospireg_core::AppError;
use hospireg_storage::keys::timestamped_filename;

use crate::error::multipart_error;
use crate::state::{AppState, UploadPolicy};
use crate::utils::upload::{sanitize_filename, validate_file_size, validate_image_format};

/// One file part as received.
#[derive(Debug, Clone)]
pub struct ReceivedFile {
    pub field: String,
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Everything read from the multipart body, before validation.
#[derive(Debug, Default, Clone)]
pub struct ReceivedSubmission {
    pub name: Option<String>,
    pub address: Option<String>,
    pub files: Vec<ReceivedFile>,
}

/// A file part accepted for storage.
#[derive(Debug, Clone)]
pub struct AcceptedDocument {
    pub kind: DocumentKind,
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// A submission that passed every check.
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub name: String,
    pub address: String,
    pub documents: Vec<AcceptedDocument>,
}

/// Read the whole multipart body. Parts with a filename are files; of the text parts only
/// `name` and `address` are kept.
pub async fn extract_submission(mut multipart: Multipart) -> Result<ReceivedSubmission, AppError> {
    let mut submission = ReceivedSubmission::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if let Some(filename) = field.file_name().map(|s| s.to_string()) {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let data = field.bytes().await.map_err(multipart_error)?;

            submission.files.push(ReceivedFile {
                field: field_name,
                filename,
                content_type,
                data,
            });
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        match field_name.as_str() {
            NAME_FIELD => submission.name = Some(value),
            ADDRESS_FIELD => submission.address = Some(value),
            other => tracing::debug!(field = %other, "Ignoring unknown text field"),
        }
    }

    Ok(submission)
}

fn required_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Apply the submission rules in order: text fields, presence of files, then every part
/// against the field names and upload policy.
pub fn validate_submission(
    submission: ReceivedSubmission,
    policy: &UploadPolicy,
) -> Result<ValidatedSubmission, AppError> {
    let (Some(name), Some(address)) = (
        required_text(submission.name),
        required_text(submission.address),
    ) else {
        return Err(AppError::FieldValidation(
            MSG_NAME_AND_ADDRESS_REQUIRED.to_string(),
        ));
    };

    if submission.files.is_empty() {
        return Err(AppError::FieldValidation(MSG_NO_FILES_UPLOADED.to_string()));
    }

    let mut seen = HashSet::new();
    let mut documents = Vec::with_capacity(submission.files.len());

    for file in submission.files {
        let kind = DocumentKind::from_str(&file.field)
            .map_err(|_| AppError::UploadRejected(MSG_UNEXPECTED_FIELD.to_string()))?;
        if !seen.insert(kind) {
            return Err(AppError::UploadRejected(MSG_UNEXPECTED_FIELD.to_string()));
        }

        validate_image_format(&file.filename, &file.content_type, &policy.allowed_extensions)?;
        validate_file_size(file.data.len(), policy.max_file_size)?;

        documents.push(AcceptedDocument {
            kind,
            filename: sanitize_filename(&file.filename),
            content_type: file.content_type,
            data: file.data,
        });
    }

    Ok(ValidatedSubmission {
        name,
        address,
        documents,
    })
}

/// Storage filenames for one submission: `{millis}-{name}`. A name repeated under another
/// kind gets the kind inserted so two documents never share a key.
pub fn storage_filenames(millis: i64, documents: &[AcceptedDocument]) -> Vec<String> {
    let mut used = HashSet::new();
    documents
        .iter()
        .map(|doc| {
            let plain = timestamped_filename(millis, &doc.filename);
            if used.insert(plain.clone()) {
                plain
            } else {
                let qualified =
                    timestamped_filename(millis, &format!("{}-{}", doc.kind, doc.filename));
                used.insert(qualified.clone());
                qualified
            }
        })
        .collect()
}

/// Runs a registration submission end to end.
pub struct RegistrationUploadService {
    state: Arc<AppState>,
}

impl RegistrationUploadService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Complete workflow: extract → validate → store → persist
    pub async fn register(
        &self,
        multipart: Multipart,
    ) -> Result<HospitalRegistrationRecord, AppError> {
        let received = extract_submission(multipart).await?;
        let submission = validate_submission(received, &self.state.upload)?;
        let documents = self.store_documents(&submission.documents).await?;

        self.state
            .registrations
            .insert(NewRegistration {
                name: submission.name,
                address: submission.address,
                documents,
            })
            .await
    }

    async fn store_documents(
        &self,
        documents: &[AcceptedDocument],
    ) -> Result<DocumentLocations, AppError> {
        let millis = Utc::now().timestamp_millis();
        let filenames = storage_filenames(millis, documents);
        let mut locations = DocumentLocations::default();

        for (doc, filename) in documents.iter().zip(filenames) {
            let stored = self
                .state
                .storage
                .upload(
                    &self.state.upload.folder,
                    &filename,
                    &doc.content_type,
                    doc.data.to_vec(),
                )
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %e,
                        kind = %doc.kind,
                        filename = %filename,
                        "Document storage failed"
                    );
                    AppError::UploadRejected(e.to_string())
                })?;

            tracing::debug!(kind = %doc.kind, key = %stored.key, "Document stored");
            locations.set(doc.kind, stored.url);
        }

        Ok(locations)
    }
}
