//! HTTP transport for submissions.

use anyhow::{Context, Result};
use async_trait::async_trait;
use hospireg_core::constants::UPLOAD_PATH;
use hospireg_core::UploadResponse;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::form::{FilePart, SubmissionPayload};

/// A 2xx answer from the upload service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub status: u16,
    /// Present when the body was the usual `{success, insertedId}`.
    pub inserted_id: Option<Uuid>,
}

/// Sends one submission; exactly one request per call, no retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmitReceipt, TransportError>;
}

/// `reqwest` transport posting `multipart/form-data` to `{base}/upload`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

/// Filesystem path behind a picker URI; only local files can be read.
pub fn uri_to_path(uri: &str) -> Result<&str, TransportError> {
    if let Some(path) = uri.strip_prefix("file://") {
        return Ok(path);
    }
    if uri.contains("://") {
        return Err(TransportError::UnsupportedUri(uri.to_string()));
    }
    Ok(uri)
}

async fn file_part(file: &FilePart) -> Result<Part, TransportError> {
    let path = uri_to_path(&file.uri)?;
    let data = tokio::fs::read(path)
        .await
        .map_err(|source| TransportError::ReadFile {
            uri: file.uri.clone(),
            source,
        })?;

    Part::bytes(data)
        .file_name(file.file_name.clone())
        .mime_str(&file.mime_type)
        .map_err(|_| TransportError::InvalidMimeType(file.mime_type.clone()))
}

/// Build the multipart body: text fields first, then the files in payload order.
pub async fn build_form(payload: &SubmissionPayload) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for (field, value) in &payload.text_fields {
        form = form.text(*field, value.clone());
    }
    for file in &payload.files {
        form = form.part(file.kind.as_str(), file_part(file).await?);
    }
    Ok(form)
}

#[async_trait]
impl Transport for HttpTransport {
    #[tracing::instrument(skip(self, payload), fields(files = payload.files.len()))]
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmitReceipt, TransportError> {
        let form = build_form(payload).await?;
        let url = self.config.build_url(UPLOAD_PATH);

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let inserted_id = serde_json::from_slice::<UploadResponse>(&body)
            .ok()
            .map(|r| r.inserted_id);
        tracing::debug!(status = status.as_u16(), inserted_id = ?inserted_id, "Submission accepted");

        Ok(SubmitReceipt {
            status: status.as_u16(),
            inserted_id,
        })
    }
}
