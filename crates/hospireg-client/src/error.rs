//! Client-side failures. None of these reach the server except `TransportError`, which is
//! the server (or the network) answering badly.

use hospireg_core::DocumentKind;
use thiserror::Error;

/// The host picker failed; cancelling is not an error.
#[derive(Debug, Error)]
#[error("Failed to pick image: {0}")]
pub struct SelectionError(pub String);

/// The form is not ready to submit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Hospital name is required")]
    MissingName,

    #[error("Address is required")]
    MissingAddress,

    #[error("Missing documents: {}", .0.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", "))]
    MissingDocuments(Vec<DocumentKind>),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to read {uri}: {source}")]
    ReadFile {
        uri: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported file URI: {0}")]
    UnsupportedUri(String),

    #[error("Invalid MIME type {0}")]
    InvalidMimeType(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Upload failed with status {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Error)]
pub enum SubmitError {
    /// A previous submission has not settled yet.
    #[error("A submission is already in progress")]
    InFlight,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}
