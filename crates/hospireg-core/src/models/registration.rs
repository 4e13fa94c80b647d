use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::document::DocumentLocations;

/// A persisted hospital registration. Created once per accepted submission, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalRegistrationRecord {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub documents: DocumentLocations,
    pub upload_time: DateTime<Utc>,
}

/// Fields of a registration before the store assigns its id and insertion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub name: String,
    pub address: String,
    pub documents: DocumentLocations,
}

/// Body of a successful `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub inserted_id: Uuid,
}

impl UploadResponse {
    pub fn inserted(id: Uuid) -> Self {
        Self {
            success: true,
            inserted_id: id,
        }
    }
}

/// Body of every failed request: `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    /// Error chain, only outside production.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
        }
    }
}
