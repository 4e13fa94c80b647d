//! Seams to the host application.

use async_trait::async_trait;
use hospireg_core::DocumentKind;

use crate::error::SelectionError;

/// What the host's photo picker returned for a single selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedImage {
    pub uri: String,
    pub mime_type: Option<String>,
    pub file_name: Option<String>,
}

/// Host photo picker.
#[async_trait]
pub trait FilePicker: Send + Sync {
    /// `Ok(None)` when the user cancels.
    async fn pick_image(&self, kind: DocumentKind) -> Result<Option<PickedImage>, SelectionError>;
}

/// The UI around the form: it shows alerts and owns navigation.
pub trait UiHost: Send + Sync {
    fn alert(&self, title: &str, message: &str);

    fn navigate_to_dashboard(&self);
}
