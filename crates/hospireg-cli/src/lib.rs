//! Shared pieces for the command-line submitter: a picker backed by local paths and a host
//! that prints alerts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hospireg_client::{FilePicker, PickedImage, SelectionError, UiHost};
use hospireg_core::DocumentKind;

/// Picks the file given on the command line for each kind.
#[derive(Debug, Clone, Default)]
pub struct PathPicker {
    paths: HashMap<DocumentKind, PathBuf>,
}

impl PathPicker {
    pub fn new(paths: HashMap<DocumentKind, PathBuf>) -> Self {
        Self { paths }
    }
}

/// MIME type for an image path, by extension.
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[async_trait]
impl FilePicker for PathPicker {
    async fn pick_image(&self, kind: DocumentKind) -> Result<Option<PickedImage>, SelectionError> {
        let Some(path) = self.paths.get(&kind) else {
            return Ok(None);
        };

        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| SelectionError(format!("{}: {}", path.display(), e)))?;
        if !metadata.is_file() {
            return Err(SelectionError(format!("{} is not a file", path.display())));
        }

        let absolute = tokio::fs::canonicalize(path)
            .await
            .map_err(|e| SelectionError(format!("{}: {}", path.display(), e)))?;

        Ok(Some(PickedImage {
            uri: absolute.to_string_lossy().into_owned(),
            mime_type: mime_type_for_path(path).map(String::from),
            file_name: path
                .file_name()
                .and_then(|n| n.to_str())
                .map(String::from),
        }))
    }
}

/// Prints alerts to stdout; navigation just logs.
#[derive(Debug, Default)]
pub struct ConsoleHost;

impl UiHost for ConsoleHost {
    fn alert(&self, title: &str, message: &str) {
        println!("[{}] {}", title, message);
    }

    fn navigate_to_dashboard(&self) {
        tracing::info!("Registration complete, dashboard would open now");
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
