//! Form state and multipart packaging.

use std::collections::BTreeMap;

use hospireg_core::constants::{ADDRESS_FIELD, NAME_FIELD};
use hospireg_core::DocumentKind;

use crate::error::ValidationError;
use crate::host::PickedImage;

const DEFAULT_MIME_TYPE: &str = "image/jpeg";
const ADDRESS_LINES: usize = 3;

/// Host platform; decides how picker URIs are written into the upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    #[default]
    Android,
    Ios,
}

impl Platform {
    /// Android pickers may hand back bare paths; the upload needs a `file://` URI.
    pub fn normalize_uri(&self, uri: &str) -> String {
        match self {
            Platform::Android if !uri.starts_with("file://") => format!("file://{}", uri),
            _ => uri.to_string(),
        }
    }
}

/// An image chosen for one document kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub uri: String,
    pub mime_type: String,
    pub display_name: String,
}

impl SelectedFile {
    /// Fill in what the picker left out: `image/jpeg` and `"{kind}.jpg"`.
    pub fn from_picked(kind: DocumentKind, picked: PickedImage) -> Self {
        Self {
            uri: picked.uri,
            mime_type: picked
                .mime_type
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
            display_name: picked
                .file_name
                .unwrap_or_else(|| format!("{}.jpg", kind)),
        }
    }
}

/// One file part of the upload body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub kind: DocumentKind,
    pub uri: String,
    pub mime_type: String,
    pub file_name: String,
}

/// Everything `POST /upload` receives: the two text fields and one file per kind, in
/// `DocumentKind::ALL` order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub text_fields: Vec<(&'static str, String)>,
    pub files: Vec<FilePart>,
}

/// Editable form state.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    name: String,
    address: String,
    documents: BTreeMap<DocumentKind, SelectedFile>,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The address as submitted: lines joined with `\n`.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
    }

    /// The three address inputs.
    pub fn address_lines(&self) -> [String; ADDRESS_LINES] {
        let mut lines: [String; ADDRESS_LINES] = Default::default();
        for (slot, line) in lines.iter_mut().zip(self.address.split('\n')) {
            *slot = line.to_string();
        }
        lines
    }

    /// Replace one of the three address inputs. Out-of-range indexes are ignored.
    pub fn set_address_line(&mut self, index: usize, text: &str) {
        if index >= ADDRESS_LINES {
            return;
        }
        let mut lines: Vec<String> = self.address.split('\n').map(String::from).collect();
        if lines.len() <= index {
            lines.resize(index + 1, String::new());
        }
        lines[index] = text.to_string();
        self.address = lines.join("\n");
    }

    pub fn document(&self, kind: DocumentKind) -> Option<&SelectedFile> {
        self.documents.get(&kind)
    }

    pub fn set_document(&mut self, kind: DocumentKind, file: SelectedFile) {
        self.documents.insert(kind, file);
    }

    pub fn missing_documents(&self) -> Vec<DocumentKind> {
        DocumentKind::ALL
            .into_iter()
            .filter(|kind| !self.documents.contains_key(kind))
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.address.trim().is_empty() {
            return Err(ValidationError::MissingAddress);
        }
        let missing = self.missing_documents();
        if !missing.is_empty() {
            return Err(ValidationError::MissingDocuments(missing));
        }
        Ok(())
    }

    /// Validate, then build the upload body. Text is sent as typed.
    pub fn to_payload(&self, platform: Platform) -> Result<SubmissionPayload, ValidationError> {
        self.validate()?;

        let files = DocumentKind::ALL
            .into_iter()
            .filter_map(|kind| {
                self.documents.get(&kind).map(|file| FilePart {
                    kind,
                    uri: platform.normalize_uri(&file.uri),
                    mime_type: file.mime_type.clone(),
                    file_name: file.display_name.clone(),
                })
            })
            .collect();

        Ok(SubmissionPayload {
            text_fields: vec![
                (NAME_FIELD, self.name.clone()),
                (ADDRESS_FIELD, self.address.clone()),
            ],
            files,
        })
    }

    /// Clear name, address and every selection.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picked(uri: &str) -> PickedImage {
        PickedImage {
            uri: uri.to_string(),
            mime_type: None,
            file_name: None,
        }
    }

    fn complete_form() -> RegistrationForm {
        let mut form = RegistrationForm::new();
        form.set_name("St. Mary");
        form.set_address_line(0, "1 Main St");
        form.set_address_line(1, "Springfield");
        for kind in DocumentKind::ALL {
            form.set_document(
                kind,
                SelectedFile::from_picked(kind, picked(&format!("/data/{}.jpg", kind))),
            );
        }
        form
    }

    #[test]
    fn selected_file_defaults() {
        let file = SelectedFile::from_picked(DocumentKind::FireNoc, picked("/tmp/x"));
        assert_eq!(file.mime_type, "image/jpeg");
        assert_eq!(file.display_name, "fireNOC.jpg");

        let file = SelectedFile::from_picked(
            DocumentKind::FireNoc,
            PickedImage {
                uri: "/tmp/x".to_string(),
                mime_type: Some("image/png".to_string()),
                file_name: Some("noc.png".to_string()),
            },
        );
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.display_name, "noc.png");
    }

    #[test]
    fn uri_normalization_per_platform() {
        assert_eq!(
            Platform::Android.normalize_uri("/storage/a.jpg"),
            "file:///storage/a.jpg"
        );
        assert_eq!(
            Platform::Android.normalize_uri("file:///storage/a.jpg"),
            "file:///storage/a.jpg"
        );
        assert_eq!(Platform::Ios.normalize_uri("/var/a.jpg"), "/var/a.jpg");
    }

    #[test]
    fn address_lines_are_joined_with_newlines() {
        let mut form = RegistrationForm::new();
        form.set_address_line(2, "District 9");
        assert_eq!(form.address(), "\n\nDistrict 9");
        form.set_address_line(0, "1 Main St");
        assert_eq!(form.address(), "1 Main St\n\nDistrict 9");
        assert_eq!(
            form.address_lines(),
            [
                "1 Main St".to_string(),
                String::new(),
                "District 9".to_string()
            ]
        );
        form.set_address_line(3, "ignored");
        assert_eq!(form.address(), "1 Main St\n\nDistrict 9");
    }

    #[test]
    fn blank_fields_fail_validation() {
        let mut form = complete_form();
        form.set_name("   ");
        assert_eq!(form.validate(), Err(ValidationError::MissingName));

        let mut form = complete_form();
        form.set_address("\n\n");
        assert_eq!(form.validate(), Err(ValidationError::MissingAddress));
    }

    #[test]
    fn every_kind_is_required() {
        let mut form = complete_form();
        form.documents.remove(&DocumentKind::BiomedicalAuth);
        assert_eq!(
            form.to_payload(Platform::Ios),
            Err(ValidationError::MissingDocuments(vec![
                DocumentKind::BiomedicalAuth
            ]))
        );
    }

    #[test]
    fn payload_has_two_text_parts_and_five_files_in_order() {
        let payload = complete_form().to_payload(Platform::Android).unwrap();

        assert_eq!(
            payload.text_fields,
            vec![
                ("name", "St. Mary".to_string()),
                ("address", "1 Main St\nSpringfield".to_string()),
            ]
        );
        let kinds: Vec<DocumentKind> = payload.files.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, DocumentKind::ALL.to_vec());
        assert_eq!(payload.files[0].uri, "file:///data/hospitalCert.jpg");
        assert_eq!(payload.files[0].file_name, "hospitalCert.jpg");
    }

    #[test]
    fn reset_clears_everything() {
        let mut form = complete_form();
        form.reset();
        assert!(form.name().is_empty());
        assert!(form.address().is_empty());
        assert_eq!(form.missing_documents().len(), 5);
    }
}
