//! Multipart bodies for registration submissions.

use axum_test::multipart::{MultipartForm, Part};
use hospireg_core::DocumentKind;

/// JPEG SOI/EOI markers; the service only looks at names and sizes.
pub fn jpeg_bytes(tag: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.extend_from_slice(tag.as_bytes());
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}

pub fn jpeg_part(kind: DocumentKind) -> Part {
    Part::bytes(jpeg_bytes(kind.as_str()))
        .file_name(format!("{}.jpg", kind))
        .mime_type("image/jpeg")
}

pub fn text_fields(name: &str, address: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("name", name.to_string())
        .add_text("address", address.to_string())
}

/// A complete submission: both text fields and one jpg per kind.
pub fn full_submission() -> MultipartForm {
    DocumentKind::ALL
        .iter()
        .fold(text_fields("St. Mary", "1 Main St\nSpringfield\n"), |form, kind| {
            form.add_part(kind.as_str(), jpeg_part(*kind))
        })
}
