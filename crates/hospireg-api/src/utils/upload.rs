//! Common utilities for document uploads

use hospireg_core::AppError;

/// Reduce a client-supplied filename to a single safe path segment.
///
/// Directory components are dropped, characters outside `[A-Za-z0-9._-]` become `_`, and runs
/// of dots collapse so the result can never contain `..`.
pub fn sanitize_filename(filename: &str) -> String {
    const MAX_FILENAME_LENGTH: usize = 200;

    let last_segment = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let mut sanitized = String::with_capacity(last_segment.len());
    for c in last_segment.chars().take(MAX_FILENAME_LENGTH) {
        let c = if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
            c
        } else {
            '_'
        };
        if c == '.' && sanitized.ends_with('.') {
            continue;
        }
        sanitized.push(c);
    }

    let sanitized = sanitized.trim_matches('.').to_string();
    if sanitized.is_empty() {
        return "file".to_string();
    }
    sanitized
}

/// Extension of `filename` (lowercased, without the dot), if it has one.
fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Extension implied by a MIME type, parameters ignored.
fn extension_for_content_type(content_type: &str) -> Option<String> {
    let mime = content_type
        .split(';')
        .next()
        .map(|s| s.trim().to_lowercase())?;
    let (kind, subtype) = mime.split_once('/')?;
    if kind != "image" || subtype.is_empty() {
        return None;
    }
    Some(match subtype {
        "jpeg" | "pjpeg" => "jpg".to_string(),
        "svg+xml" => "svg".to_string(),
        other => other.to_string(),
    })
}

/// Image format of an uploaded part: the filename extension, else the declared MIME type.
pub fn resolve_format(filename: &str, content_type: &str) -> Option<String> {
    extension_of(filename).or_else(|| extension_for_content_type(content_type))
}

/// Check an uploaded part against the extension allow-list, returning its format.
pub fn validate_image_format(
    filename: &str,
    content_type: &str,
    allowed_extensions: &[String],
) -> Result<String, AppError> {
    match resolve_format(filename, content_type) {
        Some(format) if allowed_extensions.contains(&format) => Ok(format),
        Some(format) => Err(AppError::UploadRejected(format!(
            "Image file format {} not allowed",
            format
        ))),
        None => Err(AppError::UploadRejected(
            "Image file format unknown not allowed".to_string(),
        )),
    }
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// `Content-Type` used when serving a stored document back.
pub fn content_type_for_key(key: &str) -> &'static str {
    match extension_of(key).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
