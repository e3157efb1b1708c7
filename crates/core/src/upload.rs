//! Upload acceptance rules and the mapping between stored uploads and
//! resource locators.

use crate::error::CoreError;

/// Default maximum accepted upload size: 10 MB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// URL prefix under which stored uploads are addressed. A resource locator
/// with this prefix refers to a file in the upload directory.
pub const UPLOAD_URL_PREFIX: &str = "/uploads/";

/// File extensions accepted for uploaded images.
const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Validate an uploaded image before it is stored.
///
/// Rules:
/// - Content type must be `image/*`.
/// - Body must not be empty and must not exceed `max_bytes`.
pub fn validate_upload(content_type: &str, size: usize, max_bytes: usize) -> Result<(), CoreError> {
    if !content_type.starts_with("image/") {
        return Err(CoreError::Validation("File must be an image".into()));
    }
    if size == 0 {
        return Err(CoreError::Validation("File must not be empty".into()));
    }
    if size > max_bytes {
        return Err(CoreError::Validation(format!(
            "File size must be less than {}MB",
            max_bytes / (1024 * 1024)
        )));
    }
    Ok(())
}

/// Pick the extension a stored upload is saved with.
///
/// Uses the original filename's extension when it is a supported image
/// type, otherwise falls back to the content type's subtype.
pub fn stored_extension(filename: &str, content_type: &str) -> Result<String, CoreError> {
    let from_name = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    let from_type = content_type
        .strip_prefix("image/")
        .map(|sub| sub.to_ascii_lowercase());

    from_name
        .into_iter()
        .chain(from_type)
        .find(|ext| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| {
            CoreError::Validation(
                "Unsupported image format. Supported: .jpg, .jpeg, .png, .webp".into(),
            )
        })
}

/// Resource locator for a stored upload.
pub fn locator_for(stored_name: &str) -> String {
    format!("{UPLOAD_URL_PREFIX}{stored_name}")
}

/// Extract the stored file name from an upload locator.
///
/// Returns `None` for locators outside the upload area. Names that could
/// escape the upload directory are rejected.
pub fn stored_name_from_locator(locator: &str) -> Option<Result<&str, CoreError>> {
    let name = locator.strip_prefix(UPLOAD_URL_PREFIX)?;
    if name.is_empty() || name.contains(|c: char| c == '/' || c == '\\') || name.starts_with('.') {
        return Some(Err(CoreError::Validation(format!(
            "Invalid upload locator '{locator}'"
        ))));
    }
    Some(Ok(name))
}
