use super::error::StorageError;

/// Maximum length of a store-relative path.
pub const MAX_PATH_LEN: usize = 512;

/// Checks if a path string contains path traversal patterns.
pub fn contains_path_traversal(path: &str) -> bool {
    path == ".."
        || path.starts_with("../")
        || path.contains("/../")
        || path.ends_with("/..")
        || path.starts_with("..\\")
        || path.contains("\\..\\")
        || path.ends_with("\\..")
}

/// Validates a store-relative path such as `images/7.png`.
///
/// Returns the trimmed path on success.
pub fn validate_relative_path(path: &str) -> Result<&str, StorageError> {
    let trimmed = path.trim();
    let invalid = |reason| StorageError::InvalidPath {
        path: path.to_string(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(invalid("path cannot be empty"));
    }
    if trimmed.len() > MAX_PATH_LEN {
        return Err(invalid("path exceeds maximum length"));
    }
    if trimmed.contains('\0') {
        return Err(invalid("path must not contain null bytes"));
    }
    if trimmed.contains('\\') {
        return Err(invalid("path must not contain backslashes"));
    }
    if trimmed.starts_with('/') {
        return Err(invalid("path must be relative"));
    }
    if trimmed.ends_with('/') {
        return Err(invalid("path must not end with '/'"));
    }
    if contains_path_traversal(trimmed) {
        return Err(invalid("path must not contain '..' traversal"));
    }
    for segment in trimmed.split('/') {
        if segment.is_empty() {
            return Err(invalid("path must not contain empty segments"));
        }
        if segment.starts_with('.') {
            return Err(invalid("path segments must not start with '.'"));
        }
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '-' | '_' | '.'))
    {
        return Err(invalid("path contains invalid characters"));
    }

    Ok(trimmed)
}
