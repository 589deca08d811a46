use std::path::Path;

/// Why an uploaded file name cannot be used to name a stored image.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename contains null bytes.
    NullByte,
    /// Filename contains control characters (CR, LF, etc.).
    ControlCharacter,
    /// Extension contains something other than ASCII letters and digits.
    InvalidExtension,
    /// The file does not look like an image.
    NotAnImage,
}

impl FilenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::NullByte => "Invalid filename: null bytes are not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
            Self::InvalidExtension => {
                "Invalid filename: extension may only contain letters and digits"
            }
            Self::NotAnImage => "Only image files can be uploaded",
        }
    }
}

/// Strips any directory components a client may have sent with the name.
pub fn base_name(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim()
}

/// Returns the extension of an uploaded image including the leading dot
/// (`".jpg"`), or an empty string when the name has none.
pub fn upload_extension(filename: &str) -> Result<String, FilenameError> {
    if filename.contains('\0') {
        return Err(FilenameError::NullByte);
    }
    if filename.chars().any(|c| c.is_ascii_control()) {
        return Err(FilenameError::ControlCharacter);
    }

    let name = base_name(filename);
    if name.is_empty() {
        return Err(FilenameError::Empty);
    }

    let Some(ext) = Path::new(name).extension().and_then(|e| e.to_str()) else {
        return Ok(String::new());
    };
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FilenameError::InvalidExtension);
    }

    Ok(format!(".{ext}"))
}

/// Validates that an upload is an image and returns its extension.
pub fn image_extension(filename: &str) -> Result<String, FilenameError> {
    let ext = upload_extension(filename)?;
    let is_image = mime_guess::from_path(base_name(filename))
        .iter()
        .any(|m| m.type_() == mime_guess::mime::IMAGE);
    if !is_image {
        return Err(FilenameError::NotAnImage);
    }
    Ok(ext)
}
