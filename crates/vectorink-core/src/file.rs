//! File collaborator boundary: validation of user-supplied SVG files.
//!
//! Reading and choosing files stays outside the core; the core only decides
//! whether a candidate file and its content are acceptable.

use thiserror::Error;

/// Maximum accepted file size.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Metadata of a user-supplied file, as reported by the file collaborator.
#[derive(Debug, Clone)]
pub struct FileMeta {
    pub name: String,
    pub media_type: String,
    pub size: u64,
}

/// Validation failures, reported as structured reasons, never panics.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FileError {
    #[error("not a valid SVG file (.svg extension or image/svg+xml type required)")]
    InvalidType,
    #[error("file is larger than the 10 MiB limit")]
    TooLarge,
    #[error("file is empty")]
    Empty,
    #[error("invalid SVG content: {0}")]
    InvalidContent(String),
}

/// Validate file metadata before reading the content.
pub fn validate_file(meta: &FileMeta) -> Result<(), FileError> {
    if meta.media_type != "image/svg+xml" && !meta.name.to_ascii_lowercase().ends_with(".svg") {
        return Err(FileError::InvalidType);
    }
    if meta.size == 0 {
        return Err(FileError::Empty);
    }
    if meta.size > MAX_FILE_SIZE {
        return Err(FileError::TooLarge);
    }
    Ok(())
}

/// Validate file content: it must be bracketed by an opening and closing
/// root-document tag.
pub fn validate_content(content: &str) -> Result<(), FileError> {
    if !content.contains("<svg") || !content.contains("</svg>") {
        return Err(FileError::InvalidContent(
            "content must contain valid SVG markup".to_string(),
        ));
    }
    Ok(())
}

/// Whether a template reference carries inline markup rather than a path.
pub fn is_inline_template(reference: &str) -> bool {
    reference.starts_with("<svg") || reference.starts_with("<?xml")
}
