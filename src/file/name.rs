//! Stored-name validation.
//!
//! A stored name is the client-supplied filename used verbatim on disk, so it
//! must resolve to a direct child of the storage directory.

use std::path::{Component, Path};

use thiserror::Error;

/// Maximum stored name length in bytes.
pub const MAX_NAME_LENGTH: usize = 255;

/// Prefix reserved for in-progress upload files.
pub(crate) const TEMP_PREFIX: &str = ".upload-";

/// Reasons a filename is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Name is empty.
    #[error("filename cannot be empty")]
    Empty,

    /// Name is too long.
    #[error("filename must be at most {MAX_NAME_LENGTH} bytes")]
    TooLong,

    /// Name contains a path separator or otherwise names something other
    /// than a direct child of the storage directory.
    #[error("filename must not contain path separators or parent segments")]
    PathTraversal,

    /// Name starts with a dot.
    #[error("filename must not start with '.'")]
    Hidden,

    /// Name contains control characters.
    #[error("filename contains control characters")]
    ControlChars,
}

/// Validate a stored name.
///
/// Requirements:
/// - Not empty, at most 255 bytes
/// - No `/` or `\`, not `.` or `..`, exactly one normal path component
/// - Does not start with `.`
/// - No control characters (including NUL)
///
/// # Examples
///
/// ```
/// use meteorz::file::validate_name;
///
/// assert!(validate_name("hello.lua").is_ok());
/// assert!(validate_name("../secret").is_err());
/// assert!(validate_name("nested/name.txt").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(NameError::TooLong);
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(NameError::PathTraversal);
    }
    if name.starts_with('.') {
        return Err(NameError::Hidden);
    }
    if name.chars().any(char::is_control) {
        return Err(NameError::ControlChars);
    }

    // Catches platform prefixes such as `C:` on Windows.
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(NameError::PathTraversal),
    }
}

impl From<NameError> for crate::MeteorzError {
    fn from(err: NameError) -> Self {
        crate::MeteorzError::InvalidName(err.to_string())
    }
}
