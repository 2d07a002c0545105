//! Response DTOs for the Meteorz web API.

use serde::Serialize;

/// Message returned on a successful upload.
pub const UPLOAD_MESSAGE: &str = "Script uploaded";

/// POST /upload response.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Status message.
    pub message: String,
    /// Stored name.
    pub filename: String,
}

impl UploadResponse {
    /// Create an upload response for the given stored name.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            message: UPLOAD_MESSAGE.to_string(),
            filename: filename.into(),
        }
    }
}

/// GET /scripts response.
#[derive(Debug, Serialize)]
pub struct ScriptListResponse {
    /// Stored names.
    pub scripts: Vec<String>,
}
