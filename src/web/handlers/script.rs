//! Script upload, listing and retrieval handlers.

use axum::{
    body::{Body, Bytes},
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::PathRejection,
        Multipart, Path, Request, State,
    },
    http::StatusCode,
    response::Response,
    Json,
};
use mime_guess::Mime;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::web::dto::{ScriptListResponse, UploadResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::MeteorzError;

/// Multipart field carrying the uploaded file.
pub const SCRIPT_FIELD: &str = "scriptFile";

/// POST /upload - Store a script under its original filename.
///
/// Request body: multipart/form-data with exactly one file in `scriptFile`.
/// Other fields are ignored. An existing script with the same name is
/// replaced.
pub async fn upload_script(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    // A request that is not multipart at all carries no file.
    let mut multipart = multipart.map_err(|e| {
        tracing::warn!("Rejected upload without multipart body: {}", e);
        ApiError::bad_request("No file uploaded")
    })?;
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Invalid multipart data"))?
    {
        if field.name() != Some(SCRIPT_FIELD) {
            continue;
        }

        // Browsers send an empty filename when no file was selected.
        let Some(filename) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            continue;
        };

        if upload.is_some() {
            return Err(ApiError::bad_request("Only one file may be uploaded"));
        }

        let content = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, "Failed to read file"))?;
        upload = Some((filename, content));
    }

    let (filename, content) = upload.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;
    let size = content.len();

    let storage = state.storage.clone();
    let stored = tokio::task::spawn_blocking(move || storage.save(&filename, &content))
        .await
        .map_err(|e| {
            tracing::error!("Upload task failed: {}", e);
            ApiError::internal("Failed to save script")
        })?
        .map_err(|e| match e {
            MeteorzError::InvalidName(reason) => {
                tracing::warn!("Rejected upload: {}", reason);
                ApiError::bad_request("Invalid filename")
            }
            e => {
                tracing::error!("Failed to save script: {}", e);
                ApiError::internal("Failed to save script")
            }
        })?;

    tracing::info!(filename = %stored.name, size, "Script uploaded");

    Ok(Json(UploadResponse::new(stored.name)))
}

/// Map a multipart read error, keeping 413 for bodies over the upload limit.
fn multipart_error(err: MultipartError, message: &str) -> ApiError {
    tracing::warn!("Failed to read multipart body: {}", err);
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("Upload too large")
    } else {
        ApiError::bad_request(message)
    }
}

/// GET /scripts - List stored script names in lexicographic order.
pub async fn list_scripts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ScriptListResponse>, ApiError> {
    let scripts = state.storage.list().map_err(|e| {
        tracing::error!("Failed to list scripts: {}", e);
        ApiError::internal("Cannot read scripts folder")
    })?;

    Ok(Json(ScriptListResponse { scripts }))
}

/// GET /scripts/:filename - Stream a stored script.
///
/// The content type is guessed from the filename extension. Names that are
/// invalid, undecodable or absent all report not found.
pub async fn get_script(
    State(state): State<Arc<AppState>>,
    filename: Result<Path<String>, PathRejection>,
    request: Request,
) -> Result<Response, ApiError> {
    let Path(filename) = filename.map_err(|e| {
        tracing::warn!("Rejected script path: {}", e);
        ApiError::not_found("Script not found")
    })?;

    let path = state.storage.locate(&filename).map_err(|e| match e {
        MeteorzError::NotFound(_) => ApiError::not_found("Script not found"),
        MeteorzError::InvalidName(reason) => {
            tracing::warn!("Rejected script lookup {:?}: {}", filename, reason);
            ApiError::not_found("Script not found")
        }
        e => {
            tracing::error!("Failed to locate script: {}", e);
            ApiError::internal("Failed to read script")
        }
    })?;

    let mime = mime_guess::from_path(&filename).first_or_octet_stream();
    serve_script(path, &mime, request).await
}

async fn serve_script(path: PathBuf, mime: &Mime, request: Request) -> Result<Response, ApiError> {
    let response = match ServeFile::new_with_mime(path, mime).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    // The file can vanish between locate and open.
    if response.status() == StatusCode::NOT_FOUND {
        return Err(ApiError::not_found("Script not found"));
    }

    Ok(response.map(Body::new))
}
