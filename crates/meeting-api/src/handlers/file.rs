use crate::error::{ErrorResponse, HttpAppError};
use crate::state::{AppState, DownloadMode};
use crate::utils::upload::{recording_content_type, spool_file_field, validate_recording_extension};
use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, Response, StatusCode},
    response::IntoResponse,
    Json,
};
use futures::StreamExt;
use meeting_core::constants::{
    DOWNLOAD_OPEN_TIMEOUT, MAX_UPLOAD_SIZE_BYTES, SIGNED_URL_TIMEOUT, UPLOAD_TIMEOUT,
};
use meeting_core::AppError;
use meeting_storage::{generate_storage_key, validate_key, Deadline, StorageError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    /// Storage key of the uploaded recording
    pub file_id: String,
    /// Name the file was uploaded with
    pub filename: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadLinkResponse {
    pub file_id: String,
    pub download_url: String,
    /// Validity of `download_url`, e.g. "15m"
    pub expires_in: String,
}

#[derive(Debug, Deserialize)]
pub struct SignedFileQuery {
    pub expires: Option<u64>,
    pub signature: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/file/upload",
    tag = "files",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Recording uploaded", body = UploadResponse),
        (status = 400, description = "Missing file, too large, or unsupported format", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_recording"))]
pub async fn upload_recording(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let spooled = spool_file_field(multipart, MAX_UPLOAD_SIZE_BYTES).await?;
    let extension = validate_recording_extension(&spooled.filename)?;

    let key = generate_storage_key(&extension);
    let content_type = spooled.content_type_for(&key);

    tracing::debug!(
        key = %key,
        filename = %spooled.filename,
        content_type = %content_type,
        size_bytes = spooled.size,
        "Uploading recording"
    );

    let result = state
        .storage
        .upload(
            Deadline::after(UPLOAD_TIMEOUT),
            Box::pin(spooled.file),
            &key,
            &content_type,
        )
        .await
        .map_err(|e| AppError::storage("Failed to upload to storage", e))?;

    Ok(Json(UploadResponse {
        message: "File uploaded successfully".to_string(),
        file_id: result.key,
        filename: spooled.filename,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/file/download/{file_id}",
    tag = "files",
    params(
        ("file_id" = String, Path, description = "Storage key returned by the upload")
    ),
    responses(
        (status = 200, description = "Signed download link (object storage) or the recording bytes (local disk)", body = DownloadLinkResponse),
        (status = 400, description = "Invalid file ID", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download_recording"))]
pub async fn download_recording(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
) -> Result<Response<Body>, HttpAppError> {
    validate_key(&file_id).map_err(|_| AppError::InvalidInput("Invalid file ID".to_string()))?;

    match state.download_mode {
        DownloadMode::SignedUrl => {
            let download_url = state
                .storage
                .get_signed_url(Deadline::after(SIGNED_URL_TIMEOUT), &file_id)
                .await
                .map_err(|e| AppError::storage("Failed to generate download link", e))?;

            Ok(Json(DownloadLinkResponse {
                file_id,
                download_url,
                expires_in: format_ttl(state.storage.signed_url_ttl()),
            })
            .into_response())
        }
        DownloadMode::Stream => stream_recording(&state, &file_id).await,
    }
}

/// Serve a local-disk recording reached through a signed URL.
#[tracing::instrument(skip(state, query), fields(operation = "serve_local_file"))]
pub async fn serve_local_file(
    State(state): State<Arc<AppState>>,
    Path(file_id): Path<String>,
    Query(query): Query<SignedFileQuery>,
) -> Result<Response<Body>, HttpAppError> {
    validate_key(&file_id).map_err(|_| AppError::InvalidInput("Invalid file ID".to_string()))?;

    let (Some(expires), Some(signature)) = (query.expires, query.signature) else {
        return Err(AppError::InvalidInput("Missing download link signature".to_string()).into());
    };

    state.url_signer.verify(&file_id, expires, &signature)?;

    stream_recording(&state, &file_id).await
}

async fn stream_recording(state: &AppState, key: &str) -> Result<Response<Body>, HttpAppError> {
    let stream = state
        .storage
        .download_stream(Deadline::after(DOWNLOAD_OPEN_TIMEOUT), key)
        .await
        .map_err(|e| match e {
            StorageError::NotFound(_) => AppError::NotFound("File not found".to_string()),
            other => AppError::storage("Failed to read from storage", other),
        })?;

    let body_stream = stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let content_disposition = format!("attachment; filename=\"{}\"", key);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, recording_content_type(key))
        .header(header::CONTENT_DISPOSITION, content_disposition.as_str())
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// Human-readable validity window: whole minutes as "15m", otherwise seconds.
fn format_ttl(ttl: Duration) -> String {
    let secs = ttl.as_secs();
    if secs > 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ttl() {
        assert_eq!(format_ttl(Duration::from_secs(900)), "15m");
        assert_eq!(format_ttl(Duration::from_secs(90)), "90s");
        assert_eq!(format_ttl(Duration::ZERO), "0s");
    }
}
