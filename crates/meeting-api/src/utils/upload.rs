//! Multipart spooling and recording validation for the upload endpoint

use axum::extract::Multipart;
use meeting_core::constants::ALLOWED_RECORDING_EXTENSIONS;
use meeting_core::AppError;
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

pub const NO_FILE_MESSAGE: &str = "No file uploaded";
pub const FILE_TOO_LARGE_MESSAGE: &str = "File size exceeds 50MB";
pub const INVALID_EXTENSION_MESSAGE: &str = "Only .mp3, .wav, and .m4a files are allowed";

/// Upload body spooled to an anonymous temp file, rewound to the start
#[derive(Debug)]
pub struct SpooledFile {
    pub file: File,
    pub size: u64,
    pub filename: String,
    /// Content type the client declared on the part, if any
    pub content_type: Option<String>,
}

impl SpooledFile {
    /// Declared content type, or the one implied by the key's extension.
    pub fn content_type_for(&self, key: &str) -> String {
        upload_content_type(self.content_type.as_deref(), key)
    }
}

/// Spool the multipart field named `file` to disk while counting bytes.
///
/// Reading stops as soon as the count passes `max_size`. Other fields are
/// skipped; a second `file` field is rejected.
pub async fn spool_file_field(
    mut multipart: Multipart,
    max_size: u64,
) -> Result<SpooledFile, AppError> {
    let mut spooled: Option<SpooledFile> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        if spooled.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let mut file = File::from_std(tempfile::tempfile()?);
        let mut size: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?
        {
            size += chunk.len() as u64;
            if size > max_size {
                tracing::debug!(
                    filename = %filename,
                    max_size,
                    "Upload rejected while spooling: size cap exceeded"
                );
                return Err(AppError::InvalidInput(FILE_TOO_LARGE_MESSAGE.to_string()));
            }
            file.write_all(&chunk).await?;
        }

        file.flush().await?;
        file.rewind().await?;

        spooled = Some(SpooledFile {
            file,
            size,
            filename,
            content_type,
        });
    }

    spooled.ok_or_else(|| AppError::InvalidInput(NO_FILE_MESSAGE.to_string()))
}

/// Lowercase extension of `filename` if it is an accepted recording format.
pub fn validate_recording_extension(filename: &str) -> Result<String, AppError> {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if !ALLOWED_RECORDING_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::InvalidInput(INVALID_EXTENSION_MESSAGE.to_string()));
    }

    Ok(extension)
}

/// Content type served for a stored recording key.
pub fn recording_content_type(key: &str) -> &'static str {
    let extension = key.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match extension.to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        _ => "application/octet-stream",
    }
}

/// Content type recorded for an upload: the declared one when present,
/// otherwise derived from the key.
pub fn upload_content_type(declared: Option<&str>, key: &str) -> String {
    match declared.map(str::trim) {
        Some(declared) if !declared.is_empty() => declared.to_string(),
        _ => recording_content_type(key).to_string(),
    }
}
