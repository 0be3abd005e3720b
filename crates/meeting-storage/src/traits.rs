//! Storage abstraction trait
//!
//! This module defines the `StorageProvider` trait that every storage backend implements.

use crate::deadline::Deadline;
use crate::StorageDriver;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
///
/// Backend failures carry the key they were operating on and the backend's
/// diagnostic message.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed for key {key}: {message}")]
    UploadFailed { key: String, message: String },

    #[error("Delete failed for key {key}: {message}")]
    DeleteFailed { key: String, message: String },

    #[error("Signed URL generation failed for key {key}: {message}")]
    SignedUrlFailed { key: String, message: String },

    #[error("Download failed for key {key}: {message}")]
    DownloadFailed { key: String, message: String },

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Invalid or expired signature for key {0}")]
    InvalidSignature(String),

    #[error("Deadline exceeded during {operation} of key {key}")]
    DeadlineExceeded {
        operation: &'static str,
        key: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Stream of object bytes
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// Outcome of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// Identifier of the stored object
    pub key: String,
    /// Direct URL, only set when one was produced at upload time
    pub url: Option<String>,
    /// Number of bytes written, when the backend reports it
    pub size: Option<u64>,
    /// Content type declared by the uploader
    pub mime_type: String,
}

/// Storage provider trait
///
/// Exactly one provider is constructed per process and shared across all
/// requests, so implementations hold only immutable client state.
///
/// Every operation is bounded by a [`Deadline`]: an expired deadline fails
/// immediately with [`StorageError::DeadlineExceeded`] and a deadline that
/// elapses mid-operation aborts the backend call. Nothing is retried.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Stream `reader` to the backend under `key`.
    ///
    /// The payload is never buffered in full. On failure, whether a partial
    /// object is visible is backend-dependent.
    async fn upload(
        &self,
        deadline: Deadline,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<UploadResult>;

    /// Remove the object stored under `key`. Deleting an absent key succeeds.
    async fn delete(&self, deadline: Deadline, key: &str) -> StorageResult<()>;

    /// Produce a retrieval URL for `key` valid for [`signed_url_ttl`](Self::signed_url_ttl).
    async fn get_signed_url(&self, deadline: Deadline, key: &str) -> StorageResult<String>;

    /// Open the object for streaming.
    ///
    /// The deadline bounds opening the object only; the returned stream is
    /// consumed at the client's pace.
    async fn download_stream(&self, deadline: Deadline, key: &str) -> StorageResult<ByteStream>;

    /// Validity window of URLs returned by `get_signed_url`.
    fn signed_url_ttl(&self) -> Duration;

    /// Driver this provider was constructed for.
    fn driver(&self) -> StorageDriver;
}
