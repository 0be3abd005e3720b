use crate::deadline::Deadline;
use crate::keys::validate_key;
use crate::signing::UrlSigner;
use crate::traits::{ByteStream, StorageError, StorageProvider, StorageResult, UploadResult};
use crate::StorageDriver;
use async_trait::async_trait;
use futures::StreamExt;
use meeting_core::constants::SIGNED_URL_TTL;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio_util::io::ReaderStream;

/// Local filesystem storage implementation
///
/// Recordings are stored flat under `root` by key. Signed URLs point at the
/// API's local file route and carry an expiry plus an HMAC over key and expiry.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
    signer: Arc<UrlSigner>,
    signed_url_ttl: Duration,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `root` - Directory recordings are written to (created if missing)
    /// * `base_url` - Absolute URL of the file-serving route (e.g., "http://localhost:8080/api/v1/file/local")
    /// * `signer` - Signer shared with the route that verifies the URLs
    pub async fn new(
        root: impl Into<PathBuf>,
        base_url: String,
        signer: Arc<UrlSigner>,
    ) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::Config(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            root,
            base_url: base_url.trim_end_matches('/').to_string(),
            signer,
            signed_url_ttl: SIGNED_URL_TTL,
        })
    }

    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    async fn write_file(
        &self,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<UploadResult> {
        let path = self.key_to_path(key)?;
        let start = std::time::Instant::now();

        let upload_failed = |action: &str, e: std::io::Error| StorageError::UploadFailed {
            key: key.to_string(),
            message: format!("Failed to {} file {}: {}", action, path.display(), e),
        };

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| upload_failed("create", e))?;

        let written = async {
            let size = tokio::io::copy(&mut reader, &mut file).await?;
            file.flush().await?;
            file.sync_all().await?;
            Ok::<u64, std::io::Error>(size)
        }
        .await;

        let size = match written {
            Ok(size) => size,
            Err(e) => {
                drop(file);
                if let Err(remove_err) = fs::remove_file(&path).await {
                    tracing::warn!(
                        error = %remove_err,
                        path = %path.display(),
                        "Failed to remove partial upload"
                    );
                }
                tracing::error!(
                    error = %e,
                    path = %path.display(),
                    key = %key,
                    "Local storage upload failed"
                );
                return Err(upload_failed("write", e));
            }
        };

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(UploadResult {
            key: key.to_string(),
            url: None,
            size: Some(size),
            mime_type: content_type.to_string(),
        })
    }

    async fn remove_file(&self, key: &str) -> StorageResult<()> {
        let path = self.key_to_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), key = %key, "Local storage delete successful");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(key = %key, "Local storage delete of absent key");
                Ok(())
            }
            Err(e) => Err(StorageError::DeleteFailed {
                key: key.to_string(),
                message: format!("Failed to delete file {}: {}", path.display(), e),
            }),
        }
    }

    fn signed_url(&self, key: &str) -> StorageResult<String> {
        validate_key(key)?;
        let expires = UrlSigner::expiry_from_now(self.signed_url_ttl);
        let signature = self.signer.sign(key, expires);

        Ok(format!(
            "{}/{}?expires={}&signature={}",
            self.base_url,
            urlencoding::encode(key),
            expires,
            signature
        ))
    }

    async fn open_file(&self, key: &str) -> StorageResult<ByteStream> {
        let path = self.key_to_path(key)?;

        let file = fs::File::open(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
            _ => StorageError::DownloadFailed {
                key: key.to_string(),
                message: format!("Failed to open file {}: {}", path.display(), e),
            },
        })?;

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(StorageError::DownloadFailed {
                key: key.to_string(),
                message: format!("{} is not a regular file", path.display()),
            });
        }

        tracing::debug!(path = %path.display(), key = %key, "Local storage stream opened");

        let stream = ReaderStream::new(file).map(|chunk| chunk.map_err(StorageError::Io));
        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl StorageProvider for LocalStorage {
    async fn upload(
        &self,
        deadline: Deadline,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<UploadResult> {
        deadline
            .run("upload", key, self.write_file(reader, key, content_type))
            .await
    }

    async fn delete(&self, deadline: Deadline, key: &str) -> StorageResult<()> {
        deadline.run("delete", key, self.remove_file(key)).await
    }

    async fn get_signed_url(&self, deadline: Deadline, key: &str) -> StorageResult<String> {
        deadline
            .run("get_signed_url", key, async { self.signed_url(key) })
            .await
    }

    async fn download_stream(&self, deadline: Deadline, key: &str) -> StorageResult<ByteStream> {
        deadline.run("download", key, self.open_file(key)).await
    }

    fn signed_url_ttl(&self) -> Duration {
        self.signed_url_ttl
    }

    fn driver(&self) -> StorageDriver {
        StorageDriver::Local
    }
}
