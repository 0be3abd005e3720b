use crate::deadline::Deadline;
use crate::traits::{ByteStream, StorageError, StorageProvider, StorageResult, UploadResult};
use crate::StorageDriver;
use async_trait::async_trait;
use futures::StreamExt;
use http::Method;
use meeting_core::constants::{SIGNED_URL_TTL, STORAGE_HTTP_TIMEOUT};
use meeting_core::StorageConfig;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::signer::Signer;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, Attributes, ClientOptions, ObjectStoreExt, Result as ObjectResult};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWriteExt};
use url::Url;

/// S3-compatible storage implementation (AWS S3, MinIO)
///
/// Objects are addressed path-style (`{endpoint}/{bucket}/{key}`) so that
/// self-hosted endpoints work without wildcard DNS.
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<AmazonS3>,
    bucket: String,
    driver: StorageDriver,
    signed_url_ttl: Duration,
}

impl S3Storage {
    /// Create a new S3Storage instance from the storage configuration.
    ///
    /// Fails with `StorageError::Config` when the endpoint is not a valid URL
    /// or the client cannot be built from the given settings.
    pub fn new(config: &StorageConfig) -> StorageResult<Self> {
        let client_options = ClientOptions::new().with_timeout(STORAGE_HTTP_TIMEOUT);

        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(config.bucket.clone())
            .with_region(config.region.clone())
            .with_virtual_hosted_style_request(false)
            .with_client_options(client_options);

        if !config.access_key.is_empty() {
            builder = builder
                .with_access_key_id(config.access_key.clone())
                .with_secret_access_key(config.secret_key.clone());
        }

        if let Some(ref endpoint) = config.endpoint {
            let parsed = Url::parse(endpoint).map_err(|e| {
                StorageError::Config(format!("Invalid storage endpoint '{}': {}", endpoint, e))
            })?;
            builder = builder
                .with_endpoint(endpoint.trim_end_matches('/').to_string())
                .with_allow_http(parsed.scheme() == "http");
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::Config(e.to_string()))?;

        tracing::info!(
            driver = %config.driver,
            bucket = %config.bucket,
            region = %config.region,
            endpoint = ?config.endpoint,
            "S3 storage client initialized"
        );

        Ok(S3Storage {
            store: Arc::new(store),
            bucket: config.bucket.clone(),
            driver: config.driver,
            signed_url_ttl: SIGNED_URL_TTL,
        })
    }

    async fn put_stream(
        &self,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<UploadResult> {
        let start = std::time::Instant::now();
        let location = Path::from(key);

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());

        // Single PUT up to the writer's buffer capacity, multipart beyond it.
        let store: Arc<dyn object_store::ObjectStore> = self.store.clone();
        let mut writer = BufWriter::new(store, location).with_attributes(attributes);

        let upload_failed = |message: String| StorageError::UploadFailed {
            key: key.to_string(),
            message,
        };

        let size = match tokio::io::copy(&mut reader, &mut writer).await {
            Ok(size) => size,
            Err(e) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(
                        error = %abort_err,
                        bucket = %self.bucket,
                        key = %key,
                        "Failed to abort partial S3 upload"
                    );
                }
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                return Err(upload_failed(e.to_string()));
            }
        };

        writer.shutdown().await.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            upload_failed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(UploadResult {
            key: key.to_string(),
            url: None,
            size: Some(size),
            mime_type: content_type.to_string(),
        })
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let location = Path::from(key);

        let result: ObjectResult<_> = self.store.delete(&location).await;

        match result {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                return Err(StorageError::DeleteFailed {
                    key: key.to_string(),
                    message: e.to_string(),
                });
            }
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    async fn presign_get(&self, key: &str) -> StorageResult<String> {
        let location = Path::from(key);
        let url_result: ObjectResult<_> = self
            .store
            .signed_url(Method::GET, &location, self.signed_url_ttl)
            .await;

        let url = url_result
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "S3 presign failed"
                );
                StorageError::SignedUrlFailed {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            })?
            .to_string();

        tracing::debug!(bucket = %self.bucket, key = %key, "S3 presigned GET generated");

        Ok(url)
    }

    async fn open_stream(&self, key: &str) -> StorageResult<ByteStream> {
        let start = std::time::Instant::now();
        let location = Path::from(key);

        let result: ObjectResult<_> = self.store.get(&location).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => StorageError::DownloadFailed {
                key: key.to_string(),
                message: other.to_string(),
            },
        })?;

        let bucket = self.bucket.clone();
        let key = key.to_string();

        let stream = result.into_stream().map(move |res| {
            res.map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream download error"
                );
                StorageError::DownloadFailed {
                    key: key.clone(),
                    message: e.to_string(),
                }
            })
        });

        Ok(Box::pin(stream))
    }
}

#[async_trait]
impl StorageProvider for S3Storage {
    async fn upload(
        &self,
        deadline: Deadline,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<UploadResult> {
        deadline
            .run("upload", key, self.put_stream(reader, key, content_type))
            .await
    }

    async fn delete(&self, deadline: Deadline, key: &str) -> StorageResult<()> {
        deadline.run("delete", key, self.delete_object(key)).await
    }

    async fn get_signed_url(&self, deadline: Deadline, key: &str) -> StorageResult<String> {
        deadline
            .run("get_signed_url", key, self.presign_get(key))
            .await
    }

    async fn download_stream(&self, deadline: Deadline, key: &str) -> StorageResult<ByteStream> {
        deadline.run("download", key, self.open_stream(key)).await
    }

    fn signed_url_ttl(&self) -> Duration {
        self.signed_url_ttl
    }

    fn driver(&self) -> StorageDriver {
        self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn minio_config(endpoint: Option<&str>) -> StorageConfig {
        StorageConfig {
            driver: StorageDriver::Minio,
            bucket: "meetings".to_string(),
            endpoint: endpoint.map(String::from),
            region: "us-east-1".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            local_path: PathBuf::from("./uploads"),
            public_base_url: "http://localhost:8080".to_string(),
            url_signing_key: None,
        }
    }

    #[test]
    fn test_malformed_endpoint_is_config_error() {
        let result = S3Storage::new(&minio_config(Some("not a url")));
        assert!(matches!(result, Err(StorageError::Config(_))));
    }

    #[tokio::test]
    async fn test_presigned_get_uses_path_style_and_ttl() {
        let storage = S3Storage::new(&minio_config(Some("http://localhost:9000"))).unwrap();
        let url = storage
            .get_signed_url(Deadline::after(Duration::from_secs(5)), "abc.mp3")
            .await
            .unwrap();

        assert!(url.starts_with("http://localhost:9000/meetings/abc.mp3?"));
        assert!(url.contains("X-Amz-Expires=900"));
        assert!(url.contains("X-Amz-Signature="));
        assert_eq!(storage.signed_url_ttl(), Duration::from_secs(900));
        assert_eq!(storage.driver(), StorageDriver::Minio);
    }

    #[tokio::test]
    async fn test_signed_url_on_expired_deadline_fails() {
        let storage = S3Storage::new(&minio_config(Some("http://localhost:9000"))).unwrap();
        let result = storage
            .get_signed_url(Deadline::after(Duration::ZERO), "abc.mp3")
            .await;
        assert!(matches!(result, Err(StorageError::DeadlineExceeded { .. })));
    }
}
