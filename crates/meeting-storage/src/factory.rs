#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{StorageDriver, StorageProvider, StorageResult, UrlSigner};
use meeting_core::StorageConfig;
use std::sync::Arc;

/// Create the storage provider selected by `config.driver`.
///
/// `signer` is only used by the local driver, whose signed URLs are verified
/// by the API with the same signer.
pub async fn create_storage(
    config: &StorageConfig,
    #[cfg_attr(not(feature = "storage-local"), allow(unused_variables))] signer: Arc<UrlSigner>,
) -> StorageResult<Arc<dyn StorageProvider>> {
    match config.driver {
        #[cfg(feature = "storage-s3")]
        StorageDriver::S3 | StorageDriver::Minio => {
            let storage = S3Storage::new(config)?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageDriver::S3 | StorageDriver::Minio => Err(crate::StorageError::Config(format!(
            "{} storage driver not available (storage-s3 feature not enabled)",
            config.driver
        ))),

        #[cfg(feature = "storage-local")]
        StorageDriver::Local => {
            let storage = LocalStorage::new(
                config.local_path.clone(),
                config.local_files_base_url(),
                signer,
            )
            .await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageDriver::Local => Err(crate::StorageError::Config(
            "Local storage driver not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn storage_config(driver: StorageDriver, local_path: PathBuf) -> StorageConfig {
        StorageConfig {
            driver,
            bucket: "meetings".to_string(),
            endpoint: Some("http://localhost:9000".to_string()),
            region: "us-east-1".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            local_path,
            public_base_url: "http://localhost:8080".to_string(),
            url_signing_key: None,
        }
    }

    #[tokio::test]
    async fn test_local_driver_creates_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("recordings");
        let signer = Arc::new(UrlSigner::random().unwrap());

        let storage = create_storage(&storage_config(StorageDriver::Local, root.clone()), signer)
            .await
            .unwrap();

        assert_eq!(storage.driver(), StorageDriver::Local);
        assert!(root.is_dir());
    }

    #[cfg(feature = "storage-s3")]
    #[tokio::test]
    async fn test_minio_driver() {
        let signer = Arc::new(UrlSigner::random().unwrap());
        let storage = create_storage(
            &storage_config(StorageDriver::Minio, PathBuf::from("./uploads")),
            signer,
        )
        .await
        .unwrap();
        assert_eq!(storage.driver(), StorageDriver::Minio);
    }
}
