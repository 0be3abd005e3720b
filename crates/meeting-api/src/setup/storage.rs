//! Storage setup and initialization

use anyhow::{Context, Result};
use meeting_core::Config;
use meeting_storage::{create_storage, StorageProvider, UrlSigner};
use std::sync::Arc;

/// Build the process-wide storage provider and the signer for local download links.
pub async fn setup_storage(config: &Config) -> Result<(Arc<dyn StorageProvider>, Arc<UrlSigner>)> {
    let url_signer = match config.storage.url_signing_key {
        Some(ref key) => UrlSigner::new(key.as_bytes()),
        None => {
            if config.storage_driver() == meeting_core::StorageDriver::Local {
                tracing::warn!(
                    "LOCAL_URL_SIGNING_KEY not set - download links will not survive a restart"
                );
            }
            UrlSigner::random()
        }
    }
    .context("Failed to initialize URL signer")?;
    let url_signer = Arc::new(url_signer);

    tracing::info!(driver = %config.storage_driver(), "Initializing storage provider...");
    let storage = create_storage(&config.storage, url_signer.clone())
        .await
        .context("Failed to initialize storage provider")?;
    tracing::info!(
        driver = %storage.driver(),
        signed_url_ttl_secs = storage.signed_url_ttl().as_secs(),
        "Storage provider initialized successfully"
    );

    Ok((storage, url_signer))
}
