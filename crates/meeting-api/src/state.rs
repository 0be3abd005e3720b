//! Application state shared by all handlers.

use meeting_core::{Config, StorageDriver};
use meeting_db::MeetingStore;
use meeting_queue::JobPublisher;
use meeting_storage::{StorageProvider, UrlSigner};
use std::sync::Arc;

/// How `GET /file/download/{file_id}` serves a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    /// Respond with a time-limited URL pointing at the backend
    SignedUrl,
    /// Stream the bytes through the API
    Stream,
}

impl DownloadMode {
    pub fn for_driver(driver: StorageDriver) -> Self {
        if driver.is_object_store() {
            DownloadMode::SignedUrl
        } else {
            DownloadMode::Stream
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn StorageProvider>,
    pub download_mode: DownloadMode,
    /// Verifies URLs issued by the local storage driver
    pub url_signer: Arc<UrlSigner>,
    pub meetings: Arc<dyn MeetingStore>,
    pub queue: Arc<dyn JobPublisher>,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: Arc<dyn StorageProvider>,
        url_signer: Arc<UrlSigner>,
        meetings: Arc<dyn MeetingStore>,
        queue: Arc<dyn JobPublisher>,
    ) -> Self {
        let download_mode = DownloadMode::for_driver(storage.driver());
        Self {
            config,
            storage,
            download_mode,
            url_signer,
            meetings,
            queue,
        }
    }
}
