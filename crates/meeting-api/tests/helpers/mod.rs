#![allow(dead_code)]

mod mocks;

pub use mocks::*;

use axum_test::TestServer;
use meeting_api::setup::routes::setup_routes;
use meeting_api::AppState;
use meeting_core::Config;
use meeting_storage::{LocalStorage, StorageProvider, UrlSigner};
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

/// Returns the versioned API path.
/// Usage: `api_path("/meetings")` -> `/api/v1/meetings`.
pub fn api_path(path: &str) -> String {
    format!("{}{}", meeting_api::constants::API_PREFIX, path)
}

pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub store: InMemoryMeetingStore,
    pub jobs: RecordingJobPublisher,
    /// Present when the app runs against the in-memory object store
    pub memory: Option<MemoryStorage>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn memory(&self) -> &MemoryStorage {
        self.memory
            .as_ref()
            .expect("app was not built with object storage")
    }

    /// Path of a locally stored recording
    pub fn local_file(&self, key: &str) -> std::path::PathBuf {
        self._temp_dir.path().join(key)
    }
}

fn test_config(driver: &str, temp_dir: &TempDir) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("STORAGE_DRIVER", driver.to_string()),
        (
            "LOCAL_STORAGE_PATH",
            temp_dir.path().to_string_lossy().into_owned(),
        ),
        ("PUBLIC_BASE_URL", "http://localhost:8080".to_string()),
        ("CORS_ORIGINS", "*".to_string()),
        ("ENVIRONMENT", "test".to_string()),
    ]);
    Config::from_vars(|key| vars.get(key).cloned()).expect("Failed to build test config")
}

fn build_app(
    config: Config,
    storage: Arc<dyn StorageProvider>,
    signer: Arc<UrlSigner>,
    memory: Option<MemoryStorage>,
    temp_dir: TempDir,
) -> TestApp {
    let store = InMemoryMeetingStore::new();
    let jobs = RecordingJobPublisher::new();

    let state = Arc::new(AppState::new(
        config.clone(),
        storage,
        signer,
        Arc::new(store.clone()),
        Arc::new(jobs.clone()),
    ));

    let router = setup_routes(&config, state.clone()).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        state,
        store,
        jobs,
        memory,
        _temp_dir: temp_dir,
    }
}

/// App backed by local-disk storage under a temporary directory
pub async fn setup_local_app() -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config("local", &temp_dir);

    let signer = Arc::new(UrlSigner::new(b"test-signing-key").expect("Failed to build signer"));
    let storage = LocalStorage::new(
        config.storage.local_path.clone(),
        config.storage.local_files_base_url(),
        signer.clone(),
    )
    .await
    .expect("Failed to create local storage");

    build_app(config, Arc::new(storage), signer, None, temp_dir)
}

/// App backed by the in-memory object store, serving presigned links
pub async fn setup_object_store_app() -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = test_config("minio", &temp_dir);

    let signer = Arc::new(UrlSigner::new(b"test-signing-key").expect("Failed to build signer"));
    let memory = MemoryStorage::new();

    build_app(
        config,
        Arc::new(memory.clone()),
        signer,
        Some(memory),
        temp_dir,
    )
}
