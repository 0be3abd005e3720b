//! Limits and timeouts shared by the upload pipeline, storage providers and queue.

use std::time::Duration;

/// Largest accepted recording upload (50 MiB).
pub const MAX_UPLOAD_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Recording extensions accepted by the upload endpoint (lowercase, without dot).
pub const ALLOWED_RECORDING_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a"];

/// Upload deadline, sized for the 50 MiB cap over a slow connection.
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Deadline for producing a signed download URL.
pub const SIGNED_URL_TIMEOUT: Duration = Duration::from_secs(5);

/// Validity window of signed download URLs.
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(15 * 60);

/// Deadline for opening a stored recording for streaming.
pub const DOWNLOAD_OPEN_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline for removing a stored recording.
pub const DELETE_TIMEOUT: Duration = Duration::from_secs(30);

/// Deadline for a single queue push.
pub const QUEUE_PUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// HTTP client timeout for the object-storage backend, independent of per-call deadlines.
pub const STORAGE_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Redis list consumed by the processing worker.
pub const DEFAULT_QUEUE_NAME: &str = "meeting_jobs";

/// Base path of the versioned HTTP API.
pub const API_PREFIX: &str = "/api/v1";

/// Route (under `API_PREFIX`) serving local-disk files through signed URLs.
pub const LOCAL_FILE_ROUTE: &str = "/file/local";
