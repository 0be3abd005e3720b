//! Meeting Storage Library
//!
//! Storage abstraction for meeting recordings: the `StorageProvider` trait plus
//! an S3-compatible backend (AWS S3, MinIO) and a local-disk backend.
//!
//! # Storage key format
//!
//! Keys are generated by the upload pipeline as `{uuid}.{extension}` and are used
//! verbatim as object names (S3) or file names (local disk). Keys never contain
//! `..`, `/` or `\`; see the `keys` module.

pub mod deadline;
pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod signing;
pub mod traits;

// Re-export commonly used types
pub use deadline::Deadline;
pub use factory::create_storage;
pub use keys::{generate_storage_key, validate_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use meeting_core::StorageDriver;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use signing::UrlSigner;
pub use traits::{ByteStream, StorageError, StorageProvider, StorageResult, UploadResult};
