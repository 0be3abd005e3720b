//! Meeting Core Library
//!
//! Domain models, error types, configuration and constants shared by every
//! crate in the meeting backend.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, DatabaseConfig, QueueConfig, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageDriver;
