//! Meeting API Library
//!
//! HTTP handlers, application state and setup for the meeting backend.

mod api_doc;
pub mod constants;
mod handlers;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::{AppState, DownloadMode};
