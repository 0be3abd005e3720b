//! API route constants

pub use meeting_core::constants::{API_PREFIX, LOCAL_FILE_ROUTE};

/// Upload and download routes
pub const FILE_ROUTES: &str = "/file";

/// Meeting CRUD routes
pub const MEETING_ROUTES: &str = "/meetings";

/// Served OpenAPI document
pub const OPENAPI_JSON_PATH: &str = "/api/openapi.json";
