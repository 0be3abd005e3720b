//! Domain route groups (files, meetings).

use crate::constants::{API_PREFIX, FILE_ROUTES, LOCAL_FILE_ROUTE, MEETING_ROUTES};
use crate::handlers;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use meeting_core::StorageDriver;
use std::sync::Arc;

pub fn file_routes(state: &AppState) -> Router<Arc<AppState>> {
    let files = format!("{}{}", API_PREFIX, FILE_ROUTES);

    let router = Router::new()
        .route(
            &format!("{}/upload", files),
            // The handler enforces the upload cap while spooling.
            post(handlers::file::upload_recording).layer(DefaultBodyLimit::disable()),
        )
        .route(
            &format!("{}/download/{{file_id}}", files),
            get(handlers::file::download_recording),
        );

    if state.storage.driver() == StorageDriver::Local {
        router.route(
            &format!("{}{}/{{file_id}}", API_PREFIX, LOCAL_FILE_ROUTE),
            get(handlers::file::serve_local_file),
        )
    } else {
        router
    }
}

pub fn meeting_routes() -> Router<Arc<AppState>> {
    let meetings = format!("{}{}", API_PREFIX, MEETING_ROUTES);

    Router::new()
        .route(
            &meetings,
            post(handlers::meetings::create_meeting).get(handlers::meetings::list_meetings),
        )
        .route(
            &format!("{}/{{id}}", meetings),
            get(handlers::meetings::get_meeting)
                .put(handlers::meetings::update_meeting)
                .delete(handlers::meetings::delete_meeting),
        )
        .route(
            &format!("{}/{{id}}/process", meetings),
            post(handlers::meetings::process_meeting),
        )
}
