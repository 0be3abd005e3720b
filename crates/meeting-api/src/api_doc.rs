//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use meeting_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Meeting Assistant API",
        version = "0.1.0",
        description = "Upload meeting recordings, manage meetings and queue recordings for processing. All endpoints are versioned under /api/v1/."
    ),
    paths(
        // Files
        handlers::file::upload_recording,
        handlers::file::download_recording,
        // Meetings
        handlers::meetings::create_meeting,
        handlers::meetings::list_meetings,
        handlers::meetings::get_meeting,
        handlers::meetings::update_meeting,
        handlers::meetings::delete_meeting,
        handlers::meetings::process_meeting,
        // Health
        handlers::health::liveness_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::file::UploadResponse,
        handlers::file::DownloadLinkResponse,
        handlers::meetings::MessageResponse,
        handlers::meetings::ProcessResponse,
        handlers::health::ReadinessResponse,
        models::Meeting,
        models::MeetingStatus,
        models::CreateMeetingRequest,
        models::MeetingPatch,
        models::MeetingJob,
    )),
    tags(
        (name = "files", description = "Recording upload and download"),
        (name = "meetings", description = "Meeting records and processing"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
