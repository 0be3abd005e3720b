use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use meeting_core::constants::DELETE_TIMEOUT;
use meeting_core::models::{CreateMeetingRequest, Meeting, MeetingPatch};
use meeting_core::AppError;
use meeting_storage::{Deadline, StorageError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProcessResponse {
    pub message: String,
    pub id: i32,
    pub file_path: String,
}

fn parse_meeting_id(raw: &str) -> Result<i32, AppError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| AppError::InvalidInput("Invalid ID format".to_string()))
}

fn meeting_not_found() -> AppError {
    AppError::NotFound("Meeting not found".to_string())
}

async fn enqueue_recording(state: &AppState, meeting_id: i32, key: &str) -> Result<(), AppError> {
    state
        .queue
        .enqueue(meeting_id, key)
        .await
        .map_err(|e| AppError::Queue(e.to_string()))
}

#[utoipa::path(
    post,
    path = "/api/v1/meetings",
    tag = "meetings",
    request_body = CreateMeetingRequest,
    responses(
        (status = 201, description = "Meeting created", body = Meeting),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Database or queue failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(operation = "create_meeting"))]
pub async fn create_meeting(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateMeetingRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;

    let meeting = state.meetings.create(&request).await?;

    tracing::info!(meeting_id = meeting.id, "Meeting created");

    if let Some(key) = meeting.recording_key() {
        enqueue_recording(&state, meeting.id, key).await?;
    }

    Ok((StatusCode::CREATED, Json(meeting)))
}

#[utoipa::path(
    get,
    path = "/api/v1/meetings",
    tag = "meetings",
    responses(
        (status = 200, description = "All meetings, newest first", body = [Meeting]),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_meetings"))]
pub async fn list_meetings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Meeting>>, HttpAppError> {
    let meetings = state.meetings.list().await?;
    Ok(Json(meetings))
}

#[utoipa::path(
    get,
    path = "/api/v1/meetings/{id}",
    tag = "meetings",
    params(("id" = i32, Path, description = "Meeting ID")),
    responses(
        (status = 200, description = "Meeting", body = Meeting),
        (status = 400, description = "Invalid ID format", body = ErrorResponse),
        (status = 404, description = "Meeting not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_meeting"))]
pub async fn get_meeting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Meeting>, HttpAppError> {
    let id = parse_meeting_id(&id)?;
    let meeting = state
        .meetings
        .get(id)
        .await?
        .ok_or_else(meeting_not_found)?;
    Ok(Json(meeting))
}

#[utoipa::path(
    put,
    path = "/api/v1/meetings/{id}",
    tag = "meetings",
    params(("id" = i32, Path, description = "Meeting ID")),
    request_body = MeetingPatch,
    responses(
        (status = 200, description = "Updated meeting", body = Meeting),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Meeting not found", body = ErrorResponse),
        (status = 500, description = "Database or queue failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, patch), fields(operation = "update_meeting"))]
pub async fn update_meeting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<MeetingPatch>,
) -> Result<Json<Meeting>, HttpAppError> {
    let id = parse_meeting_id(&id)?;
    patch.validate()?;

    let meeting = state
        .meetings
        .update(id, &patch)
        .await?
        .ok_or_else(meeting_not_found)?;

    if let Some(key) = patch.new_recording_key() {
        enqueue_recording(&state, meeting.id, key).await?;
    }

    Ok(Json(meeting))
}

#[utoipa::path(
    delete,
    path = "/api/v1/meetings/{id}",
    tag = "meetings",
    params(("id" = i32, Path, description = "Meeting ID")),
    responses(
        (status = 200, description = "Meeting deleted", body = MessageResponse),
        (status = 400, description = "Invalid ID format", body = ErrorResponse),
        (status = 404, description = "Meeting not found", body = ErrorResponse),
        (status = 500, description = "Recording could not be removed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_meeting"))]
pub async fn delete_meeting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    let id = parse_meeting_id(&id)?;
    let meeting = state
        .meetings
        .get(id)
        .await?
        .ok_or_else(meeting_not_found)?;

    // The row is kept when the recording cannot be removed. A path that is
    // not a valid storage key cannot name a stored object.
    if let Some(key) = meeting.recording_key() {
        match state
            .storage
            .delete(Deadline::after(DELETE_TIMEOUT), key)
            .await
        {
            Ok(()) => {}
            Err(StorageError::InvalidKey(reason)) => {
                tracing::warn!(
                    meeting_id = id,
                    recording_path = %key,
                    reason = %reason,
                    "Recording path is not a storage key; deleting meeting only"
                );
            }
            Err(e) => return Err(AppError::storage("Failed to delete recording", e).into()),
        }
    }

    if !state.meetings.delete(id).await? {
        return Err(meeting_not_found().into());
    }

    tracing::info!(meeting_id = id, "Meeting deleted");

    Ok(Json(MessageResponse {
        message: "Meeting deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/meetings/{id}/process",
    tag = "meetings",
    params(("id" = i32, Path, description = "Meeting ID")),
    responses(
        (status = 202, description = "Processing job enqueued", body = ProcessResponse),
        (status = 400, description = "Invalid ID or no recording attached", body = ErrorResponse),
        (status = 404, description = "Meeting not found", body = ErrorResponse),
        (status = 500, description = "Queue failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "process_meeting"))]
pub async fn process_meeting(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_meeting_id(&id)?;
    let meeting = state
        .meetings
        .get(id)
        .await?
        .ok_or_else(meeting_not_found)?;

    let key = meeting
        .recording_key()
        .ok_or_else(|| AppError::InvalidInput("Meeting has no recording to process".to_string()))?;

    enqueue_recording(&state, meeting.id, key).await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(ProcessResponse {
            message: "Meeting queued for processing".to_string(),
            id: meeting.id,
            file_path: key.to_string(),
        }),
    ))
}
