use async_trait::async_trait;
use meeting_core::{
    models::{CreateMeetingRequest, Meeting, MeetingPatch},
    AppError,
};
use sqlx::{PgPool, Postgres};

const MEETING_COLUMNS: &str = "id, title, description, meeting_url, meeting_platform, scheduled_at, \
     recording_path, recording_size_bytes, recording_duration_seconds, transcript, summary, \
     key_points, action_items, status, user_id, created_at, updated_at";

/// Persistence operations the HTTP layer needs for meetings
#[async_trait]
pub trait MeetingStore: Send + Sync {
    async fn create(&self, request: &CreateMeetingRequest) -> Result<Meeting, AppError>;

    async fn get(&self, id: i32) -> Result<Option<Meeting>, AppError>;

    /// All meetings, newest first
    async fn list(&self) -> Result<Vec<Meeting>, AppError>;

    /// Apply `patch` to the stored meeting. `None` when the meeting does not exist.
    async fn update(&self, id: i32, patch: &MeetingPatch) -> Result<Option<Meeting>, AppError>;

    /// Returns whether a row was deleted
    async fn delete(&self, id: i32) -> Result<bool, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}

/// Repository for managing meetings
#[derive(Clone)]
pub struct MeetingRepository {
    pool: PgPool,
}

impl MeetingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl MeetingStore for MeetingRepository {
    /// Create a new meeting
    #[tracing::instrument(skip(self, request), fields(db.table = "meetings", db.operation = "insert"))]
    async fn create(&self, request: &CreateMeetingRequest) -> Result<Meeting, AppError> {
        let query = format!(
            r#"
            INSERT INTO meetings (
                title, description, meeting_url, meeting_platform, scheduled_at,
                recording_path, recording_duration_seconds, recording_size_bytes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            MEETING_COLUMNS
        );

        let meeting = sqlx::query_as::<Postgres, Meeting>(&query)
            .bind(&request.title)
            .bind(&request.description)
            .bind(&request.meeting_url)
            .bind(&request.meeting_platform)
            .bind(request.scheduled_at)
            .bind(&request.recording_path)
            .bind(request.recording_duration_seconds)
            .bind(request.recording_size_bytes)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(meeting_id = meeting.id, "Meeting created");

        Ok(meeting)
    }

    /// Get meeting by ID
    #[tracing::instrument(skip(self), fields(db.table = "meetings", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: i32) -> Result<Option<Meeting>, AppError> {
        let query = format!("SELECT {} FROM meetings WHERE id = $1", MEETING_COLUMNS);

        let meeting = sqlx::query_as::<Postgres, Meeting>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(meeting)
    }

    #[tracing::instrument(skip(self), fields(db.table = "meetings", db.operation = "select"))]
    async fn list(&self) -> Result<Vec<Meeting>, AppError> {
        let query = format!(
            "SELECT {} FROM meetings ORDER BY created_at DESC",
            MEETING_COLUMNS
        );

        let meetings = sqlx::query_as::<Postgres, Meeting>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(meetings)
    }

    /// Update meeting fields present in the patch
    #[tracing::instrument(skip(self, patch), fields(db.table = "meetings", db.operation = "update", db.record_id = %id))]
    async fn update(&self, id: i32, patch: &MeetingPatch) -> Result<Option<Meeting>, AppError> {
        let mut tx = self.pool.begin().await?;

        let select = format!(
            "SELECT {} FROM meetings WHERE id = $1 FOR UPDATE",
            MEETING_COLUMNS
        );
        let current = sqlx::query_as::<Postgres, Meeting>(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(mut meeting) = current else {
            return Ok(None);
        };

        patch.apply_to(&mut meeting);

        let update = format!(
            r#"
            UPDATE meetings
            SET title = $2,
                description = $3,
                meeting_url = $4,
                meeting_platform = $5,
                scheduled_at = $6,
                recording_path = $7,
                recording_size_bytes = $8,
                recording_duration_seconds = $9,
                status = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            MEETING_COLUMNS
        );

        let updated = sqlx::query_as::<Postgres, Meeting>(&update)
            .bind(id)
            .bind(&meeting.title)
            .bind(&meeting.description)
            .bind(&meeting.meeting_url)
            .bind(&meeting.meeting_platform)
            .bind(meeting.scheduled_at)
            .bind(&meeting.recording_path)
            .bind(meeting.recording_size_bytes)
            .bind(meeting.recording_duration_seconds)
            .bind(meeting.status)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(updated))
    }

    #[tracing::instrument(skip(self), fields(db.table = "meetings", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM meetings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
