//! In-memory collaborators for API tests.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use meeting_core::models::{CreateMeetingRequest, Meeting, MeetingJob, MeetingPatch, MeetingStatus};
use meeting_core::AppError;
use meeting_db::MeetingStore;
use meeting_queue::{JobPublisher, QueueError};
use meeting_storage::{
    ByteStream, Deadline, StorageDriver, StorageError, StorageProvider, StorageResult,
    UploadResult,
};
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Meeting store backed by a vector
#[derive(Clone, Default)]
pub struct InMemoryMeetingStore {
    meetings: Arc<Mutex<Vec<Meeting>>>,
}

impl InMemoryMeetingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.meetings.lock().unwrap().len()
    }
}

#[async_trait]
impl MeetingStore for InMemoryMeetingStore {
    async fn create(&self, request: &CreateMeetingRequest) -> Result<Meeting, AppError> {
        let mut meetings = self.meetings.lock().unwrap();
        let now = Utc::now();
        let id = meetings.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        let meeting = Meeting {
            id,
            title: request.title.clone(),
            description: request.description.clone(),
            meeting_url: request.meeting_url.clone(),
            meeting_platform: request.meeting_platform.clone(),
            scheduled_at: request.scheduled_at,
            recording_path: request.recording_path.clone(),
            recording_size_bytes: request.recording_size_bytes,
            recording_duration_seconds: request.recording_duration_seconds,
            transcript: None,
            summary: None,
            key_points: None,
            action_items: None,
            status: MeetingStatus::Created,
            user_id: None,
            created_at: now,
            updated_at: now,
        };
        meetings.push(meeting.clone());
        Ok(meeting)
    }

    async fn get(&self, id: i32) -> Result<Option<Meeting>, AppError> {
        let meetings = self.meetings.lock().unwrap();
        Ok(meetings.iter().find(|m| m.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Meeting>, AppError> {
        let mut meetings = self.meetings.lock().unwrap().clone();
        meetings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(meetings)
    }

    async fn update(&self, id: i32, patch: &MeetingPatch) -> Result<Option<Meeting>, AppError> {
        let mut meetings = self.meetings.lock().unwrap();
        let Some(meeting) = meetings.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        patch.apply_to(meeting);
        meeting.updated_at = Utc::now();
        Ok(Some(meeting.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut meetings = self.meetings.lock().unwrap();
        let before = meetings.len();
        meetings.retain(|m| m.id != id);
        Ok(meetings.len() < before)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Job publisher that records every job it is given
#[derive(Clone, Default)]
pub struct RecordingJobPublisher {
    jobs: Arc<Mutex<Vec<MeetingJob>>>,
    fail: Arc<AtomicBool>,
}

impl RecordingJobPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> Vec<MeetingJob> {
        self.jobs.lock().unwrap().clone()
    }

    /// Make every subsequent call fail
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl JobPublisher for RecordingJobPublisher {
    async fn enqueue(&self, meeting_id: i32, file_path: &str) -> Result<(), QueueError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(QueueError::Timeout(Duration::from_secs(5)));
        }
        self.jobs
            .lock()
            .unwrap()
            .push(MeetingJob::new(meeting_id, file_path));
        Ok(())
    }

    async fn health_check(&self) -> Result<(), QueueError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(QueueError::Timeout(Duration::from_secs(5)));
        }
        Ok(())
    }
}

/// Object-storage stand-in: keeps objects in memory and hands out fake presigned URLs
#[derive(Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    content_types: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of provider operations invoked
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    /// Content type the provider was given for `key`
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.content_types.lock().unwrap().get(key).cloned()
    }

    pub fn insert(&self, key: &str, data: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn begin(&self, key: &str) -> StorageResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed {
                key: key.to_string(),
                message: "backend unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    async fn upload(
        &self,
        deadline: Deadline,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
        key: &str,
        content_type: &str,
    ) -> StorageResult<UploadResult> {
        self.begin(key)?;
        let mut data = Vec::new();
        deadline
            .run("upload", key, async {
                reader.read_to_end(&mut data).await?;
                Ok::<(), StorageError>(())
            })
            .await?;
        let size = data.len() as u64;
        self.objects.lock().unwrap().insert(key.to_string(), data);
        self.content_types
            .lock()
            .unwrap()
            .insert(key.to_string(), content_type.to_string());
        Ok(UploadResult {
            key: key.to_string(),
            url: None,
            size: Some(size),
            mime_type: content_type.to_string(),
        })
    }

    async fn delete(&self, _deadline: Deadline, key: &str) -> StorageResult<()> {
        self.begin(key)?;
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn get_signed_url(&self, _deadline: Deadline, key: &str) -> StorageResult<String> {
        self.begin(key)?;
        Ok(format!(
            "http://storage.test/meetings/{}?X-Amz-Expires={}&X-Amz-Signature=test",
            key,
            self.signed_url_ttl().as_secs()
        ))
    }

    async fn download_stream(&self, _deadline: Deadline, key: &str) -> StorageResult<ByteStream> {
        self.begin(key)?;
        let data = self
            .object(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))?;
        Ok(Box::pin(futures::stream::once(async move {
            Ok::<Bytes, StorageError>(Bytes::from(data))
        })))
    }

    fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(900)
    }

    fn driver(&self) -> StorageDriver {
        StorageDriver::Minio
    }
}
