use async_trait::async_trait;
use meeting_core::constants::QUEUE_PUSH_TIMEOUT;
use meeting_core::models::MeetingJob;
use redis::AsyncCommands;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Failed to serialize job: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Queue operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Publisher of processing jobs
#[async_trait]
pub trait JobPublisher: Send + Sync {
    /// Publish a job for `meeting_id` whose recording is stored under `file_path`.
    async fn enqueue(&self, meeting_id: i32, file_path: &str) -> Result<(), QueueError>;

    async fn health_check(&self) -> Result<(), QueueError>;
}

/// Job queue backed by a Redis list (RPUSH producer side)
#[derive(Clone)]
pub struct RedisJobQueue {
    client: redis::Client,
    queue_name: String,
    timeout: Duration,
}

impl RedisJobQueue {
    /// Create from a Redis URL. A bare `host:port` is treated as `redis://host:port`.
    pub fn new(redis_url: &str, queue_name: impl Into<String>) -> Result<Self, QueueError> {
        let client = redis::Client::open(normalize_redis_url(redis_url))?;
        Ok(Self {
            client,
            queue_name: queue_name.into(),
            timeout: QUEUE_PUSH_TIMEOUT,
        })
    }

    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    async fn push(&self, payload: String) -> Result<i64, QueueError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let length: i64 = conn.rpush(&self.queue_name, payload).await?;
        Ok(length)
    }

    async fn ping(&self) -> Result<(), QueueError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }
}

#[async_trait]
impl JobPublisher for RedisJobQueue {
    #[tracing::instrument(skip(self), fields(queue = %self.queue_name))]
    async fn enqueue(&self, meeting_id: i32, file_path: &str) -> Result<(), QueueError> {
        let payload = serde_json::to_string(&MeetingJob::new(meeting_id, file_path))?;

        let length = tokio::time::timeout(self.timeout, self.push(payload))
            .await
            .map_err(|_| QueueError::Timeout(self.timeout))
            .and_then(|result| result)
            .inspect_err(|e| {
                tracing::error!(error = %e, meeting_id, file_path = %file_path, "Failed to enqueue job");
            })?;

        tracing::info!(
            meeting_id,
            file_path = %file_path,
            queue_length = length,
            "Job enqueued"
        );

        Ok(())
    }

    async fn health_check(&self) -> Result<(), QueueError> {
        tokio::time::timeout(self.timeout, self.ping())
            .await
            .map_err(|_| QueueError::Timeout(self.timeout))?
    }
}

fn normalize_redis_url(url: &str) -> String {
    let url = url.trim();
    if url.contains("://") {
        url.to_string()
    } else {
        format!("redis://{}", url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host_port_gets_scheme() {
        assert_eq!(normalize_redis_url("localhost:6379"), "redis://localhost:6379");
        assert_eq!(
            normalize_redis_url("redis://cache:6380/1"),
            "redis://cache:6380/1"
        );
        assert_eq!(
            normalize_redis_url("rediss://cache.example.com"),
            "rediss://cache.example.com"
        );
    }

    #[test]
    fn test_new_does_not_connect() {
        let queue = RedisJobQueue::new("localhost:6379", "meeting_jobs").unwrap();
        assert_eq!(queue.queue_name(), "meeting_jobs");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result = RedisJobQueue::new("http://localhost:6379", "meeting_jobs");
        assert!(matches!(result, Err(QueueError::Redis(_))));
    }

    #[tokio::test]
    async fn test_enqueue_unreachable_redis_fails() {
        // Port 1 is never a Redis server; the connect is refused or times out.
        let queue = RedisJobQueue::new("127.0.0.1:1", "meeting_jobs").unwrap();
        let result = queue.enqueue(1, "abc.mp3").await;
        assert!(result.is_err());
    }
}
