//! Per-call time bounds for storage operations.

use crate::traits::{StorageError, StorageResult};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Point in time by which a storage operation must complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now() + timeout,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Run `operation` on `key` within this deadline.
    pub async fn run<F, T>(&self, operation: &'static str, key: &str, fut: F) -> StorageResult<T>
    where
        F: Future<Output = StorageResult<T>>,
    {
        let exceeded = || StorageError::DeadlineExceeded {
            operation,
            key: key.to_string(),
        };

        if self.is_expired() {
            return Err(exceeded());
        }

        match tokio::time::timeout_at(self.at, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(operation, key = %key, "Storage operation deadline exceeded");
                Err(exceeded())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_expired_deadline_fails_instead_of_hanging() {
        let deadline = Deadline::after(Duration::ZERO);
        let result: StorageResult<()> = deadline
            .run("get_signed_url", "a.mp3", std::future::pending())
            .await;
        assert!(matches!(
            result,
            Err(StorageError::DeadlineExceeded {
                operation: "get_signed_url",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_slow_operation_times_out() {
        let deadline = Deadline::after(Duration::from_millis(50));
        let result: StorageResult<()> = deadline
            .run("upload", "slow.wav", async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;
        assert!(matches!(result, Err(StorageError::DeadlineExceeded { .. })));
    }

    #[tokio::test]
    async fn test_fast_operation_passes_through() {
        let deadline = Deadline::after(Duration::from_secs(5));
        let result = deadline.run("delete", "a.mp3", async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }
}
