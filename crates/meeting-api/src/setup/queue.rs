//! Job queue setup

use anyhow::{Context, Result};
use meeting_core::Config;
use meeting_queue::{JobPublisher, RedisJobQueue};
use std::sync::Arc;

pub fn setup_queue(config: &Config) -> Result<Arc<dyn JobPublisher>> {
    let queue = RedisJobQueue::new(&config.queue.redis_url, config.queue.queue_name.clone())
        .context("Failed to create Redis client")?;

    tracing::info!(queue = %queue.queue_name(), "Job queue publisher initialized");

    Ok(Arc::new(queue))
}
