//! Meeting Queue Library
//!
//! Publishes recording-processing jobs for the external worker. Jobs are
//! JSON documents appended to a Redis list; delivery is fire-and-forget.

pub mod publisher;

pub use publisher::{JobPublisher, QueueError, RedisJobQueue};
