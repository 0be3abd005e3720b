//! Database repositories for data access layer
//!
//! Each repository owns the queries for one table. Handlers depend on the
//! store traits so they can be exercised without a database.

pub mod meeting;

pub use meeting::{MeetingRepository, MeetingStore};
