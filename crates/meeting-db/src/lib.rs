//! Meeting Database Library
//!
//! Postgres-backed repositories for the meeting backend.

pub mod db;

pub use db::{MeetingRepository, MeetingStore};
