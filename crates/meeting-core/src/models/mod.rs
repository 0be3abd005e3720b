pub mod job;
pub mod meeting;

pub use job::MeetingJob;
pub use meeting::{CreateMeetingRequest, Meeting, MeetingPatch, MeetingStatus};
