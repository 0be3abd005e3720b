use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Job descriptor pushed onto the processing queue.
///
/// The JSON shape `{"id": <int>, "file_path": "<key>"}` is consumed by the
/// external worker and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MeetingJob {
    pub id: i32,
    pub file_path: String,
}

impl MeetingJob {
    pub fn new(id: i32, file_path: impl Into<String>) -> Self {
        Self {
            id,
            file_path: file_path.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_json_shape() {
        let job = MeetingJob::new(42, "abc.mp3");
        let json = serde_json::to_string(&job).unwrap();
        assert_eq!(json, r#"{"id":42,"file_path":"abc.mp3"}"#);

        let back: MeetingJob = serde_json::from_str(&json).unwrap();
        assert_eq!(back, job);
    }
}
