use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

/// Processing lifecycle of a meeting recording
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "meeting_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    #[default]
    Created,
    Processing,
    Completed,
    Failed,
}

impl FromStr for MeetingStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" => Ok(MeetingStatus::Created),
            "processing" => Ok(MeetingStatus::Processing),
            "completed" => Ok(MeetingStatus::Completed),
            "failed" => Ok(MeetingStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid meeting status: {}", s)),
        }
    }
}

impl Display for MeetingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MeetingStatus::Created => write!(f, "created"),
            MeetingStatus::Processing => write!(f, "processing"),
            MeetingStatus::Completed => write!(f, "completed"),
            MeetingStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Meeting record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Meeting {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub meeting_url: Option<String>,
    pub meeting_platform: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    /// Storage key of the uploaded recording
    pub recording_path: Option<String>,
    pub recording_size_bytes: Option<i64>,
    pub recording_duration_seconds: Option<i32>,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub key_points: Option<serde_json::Value>,
    pub action_items: Option<serde_json::Value>,
    pub status: MeetingStatus,
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Meeting {
    /// Recording key, if one has been attached.
    pub fn recording_key(&self) -> Option<&str> {
        self.recording_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Request DTO for creating a meeting
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateMeetingRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500, message = "Meeting URL must be at most 500 characters"))]
    pub meeting_url: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50, message = "Meeting platform must be at most 50 characters"))]
    pub meeting_platform: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 500, message = "Recording path must be at most 500 characters"))]
    pub recording_path: Option<String>,
    #[serde(default)]
    pub recording_duration_seconds: Option<i32>,
    #[serde(default)]
    pub recording_size_bytes: Option<i64>,
}

impl CreateMeetingRequest {
    /// Recording key to enqueue after creation, if any.
    pub fn recording_key(&self) -> Option<&str> {
        self.recording_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// Partial update for a meeting.
///
/// Every field distinguishes "absent" (leave the column alone) from a value.
/// Nullable columns use `Option<Option<T>>` so an explicit `null` clears the
/// column while an explicit `""` is stored as an empty string.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct MeetingPatch {
    #[serde(default)]
    #[validate(length(
        min = 3,
        max = 255,
        message = "Title must be between 3 and 255 characters"
    ))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 500, message = "Meeting URL must be at most 500 characters"))]
    pub meeting_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 50, message = "Meeting platform must be at most 50 characters"))]
    pub meeting_platform: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(length(max = 500, message = "Recording path must be at most 500 characters"))]
    pub recording_path: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub recording_duration_seconds: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub recording_size_bytes: Option<Option<i64>>,
    #[serde(default)]
    pub status: Option<MeetingStatus>,
}

/// Maps a present JSON value (including `null`) to `Some`, so that a missing
/// field stays `None` through `#[serde(default)]`.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl MeetingPatch {
    /// Apply every present field to `meeting`.
    pub fn apply_to(&self, meeting: &mut Meeting) {
        if let Some(ref title) = self.title {
            meeting.title = title.clone();
        }
        if let Some(ref description) = self.description {
            meeting.description = description.clone();
        }
        if let Some(ref meeting_url) = self.meeting_url {
            meeting.meeting_url = meeting_url.clone();
        }
        if let Some(ref meeting_platform) = self.meeting_platform {
            meeting.meeting_platform = meeting_platform.clone();
        }
        if let Some(scheduled_at) = self.scheduled_at {
            meeting.scheduled_at = scheduled_at;
        }
        if let Some(ref recording_path) = self.recording_path {
            meeting.recording_path = recording_path.clone();
        }
        if let Some(duration) = self.recording_duration_seconds {
            meeting.recording_duration_seconds = duration;
        }
        if let Some(size) = self.recording_size_bytes {
            meeting.recording_size_bytes = size;
        }
        if let Some(status) = self.status {
            meeting.status = status;
        }
    }

    /// Non-empty recording key set by this patch, if any.
    pub fn new_recording_key(&self) -> Option<&str> {
        match self.recording_path {
            Some(Some(ref path)) => Some(path.trim()).filter(|p| !p.is_empty()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_meeting() -> Meeting {
        let now = Utc::now();
        Meeting {
            id: 1,
            title: "Weekly sync".to_string(),
            description: Some("Team standup".to_string()),
            meeting_url: Some("https://meet.example.com/abc".to_string()),
            meeting_platform: None,
            scheduled_at: None,
            recording_path: None,
            recording_size_bytes: None,
            recording_duration_seconds: None,
            transcript: None,
            summary: None,
            key_points: None,
            action_items: None,
            status: MeetingStatus::Created,
            user_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_patch_distinguishes_absent_null_and_empty() {
        let patch: MeetingPatch =
            serde_json::from_str(r#"{"description": "", "meeting_url": null}"#).unwrap();
        assert_eq!(patch.description, Some(Some(String::new())));
        assert_eq!(patch.meeting_url, Some(None));
        assert_eq!(patch.meeting_platform, None);
        assert_eq!(patch.title, None);

        let mut meeting = sample_meeting();
        patch.apply_to(&mut meeting);
        assert_eq!(meeting.description.as_deref(), Some(""));
        assert_eq!(meeting.meeting_url, None);
        assert_eq!(meeting.title, "Weekly sync");
    }

    #[test]
    fn test_patch_status_and_recording() {
        let patch: MeetingPatch =
            serde_json::from_str(r#"{"status": "processing", "recording_path": "abc.mp3"}"#)
                .unwrap();
        assert_eq!(patch.new_recording_key(), Some("abc.mp3"));

        let mut meeting = sample_meeting();
        patch.apply_to(&mut meeting);
        assert_eq!(meeting.status, MeetingStatus::Processing);
        assert_eq!(meeting.recording_key(), Some("abc.mp3"));
    }

    #[test]
    fn test_patch_rejects_unknown_status() {
        let result = serde_json::from_str::<MeetingPatch>(r#"{"status": "archived"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_title_min_length() {
        let patch: MeetingPatch = serde_json::from_str(r#"{"title": "ab"}"#).unwrap();
        assert!(patch.validate().is_err());

        let patch: MeetingPatch = serde_json::from_str(r#"{"title": "abc"}"#).unwrap();
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_patch_length_limits_match_create() {
        let long_url = format!(r#"{{"meeting_url": "{}"}}"#, "x".repeat(501));
        let patch: MeetingPatch = serde_json::from_str(&long_url).unwrap();
        assert!(patch.validate().is_err());

        let long_platform = format!(r#"{{"meeting_platform": "{}"}}"#, "x".repeat(51));
        let patch: MeetingPatch = serde_json::from_str(&long_platform).unwrap();
        assert!(patch.validate().is_err());

        let patch: MeetingPatch =
            serde_json::from_str(r#"{"meeting_url": null, "recording_path": "abc.mp3"}"#).unwrap();
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_empty_recording_path_is_not_a_recording() {
        let patch: MeetingPatch = serde_json::from_str(r#"{"recording_path": "  "}"#).unwrap();
        assert_eq!(patch.new_recording_key(), None);

        let req: CreateMeetingRequest =
            serde_json::from_str(r#"{"title": "Kickoff", "recording_path": ""}"#).unwrap();
        assert_eq!(req.recording_key(), None);
    }

    #[test]
    fn test_create_requires_title() {
        assert!(serde_json::from_str::<CreateMeetingRequest>(r#"{}"#).is_err());

        let req: CreateMeetingRequest = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            MeetingStatus::Created,
            MeetingStatus::Processing,
            MeetingStatus::Completed,
            MeetingStatus::Failed,
        ] {
            assert_eq!(status.to_string().parse::<MeetingStatus>().unwrap(), status);
        }
    }
}
