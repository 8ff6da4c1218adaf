use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Metadata document describing one uploaded photo
///
/// Written once after the object is stored and its URL resolved; never
/// updated by the upload path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    pub owner_id: String,
    pub url: String,
    pub title: String,
    pub created_at: String, // ISO 8601, UTC, millisecond precision
}

impl PhotoRecord {
    /// Builds a record stamped with the current wall-clock time
    pub fn new(owner_id: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            url: url.into(),
            title: title.into(),
            created_at: iso_timestamp_now(),
        }
    }
}

/// Current UTC time as `2025-01-31T12:00:00.000Z`
pub fn iso_timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A file chosen by the user or dropped on the widget
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// The signed-in user an upload is attributed to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Session {
    pub user_id: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Handle to an object held by a storage backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Path relative to the backend root, e.g. `photos/u1/<uuid>`
    pub path: String,
}

/// Rendering state of the upload widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    Uploading,
}

impl UploadPhase {
    pub fn is_uploading(self) -> bool {
        matches!(self, UploadPhase::Uploading)
    }
}

/// Notification sent to views once an upload has been recorded
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    Completed(PhotoRecord),
}

/// Configuration for the upload service
#[derive(Debug, Clone)]
pub struct PhotoUploadConfig {
    /// First segment of every object path
    pub path_prefix: String,
    /// Document collection that receives photo records
    pub collection: String,
    /// Capacity of the completion event channel
    pub event_capacity: usize,
}

impl Default for PhotoUploadConfig {
    fn default() -> Self {
        Self {
            path_prefix: "photos".to_string(),
            collection: "photos".to_string(),
            event_capacity: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_camel_case() {
        let record = PhotoRecord {
            owner_id: "u1".to_string(),
            url: "https://cdn.example.com/a".to_string(),
            title: "cat.jpg".to_string(),
            created_at: "2025-01-01T00:00:00.000Z".to_string(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["ownerId"], "u1");
        assert_eq!(json["createdAt"], "2025-01-01T00:00:00.000Z");
        assert!(json.get("owner_id").is_none());
    }

    #[test]
    fn test_timestamp_is_iso_utc_millis() {
        let ts = iso_timestamp_now();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2025-01-01T00:00:00.000Z".len());
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_default_phase_is_idle() {
        assert_eq!(UploadPhase::default(), UploadPhase::Idle);
        assert!(!UploadPhase::Idle.is_uploading());
        assert!(UploadPhase::Uploading.is_uploading());
    }
}
