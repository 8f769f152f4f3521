//! Persistence contract.

use crate::error::TransportError;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Title used when an autosave runs before the user named the comic.
pub const DEFAULT_TITLE: &str = "Untitled Comic";

/// Body of one save request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavePayload {
    pub title: String,
    /// Serialized document.
    pub content: String,
    /// RFC 3339 UTC time the payload was built.
    pub timestamp: String,
}

impl SavePayload {
    /// Build a payload stamped with the current time. A blank `title`
    /// becomes `DEFAULT_TITLE`.
    pub fn new(title: &str, content: impl Into<String>) -> Self {
        let title = title.trim();
        Self {
            title: if title.is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                title.to_string()
            },
            content: content.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Where saved comics go.
#[allow(async_fn_in_trait)]
pub trait SaveBackend {
    async fn save(&self, payload: &SavePayload) -> Result<(), TransportError>;
}

/// How a `save` call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The backend accepted the payload.
    Saved,
    /// Explicit save with nothing new since the last one; backend not called.
    Unchanged,
    /// Autosave failed; the error was logged and dropped.
    Suppressed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn blank_title_defaults() {
        assert_eq!(SavePayload::new("  ", "{}").title, DEFAULT_TITLE);
        assert_eq!(SavePayload::new(" My Comic ", "{}").title, "My Comic");
    }

    #[test]
    fn timestamp_is_rfc3339_utc() {
        let payload = SavePayload::new("t", "{}");
        assert!(payload.timestamp.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(&payload.timestamp).is_ok());
    }

    #[test]
    fn payload_wire_shape() {
        let payload = SavePayload {
            title: "T".into(),
            content: "{}".into(),
            timestamp: "2024-01-01T00:00:00.000Z".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": "T",
                "content": "{}",
                "timestamp": "2024-01-01T00:00:00.000Z"
            })
        );
    }
}
