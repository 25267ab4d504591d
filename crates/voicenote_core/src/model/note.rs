//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record and its serialized shape.
//!
//! # Invariants
//! - `id` and `date` are fixed at creation and never rewritten.
//! - `content` changes only by full replacement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a note.
pub type NoteId = Uuid;

/// User-authored text record.
///
/// Serialized as `{"id": .., "date": .., "content": ..}` with `date` in
/// RFC 3339 form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique across the live list.
    pub id: NoteId,
    /// Creation time in UTC.
    pub date: DateTime<Utc>,
    /// Free-form body text.
    pub content: String,
}

impl Note {
    /// Creates a note with a fresh v4 id stamped with the current time.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), Utc::now(), content)
    }

    /// Creates a note with caller-provided identity and timestamp.
    ///
    /// Used when rehydrating records and in tests that need fixed values.
    pub fn with_id(id: NoteId, date: DateTime<Utc>, content: impl Into<String>) -> Self {
        Self {
            id,
            date,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Note;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn new_notes_get_distinct_ids() {
        let first = Note::new("a");
        let second = Note::new("a");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn serializes_with_rfc3339_date() {
        let id = Uuid::parse_str("1b4e28ba-2fa1-11d2-883f-0016d3cca427").unwrap();
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let note = Note::with_id(id, date, "buy milk");

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["id"], "1b4e28ba-2fa1-11d2-883f-0016d3cca427");
        assert_eq!(json["date"], "2024-03-01T12:30:00Z");
        assert_eq!(json["content"], "buy milk");
    }

    #[test]
    fn accepts_millisecond_utc_timestamps() {
        let raw = r#"{"id":"1b4e28ba-2fa1-11d2-883f-0016d3cca427","date":"2024-03-01T12:30:00.123Z","content":"x"}"#;
        let note: Note = serde_json::from_str(raw).unwrap();
        assert_eq!(note.date.timestamp_millis() % 1000, 123);
    }

    #[test]
    fn offset_timestamps_are_normalized_to_utc() {
        let raw = r#"{"id":"1b4e28ba-2fa1-11d2-883f-0016d3cca427","date":"2024-03-01T14:30:00+02:00","content":"x"}"#;
        let note: Note = serde_json::from_str(raw).unwrap();
        assert_eq!(note.date, Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap());
    }
}
