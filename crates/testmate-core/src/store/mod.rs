mod file;
mod memory;

pub use file::JsonFileTurnStore;
pub use memory::MemoryTurnStore;

use crate::error::TestmateError;
use crate::llm::Message;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// One persisted exchange: the user's question and the assistant's reply.
/// Written once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRecord {
    pub id: String,
    pub owner: String,
    pub use_case: String,
    pub question: String,
    pub response: Message,
    pub timestamp: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TurnRecord {
    /// Create a record stamped with the current instant.
    pub fn new(
        owner: impl Into<String>,
        use_case: impl Into<String>,
        question: impl Into<String>,
        response: Message,
    ) -> Self {
        Self::at(owner, use_case, question, response, Utc::now())
    }

    /// Create a record stamped with an explicit instant.
    pub fn at(
        owner: impl Into<String>,
        use_case: impl Into<String>,
        question: impl Into<String>,
        response: Message,
        at: DateTime<Utc>,
    ) -> Self {
        let timestamp = format_timestamp(at);
        Self {
            id: generate_id(),
            owner: owner.into(),
            use_case: use_case.into(),
            question: question.into(),
            response,
            timestamp: timestamp.clone(),
            created_at: timestamp.clone(),
            updated_at: timestamp,
        }
    }

    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Generate a unique record id.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// ISO 8601 with millisecond precision, always UTC.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The turn persistence seam: single-item put keyed by id, and an
/// owner-equality query. Callers sort query results themselves.
#[async_trait::async_trait]
pub trait TurnStore: Send + Sync {
    async fn put(&self, record: &TurnRecord) -> Result<(), TestmateError>;

    async fn query_by_owner(&self, owner: &str) -> Result<Vec<TurnRecord>, TestmateError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generate_id() {
        let id1 = generate_id();
        let id2 = generate_id();

        assert_ne!(id1, id2);
        assert!(id1.contains('-'));
    }

    #[test]
    fn test_record_timestamps_match() {
        let record = TurnRecord::new("alice", "use-case-2", "q", Message::assistant("a"));
        assert_eq!(record.timestamp, record.created_at);
        assert_eq!(record.timestamp, record.updated_at);
        assert!(record.timestamp.ends_with('Z'));
        assert!(record.parsed_timestamp().is_some());
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let record = TurnRecord::at("alice", "use-case-2", "q", Message::assistant("a"), at);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["useCase"], "use-case-2");
        assert_eq!(json["createdAt"], "2024-05-01T12:00:00.000Z");
        assert_eq!(json["response"]["role"], "assistant");
        assert_eq!(json["response"]["content"][0]["text"], "a");
    }
}
