//! Query results and logged interactions

use crate::source::SourceAttribution;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to an interaction by the log
///
/// Starts at 1 and increases by one per append for the lifetime of the process.
pub type InteractionId = u64;

/// Structured answer to a single question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Generated (or canned) answer text
    pub answer: String,

    /// Attributions for every chunk that backed the answer, in rank order
    pub sources: Vec<SourceAttribution>,

    /// The question as it was answered (surrounding whitespace removed)
    pub question: String,

    /// Log id, present only when the interaction was recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_id: Option<InteractionId>,
}

/// A completed interaction waiting to be assigned an id by the log
///
/// The log stamps the time together with the id, so id order and time order
/// always agree.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInteraction {
    /// Question text
    pub question: String,

    /// Answer text
    pub answer: String,

    /// Sources that backed the answer
    pub sources: Vec<SourceAttribution>,
}

impl NewInteraction {
    /// Capture a query result as a new interaction
    pub fn from_result(result: &QueryResult) -> Self {
        Self {
            question: result.question.clone(),
            answer: result.answer.clone(),
            sources: result.sources.clone(),
        }
    }
}

/// An interaction retained by the log
///
/// Records are immutable; the log only ever creates or evicts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Monotonic id, never reused
    pub id: InteractionId,

    /// UTC instant, serialized as ISO-8601 with a trailing `Z`
    #[serde(with = "iso_utc")]
    pub timestamp: DateTime<Utc>,

    /// Question text
    pub question: String,

    /// Answer text
    pub answer: String,

    /// Sources that backed the answer
    pub sources: Vec<SourceAttribution>,

    /// Number of sources
    pub sources_count: usize,

    /// Answer length in characters
    pub answer_length: usize,
}

impl InteractionRecord {
    /// Materialize a record from a new interaction and its assigned id and time
    pub fn new(id: InteractionId, timestamp: DateTime<Utc>, interaction: NewInteraction) -> Self {
        let sources_count = interaction.sources.len();
        let answer_length = interaction.answer.chars().count();

        Self {
            id,
            timestamp,
            question: interaction.question,
            answer: interaction.answer,
            sources: interaction.sources,
            sources_count,
            answer_length,
        }
    }

    /// Timestamp in the record's wire format
    pub fn timestamp_string(&self) -> String {
        iso_utc::format(&self.timestamp)
    }
}

/// ISO-8601 UTC timestamps with microsecond precision and a `Z` suffix
pub mod iso_utc {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Format a timestamp, e.g. `2025-03-01T12:00:00.000000Z`
    pub fn format(timestamp: &DateTime<Utc>) -> String {
        timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Serde serializer
    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format(timestamp))
    }

    /// Serde deserializer, accepts any RFC 3339 timestamp
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_sources() -> Vec<SourceAttribution> {
        vec![SourceAttribution {
            document_id: "doc_1".to_string(),
            document_name: "FundA".to_string(),
            relevance_score: 0.91,
            snippet: "snippet".to_string(),
        }]
    }

    #[test]
    fn test_record_derives_counts() {
        let interaction = NewInteraction {
            question: "Who invests in defense tech?".to_string(),
            answer: "Fonds café".to_string(),
            sources: sample_sources(),
        };

        let record = InteractionRecord::new(7, Utc::now(), interaction);
        assert_eq!(record.id, 7);
        assert_eq!(record.sources_count, 1);
        // Characters, not bytes
        assert_eq!(record.answer_length, 10);
    }

    #[test]
    fn test_timestamp_wire_format() {
        let timestamp = Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 5).unwrap();
        let record = InteractionRecord::new(
            1,
            timestamp,
            NewInteraction {
                question: "q".to_string(),
                answer: "a".to_string(),
                sources: Vec::new(),
            },
        );

        assert_eq!(record.timestamp_string(), "2025-03-01T12:30:05.000000Z");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["timestamp"], "2025-03-01T12:30:05.000000Z");

        let parsed: InteractionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_query_result_omits_missing_interaction_id() {
        let result = QueryResult {
            answer: "a".to_string(),
            sources: Vec::new(),
            question: "q".to_string(),
            interaction_id: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("interaction_id").is_none());
    }
}
