//! Highlight entity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Importance of a highlight.
///
/// The classifier currently only produces `High`; the other variants are
/// kept for stored-lecture compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

/// A transcript segment judged important, enriched with a derived summary
/// and keyword set. Companion to exactly one `TranscriptSegment`; shares its
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub id: Uuid,
    /// Timestamp of the originating segment
    pub timestamp_secs: u64,
    /// Full text of the originating segment
    pub text: String,
    /// Derived one-sentence summary, at most 100 characters
    pub summary: String,
    /// Derived keywords in discovery order, at most 5
    pub keywords: Vec<String>,
    pub importance: Importance,
}

impl Highlight {
    /// Create a highlight for a classified fragment
    pub fn new(
        timestamp_secs: u64,
        text: impl Into<String>,
        summary: impl Into<String>,
        keywords: Vec<String>,
        importance: Importance,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp_secs,
            text: text.into(),
            summary: summary.into(),
            keywords,
            importance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_keeps_fields() {
        let h = Highlight::new(
            7,
            "이건 정말 중요합니다!",
            "이건 정말 중요합니다",
            vec!["정말".to_string()],
            Importance::High,
        );
        assert_eq!(h.timestamp_secs, 7);
        assert_eq!(h.summary, "이건 정말 중요합니다");
        assert_eq!(h.keywords, vec!["정말"]);
        assert_eq!(h.importance, Importance::High);
    }

    #[test]
    fn importance_serializes_lowercase() {
        let json = serde_json::to_string(&Importance::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}
