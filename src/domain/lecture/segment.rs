//! Transcript segment entity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One finalized unit of transcribed speech.
///
/// Created exactly once per finalized fragment and never mutated afterwards;
/// the session appends segments in arrival order, so insertion order is
/// chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub id: Uuid,
    /// Elapsed recording seconds at the moment the fragment finalized
    pub timestamp_secs: u64,
    pub text: String,
    pub is_highlight: bool,
}

impl TranscriptSegment {
    /// Create a new segment for a finalized fragment
    pub fn new(timestamp_secs: u64, text: impl Into<String>, is_highlight: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp_secs,
            text: text.into(),
            is_highlight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_segment_has_unique_id() {
        let a = TranscriptSegment::new(0, "hello", false);
        let b = TranscriptSegment::new(0, "hello", false);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn segment_keeps_fields() {
        let s = TranscriptSegment::new(42, "물리학의 법칙", true);
        assert_eq!(s.timestamp_secs, 42);
        assert_eq!(s.text, "물리학의 법칙");
        assert!(s.is_highlight);
    }
}
