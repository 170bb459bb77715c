//! Assembled lecture record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::highlight::Highlight;
use super::segment::TranscriptSegment;

/// A finished lecture: the final transcript and highlight sequences plus
/// metadata, packaged at stop time.
///
/// Immutable once assembled; fields are only reachable through accessors so
/// the display and storage layers cannot mutate a stored lecture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecture {
    id: Uuid,
    title: String,
    presenter: Option<String>,
    created_at: DateTime<Utc>,
    duration_secs: u64,
    segments: Vec<TranscriptSegment>,
    highlights: Vec<Highlight>,
}

impl Lecture {
    /// Compose a lecture from its parts. Only the assembler should call this.
    pub(crate) fn compose(
        title: String,
        presenter: Option<String>,
        created_at: DateTime<Utc>,
        duration_secs: u64,
        segments: Vec<TranscriptSegment>,
        highlights: Vec<Highlight>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            presenter,
            created_at,
            duration_secs,
            segments,
            highlights,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn presenter(&self) -> Option<&str> {
        self.presenter.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.segments
    }

    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_keeps_fields() {
        let lecture = Lecture::compose(
            "물리학 1강".to_string(),
            Some("김교수".to_string()),
            Utc::now(),
            120,
            vec![TranscriptSegment::new(3, "안녕하세요", false)],
            vec![],
        );
        assert_eq!(lecture.title(), "물리학 1강");
        assert_eq!(lecture.presenter(), Some("김교수"));
        assert_eq!(lecture.duration_secs(), 120);
        assert_eq!(lecture.segments().len(), 1);
        assert!(lecture.highlights().is_empty());
    }

    #[test]
    fn json_round_trip() {
        let lecture = Lecture::compose(
            "강의".to_string(),
            None,
            Utc::now(),
            5,
            vec![],
            vec![],
        );
        let json = serde_json::to_string(&lecture).unwrap();
        let parsed: Lecture = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, lecture);
    }
}
