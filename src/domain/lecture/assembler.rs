//! Lecture assembly at stop time

use chrono::Utc;

use crate::domain::session::RecordingSession;

use super::record::Lecture;

/// Externally supplied lecture metadata; both fields are defaulted when
/// absent.
#[derive(Debug, Clone, Default)]
pub struct LectureMeta {
    pub title: Option<String>,
    pub presenter: Option<String>,
}

/// Packages accumulated session state into an immutable `Lecture`.
///
/// Pure field composition; always succeeds given a session snapshot, even
/// when zero highlights were produced.
pub struct LectureAssembler;

impl LectureAssembler {
    pub fn assemble(session: &RecordingSession, meta: LectureMeta) -> Lecture {
        let created_at = Utc::now();
        let title = meta
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Lecture {}", created_at.format("%Y-%m-%d %H:%M")));

        Lecture::compose(
            title,
            meta.presenter.filter(|p| !p.trim().is_empty()),
            created_at,
            session.duration_secs(),
            session.segments().to_vec(),
            session.highlights().to_vec(),
        )
    }
}
