//! Recording session state machine
//!
//! All session mutation flows through one step function consuming a single
//! inbound event enum, so event ordering stays deterministic regardless of
//! which host callback produced the event. The machine itself does no I/O;
//! the use case layer pumps events into it.

use crate::domain::classifier::HighlightClassifier;
use crate::domain::lecture::{Highlight, Importance, TranscriptSegment};

use super::state::{InvalidStateTransition, SessionState};

/// An asynchronous occurrence delivered to the session while recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// One elapsed second of recording time
    Tick,
    /// Latest loudness sample, 0-100
    Level(u8),
    /// Provisional text for the in-flight utterance; replaces the previous
    /// interim value
    Interim(String),
    /// Authoritative text for a finalized utterance
    Final(String),
}

/// State machine for one live recording session.
///
///   Idle -> Recording -> Paused -> Recording -> ... -> Stopped
///
/// `Stopped` is terminal. Lifecycle methods validate transitions and fail
/// with `InvalidStateTransition` otherwise; events arriving outside the
/// Recording state are stale callbacks and are dropped.
#[derive(Debug)]
pub struct RecordingSession {
    state: SessionState,
    duration_secs: u64,
    segments: Vec<TranscriptSegment>,
    highlights: Vec<Highlight>,
    interim_text: String,
    audio_level: u8,
    classifier: HighlightClassifier,
}

impl RecordingSession {
    /// Create a new session in the idle state
    pub fn new(classifier: HighlightClassifier) -> Self {
        Self {
            state: SessionState::Idle,
            duration_secs: 0,
            segments: Vec::new(),
            highlights: Vec::new(),
            interim_text: String::new(),
            audio_level: 0,
            classifier,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    pub fn is_stopped(&self) -> bool {
        self.state == SessionState::Stopped
    }

    /// Elapsed recording seconds; frozen while paused, never decreasing
    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    /// Finalized segments in chronological order
    pub fn segments(&self) -> &[TranscriptSegment] {
        &self.segments
    }

    /// Highlights in chronological order
    pub fn highlights(&self) -> &[Highlight] {
        &self.highlights
    }

    /// The current unfinalized text, empty when none is in flight
    pub fn interim_text(&self) -> &str {
        &self.interim_text
    }

    /// Most recent loudness sample, 0-100
    pub fn audio_level(&self) -> u8 {
        self.audio_level
    }

    /// Transition Idle -> Recording
    pub fn start(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Idle {
            return Err(self.invalid("start"));
        }
        self.state = SessionState::Recording;
        Ok(())
    }

    /// Transition Recording -> Paused. Any in-flight interim text is
    /// discarded, never finalized into a segment.
    pub fn pause(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Recording {
            return Err(self.invalid("pause"));
        }
        self.state = SessionState::Paused;
        self.interim_text.clear();
        Ok(())
    }

    /// Transition Paused -> Recording, continuing the accumulated duration
    pub fn resume(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Paused {
            return Err(self.invalid("resume"));
        }
        self.state = SessionState::Recording;
        Ok(())
    }

    /// Transition Recording or Paused -> Stopped. In-flight interim text is
    /// discarded. Stopped is terminal.
    pub fn stop(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Recording && self.state != SessionState::Paused {
            return Err(self.invalid("stop"));
        }
        self.state = SessionState::Stopped;
        self.interim_text.clear();
        Ok(())
    }

    /// Apply one inbound event. Events are only meaningful while Recording;
    /// anything arriving in another state is a leftover callback from a
    /// suspended component and is ignored.
    pub fn apply(&mut self, event: SessionEvent) {
        if self.state != SessionState::Recording {
            return;
        }
        match event {
            SessionEvent::Tick => {
                self.duration_secs += 1;
            }
            SessionEvent::Level(level) => {
                self.audio_level = level.min(100);
            }
            SessionEvent::Interim(text) => {
                self.interim_text = text;
            }
            SessionEvent::Final(text) => {
                self.finalize_fragment(text);
            }
        }
    }

    /// Hot path: one finalized fragment becomes one segment, optionally
    /// paired with a highlight appended immediately after it.
    fn finalize_fragment(&mut self, text: String) {
        let classification = self.classifier.classify(&text, self.audio_level);

        self.segments.push(TranscriptSegment::new(
            self.duration_secs,
            text.clone(),
            classification.is_highlight,
        ));

        if classification.is_highlight {
            self.highlights.push(Highlight::new(
                self.duration_secs,
                text,
                classification.summary,
                classification.keywords,
                Importance::High,
            ));
        }

        self.interim_text.clear();
    }

    fn invalid(&self, action: &str) -> InvalidStateTransition {
        InvalidStateTransition {
            current_state: self.state,
            action: action.to_string(),
        }
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new(HighlightClassifier::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_session() -> RecordingSession {
        let mut session = RecordingSession::default();
        session.start().unwrap();
        session
    }

    #[test]
    fn new_session_is_idle() {
        let session = RecordingSession::default();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.duration_secs(), 0);
        assert!(session.segments().is_empty());
        assert!(session.highlights().is_empty());
        assert_eq!(session.interim_text(), "");
    }

    #[test]
    fn full_lifecycle() {
        let mut session = RecordingSession::default();
        session.start().unwrap();
        assert!(session.is_recording());
        session.pause().unwrap();
        assert_eq!(session.state(), SessionState::Paused);
        session.resume().unwrap();
        assert!(session.is_recording());
        session.stop().unwrap();
        assert!(session.is_stopped());
    }

    #[test]
    fn start_from_recording_fails() {
        let mut session = recording_session();
        let err = session.start().unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
        assert!(session.is_recording());
    }

    #[test]
    fn pause_from_idle_fails_and_leaves_state_untouched() {
        let mut session = RecordingSession::default();
        let err = session.pause().unwrap_err();
        assert_eq!(err.current_state, SessionState::Idle);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn resume_from_recording_fails_and_leaves_state_untouched() {
        let mut session = recording_session();
        session.apply(SessionEvent::Tick);
        let err = session.resume().unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
        assert!(session.is_recording());
        assert_eq!(session.duration_secs(), 1);
    }

    #[test]
    fn stop_from_idle_fails() {
        let mut session = RecordingSession::default();
        assert!(session.stop().is_err());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn stopped_is_terminal() {
        let mut session = recording_session();
        session.stop().unwrap();
        assert!(session.start().is_err());
        assert!(session.pause().is_err());
        assert!(session.resume().is_err());
        assert!(session.stop().is_err());
        assert!(session.is_stopped());
    }

    #[test]
    fn duration_advances_only_while_recording() {
        let mut session = recording_session();
        session.apply(SessionEvent::Tick);
        session.apply(SessionEvent::Tick);
        assert_eq!(session.duration_secs(), 2);

        session.pause().unwrap();
        session.apply(SessionEvent::Tick);
        assert_eq!(session.duration_secs(), 2);

        session.resume().unwrap();
        session.apply(SessionEvent::Tick);
        assert_eq!(session.duration_secs(), 3);
    }

    #[test]
    fn final_fragment_becomes_one_segment_and_clears_interim() {
        let mut session = recording_session();
        session.apply(SessionEvent::Interim("물리학의".to_string()));
        assert_eq!(session.interim_text(), "물리학의");

        session.apply(SessionEvent::Final("물리학의 법칙은 중요합니다.".to_string()));

        assert_eq!(session.segments().len(), 1);
        assert_eq!(session.segments()[0].text, "물리학의 법칙은 중요합니다.");
        assert!(session.segments()[0].is_highlight);
        assert_eq!(session.interim_text(), "");

        assert_eq!(session.highlights().len(), 1);
        let highlight = &session.highlights()[0];
        assert!(highlight.keywords.contains(&"법칙은".to_string()));
        assert_eq!(highlight.importance, Importance::High);
    }

    #[test]
    fn interim_replaces_previous_interim() {
        let mut session = recording_session();
        session.apply(SessionEvent::Interim("안녕".to_string()));
        session.apply(SessionEvent::Interim("안녕하세요".to_string()));
        assert_eq!(session.interim_text(), "안녕하세요");
        assert!(session.segments().is_empty());
    }

    #[test]
    fn non_highlight_fragment_produces_no_highlight() {
        let mut session = recording_session();
        session.apply(SessionEvent::Level(30));
        session.apply(SessionEvent::Final("오늘은 날씨가 좋습니다.".to_string()));
        assert_eq!(session.segments().len(), 1);
        assert!(!session.segments()[0].is_highlight);
        assert!(session.highlights().is_empty());
    }

    #[test]
    fn highlight_timestamp_matches_segment_timestamp() {
        let mut session = recording_session();
        for _ in 0..7 {
            session.apply(SessionEvent::Tick);
        }
        session.apply(SessionEvent::Final("반드시 기억하세요!".to_string()));
        assert_eq!(session.segments()[0].timestamp_secs, 7);
        assert_eq!(session.highlights()[0].timestamp_secs, 7);
    }

    #[test]
    fn segment_timestamps_never_exceed_duration() {
        let mut session = recording_session();
        session.apply(SessionEvent::Tick);
        session.apply(SessionEvent::Final("첫 문장입니다.".to_string()));
        session.apply(SessionEvent::Tick);
        session.apply(SessionEvent::Tick);
        session.apply(SessionEvent::Final("두 번째 문장입니다.".to_string()));
        let last = session.segments().last().unwrap();
        assert!(last.timestamp_secs <= session.duration_secs());
    }

    #[test]
    fn pause_discards_interim_and_preserves_history() {
        let mut session = recording_session();
        session.apply(SessionEvent::Final("첫 문장입니다.".to_string()));
        session.apply(SessionEvent::Interim("끊긴".to_string()));

        session.pause().unwrap();
        assert_eq!(session.interim_text(), "");
        assert_eq!(session.segments().len(), 1);

        session.resume().unwrap();
        assert_eq!(session.segments().len(), 1);
        assert_eq!(session.segments()[0].text, "첫 문장입니다.");
    }

    #[test]
    fn stop_discards_interim() {
        let mut session = recording_session();
        session.apply(SessionEvent::Interim("마지막".to_string()));
        session.stop().unwrap();
        assert_eq!(session.interim_text(), "");
        assert!(session.segments().is_empty());
    }

    #[test]
    fn events_outside_recording_are_dropped() {
        let mut session = recording_session();
        session.pause().unwrap();
        session.apply(SessionEvent::Final("유실될 문장".to_string()));
        session.apply(SessionEvent::Interim("유실".to_string()));
        session.apply(SessionEvent::Level(90));
        assert!(session.segments().is_empty());
        assert_eq!(session.interim_text(), "");
        assert_eq!(session.audio_level(), 0);
    }

    #[test]
    fn level_updates_feed_the_classifier() {
        let mut session = recording_session();
        session.apply(SessionEvent::Level(95));
        // Loud and long, no keyword: highlighted through the emphasis rule
        session.apply(SessionEvent::Final("관측이 파동함수를 붕괴시킵니다".to_string()));
        assert!(session.segments()[0].is_highlight);
    }

    #[test]
    fn level_is_clamped_to_scale() {
        let mut session = recording_session();
        session.apply(SessionEvent::Level(255));
        assert_eq!(session.audio_level(), 100);
    }
}
