//! Live lecture recording use case

use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, warn};

use crate::domain::classifier::HighlightClassifier;
use crate::domain::lecture::{Highlight, Lecture, LectureAssembler, LectureMeta, TranscriptSegment};
use crate::domain::session::{InvalidStateTransition, RecordingSession, SessionEvent, SessionState};

use super::ports::{
    CaptureDevice, CaptureError, CaptureStream, LectureStore, StorageError, TranscriptionError,
    TranscriptionEvent, TranscriptionSource,
};

/// How often the loudness level is sampled while recording
const LEVEL_SAMPLE_INTERVAL: Duration = Duration::from_millis(100);

/// Errors from the record use case
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Capture failed: {0}")]
    Capture(#[from] CaptureError),

    #[error("Transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("Invalid state transition: {0}")]
    InvalidState(#[from] InvalidStateTransition),

    #[error("Failed to store lecture: {0}")]
    Storage(#[from] StorageError),
}

/// Live recording use case.
///
/// Owns the session state machine and orchestrates the capture device and
/// transcription source through it. All session mutation goes through the
/// single `Arc<Mutex<RecordingSession>>` owner; the spawned tick, level,
/// and event-pump loops self-cancel once the session leaves the Recording
/// state and are additionally aborted on pause/stop so nothing fires after
/// the fact. The capture stream is released exactly once: on `stop()`, or
/// on drop when the session is abandoned mid-recording.
pub struct RecordLectureUseCase<C, T, S>
where
    C: CaptureDevice,
    T: TranscriptionSource + 'static,
    S: LectureStore,
{
    capture: C,
    source: Arc<T>,
    store: S,
    meta: LectureMeta,
    session: Arc<Mutex<RecordingSession>>,
    stream: StdMutex<Option<Arc<dyn CaptureStream>>>,
    tasks: StdMutex<Vec<JoinHandle<()>>>,
}

impl<C, T, S> RecordLectureUseCase<C, T, S>
where
    C: CaptureDevice,
    T: TranscriptionSource + 'static,
    S: LectureStore,
{
    /// Create a new use case instance
    pub fn new(
        capture: C,
        source: T,
        store: S,
        classifier: HighlightClassifier,
        meta: LectureMeta,
    ) -> Self {
        Self {
            capture,
            source: Arc::new(source),
            store,
            meta,
            session: Arc::new(Mutex::new(RecordingSession::new(classifier))),
            stream: StdMutex::new(None),
            tasks: StdMutex::new(Vec::new()),
        }
    }

    /// Get current session state
    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state()
    }

    /// Elapsed recording seconds
    pub async fn duration_secs(&self) -> u64 {
        self.session.lock().await.duration_secs()
    }

    /// Snapshot of the transcript so far, chronological order
    pub async fn segments(&self) -> Vec<TranscriptSegment> {
        self.session.lock().await.segments().to_vec()
    }

    /// Snapshot of the highlights so far, chronological order
    pub async fn highlights(&self) -> Vec<Highlight> {
        self.session.lock().await.highlights().to_vec()
    }

    /// The current unfinalized text, empty when none is in flight
    pub async fn interim_text(&self) -> String {
        self.session.lock().await.interim_text().to_string()
    }

    /// Most recent loudness sample, 0-100
    pub async fn audio_level(&self) -> u8 {
        self.session.lock().await.audio_level()
    }

    /// Start recording: Idle -> Recording.
    ///
    /// Acquires the microphone and starts the transcription source before
    /// transitioning, so any `PermissionDenied` / `DeviceUnavailable` /
    /// `UnsupportedEnvironment` failure leaves the session in Idle.
    pub async fn start(&self) -> Result<(), RecordError> {
        {
            let session = self.session.lock().await;
            if session.state() != SessionState::Idle {
                return Err(InvalidStateTransition {
                    current_state: session.state(),
                    action: "start".to_string(),
                }
                .into());
            }
        }

        let stream = self.capture.acquire().await?;

        let (sink, feed) = mpsc::unbounded_channel();
        stream.attach_sink(sink);

        let events = match self.source.start(feed).await {
            Ok(events) => events,
            Err(e) => {
                stream.close();
                return Err(e.into());
            }
        };

        if let Err(e) = self.session.lock().await.start() {
            self.source.stop().await;
            stream.close();
            return Err(e.into());
        }

        if let Ok(mut slot) = self.stream.lock() {
            *slot = Some(Arc::clone(&stream));
        }
        self.spawn_recording_tasks(stream, events);
        debug!("recording started");
        Ok(())
    }

    /// Pause recording: Recording -> Paused. Freezes the duration, suspends
    /// level sampling, stops the transcription source, and discards any
    /// in-flight interim text.
    pub async fn pause(&self) -> Result<(), RecordError> {
        self.session.lock().await.pause()?;
        self.halt_recording_tasks();

        if let Some(stream) = self.current_stream() {
            stream.suspend();
            stream.detach_sink();
        }
        self.source.stop().await;
        debug!("recording paused");
        Ok(())
    }

    /// Resume recording: Paused -> Recording, continuing the accumulated
    /// duration.
    pub async fn resume(&self) -> Result<(), RecordError> {
        self.session.lock().await.resume()?;

        let stream = self
            .current_stream()
            .ok_or_else(|| CaptureError::StreamFailed("capture stream missing".to_string()))?;
        stream.resume();

        let (sink, feed) = mpsc::unbounded_channel();
        stream.attach_sink(sink);

        match self.source.start(feed).await {
            Ok(events) => {
                self.spawn_recording_tasks(stream, events);
                debug!("recording resumed");
                Ok(())
            }
            Err(e) => {
                // Back to Paused so the caller can retry
                stream.suspend();
                stream.detach_sink();
                let _ = self.session.lock().await.pause();
                Err(e.into())
            }
        }
    }

    /// Stop recording: Recording or Paused -> Stopped. Releases the capture
    /// device, discards in-flight interim text, and hands the assembled
    /// lecture to the store. Always yields a lecture, highlights or not.
    pub async fn stop(&self) -> Result<Lecture, RecordError> {
        self.session.lock().await.stop()?;
        self.halt_recording_tasks();
        self.source.stop().await;

        if let Ok(mut slot) = self.stream.lock() {
            if let Some(stream) = slot.take() {
                stream.close();
            }
        }

        let lecture = {
            let session = self.session.lock().await;
            LectureAssembler::assemble(&session, self.meta.clone())
        };
        self.store.save(&lecture).await?;
        debug!(lecture_id = %lecture.id(), "recording stopped and stored");
        Ok(lecture)
    }

    fn current_stream(&self) -> Option<Arc<dyn CaptureStream>> {
        self.stream.lock().ok().and_then(|slot| slot.clone())
    }

    /// Spawn the tick, level-sampling, and event-pump loops for one
    /// recording stretch. Each loop checks the session state before
    /// mutating and exits once the session is no longer Recording.
    fn spawn_recording_tasks(
        &self,
        stream: Arc<dyn CaptureStream>,
        events: mpsc::UnboundedReceiver<TranscriptionEvent>,
    ) {
        let mut handles = Vec::with_capacity(3);

        // Duration tick, once per elapsed second
        let session = Arc::clone(&self.session);
        handles.push(tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));
            ticker.tick().await; // first tick completes immediately
            loop {
                ticker.tick().await;
                let mut session = session.lock().await;
                if !session.is_recording() {
                    break;
                }
                session.apply(SessionEvent::Tick);
            }
        }));

        // Loudness sampling
        let session = Arc::clone(&self.session);
        let level_stream = Arc::clone(&stream);
        handles.push(tokio::spawn(async move {
            let mut ticker = interval(LEVEL_SAMPLE_INTERVAL);
            loop {
                ticker.tick().await;
                let mut session = session.lock().await;
                if !session.is_recording() {
                    break;
                }
                session.apply(SessionEvent::Level(level_stream.level()));
            }
        }));

        // Recognition event pump; restarts the source if it ends while the
        // session is still Recording
        let session = Arc::clone(&self.session);
        let source = Arc::clone(&self.source);
        let pump_stream = Arc::clone(&stream);
        let mut events = events;
        handles.push(tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Some(TranscriptionEvent::Interim(text)) => {
                        session.lock().await.apply(SessionEvent::Interim(text));
                    }
                    Some(TranscriptionEvent::Final(text)) => {
                        session.lock().await.apply(SessionEvent::Final(text));
                    }
                    Some(TranscriptionEvent::Failed(error)) => {
                        warn!(%error, "transcription source failed");
                        break;
                    }
                    Some(TranscriptionEvent::Ended) | None => {
                        if !session.lock().await.is_recording() {
                            break;
                        }
                        debug!("transcription source ended while recording, restarting");
                        let (sink, feed) = mpsc::unbounded_channel();
                        pump_stream.attach_sink(sink);
                        match source.start(feed).await {
                            Ok(next) => events = next,
                            Err(error) => {
                                warn!(%error, "could not restart transcription source");
                                break;
                            }
                        }
                    }
                }
            }
        }));

        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.extend(handles);
        }
    }

    fn halt_recording_tasks(&self) {
        if let Ok(mut tasks) = self.tasks.lock() {
            for task in tasks.drain(..) {
                task.abort();
            }
        }
    }
}

impl<C, T, S> Drop for RecordLectureUseCase<C, T, S>
where
    C: CaptureDevice,
    T: TranscriptionSource + 'static,
    S: LectureStore,
{
    /// Abnormal disposal still cancels the loops and releases the capture
    /// device.
    fn drop(&mut self) {
        self.halt_recording_tasks();
        if let Ok(mut slot) = self.stream.lock() {
            if let Some(stream) = slot.take() {
                stream.close();
            }
        }
    }
}
