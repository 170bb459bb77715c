//! Application wiring for the CLI commands

use std::process::ExitCode;
use std::time::Duration;

use tokio::time::interval;

use crate::application::ports::{CaptureError, LectureStore, TranscriptionError};
use crate::application::record::{RecordError, RecordLectureUseCase};
use crate::domain::classifier::HighlightClassifier;
use crate::domain::config::AppConfig;
use crate::domain::lecture::{Lecture, LectureMeta};
use crate::infrastructure::{
    CpalCaptureDevice, GeminiSpeechSource, JsonLectureStore, XdgConfigStore,
};

use super::args::RecordOptions;
use super::presenter::Presenter;
use super::signals::{SessionSignal, SessionSignalHandler};

/// Exit code for runtime errors
pub const EXIT_ERROR: u8 = 1;

/// Exit code for usage errors
pub const EXIT_USAGE_ERROR: u8 = 2;

/// How often the live status line refreshes
const STATUS_REFRESH: Duration = Duration::from_millis(200);

/// Merge config sources: defaults < config file < environment < CLI args
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match crate::application::ports::ConfigStore::load(&store).await {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(%e, "could not load config file, using defaults");
            AppConfig::empty()
        }
    };

    let env_config = AppConfig {
        api_key: std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty()),
        ..Default::default()
    };

    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}

fn lecture_store(config: &AppConfig) -> JsonLectureStore {
    match &config.store_dir {
        Some(dir) => JsonLectureStore::with_dir(dir),
        None => JsonLectureStore::new(),
    }
}

/// Run a live recording session until a stop signal arrives
pub async fn run_record(options: RecordOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let cli_config = AppConfig {
        language: options.language.clone(),
        chunk_seconds: options.chunk_seconds,
        ..Default::default()
    };
    let config = load_merged_config(cli_config).await;

    // Surface a missing engine before touching the microphone
    if config.api_key.is_none() {
        presenter.error(&TranscriptionError::UnsupportedEnvironment.to_string());
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    let source = GeminiSpeechSource::new(
        config.api_key.clone(),
        config.language_or_default(),
        config.chunk_seconds_or_default(),
    );
    let use_case = RecordLectureUseCase::new(
        CpalCaptureDevice::new(),
        source,
        lecture_store(&config),
        HighlightClassifier::new(config.classifier_config()),
        LectureMeta {
            title: options.title.clone(),
            presenter: options.presenter.clone(),
        },
    );

    let mut signals = match SessionSignalHandler::new().await {
        Ok(signals) => signals,
        Err(e) => {
            presenter.error(&format!("Failed to install signal handlers: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Err(e) = use_case.start().await {
        report_start_failure(&presenter, &e);
        return ExitCode::from(EXIT_ERROR);
    }

    presenter.info("Recording. Ctrl-C stops and saves; SIGUSR1 pauses, SIGUSR2 resumes.");
    presenter.start_spinner("Recording...");

    let mut printed = 0usize;
    let mut ticker = interval(STATUS_REFRESH);
    loop {
        tokio::select! {
            signal = signals.recv() => match signal {
                Some(SessionSignal::Stop) | None => break,
                Some(SessionSignal::Pause) => {
                    if let Err(e) = use_case.pause().await {
                        presenter.warn(&e.to_string());
                    }
                }
                Some(SessionSignal::Resume) => {
                    if let Err(e) = use_case.resume().await {
                        presenter.warn(&e.to_string());
                    }
                }
            },
            _ = ticker.tick() => {
                let segments = use_case.segments().await;
                for segment in &segments[printed..] {
                    presenter.println_above_spinner(&presenter.format_segment(segment));
                }
                printed = segments.len();

                let status = presenter.format_status(
                    use_case.state().await.as_str(),
                    use_case.duration_secs().await,
                    use_case.audio_level().await,
                    &use_case.interim_text().await,
                );
                presenter.update_spinner(&status);
            }
        }
    }

    presenter.stop_spinner();

    match use_case.stop().await {
        Ok(lecture) => {
            report_saved_lecture(&presenter, &lecture);
            ExitCode::SUCCESS
        }
        Err(e) => {
            presenter.error(&format!("Failed to finish recording: {}", e));
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn report_start_failure(presenter: &Presenter, error: &RecordError) {
    presenter.error(&error.to_string());
    match error {
        RecordError::Capture(CaptureError::PermissionDenied) => {
            presenter.info("Grant microphone access and run again.");
        }
        RecordError::Capture(CaptureError::DeviceUnavailable) => {
            presenter.info("Connect a microphone and run again.");
        }
        RecordError::Transcription(TranscriptionError::UnsupportedEnvironment) => {
            presenter.info("Set GEMINI_API_KEY or run: lecture-scribe config set api_key <key>");
        }
        _ => {}
    }
}

fn report_saved_lecture(presenter: &Presenter, lecture: &Lecture) {
    presenter.success(&format!(
        "Saved \"{}\" ({}, {} segments, {} highlights)",
        lecture.title(),
        presenter.format_timestamp(lecture.duration_secs()),
        lecture.segments().len(),
        lecture.highlights().len()
    ));
    presenter.info(&format!("Lecture id: {}", lecture.id()));

    if !lecture.highlights().is_empty() {
        presenter.output("");
        presenter.output("Highlights:");
        for highlight in lecture.highlights() {
            presenter.output(&presenter.format_highlight(highlight));
        }
    }
}

/// List stored lectures, newest first
pub async fn run_list() -> ExitCode {
    let presenter = Presenter::new();
    let config = load_merged_config(AppConfig::empty()).await;
    let store = lecture_store(&config);

    match store.list().await {
        Ok(lectures) if lectures.is_empty() => {
            presenter.info("No lectures recorded yet.");
            ExitCode::SUCCESS
        }
        Ok(lectures) => {
            for lecture in &lectures {
                presenter.lecture_row(lecture);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Print one stored lecture with its transcript and highlights
pub async fn run_show(id: &str) -> ExitCode {
    let presenter = Presenter::new();
    let config = load_merged_config(AppConfig::empty()).await;
    let store = lecture_store(&config);

    let lecture = match store.load(id).await {
        Ok(lecture) => lecture,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    presenter.output(&format!("# {}", lecture.title()));
    if let Some(name) = lecture.presenter() {
        presenter.output(&format!("Presenter: {}", name));
    }
    presenter.output(&format!(
        "Recorded: {}  Duration: {}",
        lecture.created_at().format("%Y-%m-%d %H:%M"),
        presenter.format_timestamp(lecture.duration_secs())
    ));

    presenter.output("");
    for segment in lecture.segments() {
        presenter.output(&presenter.format_segment(segment));
    }

    if !lecture.highlights().is_empty() {
        presenter.output("");
        presenter.output("Highlights:");
        for highlight in lecture.highlights() {
            presenter.output(&presenter.format_highlight(highlight));
        }
    }

    ExitCode::SUCCESS
}
