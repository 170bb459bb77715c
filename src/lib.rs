//! LectureScribe - live lecture recording with highlight detection
//!
//! This crate records live microphone audio, produces a rolling transcript
//! through a continuous transcription source, flags pedagogically important
//! segments with lightweight heuristics, and packages finished sessions into
//! immutable lecture records.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Session state machine, classifier heuristics, lecture
//!   entities, and errors
//! - **Application**: Use cases and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, Gemini, JSON store)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
