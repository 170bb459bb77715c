//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// LectureScribe - live lecture recording with highlight detection
#[derive(Parser, Debug)]
#[command(name = "lecture-scribe")]
#[command(version)]
#[command(about = "Record lectures with live transcription and highlight detection")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a lecture (Ctrl-C stops, SIGUSR1 pauses, SIGUSR2 resumes)
    Record {
        /// Lecture title
        #[arg(short = 't', long, value_name = "TITLE")]
        title: Option<String>,

        /// Presenter name
        #[arg(short = 'p', long, value_name = "NAME")]
        presenter: Option<String>,

        /// Spoken language code (e.g., ko-KR)
        #[arg(short = 'l', long, value_name = "LANG")]
        language: Option<String>,

        /// Transcription window length in seconds
        #[arg(long, value_name = "SECS")]
        chunk_seconds: Option<u64>,
    },
    /// List stored lectures
    List,
    /// Print a stored lecture with its highlights
    Show {
        /// Lecture id
        id: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Parsed record options
#[derive(Debug, Clone, Default)]
pub struct RecordOptions {
    pub title: Option<String>,
    pub presenter: Option<String>,
    pub language: Option<String>,
    pub chunk_seconds: Option<u64>,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "language",
    "chunk_seconds",
    "store_dir",
    "highlight_keywords",
    "audio_emphasis_threshold",
    "max_keywords",
    "summary_max_length",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
