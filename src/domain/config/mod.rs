//! Configuration value objects

mod app_config;

pub use app_config::{AppConfig, DEFAULT_CHUNK_SECONDS, DEFAULT_LANGUAGE};
