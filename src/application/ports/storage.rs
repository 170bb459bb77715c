//! Lecture storage port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::lecture::Lecture;

/// Storage errors
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("Failed to write lecture: {0}")]
    WriteFailed(String),

    #[error("Failed to read lecture: {0}")]
    ReadFailed(String),

    #[error("Lecture not found: {0}")]
    NotFound(String),
}

/// Port for durable storage of finished lectures, keyed by lecture id
#[async_trait]
pub trait LectureStore: Send + Sync {
    /// Persist an assembled lecture
    async fn save(&self, lecture: &Lecture) -> Result<(), StorageError>;

    /// Load a lecture by id
    async fn load(&self, id: &str) -> Result<Lecture, StorageError>;

    /// List all stored lectures, newest first
    async fn list(&self) -> Result<Vec<Lecture>, StorageError>;
}
