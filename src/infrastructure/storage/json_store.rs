//! JSON-file lecture store

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::{LectureStore, StorageError};
use crate::domain::lecture::Lecture;

/// Lecture store writing one JSON file per lecture under the XDG data dir
pub struct JsonLectureStore {
    dir: PathBuf,
}

impl JsonLectureStore {
    /// Create a store rooted at the default XDG data location
    pub fn new() -> Self {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("lecture-scribe")
            .join("lectures");
        Self { dir }
    }

    /// Create a store rooted at a custom directory
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory lectures are written to
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn lecture_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }
}

impl Default for JsonLectureStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LectureStore for JsonLectureStore {
    async fn save(&self, lecture: &Lecture) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        let json = serde_json::to_string_pretty(lecture)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        fs::write(self.lecture_path(&lecture.id().to_string()), json)
            .await
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Lecture, StorageError> {
        let path = self.lecture_path(id);
        if !path.exists() {
            return Err(StorageError::NotFound(id.to_string()));
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;

        serde_json::from_str(&content).map_err(|e| StorageError::ReadFailed(e.to_string()))
    }

    async fn list(&self) -> Result<Vec<Lecture>, StorageError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?;

        let mut lectures = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::ReadFailed(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let content = fs::read_to_string(&path)
                .await
                .map_err(|e| StorageError::ReadFailed(e.to_string()))?;
            match serde_json::from_str::<Lecture>(&content) {
                Ok(lecture) => lectures.push(lecture),
                // A malformed file shouldn't hide the rest of the library
                Err(e) => tracing::warn!(path = %path.display(), %e, "skipping unreadable lecture file"),
            }
        }

        lectures.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(lectures)
    }
}
