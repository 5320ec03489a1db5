//! JSON file storage backend for the event log.

use std::fs;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::events::domain_event::Event;
use crate::events::storage::interface::EventStorage;
use crate::utilities::errors::StorageError;
use crate::utilities::paths;

/// Default file name for the persisted event log.
pub const EVENT_LOG_FILE: &str = "behavioral_events.json";

/// Persists the event sequence as a pretty-printed JSON array.
///
/// The encoding round-trips losslessly, nested payload values included.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    /// Path of the backing file.
    pub path: PathBuf,
}

impl JsonFileStorage {
    /// Create a storage backend at the given path.
    ///
    /// Defaults to `<data_storage_path>/behavioral_events.json` when no
    /// path is given. The file itself is only created on first persist.
    pub fn new(path: Option<PathBuf>) -> Self {
        let path =
            path.unwrap_or_else(|| paths::data_storage_path().join(EVENT_LOG_FILE));
        Self { path }
    }
}

impl Default for JsonFileStorage {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl EventStorage for JsonFileStorage {
    fn load_events(&self) -> Result<Option<Vec<Event>>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let events = serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
            message: format!("{}: {e}", self.path.display()),
        })?;
        Ok(Some(events))
    }

    fn persist_events(&self, events: &[Event]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(events)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    async fn aload_events(&self) -> Result<Option<Vec<Event>>, StorageError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.load_events())
            .await
            .map_err(join_error)?
    }

    async fn apersist_events(&self, events: &[Event]) -> Result<(), StorageError> {
        let this = self.clone();
        let events = events.to_vec();
        tokio::task::spawn_blocking(move || this.persist_events(&events))
            .await
            .map_err(join_error)?
    }
}

fn join_error(e: tokio::task::JoinError) -> StorageError {
    StorageError::Io(io::Error::other(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::domain_event::EventType;

    fn sample_events() -> Vec<Event> {
        vec![
            Event::new(
                EventType::ConstraintAdded,
                serde_json::json!({ "key": "k", "value": "v", "strength": 1.0, "type": "hard" }),
                "constraint_store",
            ),
            Event::new(
                EventType::MoodRecorded,
                serde_json::json!({ "mood": "Calm", "intensity": 2.0, "reason": "all quiet" }),
                "mood_tracker",
            ),
        ]
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(Some(dir.path().join("missing.json")));
        assert!(storage.load_events().unwrap().is_none());
    }

    #[test]
    fn test_persist_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(Some(dir.path().join("nested/dir/log.json")));
        let events = sample_events();
        storage.persist_events(&events).unwrap();
        let loaded = storage.load_events().unwrap().unwrap();
        assert_eq!(loaded, events);
    }

    #[test]
    fn test_load_corrupt_file_is_corrupt_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        fs::write(&path, "{ not json").unwrap();
        let storage = JsonFileStorage::new(Some(path));
        assert!(matches!(
            storage.load_events(),
            Err(StorageError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn test_async_persist_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(Some(dir.path().join("log.json")));
        let events = sample_events();
        storage.apersist_events(&events).await.unwrap();
        let loaded = storage.aload_events().await.unwrap().unwrap();
        assert_eq!(loaded, events);
    }
}
