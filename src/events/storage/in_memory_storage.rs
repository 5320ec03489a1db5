//! In-memory storage backend, for tests and ephemeral hosts.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::events::domain_event::Event;
use crate::events::storage::interface::EventStorage;
use crate::utilities::errors::StorageError;

/// Keeps the "persisted" sequence in memory.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    persisted: Mutex<Option<Vec<Event>>>,
}

impl InMemoryStorage {
    /// Create an empty backend (nothing persisted yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-seeded with an already-persisted sequence.
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            persisted: Mutex::new(Some(events)),
        }
    }
}

#[async_trait]
impl EventStorage for InMemoryStorage {
    fn load_events(&self) -> Result<Option<Vec<Event>>, StorageError> {
        Ok(self.persisted.lock().clone())
    }

    fn persist_events(&self, events: &[Event]) -> Result<(), StorageError> {
        *self.persisted.lock() = Some(events.to_vec());
        Ok(())
    }
}
