//! Abstract storage interface for the event log.

use async_trait::async_trait;

use crate::events::domain_event::Event;
use crate::utilities::errors::StorageError;

/// Abstract trait defining the event storage interface.
///
/// A backend persists the *entire* ordered event sequence on every write;
/// the log is small by design and wholesale rewrites keep the on-disk
/// artifact trivially consistent.
#[async_trait]
pub trait EventStorage: Send + Sync {
    /// Load the persisted event sequence.
    ///
    /// Returns `Ok(None)` when nothing has been persisted yet (first run).
    /// A present-but-undecodable artifact is an error; the event log
    /// degrades it to an empty sequence rather than surfacing it to hosts.
    fn load_events(&self) -> Result<Option<Vec<Event>>, StorageError>;

    /// Persist the full ordered event sequence.
    fn persist_events(&self, events: &[Event]) -> Result<(), StorageError>;

    /// Load the persisted event sequence asynchronously.
    async fn aload_events(&self) -> Result<Option<Vec<Event>>, StorageError> {
        self.load_events()
    }

    /// Persist the full ordered event sequence asynchronously.
    async fn apersist_events(&self, events: &[Event]) -> Result<(), StorageError> {
        self.persist_events(events)
    }
}
