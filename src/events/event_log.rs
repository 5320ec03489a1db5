//! The append-only event log.
//!
//! Append is at-least-once in memory, best-effort durable: a failed
//! persist is reported through the `log` facade and the event stays
//! visible to in-process reads until the process restarts. Load failures
//! degrade to an empty log. Neither path is ever fatal to the host.

use serde_json::Value;

use crate::events::domain_event::{Event, EventType};
use crate::events::storage::interface::EventStorage;
use crate::events::storage::json_file_storage::JsonFileStorage;

/// Durable, ordered, append-only storage of domain events.
///
/// One logical owner per instance: share it behind `Arc<Mutex<_>>` and the
/// mutex is the in-process queue that serializes appends. Reads are
/// synchronous over the in-memory sequence; only append/load touch the
/// storage backend.
pub struct EventLog {
    storage: Box<dyn EventStorage>,
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log over the given backend without loading it.
    pub fn new(storage: Box<dyn EventStorage>) -> Self {
        Self {
            storage,
            events: Vec::new(),
        }
    }

    /// Create a log over the given backend and load its persisted state.
    pub fn open(storage: Box<dyn EventStorage>) -> Self {
        let mut log = Self::new(storage);
        log.load();
        log
    }

    /// Create a log over the default JSON-file backend and load it.
    pub fn open_default() -> Self {
        Self::open(Box::new(JsonFileStorage::default()))
    }

    /// Append a new event and persist the sequence.
    ///
    /// Returns a clone of the created event. A persistence failure does
    /// not roll back the in-memory append and does not fail the call; it
    /// is reported via `log::error!` and the host decides what to do with
    /// the degraded durability.
    pub fn append(
        &mut self,
        event_type: EventType,
        payload: Value,
        source: impl Into<String>,
    ) -> Event {
        let event = Event::new(event_type, payload, source);
        self.events.push(event.clone());
        if let Err(e) = self.storage.persist_events(&self.events) {
            log::error!(
                "failed to persist event log after appending {} ({}): {e}",
                event.event_id,
                event.event_type
            );
        }
        event
    }

    /// Append a new event, persisting through the backend's async path.
    pub async fn aappend(
        &mut self,
        event_type: EventType,
        payload: Value,
        source: impl Into<String>,
    ) -> Event {
        let event = Event::new(event_type, payload, source);
        self.events.push(event.clone());
        if let Err(e) = self.storage.apersist_events(&self.events).await {
            log::error!(
                "failed to persist event log after appending {} ({}): {e}",
                event.event_id,
                event.event_type
            );
        }
        event
    }

    /// Replace the in-memory sequence with the persisted one.
    ///
    /// Nothing persisted yet means an empty log. Corrupt or unreadable
    /// state also degrades to an empty log, reported via `log::warn!`;
    /// this never propagates an error to the caller.
    pub fn load(&mut self) {
        self.events = match self.storage.load_events() {
            Ok(Some(events)) => events,
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("failed to load persisted event log, starting empty: {e}");
                Vec::new()
            }
        };
    }

    /// Replace the in-memory sequence via the backend's async load path.
    pub async fn aload(&mut self) {
        self.events = match self.storage.aload_events().await {
            Ok(Some(events)) => events,
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("failed to load persisted event log, starting empty: {e}");
                Vec::new()
            }
        };
    }

    /// Snapshot of all events, optionally filtered to one type, in append
    /// order. Never hands out the live sequence.
    pub fn get_events(&self, event_type: Option<EventType>) -> Vec<Event> {
        match event_type {
            Some(t) => self
                .events
                .iter()
                .filter(|e| e.event_type == t)
                .cloned()
                .collect(),
            None => self.events.clone(),
        }
    }

    /// All events strictly after the event with the given id, in order.
    ///
    /// An unknown id returns the full sequence: the caller has no earlier
    /// anchor, so nothing is excluded.
    pub fn get_events_since(&self, event_id: &str) -> Vec<Event> {
        match self.events.iter().position(|e| e.event_id == event_id) {
            Some(idx) => self.events[idx + 1..].to_vec(),
            None => self.events.clone(),
        }
    }

    /// Fold the ordered event sequence through `reducer`, left to right.
    ///
    /// The only sanctioned way to derive projections; there is no other
    /// read path into historical state.
    pub fn replay<S, F>(&self, initial: S, mut reducer: F) -> S
    where
        F: FnMut(S, &Event) -> S,
    {
        self.events
            .iter()
            .fold(initial, |state, event| reducer(state, event))
    }

    /// Number of events currently in memory.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the log holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
