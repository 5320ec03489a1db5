//! Append-only event log: the sole source of truth for behavioral state.
//!
//! Everything the constraint store and mood tracker expose is a projection
//! over the ordered event sequence kept here. Events are immutable once
//! appended; durable storage goes through the pluggable backends in
//! [`storage`].

/// Immutable event record and the fixed event-type enumeration.
pub mod domain_event;

/// The append-only, replayable event log.
pub mod event_log;

/// Durable storage backends for the event sequence.
pub mod storage;

/// Typed payloads carried by domain events.
pub mod types;

pub use domain_event::{Event, EventType};
pub use event_log::EventLog;
pub use storage::interface::EventStorage;
pub use storage::in_memory_storage::InMemoryStorage;
pub use storage::json_file_storage::JsonFileStorage;
