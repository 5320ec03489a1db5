//! Immutable domain events.
//!
//! An [`Event`] is never modified or removed after it has been appended to
//! the log; every other piece of state in this crate is a pure function of
//! the ordered event sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Fixed enumeration of everything the store can record.
///
/// Serialized with the wire names used in the persisted log, e.g.
/// `"CONSTRAINT_ADDED"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// A constraint was created, or renewed by overwriting its key.
    ConstraintAdded,
    /// A subset of an active constraint's fields changed.
    ConstraintUpdated,
    /// A constraint was explicitly retired.
    ConstraintObsoleted,
    /// A constraint was removed because it was shown to be wrong.
    ///
    /// Projection-wise identical to [`EventType::ConstraintObsoleted`];
    /// the distinct type records only *why* the deletion happened.
    ConstraintContradicted,
    /// A mood observation was taken.
    MoodRecorded,
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EventType::ConstraintAdded => "CONSTRAINT_ADDED",
            EventType::ConstraintUpdated => "CONSTRAINT_UPDATED",
            EventType::ConstraintObsoleted => "CONSTRAINT_OBSOLETED",
            EventType::ConstraintContradicted => "CONSTRAINT_CONTRADICTED",
            EventType::MoodRecorded => "MOOD_RECORDED",
        };
        f.write_str(name)
    }
}

/// A single immutable record in the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier (UUID v4). Ordering is carried by the
    /// log's append sequence, not by the id itself.
    pub event_id: String,

    /// UTC instant the event was created.
    pub timestamp: DateTime<Utc>,

    /// Event type discriminator.
    #[serde(rename = "type")]
    pub event_type: EventType,

    /// Event-specific structured data. Reducers decode this into the
    /// typed payloads in [`crate::events::types`] and skip records they
    /// cannot decode.
    pub payload: Value,

    /// Free-text origin tag, e.g. `"constraint_store"`.
    pub source: String,
}

impl Event {
    /// Create a new event with a fresh id and the current UTC timestamp.
    pub fn new(event_type: EventType, payload: Value, source: impl Into<String>) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type,
            payload,
            source: source.into(),
        }
    }
}
