//! Typed payloads carried by domain events.
//!
//! Each sub-module defines the payload structs for one domain. Payloads
//! serialize into the generic `payload` value of an
//! [`Event`](crate::events::Event) when appended, and are decoded back out
//! during replay.

/// Constraint lifecycle payloads (added, updated, removed).
pub mod constraint_events;

/// Mood observation payloads.
pub mod mood_events;

pub use constraint_events::{
    ConstraintAddedPayload, ConstraintRemovedPayload, ConstraintUpdatedPayload,
};
pub use mood_events::MoodRecordedPayload;
