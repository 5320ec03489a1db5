//! Payload structs for constraint lifecycle events.

use serde::{Deserialize, Serialize};

use crate::constraints::record::ConstraintType;

/// Payload of a `CONSTRAINT_ADDED` event.
///
/// Carries the full record content; the event's own id and timestamp
/// become the record's `source_event_id` and `created_at` during replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintAddedPayload {
    /// Unique constraint key.
    pub key: String,
    /// Rule content.
    pub value: String,
    /// Strength in `[0, 1]`.
    pub strength: f64,
    /// Hardness class.
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,
    /// Optional expiry in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

/// Payload of a `CONSTRAINT_UPDATED` event.
///
/// Only the fields present in the payload change; everything else retains
/// its prior value during replay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintUpdatedPayload {
    /// Key of the constraint being refreshed.
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub constraint_type: Option<ConstraintType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

/// Payload of a `CONSTRAINT_OBSOLETED` or `CONSTRAINT_CONTRADICTED` event.
///
/// The two deletions are projection-identical; the event type records why
/// the key was removed, the payload records the caller's stated reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintRemovedPayload {
    /// Key of the constraint being removed.
    pub key: String,
    /// Caller-supplied explanation.
    pub reason: String,
}
