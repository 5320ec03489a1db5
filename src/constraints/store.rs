//! The constraint store and its projection logic.
//!
//! Every mutation appends to the event log before taking effect locally,
//! so the projection can always be reconstructed by replay. Pruning is
//! ambient: it happens at projection time, not through events.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::constraints::record::{
    ConstraintOptions, ConstraintRecord, ConstraintType, ConstraintUpdate,
};
use crate::events::domain_event::{Event, EventType};
use crate::events::event_log::EventLog;
use crate::events::types::constraint_events::{
    ConstraintAddedPayload, ConstraintRemovedPayload, ConstraintUpdatedPayload,
};
use crate::utilities::errors::ConstraintError;

/// Soft constraints below this strength are pruned on rebuild.
pub const STRENGTH_THRESHOLD: f64 = 0.15;

/// Source tag stamped on every constraint event.
const EVENT_SOURCE: &str = "constraint_store";

/// Materialized view of active constraints over the event log.
///
/// Owns its keyed projection exclusively; the map is rebuilt wholesale
/// wherever correctness is in question rather than patched in place.
pub struct ConstraintStore {
    log: Arc<Mutex<EventLog>>,
    constraints: HashMap<String, ConstraintRecord>,
}

impl ConstraintStore {
    /// Create a store over a shared event log and project its current
    /// state from replay.
    pub fn new(log: Arc<Mutex<EventLog>>) -> Self {
        let mut store = Self {
            log,
            constraints: HashMap::new(),
        };
        store.rebuild();
        store
    }

    /// Add (or renew, by key) a constraint.
    ///
    /// Validates before anything reaches the log: non-empty key, non-empty
    /// value, strength in `[0, 1]`. On success appends `CONSTRAINT_ADDED`
    /// and installs the record with `created_at`/`source_event_id` taken
    /// from the new event.
    pub fn add(
        &mut self,
        key: &str,
        value: &str,
        options: ConstraintOptions,
    ) -> Result<ConstraintRecord, ConstraintError> {
        if key.trim().is_empty() {
            return Err(ConstraintError::Validation {
                message: "constraint key must be a non-empty string".to_string(),
            });
        }
        if value.trim().is_empty() {
            return Err(ConstraintError::Validation {
                message: "constraint value must be a non-empty string".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&options.strength) {
            return Err(ConstraintError::Validation {
                message: format!(
                    "constraint strength must be in [0, 1], got {}",
                    options.strength
                ),
            });
        }

        let payload = ConstraintAddedPayload {
            key: key.to_string(),
            value: value.to_string(),
            strength: options.strength,
            constraint_type: options.constraint_type,
            ttl: options.ttl,
        };
        let event = self.log.lock().append(
            EventType::ConstraintAdded,
            serde_json::to_value(&payload)?,
            EVENT_SOURCE,
        );

        let record = ConstraintRecord {
            key: payload.key,
            value: payload.value,
            strength: payload.strength,
            constraint_type: payload.constraint_type,
            source_event_id: event.event_id,
            ttl: payload.ttl,
            created_at: event.timestamp,
        };
        self.constraints.insert(key.to_string(), record.clone());
        Ok(record)
    }

    /// Refresh any subset of an active constraint's fields.
    ///
    /// An absent key is a no-op: nothing is appended and `Ok(None)` is
    /// returned. Otherwise appends `CONSTRAINT_UPDATED` and performs a
    /// full rebuild rather than trusting an incremental patch; the
    /// refreshed record is returned, or `None` when the merge left it
    /// prunable and pruning removed it.
    pub fn update(
        &mut self,
        key: &str,
        update: ConstraintUpdate,
    ) -> Result<Option<ConstraintRecord>, ConstraintError> {
        if !self.constraints.contains_key(key) {
            return Ok(None);
        }

        let payload = ConstraintUpdatedPayload {
            key: key.to_string(),
            value: update.value,
            strength: update.strength,
            constraint_type: update.constraint_type,
            ttl: update.ttl,
        };
        self.log.lock().append(
            EventType::ConstraintUpdated,
            serde_json::to_value(&payload)?,
            EVENT_SOURCE,
        );

        self.rebuild();
        Ok(self.constraints.get(key).cloned())
    }

    /// Explicitly retire a constraint.
    ///
    /// Obsoleting an absent key is not an error: nothing is appended and
    /// `Ok(false)` is returned.
    pub fn obsolete(&mut self, key: &str, reason: &str) -> Result<bool, ConstraintError> {
        self.remove(key, reason, EventType::ConstraintObsoleted)
    }

    /// Remove a constraint because it was shown to be wrong.
    ///
    /// Identical to [`obsolete`](Self::obsolete) except for the event type
    /// recorded in the log.
    pub fn contradict(&mut self, key: &str, reason: &str) -> Result<bool, ConstraintError> {
        self.remove(key, reason, EventType::ConstraintContradicted)
    }

    fn remove(
        &mut self,
        key: &str,
        reason: &str,
        event_type: EventType,
    ) -> Result<bool, ConstraintError> {
        if !self.constraints.contains_key(key) {
            return Ok(false);
        }
        let payload = ConstraintRemovedPayload {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        self.log
            .lock()
            .append(event_type, serde_json::to_value(&payload)?, EVENT_SOURCE);
        self.constraints.remove(key);
        Ok(true)
    }

    /// Obsolete every currently active key, sequentially.
    ///
    /// Returns how many constraints were removed.
    pub fn clear(&mut self) -> Result<usize, ConstraintError> {
        let keys: Vec<String> = self.constraints.keys().cloned().collect();
        let mut removed = 0;
        for key in keys {
            if self.obsolete(&key, "cleared")? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Recompute the entire projection from event replay, then prune.
    ///
    /// Idempotent: replaying the same log twice yields the same
    /// projection, and incremental state always matches a full rebuild.
    pub fn rebuild(&mut self) {
        self.rebuild_at(Utc::now());
    }

    fn rebuild_at(&mut self, now: DateTime<Utc>) {
        let mut projected = self
            .log
            .lock()
            .replay(HashMap::new(), reduce_constraints);
        prune(&mut projected, now);
        self.constraints = projected;
    }

    /// All active records, in no particular order.
    pub fn get_all(&self) -> Vec<ConstraintRecord> {
        self.constraints.values().cloned().collect()
    }

    /// Active records of one hardness class.
    pub fn get_by_type(&self, constraint_type: ConstraintType) -> Vec<ConstraintRecord> {
        self.constraints
            .values()
            .filter(|r| r.constraint_type == constraint_type)
            .cloned()
            .collect()
    }

    /// Point lookup against the current projection.
    pub fn get(&self, key: &str) -> Option<ConstraintRecord> {
        self.constraints.get(key).cloned()
    }

    /// Whether the key is active in the current projection.
    pub fn has(&self, key: &str) -> bool {
        self.constraints.contains_key(key)
    }

    /// Number of active constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether no constraints are active.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Render active constraints as human-readable lines for injection
    /// into a consumer's textual context.
    ///
    /// One line per constraint, prefixed `[HARD]` or `[SOFT]`; soft
    /// constraints carry their strength when below full. Empty string when
    /// nothing is active.
    pub fn canonical_state_string(&self) -> String {
        let lines: Vec<String> = self
            .get_all()
            .iter()
            .map(|r| match r.constraint_type {
                ConstraintType::Hard => format!("[HARD] {}", r.value),
                ConstraintType::Soft if r.strength < 1.0 => {
                    format!("[SOFT] {} (strength: {})", r.value, r.strength)
                }
                ConstraintType::Soft => format!("[SOFT] {}", r.value),
            })
            .collect();
        lines.join("\n")
    }
}

/// Reducer folding constraint events into the keyed projection.
///
/// `CONSTRAINT_ADDED` sets or overwrites by key; `CONSTRAINT_UPDATED`
/// merges into an existing record (no-op on absent keys);
/// `CONSTRAINT_OBSOLETED` and `CONSTRAINT_CONTRADICTED` both delete.
/// Undecodable payloads are skipped.
fn reduce_constraints(
    mut state: HashMap<String, ConstraintRecord>,
    event: &Event,
) -> HashMap<String, ConstraintRecord> {
    match event.event_type {
        EventType::ConstraintAdded => {
            if let Ok(p) =
                serde_json::from_value::<ConstraintAddedPayload>(event.payload.clone())
            {
                state.insert(
                    p.key.clone(),
                    ConstraintRecord {
                        key: p.key,
                        value: p.value,
                        strength: p.strength,
                        constraint_type: p.constraint_type,
                        source_event_id: event.event_id.clone(),
                        ttl: p.ttl,
                        created_at: event.timestamp,
                    },
                );
            }
        }
        EventType::ConstraintUpdated => {
            if let Ok(p) =
                serde_json::from_value::<ConstraintUpdatedPayload>(event.payload.clone())
            {
                if let Some(record) = state.get_mut(&p.key) {
                    if let Some(value) = p.value {
                        record.value = value;
                    }
                    if let Some(strength) = p.strength {
                        record.strength = strength;
                    }
                    if let Some(constraint_type) = p.constraint_type {
                        record.constraint_type = constraint_type;
                    }
                    if let Some(ttl) = p.ttl {
                        record.ttl = Some(ttl);
                    }
                    record.source_event_id = event.event_id.clone();
                }
            }
        }
        EventType::ConstraintObsoleted | EventType::ConstraintContradicted => {
            if let Ok(p) =
                serde_json::from_value::<ConstraintRemovedPayload>(event.payload.clone())
            {
                state.remove(&p.key);
            }
        }
        EventType::MoodRecorded => {}
    }
    state
}

/// Ambient, time-evaluated removal of expired or weak constraints.
///
/// Expiry applies to any record with a ttl; the strength threshold applies
/// to soft records only. Hard records are otherwise immune.
fn prune(state: &mut HashMap<String, ConstraintRecord>, now: DateTime<Utc>) {
    state.retain(|_, record| {
        if let Some(ttl) = record.ttl {
            let expires_at = record.created_at + Duration::milliseconds((ttl as i64) * 1000);
            if now > expires_at {
                return false;
            }
        }
        !(record.constraint_type == ConstraintType::Soft
            && record.strength < STRENGTH_THRESHOLD)
    });
}
