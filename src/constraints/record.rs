//! Projected constraint records and operation argument types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hardness class of a constraint.
///
/// Hard constraints persist until explicitly removed; soft constraints are
/// additionally subject to strength-based pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintType {
    Hard,
    Soft,
}

/// An active constraint, projected from the event log.
///
/// Never stored directly; the projection is rebuilt wholesale from replay
/// and a record exists only while the log says it should.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintRecord {
    /// Unique key identifying the constraint.
    pub key: String,
    /// Rule content.
    pub value: String,
    /// Strength in `[0, 1]`.
    pub strength: f64,
    /// Hardness class.
    #[serde(rename = "type")]
    pub constraint_type: ConstraintType,
    /// Id of the event that last set this record.
    pub source_event_id: String,
    /// Optional expiry in seconds from `created_at`. `None` = no expiry.
    pub ttl: Option<u64>,
    /// Timestamp of the event that created (or re-added) the record.
    pub created_at: DateTime<Utc>,
}

/// Options accepted by [`ConstraintStore::add`](super::ConstraintStore::add).
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintOptions {
    /// Hardness class. Defaults to [`ConstraintType::Soft`].
    pub constraint_type: ConstraintType,
    /// Strength in `[0, 1]`. Defaults to `1.0`.
    pub strength: f64,
    /// Optional expiry in seconds.
    pub ttl: Option<u64>,
}

impl Default for ConstraintOptions {
    fn default() -> Self {
        Self {
            constraint_type: ConstraintType::Soft,
            strength: 1.0,
            ttl: None,
        }
    }
}

impl ConstraintOptions {
    /// A hard constraint at full strength.
    pub fn hard() -> Self {
        Self {
            constraint_type: ConstraintType::Hard,
            ..Self::default()
        }
    }

    /// A soft constraint with the given strength.
    pub fn soft(strength: f64) -> Self {
        Self {
            strength,
            ..Self::default()
        }
    }

    /// Sets an expiry in seconds.
    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl = Some(ttl_seconds);
        self
    }
}

/// Field subset accepted by
/// [`ConstraintStore::update`](super::ConstraintStore::update).
///
/// `None` fields retain their prior values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintUpdate {
    pub value: Option<String>,
    pub strength: Option<f64>,
    pub constraint_type: Option<ConstraintType>,
    pub ttl: Option<u64>,
}
