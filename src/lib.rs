//! # Warden
//!
//! Event-sourced behavioral state store for AI agent supervision.
//!
//! Warden keeps two pieces of derived state for a supervised agent: a set
//! of behavioral **constraints** (rules and preferences, hard or soft)
//! and a **mood** signal with a temporally-decayed distress score. Both
//! are projections over a single append-only [`events::EventLog`], which
//! is the only durable artifact; everything else can be reconstructed by
//! replaying it.
//!
//! Construct one log, share it, and hand it to the two façades:
//!
//! ```no_run
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use warden::constraints::{ConstraintOptions, ConstraintStore};
//! use warden::events::EventLog;
//! use warden::mood::MoodTracker;
//!
//! let log = Arc::new(Mutex::new(EventLog::open_default()));
//! let mut constraints = ConstraintStore::new(Arc::clone(&log));
//! let moods = MoodTracker::new(log);
//!
//! constraints
//!     .add("no_profanity", "Never use profanity", ConstraintOptions::hard())
//!     .unwrap();
//! moods.record_mood("Frustrated", 7.0, "slow replies").unwrap();
//! println!("{}", constraints.canonical_state_string());
//! println!("{}", moods.mood_context_string());
//! ```

pub mod constraints;
pub mod events;
pub mod mood;
pub mod utilities;

pub use constraints::{
    ConstraintOptions, ConstraintRecord, ConstraintStore, ConstraintType, ConstraintUpdate,
};
pub use events::{Event, EventLog, EventType};
pub use mood::{DistressLevel, MoodObservation, MoodTracker};
pub use utilities::errors::{ConstraintError, MoodError, StorageError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
