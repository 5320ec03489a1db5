//! Constraint store: the canonical set of active behavioral constraints,
//! maintained as a projection of the event log.

pub mod record;
pub mod store;

pub use record::{ConstraintOptions, ConstraintRecord, ConstraintType, ConstraintUpdate};
pub use store::{ConstraintStore, STRENGTH_THRESHOLD};
