//! Payload structs for mood observation events.

use serde::{Deserialize, Serialize};

/// Payload of a `MOOD_RECORDED` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodRecordedPayload {
    /// Free-text mood label, e.g. `"Frustrated"`.
    pub mood: String,
    /// Intensity in `[0, 10]`.
    pub intensity: f64,
    /// Why the observation was taken. Never empty; callers that pass an
    /// empty reason get the `"unspecified"` placeholder.
    pub reason: String,
}
