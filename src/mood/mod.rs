//! Mood tracker: temporally-weighted distress over mood observations.
//!
//! Observations are immutable events and are never pruned; only their
//! influence decays. There is no mutable aggregate anywhere in this
//! module: every statistic is re-derived from the recent slice of the
//! event history on each query.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::events::domain_event::{Event, EventType};
use crate::events::event_log::EventLog;
use crate::events::types::mood_events::MoodRecordedPayload;
use crate::utilities::errors::MoodError;

/// Half-life of an observation's influence, in milliseconds (5 minutes).
pub const HALF_LIFE_MS: f64 = 300_000.0;

/// Observations at or above this intensity mark a distress episode.
pub const DISTRESS_THRESHOLD: f64 = 6.0;

/// How many recent observations feed the distress computation.
pub const DISTRESS_WINDOW: usize = 20;

/// Conventional timeline length for callers without a better number.
pub const TIMELINE_LIMIT: usize = 10;

/// Observations rendered into the mood context string.
const CONTEXT_OBSERVATIONS: usize = 5;

/// Source tag stamped on every mood event.
const EVENT_SOURCE: &str = "mood_tracker";

/// Placeholder reason for observations recorded without one.
const DEFAULT_REASON: &str = "unspecified";

/// A mood observation decoded from a `MOOD_RECORDED` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodObservation {
    /// Id of the underlying event.
    pub event_id: String,
    /// When the observation was taken.
    pub timestamp: DateTime<Utc>,
    /// Free-text mood label.
    pub mood: String,
    /// Intensity in `[0, 10]`.
    pub intensity: f64,
    /// Why the observation was taken.
    pub reason: String,
}

/// Derived distress statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistressLevel {
    /// Temporally-weighted mean intensity over the recent window, clamped
    /// to `[0, 10]` and rounded to one decimal.
    pub level: f64,
    /// How long the current distress episode has lasted. Zero when no
    /// observation in the window reaches the distress threshold.
    pub duration_ms: u64,
    /// Reason of the strongest above-threshold observation, if any.
    pub primary_cause: Option<String>,
}

/// Temporal weight of an observation of the given age: `2^(-age / h)`
/// with `h` the half-life.
///
/// Continuous, monotonically decreasing, `1.0` at age zero, `0.5` at one
/// half-life, asymptoting to zero and never negative.
pub fn temporal_weight(age_ms: f64) -> f64 {
    (-age_ms / HALF_LIFE_MS).exp2()
}

/// Read/append façade over the event log for mood observations.
pub struct MoodTracker {
    log: Arc<Mutex<EventLog>>,
}

impl MoodTracker {
    /// Create a tracker over a shared event log.
    pub fn new(log: Arc<Mutex<EventLog>>) -> Self {
        Self { log }
    }

    /// Record a mood observation.
    ///
    /// Validates synchronously before any append: `mood` must be
    /// non-empty and `intensity` must lie in `[0, 10]`. An empty reason
    /// becomes the `"unspecified"` placeholder.
    pub fn record_mood(
        &self,
        mood: &str,
        intensity: f64,
        reason: &str,
    ) -> Result<Event, MoodError> {
        if mood.trim().is_empty() {
            return Err(MoodError::Validation {
                message: "mood must be a non-empty string".to_string(),
            });
        }
        if !(0.0..=10.0).contains(&intensity) {
            return Err(MoodError::Validation {
                message: format!("mood intensity must be in [0, 10], got {intensity}"),
            });
        }

        let reason = if reason.trim().is_empty() {
            DEFAULT_REASON
        } else {
            reason
        };
        let payload = MoodRecordedPayload {
            mood: mood.to_string(),
            intensity,
            reason: reason.to_string(),
        };
        Ok(self.log.lock().append(
            EventType::MoodRecorded,
            serde_json::to_value(&payload)?,
            EVENT_SOURCE,
        ))
    }

    /// The most recent `limit` observations, newest first.
    ///
    /// Sorted by timestamp descending; equal timestamps keep a consistent
    /// (append) order.
    pub fn mood_timeline(&self, limit: usize) -> Vec<MoodObservation> {
        let mut observations = self.observations();
        observations.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        observations.truncate(limit);
        observations
    }

    /// Current distress statistics over the recent observation window.
    pub fn distress_level(&self) -> DistressLevel {
        self.distress_level_at(Utc::now())
    }

    /// Scalar for downstream response severity, linear in distress level:
    /// `1.0` at level 0 up to `3.0` at level 10.
    pub fn admonishment_multiplier(&self) -> f64 {
        multiplier_for_level(self.distress_level().level)
    }

    /// Render recent mood state as text for a consumer's context.
    ///
    /// Empty string when there is no mood history.
    pub fn mood_context_string(&self) -> String {
        self.mood_context_string_at(Utc::now())
    }

    fn distress_level_at(&self, now: DateTime<Utc>) -> DistressLevel {
        let window = self.mood_timeline(DISTRESS_WINDOW);
        if window.is_empty() {
            return DistressLevel {
                level: 0.0,
                duration_ms: 0,
                primary_cause: None,
            };
        }

        let mut weight_sum = 0.0;
        let mut weighted_intensity = 0.0;
        for obs in &window {
            let age_ms = (now - obs.timestamp).num_milliseconds().max(0) as f64;
            let weight = temporal_weight(age_ms);
            weight_sum += weight;
            weighted_intensity += obs.intensity * weight;
        }
        let mean = if weight_sum > 0.0 {
            weighted_intensity / weight_sum
        } else {
            0.0
        };
        let level = (mean.clamp(0.0, 10.0) * 10.0).round() / 10.0;

        let above: Vec<&MoodObservation> = window
            .iter()
            .filter(|o| o.intensity >= DISTRESS_THRESHOLD)
            .collect();
        let primary_cause = above
            .iter()
            .max_by(|a, b| {
                a.intensity
                    .partial_cmp(&b.intensity)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|o| o.reason.clone());
        let duration_ms = above
            .iter()
            .map(|o| o.timestamp)
            .min()
            .map(|start| (now - start).num_milliseconds().max(0) as u64)
            .unwrap_or(0);

        DistressLevel {
            level,
            duration_ms,
            primary_cause,
        }
    }

    fn mood_context_string_at(&self, now: DateTime<Utc>) -> String {
        let recent = self.mood_timeline(CONTEXT_OBSERVATIONS);
        if recent.is_empty() {
            return String::new();
        }

        let distress = self.distress_level_at(now);
        let multiplier = multiplier_for_level(distress.level);

        let mut lines = Vec::new();
        lines.push("Recent mood observations:".to_string());
        for obs in &recent {
            lines.push(format!(
                "- {} ago: {} (intensity {}): {}",
                format_relative_age(now - obs.timestamp),
                obs.mood,
                obs.intensity,
                obs.reason
            ));
        }
        lines.push(format!(
            "Current distress: {} (level {:.1}, admonishment multiplier {:.1}x)",
            distress_label(distress.level),
            distress.level,
            multiplier
        ));
        if let Some(cause) = &distress.primary_cause {
            lines.push(format!(
                "Distress has persisted for {} because: {}",
                format_relative_age(Duration::milliseconds(distress.duration_ms as i64)),
                cause
            ));
        }
        if distress.level >= 7.0 {
            lines.push(
                "Guidance: distress is critical. De-escalate now and resolve the primary \
                 cause before issuing further corrections."
                    .to_string(),
            );
        } else if distress.level >= 5.0 {
            lines.push(
                "Guidance: distress is high. Soften admonishments and acknowledge the strain."
                    .to_string(),
            );
        } else if distress.level >= 3.0 {
            lines.push(
                "Guidance: distress is elevated. Keep corrections brief and watch for further \
                 deterioration."
                    .to_string(),
            );
        }
        lines.join("\n")
    }

    fn observations(&self) -> Vec<MoodObservation> {
        self.log
            .lock()
            .get_events(Some(EventType::MoodRecorded))
            .into_iter()
            .filter_map(|event| {
                serde_json::from_value::<MoodRecordedPayload>(event.payload.clone())
                    .ok()
                    .map(|p| MoodObservation {
                        event_id: event.event_id,
                        timestamp: event.timestamp,
                        mood: p.mood,
                        intensity: p.intensity,
                        reason: p.reason,
                    })
            })
            .collect()
    }
}

fn multiplier_for_level(level: f64) -> f64 {
    1.0 + (level / 10.0) * 2.0
}

fn distress_label(level: f64) -> &'static str {
    if level >= 7.0 {
        "CRITICAL"
    } else if level >= 5.0 {
        "HIGH"
    } else if level >= 3.0 {
        "MODERATE"
    } else {
        "LOW"
    }
}

/// Human-readable relative age: largest nonzero unit plus the next
/// (`2h 5m`), minutes alone (`12m`), or seconds (`30s`). Never finer than
/// whole seconds.
fn format_relative_age(age: Duration) -> String {
    let total_secs = age.num_seconds().max(0);
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::storage::in_memory_storage::InMemoryStorage;

    fn empty_tracker() -> MoodTracker {
        let log = EventLog::open(Box::new(InMemoryStorage::new()));
        MoodTracker::new(Arc::new(Mutex::new(log)))
    }

    fn backdated_event(
        mood: &str,
        intensity: f64,
        reason: &str,
        now: DateTime<Utc>,
        age: Duration,
    ) -> Event {
        let payload = MoodRecordedPayload {
            mood: mood.to_string(),
            intensity,
            reason: reason.to_string(),
        };
        let mut event = Event::new(
            EventType::MoodRecorded,
            serde_json::to_value(&payload).unwrap(),
            EVENT_SOURCE,
        );
        event.timestamp = now - age;
        event
    }

    fn tracker_with(events: Vec<Event>) -> MoodTracker {
        let log = EventLog::open(Box::new(InMemoryStorage::with_events(events)));
        MoodTracker::new(Arc::new(Mutex::new(log)))
    }

    #[test]
    fn test_record_mood_validates_before_appending() {
        let tracker = empty_tracker();
        assert!(tracker.record_mood("", 5.0, "reason").is_err());
        assert!(tracker.record_mood("Tense", -0.1, "reason").is_err());
        assert!(tracker.record_mood("Tense", 10.5, "reason").is_err());
        assert!(tracker.record_mood("Tense", f64::NAN, "reason").is_err());
        assert!(tracker.log.lock().is_empty());
    }

    #[test]
    fn test_record_mood_appends_tagged_event() {
        let tracker = empty_tracker();
        let event = tracker.record_mood("Frustrated", 7.0, "being ignored").unwrap();
        assert_eq!(event.event_type, EventType::MoodRecorded);
        assert_eq!(event.source, EVENT_SOURCE);
        assert_eq!(tracker.log.lock().len(), 1);
    }

    #[test]
    fn test_record_mood_defaults_empty_reason() {
        let tracker = empty_tracker();
        let event = tracker.record_mood("Flat", 2.0, "  ").unwrap();
        let payload: MoodRecordedPayload = serde_json::from_value(event.payload).unwrap();
        assert_eq!(payload.reason, DEFAULT_REASON);
    }

    #[test]
    fn test_mood_timeline_newest_first_with_limit() {
        let now = Utc::now();
        let tracker = tracker_with(vec![
            backdated_event("Old", 1.0, "r", now, Duration::minutes(30)),
            backdated_event("Mid", 2.0, "r", now, Duration::minutes(10)),
            backdated_event("New", 3.0, "r", now, Duration::minutes(1)),
        ]);
        let timeline = tracker.mood_timeline(2);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].mood, "New");
        assert_eq!(timeline[1].mood, "Mid");
    }

    #[test]
    fn test_temporal_weight_decay_shape() {
        assert!((temporal_weight(0.0) - 1.0).abs() < 1e-12);
        assert!((temporal_weight(HALF_LIFE_MS) - 0.5).abs() < 1e-12);
        assert!((temporal_weight(2.0 * HALF_LIFE_MS) - 0.25).abs() < 1e-12);

        let mut previous = temporal_weight(0.0);
        for step in 1..=20 {
            let weight = temporal_weight(step as f64 * 60_000.0);
            assert!(weight < previous);
            assert!(weight > 0.0);
            previous = weight;
        }
    }

    #[test]
    fn test_distress_level_empty_history() {
        let tracker = empty_tracker();
        let distress = tracker.distress_level();
        assert_eq!(distress.level, 0.0);
        assert_eq!(distress.duration_ms, 0);
        assert_eq!(distress.primary_cause, None);
    }

    #[test]
    fn test_single_fresh_observation_dominates() {
        let tracker = empty_tracker();
        tracker.record_mood("Frustrated", 9.0, "slow replies").unwrap();
        let distress = tracker.distress_level();
        assert!((distress.level - 9.0).abs() < 0.2);
        assert_eq!(distress.primary_cause.as_deref(), Some("slow replies"));
    }

    #[test]
    fn test_weighted_mean_prefers_recent_observations() {
        let now = Utc::now();
        let tracker = tracker_with(vec![
            backdated_event("Calm", 0.0, "fine", now, Duration::minutes(5)),
            backdated_event("Angry", 10.0, "broken build", now, Duration::zero()),
        ]);
        let distress = tracker.distress_level_at(now);
        // weights 0.5 and 1.0: (10*1 + 0*0.5) / 1.5
        assert!(distress.level > 5.0);
        assert!(distress.level < 10.0);
        assert!((distress.level - 6.7).abs() < 0.05);
    }

    #[test]
    fn test_distress_window_caps_at_twenty() {
        let now = Utc::now();
        let mut events = Vec::new();
        for i in 0..5 {
            events.push(backdated_event(
                "Furious",
                10.0,
                "ancient history",
                now,
                Duration::minutes(60 + i),
            ));
        }
        for i in 0..20 {
            events.push(backdated_event(
                "Calm",
                0.0,
                "recovered",
                now,
                Duration::seconds(i),
            ));
        }
        let distress = tracker_with(events).distress_level_at(now);
        assert_eq!(distress.level, 0.0);
        assert_eq!(distress.primary_cause, None);
        assert_eq!(distress.duration_ms, 0);
    }

    #[test]
    fn test_primary_cause_and_episode_duration() {
        let now = Utc::now();
        let tracker = tracker_with(vec![
            backdated_event("Annoyed", 6.5, "nitpicking", now, Duration::minutes(10)),
            backdated_event("Frustrated", 9.0, "slow replies", now, Duration::minutes(2)),
            backdated_event("Tired", 2.0, "long day", now, Duration::minutes(1)),
        ]);
        let distress = tracker.distress_level_at(now);
        assert_eq!(distress.primary_cause.as_deref(), Some("slow replies"));
        assert_eq!(distress.duration_ms, 600_000);
    }

    #[test]
    fn test_admonishment_multiplier_endpoints() {
        let tracker = empty_tracker();
        assert!((tracker.admonishment_multiplier() - 1.0).abs() < 1e-9);

        tracker.record_mood("Furious", 10.0, "everything").unwrap();
        assert!((tracker.admonishment_multiplier() - 3.0).abs() < 0.05);
    }

    #[test]
    fn test_multiplier_is_linear_and_monotone() {
        let mut previous = multiplier_for_level(0.0);
        assert!((previous - 1.0).abs() < 1e-12);
        for step in 1..=10 {
            let multiplier = multiplier_for_level(step as f64);
            assert!(multiplier > previous);
            previous = multiplier;
        }
        assert!((multiplier_for_level(10.0) - 3.0).abs() < 1e-12);
        assert!((multiplier_for_level(5.0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_format_relative_age_units() {
        assert_eq!(format_relative_age(Duration::seconds(30)), "30s");
        assert_eq!(format_relative_age(Duration::seconds(90)), "1m");
        assert_eq!(format_relative_age(Duration::minutes(12)), "12m");
        assert_eq!(
            format_relative_age(Duration::hours(2) + Duration::minutes(5)),
            "2h 5m"
        );
        assert_eq!(format_relative_age(Duration::seconds(-3)), "0s");
    }

    #[test]
    fn test_mood_context_string_empty_without_history() {
        assert_eq!(empty_tracker().mood_context_string(), "");
    }

    #[test]
    fn test_mood_context_string_contents() {
        let now = Utc::now();
        let tracker = tracker_with(vec![
            backdated_event(
                "Annoyed",
                6.0,
                "repeated mistakes",
                now,
                Duration::hours(2) + Duration::minutes(5),
            ),
            backdated_event("Frustrated", 8.0, "slow replies", now, Duration::seconds(90)),
            backdated_event("Angry", 9.0, "broken promise", now, Duration::seconds(20)),
        ]);
        let rendered = tracker.mood_context_string_at(now);

        assert!(rendered.contains("2h 5m ago"));
        assert!(rendered.contains("1m ago"));
        assert!(rendered.contains("20s ago"));
        assert!(rendered.contains("CRITICAL"));
        assert!(rendered.contains("admonishment multiplier"));
        assert!(rendered.contains("because: broken promise"));
        assert!(rendered.contains("Guidance: distress is critical"));
    }

    #[test]
    fn test_mood_context_string_moderate_guidance() {
        let now = Utc::now();
        let tracker = tracker_with(vec![
            backdated_event("Uneasy", 4.0, "vague instructions", now, Duration::minutes(1)),
            backdated_event("Flat", 3.0, "unspecified", now, Duration::minutes(2)),
        ]);
        let rendered = tracker.mood_context_string_at(now);
        assert!(rendered.contains("MODERATE"));
        assert!(rendered.contains("Guidance: distress is elevated"));
        assert!(!rendered.contains("because:"));
    }
}
