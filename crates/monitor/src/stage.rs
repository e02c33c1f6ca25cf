//! Per-stage status records

use chrono::{DateTime, Utc};
use pipewatch_core::{REASON_METRIC_KEY, UNKNOWN_REASON};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque caller-supplied payload attached to a stage record
pub type Metrics = serde_json::Map<String, Value>;

/// State of a pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageState {
    /// Stage is known but has not started
    Pending,
    /// Stage is currently running
    Running,
    /// Stage completed successfully
    Completed,
    /// Stage failed
    Failed,
    /// Stage was not executed because its outputs were up to date
    Skipped,
}

impl StageState {
    /// Lowercase name, as serialized
    pub fn as_str(self) -> &'static str {
        match self {
            StageState::Pending => "pending",
            StageState::Running => "running",
            StageState::Completed => "completed",
            StageState::Failed => "failed",
            StageState::Skipped => "skipped",
        }
    }

    /// Icon used in console lines
    pub fn icon(self) -> &'static str {
        match self {
            StageState::Completed => "✅",
            StageState::Failed => "❌",
            StageState::Running => "🔄",
            StageState::Pending => "⏳",
            StageState::Skipped => "⏭️",
        }
    }

    /// Completed or skipped; both count towards the success rate
    pub fn is_successful(self) -> bool {
        matches!(self, StageState::Completed | StageState::Skipped)
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status record of a single named stage
///
/// Every field is serialized; absent values become `null` in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageStatus {
    /// Unique name of the stage within one run
    pub stage_name: String,
    /// Current state
    pub status: StageState,
    /// Set when the stage starts running
    pub start_time: Option<DateTime<Utc>>,
    /// Set when the stage reaches completed or failed
    pub end_time: Option<DateTime<Utc>>,
    /// Seconds between start and end; `0.0` for skipped, `None` when unknown
    pub duration: Option<f64>,
    /// Error message, only for failed stages
    pub error: Option<String>,
    /// Payload supplied by the caller on completion or skip
    pub metrics: Option<Metrics>,
}

impl StageStatus {
    /// A record that starts running at `now`
    pub fn running(stage_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            stage_name: stage_name.into(),
            status: StageState::Running,
            start_time: Some(now),
            end_time: None,
            duration: None,
            error: None,
            metrics: None,
        }
    }

    /// A skipped record: no timestamps and a zero duration
    pub fn skipped(stage_name: impl Into<String>, metrics: Option<Metrics>) -> Self {
        Self {
            stage_name: stage_name.into(),
            status: StageState::Skipped,
            start_time: None,
            end_time: None,
            duration: Some(0.0),
            error: None,
            metrics,
        }
    }

    /// A completed record whose timing could not be recovered
    pub fn completed_unknown_time(stage_name: impl Into<String>, metrics: Option<Metrics>) -> Self {
        Self {
            stage_name: stage_name.into(),
            status: StageState::Completed,
            start_time: None,
            end_time: None,
            duration: None,
            error: None,
            metrics,
        }
    }

    /// Move to a terminal state at `now`, deriving the duration from `start_time`
    ///
    /// Without a start time the duration is unknown rather than stale.
    pub(crate) fn finish(&mut self, state: StageState, now: DateTime<Utc>) {
        self.status = state;
        self.end_time = Some(now);
        self.duration = self.start_time.map(|start| seconds_between(start, now));
    }

    /// Reason carried in `metrics["reason"]`, or `"unknown"`
    pub fn reason(&self) -> String {
        reason_from(self.metrics.as_ref())
    }

    /// `cached` for skipped, `unknown` without a duration, else seconds to 2 decimals
    pub fn duration_display(&self) -> String {
        if self.status == StageState::Skipped {
            return "cached".to_string();
        }
        crate::console::format_duration(self.duration)
    }
}

/// Display reason from a metrics payload; never affects the stored record
pub fn reason_from(metrics: Option<&Metrics>) -> String {
    match metrics.and_then(|m| m.get(REASON_METRIC_KEY)) {
        Some(Value::String(reason)) => reason.clone(),
        Some(Value::Null) | None => UNKNOWN_REASON.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Elapsed seconds between two instants, clamped at zero
pub fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start)
        .to_std()
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn metrics(value: Value) -> Metrics {
        match value {
            Value::Object(map) => map,
            _ => panic!("metrics must be an object"),
        }
    }

    #[test]
    fn test_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&StageState::Skipped).unwrap(),
            "\"skipped\""
        );
        let state: StageState = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(state, StageState::Failed);
        assert!(serde_json::from_str::<StageState>("\"cancelled\"").is_err());
    }

    #[test]
    fn test_finish_computes_duration() {
        let start = Utc::now();
        let mut stage = StageStatus::running("train_model", start);
        stage.finish(StageState::Completed, start + Duration::milliseconds(1500));

        assert_eq!(stage.status, StageState::Completed);
        assert_eq!(stage.duration, Some(1.5));
        assert_eq!(stage.duration_display(), "1.50s");
    }

    #[test]
    fn test_finish_clamps_backwards_clock() {
        let start = Utc::now();
        let mut stage = StageStatus::running("train_model", start);
        stage.finish(StageState::Failed, start - Duration::seconds(3));
        assert_eq!(stage.duration, Some(0.0));
    }

    #[test]
    fn test_finish_without_start_leaves_duration_unknown() {
        let mut stage = StageStatus::skipped("evaluate_model", None);
        stage.finish(StageState::Completed, Utc::now());
        assert_eq!(stage.duration, None);
        assert_eq!(stage.duration_display(), "unknown");
    }

    #[test]
    fn test_reason_lookup() {
        assert_eq!(reason_from(None), "unknown");
        assert_eq!(reason_from(Some(&metrics(json!({"rows": 3})))), "unknown");
        assert_eq!(
            reason_from(Some(&metrics(json!({"reason": "cached"})))),
            "cached"
        );
        assert_eq!(reason_from(Some(&metrics(json!({"reason": 42})))), "42");
    }

    #[test]
    fn test_skipped_display_is_cached() {
        let stage =
            StageStatus::skipped("prepare_data", Some(metrics(json!({"reason": "cached"}))));
        assert_eq!(stage.duration, Some(0.0));
        assert_eq!(stage.duration_display(), "cached");
        assert_eq!(stage.reason(), "cached");
    }

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let stage = StageStatus::completed_unknown_time("validate_data", None);
        let value = serde_json::to_value(&stage).unwrap();
        assert_eq!(
            value,
            json!({
                "stage_name": "validate_data",
                "status": "completed",
                "start_time": null,
                "end_time": null,
                "duration": null,
                "error": null,
                "metrics": null
            })
        );
    }
}
