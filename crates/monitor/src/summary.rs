//! Aggregate counts over the stage registry

use crate::stage::{StageState, StageStatus};
use serde::{Deserialize, Serialize};

/// Summary of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Number of stage records
    pub total_stages: usize,
    /// Stages that completed, with or without known timing
    pub completed: usize,
    /// Stages that failed
    pub failed: usize,
    /// Stages skipped as cached
    pub skipped: usize,
    /// Everything else, including stages still running
    pub pending: usize,
    /// Sum of all known durations in seconds; unknown durations add nothing
    pub total_duration: f64,
    /// `(completed + skipped) / total_stages`, `0.0` for an empty run
    pub success_rate: f64,
}

impl PipelineSummary {
    /// Aggregate a sequence of stage records
    pub fn from_stages<'a, I>(stages: I) -> Self
    where
        I: IntoIterator<Item = &'a StageStatus>,
    {
        let mut summary = PipelineSummary::default();

        for stage in stages {
            summary.total_stages += 1;
            match stage.status {
                StageState::Completed => summary.completed += 1,
                StageState::Failed => summary.failed += 1,
                StageState::Skipped => summary.skipped += 1,
                StageState::Pending | StageState::Running => {}
            }
            if let Some(duration) = stage.duration {
                summary.total_duration += duration;
            }
        }

        summary.pending = summary
            .total_stages
            .saturating_sub(summary.completed + summary.failed + summary.skipped);
        summary.success_rate = if summary.total_stages > 0 {
            (summary.completed + summary.skipped) as f64 / summary.total_stages as f64
        } else {
            0.0
        };

        summary
    }

    /// Success rate as a percentage
    pub fn success_percent(&self) -> f64 {
        self.success_rate * 100.0
    }

    /// True when no stage failed
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_empty_registry() {
        let summary = PipelineSummary::from_stages(std::iter::empty::<&StageStatus>());
        assert_eq!(summary, PipelineSummary::default());
        assert_eq!(summary.success_rate, 0.0);
    }

    #[test]
    fn test_running_stage_counts_as_pending() {
        let stages = vec![
            StageStatus::running("train_model", Utc::now()),
            StageStatus::skipped("prepare_data", None),
        ];
        let summary = PipelineSummary::from_stages(&stages);
        assert_eq!(summary.total_stages, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.success_rate, 0.5);
        assert_eq!(summary.success_percent(), 50.0);
    }

    #[test]
    fn test_unknown_durations_add_nothing() {
        let mut timed = StageStatus::running("prepare_data", Utc::now());
        timed.status = StageState::Completed;
        timed.duration = Some(2.25);
        let stages = vec![
            timed,
            StageStatus::completed_unknown_time("validate_data", None),
        ];
        let summary = PipelineSummary::from_stages(&stages);
        assert_eq!(summary.total_duration, 2.25);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.success_rate, 1.0);
        assert!(summary.is_success());
    }

    #[test]
    fn test_counts_always_add_up() {
        let now = Utc::now();
        let mut failed = StageStatus::running("train_model", now);
        failed.finish(StageState::Failed, now);
        let stages = vec![
            failed,
            StageStatus::running("evaluate_model", now),
            StageStatus::skipped("prepare_data", None),
            StageStatus::completed_unknown_time("validate_data", None),
        ];
        let s = PipelineSummary::from_stages(&stages);
        assert_eq!(
            s.completed + s.failed + s.skipped + s.pending,
            s.total_stages
        );
        assert!((0.0..=1.0).contains(&s.success_rate));
        assert!(!s.is_success());
    }
}
