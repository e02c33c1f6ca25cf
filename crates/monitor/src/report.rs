//! Persisted pipeline report document

use crate::stage::StageStatus;
use crate::summary::PipelineSummary;
use chrono::{DateTime, Utc};
use pipewatch_core::{Error, Result, ResultExt};
use pipewatch_utils::write_atomic_string;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Report written at the end of a run
///
/// ```json
/// {
///   "pipeline_name": "ml_pipeline",
///   "timestamp": "2024-03-09T07:05:01.123456Z",
///   "stages": [ ... ],
///   "summary": { "total_stages": 3, ... }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub pipeline_name: String,
    pub timestamp: DateTime<Utc>,
    /// Stage records in registry order
    pub stages: Vec<StageStatus>,
    pub summary: PipelineSummary,
}

impl PipelineReport {
    /// Build a report, computing the summary from `stages`
    pub fn new(
        pipeline_name: impl Into<String>,
        timestamp: DateTime<Utc>,
        stages: Vec<StageStatus>,
    ) -> Self {
        let summary = PipelineSummary::from_stages(&stages);
        Self {
            pipeline_name: pipeline_name.into(),
            timestamp,
            stages,
            summary,
        }
    }

    /// Pretty-printed JSON document
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize pipeline report")
    }

    /// Serialize fully in memory, then write atomically
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json_pretty()?;
        write_atomic_string(path, &json)
    }

    /// Read a report back from disk
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| Error::file_system(path, "read report", e))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parse pipeline report '{}'", path.display()))
    }

    /// Summary computed afresh from the stage list
    pub fn recompute_summary(&self) -> PipelineSummary {
        PipelineSummary::from_stages(&self.stages)
    }

    /// Check that the stored summary agrees with the stage list
    pub fn verify_summary(&self, path: &Path) -> Result<()> {
        let fresh = self.recompute_summary();
        if fresh != self.summary {
            return Err(Error::report(
                path,
                format!(
                    "stored summary {:?} does not match stages (expected {:?})",
                    self.summary, fresh
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::StageState;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_stages() -> Vec<StageStatus> {
        let now = Utc::now();
        let mut done = StageStatus::running("prepare_data", now);
        done.finish(StageState::Completed, now);
        vec![done, StageStatus::skipped("evaluate_model", None)]
    }

    #[test]
    fn test_report_document_shape() {
        let report = PipelineReport::new("ml_pipeline", Utc::now(), sample_stages());
        let value = serde_json::to_value(&report).unwrap();

        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["pipeline_name", "timestamp", "stages", "summary"]);
        assert_eq!(value["stages"].as_array().unwrap().len(), 2);
        assert_eq!(value["stages"][1]["status"], json!("skipped"));
        assert_eq!(value["summary"]["total_stages"], json!(2));
        assert_eq!(value["summary"]["skipped"], json!(1));
        assert!(value["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_write_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("monitoring").join("report.json");
        let report = PipelineReport::new("ml_pipeline", Utc::now(), sample_stages());

        report.write_to(&path).unwrap();
        let loaded = PipelineReport::load(&path).unwrap();

        assert_eq!(loaded, report);
        loaded.verify_summary(&path).unwrap();
    }

    #[test]
    fn test_verify_summary_detects_tampering() {
        let mut report = PipelineReport::new("ml_pipeline", Utc::now(), sample_stages());
        report.summary.failed = 5;
        let err = report.verify_summary(Path::new("r.json")).unwrap_err();
        assert!(matches!(err, Error::Report { .. }));
    }

    #[test]
    fn test_load_missing_and_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.json");
        assert!(matches!(
            PipelineReport::load(&missing),
            Err(Error::FileSystem { .. })
        ));

        let malformed = temp_dir.path().join("bad.json");
        fs::write(&malformed, "{\"pipeline_name\": 1}").unwrap();
        let err = PipelineReport::load(&malformed).unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
        assert!(err.to_string().contains("parse pipeline report"));
        assert!(err.to_string().contains("bad.json"));
    }
}
