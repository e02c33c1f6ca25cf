//! Rebuild stage statuses after the fact, without running anything
//!
//! Used for report-only runs: the caller hands over the text printed by the
//! pipeline tool's dry run, and each declared stage is classified from that
//! text together with the presence of its output files.

use crate::monitor::PipelineMonitor;
use crate::stage::Metrics;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Error stored for stages whose outputs are missing
pub const MISSING_OUTPUTS_ERROR: &str = "Output files not found";

/// A stage together with the files it is expected to produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutputs {
    pub name: String,
    /// Paths relative to the project root
    pub outputs: Vec<PathBuf>,
}

impl StageOutputs {
    pub fn new<I, P>(name: impl Into<String>, outputs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            name: name.into(),
            outputs: outputs.into_iter().map(Into::into).collect(),
        }
    }

    /// True when every declared output exists under `root`
    pub fn outputs_present(&self, root: &Path) -> bool {
        self.outputs.iter().all(|p| root.join(p).exists())
    }
}

/// The conventional four-stage training pipeline and its outputs
pub fn default_stage_outputs() -> Vec<StageOutputs> {
    vec![
        StageOutputs::new(
            "prepare_data",
            ["data/processed/train.csv", "data/processed/test.csv"],
        ),
        StageOutputs::new("validate_data", ["reports/metrics/data_validation.json"]),
        StageOutputs::new("train_model", ["models/model.pkl"]),
        StageOutputs::new("evaluate_model", ["reports/metrics/evaluation.json"]),
    ]
}

/// What reconciliation decided for one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Outputs present and the dry run reports no change
    Cached,
    /// Outputs present but the stage would run again; it ran in an earlier process
    ExecutedEarlier,
    /// Outputs missing
    Missing,
}

/// Whether the dry run says the stage is up to date
pub fn stage_unchanged(dry_run_output: &str, stage_name: &str) -> bool {
    dry_run_output.contains(&format!("Stage '{stage_name}' didn't change"))
}

/// Classify one stage
pub fn classify(stage: &StageOutputs, dry_run_output: &str, root: &Path) -> Reconciled {
    if !stage.outputs_present(root) {
        Reconciled::Missing
    } else if stage_unchanged(dry_run_output, &stage.name) {
        Reconciled::Cached
    } else {
        Reconciled::ExecutedEarlier
    }
}

/// Record every declared stage on the monitor and return the decisions in order
pub fn reconcile_stages(
    monitor: &mut PipelineMonitor,
    dry_run_output: &str,
    stages: &[StageOutputs],
    root: &Path,
) -> Vec<(String, Reconciled)> {
    let mut decisions = Vec::with_capacity(stages.len());

    for stage in stages {
        let decision = classify(stage, dry_run_output, root);
        debug!(stage = %stage.name, decision = ?decision, "stage_reconciled");

        match decision {
            Reconciled::Cached => {
                monitor.skip_stage(&stage.name, Some(reason_metrics("skipped", "cached")));
            }
            Reconciled::ExecutedEarlier => {
                monitor.complete_stage_unknown_time(
                    &stage.name,
                    Some(reason_metrics("completed", "executed_earlier")),
                );
            }
            Reconciled::Missing => {
                monitor.start_stage(&stage.name);
                monitor.fail_stage(&stage.name, MISSING_OUTPUTS_ERROR);
            }
        }
        decisions.push((stage.name.clone(), decision));
    }

    decisions
}

fn reason_metrics(status: &str, reason: &str) -> Metrics {
    match json!({ "status": status, "reason": reason }) {
        Value::Object(map) => map,
        _ => Metrics::new(),
    }
}
