//! End-of-run notification banner

use crate::console::Console;
use crate::summary::PipelineSummary;
use std::path::Path;
use tracing::{info, warn};

/// How a pipeline run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    Success,
    Failed,
}

impl PipelineOutcome {
    /// Failed as soon as any stage failed
    pub fn from_summary(summary: &PipelineSummary) -> Self {
        if summary.is_success() {
            PipelineOutcome::Success
        } else {
            PipelineOutcome::Failed
        }
    }
}

/// Print the completion banner for a pipeline, with the report path if there is one
pub fn notify_completion(
    console: &Console,
    pipeline_name: &str,
    outcome: PipelineOutcome,
    report_path: Option<&Path>,
) {
    console.line("");
    console.separator();
    match outcome {
        PipelineOutcome::Success => {
            info!(pipeline = %pipeline_name, "pipeline_succeeded");
            console.line(format!(
                "✅ Pipeline '{pipeline_name}' completed successfully!"
            ));
        }
        PipelineOutcome::Failed => {
            warn!(pipeline = %pipeline_name, "pipeline_failed");
            console.line(format!(
                "❌ Pipeline '{pipeline_name}' finished with errors!"
            ));
        }
    }
    if let Some(path) = report_path {
        console.line(format!("📊 Report: {}", path.display()));
    }
    console.separator();
}
