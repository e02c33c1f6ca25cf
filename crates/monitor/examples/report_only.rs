//! Build a monitoring report for a pipeline that already ran.
//!
//! Pipe the dry-run output of the pipeline tool into this example from the
//! project root:
//!
//! ```sh
//! dvc repro --dry 2>&1 | cargo run -p pipewatch-monitor --example report_only
//! ```

use pipewatch_core::MonitorConfig;
use pipewatch_monitor::{
    default_stage_outputs, notify_completion, reconcile_stages, PipelineMonitor, PipelineOutcome,
};
use std::io::Read;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    pipewatch_utils::tracing::init()?;

    let config = MonitorConfig::from_env()?;
    let span = pipewatch_utils::tracing::pipeline_span(&config.pipeline_name);
    let _guard = span.enter();

    let mut dry_run = String::new();
    std::io::stdin().read_to_string(&mut dry_run)?;

    let mut monitor = PipelineMonitor::from_config(&config)?;
    reconcile_stages(
        &mut monitor,
        &dry_run,
        &default_stage_outputs(),
        Path::new("."),
    );

    let report_path = monitor.save_default_report()?;
    monitor.print_summary();
    let latest = monitor.publish_latest(&report_path)?;

    notify_completion(
        monitor.console(),
        monitor.pipeline_name(),
        PipelineOutcome::from_summary(&monitor.summary()),
        Some(&latest),
    );
    Ok(())
}
