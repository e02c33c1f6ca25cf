//! Stage registry and status transitions for one pipeline run

use crate::console::{format_duration, format_seconds, Console};
use crate::report::PipelineReport;
use crate::stage::{reason_from, Metrics, StageState, StageStatus};
use crate::summary::PipelineSummary;
use chrono::Utc;
use indexmap::IndexMap;
use pipewatch_core::config::validate_pipeline_name;
use pipewatch_core::{Error, MonitorConfig, Result};
use pipewatch_utils::{ensure_dir_exists, latest_report_path, report_file_path};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Tracks the stages of one sequential pipeline run
///
/// Records are created implicitly by the first transition for a name and
/// overwritten by later ones. A name keeps the position of its first
/// insertion, which is also the order stages appear in reports.
///
/// Transitions never fail. Only construction and report persistence touch
/// the filesystem and can return an error.
#[derive(Debug)]
pub struct PipelineMonitor {
    monitoring_dir: PathBuf,
    pipeline_name: String,
    stages: IndexMap<String, StageStatus>,
    console: Console,
}

impl PipelineMonitor {
    /// Create a monitor writing into `<reports_dir>/monitoring`
    pub fn new(reports_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::from_config(&MonitorConfig::new(reports_dir))
    }

    /// Create a monitor from a resolved configuration
    pub fn from_config(config: &MonitorConfig) -> Result<Self> {
        config.validate()?;
        let monitoring_dir = config.monitoring_dir();
        ensure_dir_exists(&monitoring_dir)?;
        debug!(monitoring_dir = %monitoring_dir.display(), "monitor_created");

        Ok(Self {
            monitoring_dir,
            pipeline_name: config.pipeline_name.clone(),
            stages: IndexMap::new(),
            console: Console::default(),
        })
    }

    /// Replace the console the monitor prints to
    #[must_use]
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn monitoring_dir(&self) -> &Path {
        &self.monitoring_dir
    }

    /// Pipeline name used by [`PipelineMonitor::save_default_report`]
    pub fn pipeline_name(&self) -> &str {
        &self.pipeline_name
    }

    /// Mark a stage as running, replacing any previous record
    pub fn start_stage(&mut self, stage_name: &str) {
        self.stages.insert(
            stage_name.to_string(),
            StageStatus::running(stage_name, Utc::now()),
        );
        self.announce_start(stage_name);
    }

    /// Mark a stage as completed, starting it first if it was never seen
    pub fn complete_stage(&mut self, stage_name: &str, metrics: Option<Metrics>) {
        let stage = self.running_or_started(stage_name);
        stage.finish(StageState::Completed, Utc::now());
        stage.error = None;
        stage.metrics = metrics;
        let duration = stage.duration;

        info!(stage = %stage_name, duration_secs = ?duration, "stage_completed");
        self.console.line(format!(
            "✅ Stage completed: {stage_name} (duration: {})",
            format_duration(duration)
        ));
    }

    /// Mark a stage as failed, starting it first if it was never seen
    ///
    /// The error is stored verbatim; an empty message is allowed.
    pub fn fail_stage(&mut self, stage_name: &str, error: impl Into<String>) {
        let message = error.into();
        let stage = self.running_or_started(stage_name);
        stage.finish(StageState::Failed, Utc::now());
        stage.error = Some(message.clone());
        let duration = stage.duration;

        error!(stage = %stage_name, duration_secs = ?duration, error = %message, "stage_failed");
        self.console.line(format!("❌ Stage failed: {stage_name}"));
        self.console.line(format!("   Error: {message}"));
    }

    /// Record a stage as skipped (cached), replacing any previous record
    pub fn skip_stage(&mut self, stage_name: &str, metrics: Option<Metrics>) {
        let reason = reason_from(metrics.as_ref());
        self.stages.insert(
            stage_name.to_string(),
            StageStatus::skipped(stage_name, metrics),
        );

        info!(stage = %stage_name, reason = %reason, "stage_skipped");
        self.console.line(format!(
            "⏭️  Stage skipped: {stage_name} (reason: {reason})"
        ));
    }

    /// Record a stage that finished in an earlier process with unknown timing
    pub fn complete_stage_unknown_time(&mut self, stage_name: &str, metrics: Option<Metrics>) {
        let reason = reason_from(metrics.as_ref());
        self.stages.insert(
            stage_name.to_string(),
            StageStatus::completed_unknown_time(stage_name, metrics),
        );

        info!(stage = %stage_name, reason = %reason, "stage_completed_earlier");
        self.console.line(format!(
            "✅ Stage completed earlier: {stage_name} (duration: unknown, {reason})"
        ));
    }

    /// Current record for a stage
    pub fn stage(&self, stage_name: &str) -> Option<&StageStatus> {
        self.stages.get(stage_name)
    }

    /// All records in registry order
    pub fn stages(&self) -> impl Iterator<Item = &StageStatus> {
        self.stages.values()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Aggregate the registry
    pub fn summary(&self) -> PipelineSummary {
        PipelineSummary::from_stages(self.stages.values())
    }

    /// Snapshot the registry into a report document stamped with the current time
    pub fn build_report(&self, pipeline_name: &str) -> PipelineReport {
        PipelineReport::new(pipeline_name, Utc::now(), self.stages().cloned().collect())
    }

    /// Write `<monitoring_dir>/<pipeline_name>_<YYYYmmdd_HHMMSS>.json`
    ///
    /// Reports saved within the same second share a path; the later one wins.
    pub fn save_report(&self, pipeline_name: &str) -> Result<PathBuf> {
        validate_pipeline_name(pipeline_name)?;

        let report = self.build_report(pipeline_name);
        let path = report_file_path(&self.monitoring_dir, pipeline_name, &report.timestamp);
        report.write_to(&path)?;

        info!(
            pipeline = %pipeline_name,
            path = %path.display(),
            total_stages = report.summary.total_stages,
            "report_saved"
        );
        self.console
            .line(format!("📊 Report saved: {}", path.display()));
        Ok(path)
    }

    /// [`PipelineMonitor::save_report`] with the configured pipeline name
    pub fn save_default_report(&self) -> Result<PathBuf> {
        self.save_report(&self.pipeline_name)
    }

    /// Copy a saved report to `<monitoring_dir>/pipeline_report.json`
    pub fn publish_latest(&self, report_path: &Path) -> Result<PathBuf> {
        let latest = latest_report_path(&self.monitoring_dir);
        if report_path != latest {
            fs::copy(report_path, &latest)
                .map_err(|e| Error::file_system(report_path, "copy report", e))?;
        }

        debug!(from = %report_path.display(), to = %latest.display(), "report_published");
        self.console.line(format!(
            "✅ Monitoring report published: {}",
            latest.display()
        ));
        Ok(latest)
    }

    /// Print the summary block followed by one line per stage
    pub fn print_summary(&self) {
        let summary = self.summary();
        let console = &self.console;

        console.line("");
        console.separator();
        console.line("📊 Pipeline run summary");
        console.separator();
        console.line(format!("Total stages: {}", summary.total_stages));
        console.line(format!("Completed: {}", summary.completed));
        console.line(format!("Skipped (cached): {}", summary.skipped));
        console.line(format!("Failed: {}", summary.failed));
        console.line(format!("Pending: {}", summary.pending));
        console.line(format!(
            "Total duration: {}",
            format_seconds(summary.total_duration)
        ));
        console.line(format!("Success rate: {:.1}%", summary.success_percent()));
        console.separator();

        for stage in self.stages.values() {
            console.line(format!(
                "{} {}: {} ({})",
                stage.status.icon(),
                stage.stage_name,
                stage.status,
                stage.duration_display()
            ));
        }
    }

    /// Existing record, or a freshly started one when the name is new
    fn running_or_started(&mut self, stage_name: &str) -> &mut StageStatus {
        if !self.stages.contains_key(stage_name) {
            self.announce_start(stage_name);
        }
        self.stages
            .entry(stage_name.to_string())
            .or_insert_with(|| StageStatus::running(stage_name, Utc::now()))
    }

    fn announce_start(&self, stage_name: &str) {
        info!(stage = %stage_name, "stage_started");
        self.console
            .line(format!("🚀 Starting stage: {stage_name}"));
    }
}
