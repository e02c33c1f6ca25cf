//! Stage monitoring for sequential ML pipelines
//!
//! A [`PipelineMonitor`] lives for exactly one pipeline run. The driver calls
//! the transition methods once per stage lifecycle event, then asks the
//! monitor to persist a [`PipelineReport`] and print a summary:
//!
//! ```no_run
//! use pipewatch_monitor::{PipelineMonitor, Metrics};
//!
//! # fn main() -> pipewatch_core::Result<()> {
//! let mut monitor = PipelineMonitor::new("reports")?;
//! monitor.start_stage("prepare_data");
//! let mut metrics = Metrics::new();
//! metrics.insert("rows".into(), 100.into());
//! monitor.complete_stage("prepare_data", Some(metrics));
//!
//! let report = monitor.save_report("ml_pipeline")?;
//! monitor.print_summary();
//! # let _ = report;
//! # Ok(())
//! # }
//! ```
//!
//! The monitor is single-threaded by construction: every transition takes
//! `&mut self`. Callers that share one across threads must wrap it in a lock.

pub mod console;
pub mod monitor;
pub mod notify;
pub mod reconcile;
pub mod report;
pub mod stage;
pub mod summary;

pub use console::Console;
pub use monitor::PipelineMonitor;
pub use notify::{notify_completion, PipelineOutcome};
pub use reconcile::{default_stage_outputs, reconcile_stages, Reconciled, StageOutputs};
pub use report::PipelineReport;
pub use stage::{Metrics, StageState, StageStatus};
pub use summary::PipelineSummary;
