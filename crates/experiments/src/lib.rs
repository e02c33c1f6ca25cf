//! Experiment tracking on plain JSON files
//!
//! An [`ExperimentTracker`] is constructed explicitly over a directory and
//! passed to whoever needs it. Parameters and metrics of each experiment live
//! in `<id>_params.json` and `<id>_metrics.json`.
//!
//! [`ExperimentRun`] scopes one experiment: parameters are written when the
//! run starts and buffered metrics are flushed when it finishes or is
//! dropped, whichever comes first.

pub mod run;
pub mod tracker;

pub use run::ExperimentRun;
pub use tracker::{Experiment, ExperimentComparison, ExperimentTracker, MetricValues, Params};
