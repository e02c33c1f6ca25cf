//! Scoped experiment run

use crate::tracker::{validate_metric, Experiment, ExperimentTracker, MetricValues, Params};
use pipewatch_core::Result;
use tracing::{debug, warn};

/// One experiment in progress
///
/// Parameters are logged when the run begins. Metrics are buffered and
/// written by [`ExperimentRun::finish`]; a run that is dropped without being
/// finished (early return, `?`, panic) flushes them from `Drop` instead.
#[derive(Debug)]
pub struct ExperimentRun<'a> {
    tracker: &'a ExperimentTracker,
    experiment_id: String,
    metrics: MetricValues,
    dirty: bool,
    finished: bool,
}

impl<'a> ExperimentRun<'a> {
    pub(crate) fn begin(
        tracker: &'a ExperimentTracker,
        experiment_id: String,
        params: Option<&Params>,
    ) -> Result<Self> {
        crate::tracker::validate_experiment_id(&experiment_id)?;
        if let Some(params) = params.filter(|p| !p.is_empty()) {
            tracker.log_params(&experiment_id, params)?;
        }
        debug!(experiment_id = %experiment_id, "experiment_run_started");

        Ok(Self {
            tracker,
            experiment_id,
            metrics: MetricValues::new(),
            dirty: false,
            finished: false,
        })
    }

    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    pub fn tracker(&self) -> &ExperimentTracker {
        self.tracker
    }

    /// Log (or replace) the run's parameters right away
    pub fn log_params(&self, params: &Params) -> Result<()> {
        self.tracker.log_params(&self.experiment_id, params)?;
        Ok(())
    }

    /// Buffer one metric; a later value for the same name wins
    ///
    /// NaN and infinite values are rejected and leave the buffer unchanged.
    pub fn record_metric(&mut self, name: impl Into<String>, value: f64) -> Result<()> {
        let name = name.into();
        validate_metric(&self.experiment_id, &name, value)?;
        self.metrics.insert(name, value);
        self.dirty = true;
        Ok(())
    }

    /// Buffer several metrics, stopping at the first rejected value
    pub fn record_metrics<I, K>(&mut self, metrics: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        for (name, value) in metrics {
            self.record_metric(name, value)?;
        }
        Ok(())
    }

    /// Metrics buffered so far
    pub fn metrics(&self) -> &MetricValues {
        &self.metrics
    }

    /// Write buffered metrics if anything changed since the last flush
    pub fn flush(&mut self) -> Result<()> {
        if self.dirty {
            self.tracker
                .log_metrics(&self.experiment_id, &self.metrics)?;
            self.dirty = false;
        }
        Ok(())
    }

    /// Flush and close the run, returning what is now on disk
    pub fn finish(mut self) -> Result<Experiment> {
        self.finished = true;
        self.flush()?;
        debug!(experiment_id = %self.experiment_id, "experiment_run_finished");
        self.tracker.get_experiment(&self.experiment_id)
    }
}

impl Drop for ExperimentRun<'_> {
    fn drop(&mut self) {
        if self.finished || !self.dirty {
            return;
        }
        if let Err(e) = self.flush() {
            warn!(
                experiment_id = %self.experiment_id,
                error = %e,
                "experiment_metrics_flush_failed"
            );
        }
    }
}
