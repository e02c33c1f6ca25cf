//! Experiment tracker backed by JSON files in one directory

use crate::run::ExperimentRun;
use pipewatch_core::{
    Error, Result, ResultExt, DEFAULT_EXPERIMENTS_DIR, GENERATED_EXPERIMENT_PREFIX,
};
use pipewatch_utils::{
    ensure_dir_exists, experiment_id_from_params_file, metrics_file_path, params_file_path,
    write_atomic_string,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;

/// Free-form experiment parameters
pub type Params = serde_json::Map<String, Value>;

/// Named numeric metrics, ordered by name
pub type MetricValues = BTreeMap<String, f64>;

/// Everything recorded for one experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    pub experiment_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricValues>,
}

/// Two experiments side by side with the per-metric difference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentComparison {
    pub experiment1: Experiment,
    pub experiment2: Experiment,
    /// `experiment2 - experiment1` per metric; missing metrics count as zero.
    /// Empty unless both experiments have metrics.
    pub metrics_diff: MetricValues,
}

/// File-based experiment tracker
#[derive(Debug, Clone)]
pub struct ExperimentTracker {
    experiments_dir: PathBuf,
}

impl ExperimentTracker {
    /// Open a tracker over `experiments_dir`, creating it if needed
    pub fn new(experiments_dir: impl Into<PathBuf>) -> Result<Self> {
        let experiments_dir = experiments_dir.into();
        ensure_dir_exists(&experiments_dir)?;
        Ok(Self { experiments_dir })
    }

    /// Open a tracker over `./experiments`
    pub fn in_default_dir() -> Result<Self> {
        Self::new(DEFAULT_EXPERIMENTS_DIR)
    }

    pub fn experiments_dir(&self) -> &Path {
        &self.experiments_dir
    }

    /// Write `<id>_params.json`, replacing earlier parameters
    pub fn log_params(&self, experiment_id: &str, params: &Params) -> Result<PathBuf> {
        validate_experiment_id(experiment_id)?;
        let path = params_file_path(&self.experiments_dir, experiment_id);
        write_json(&path, params)?;
        info!(experiment_id = %experiment_id, path = %path.display(), "params_logged");
        Ok(path)
    }

    /// Write `<id>_metrics.json`, replacing earlier metrics
    ///
    /// Nothing is written when any value is NaN or infinite.
    pub fn log_metrics(&self, experiment_id: &str, metrics: &MetricValues) -> Result<PathBuf> {
        validate_experiment_id(experiment_id)?;
        for (name, value) in metrics {
            validate_metric(experiment_id, name, *value)?;
        }
        let path = metrics_file_path(&self.experiments_dir, experiment_id);
        write_json(&path, metrics)?;
        info!(experiment_id = %experiment_id, path = %path.display(), "metrics_logged");
        Ok(path)
    }

    /// Load what is on disk for an experiment; missing files leave fields empty
    pub fn get_experiment(&self, experiment_id: &str) -> Result<Experiment> {
        validate_experiment_id(experiment_id)?;
        let params = read_json_if_exists(&params_file_path(&self.experiments_dir, experiment_id))
            .with_context(|| format!("load experiment '{experiment_id}'"))?;
        let metrics = read_json_if_exists(&metrics_file_path(&self.experiments_dir, experiment_id))
            .with_context(|| format!("load experiment '{experiment_id}'"))?;

        Ok(Experiment {
            experiment_id: experiment_id.to_string(),
            params,
            metrics,
        })
    }

    /// Ids of all experiments with logged parameters, sorted
    pub fn list_experiments(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.experiments_dir)
            .map_err(|e| Error::file_system(&self.experiments_dir, "list experiments", e))?;

        let mut ids = BTreeSet::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| Error::file_system(&self.experiments_dir, "list experiments", e))?;
            if let Some(id) = experiment_id_from_params_file(&entry.path()) {
                ids.insert(id);
            }
        }
        Ok(ids.into_iter().collect())
    }

    /// Compare two experiments metric by metric
    pub fn compare_experiments(
        &self,
        experiment_id1: &str,
        experiment_id2: &str,
    ) -> Result<ExperimentComparison> {
        let experiment1 = self.get_experiment(experiment_id1)?;
        let experiment2 = self.get_experiment(experiment_id2)?;

        let metrics_diff = match (&experiment1.metrics, &experiment2.metrics) {
            (Some(first), Some(second)) => first
                .keys()
                .chain(second.keys())
                .map(|key| {
                    let before = first.get(key).copied().unwrap_or(0.0);
                    let after = second.get(key).copied().unwrap_or(0.0);
                    (key.clone(), after - before)
                })
                .collect(),
            _ => MetricValues::new(),
        };

        Ok(ExperimentComparison {
            experiment1,
            experiment2,
            metrics_diff,
        })
    }

    /// Begin a scoped run; see [`ExperimentRun`]
    ///
    /// Without an id a fresh `exp_xxxxxxxx` id is generated. Non-empty
    /// parameters are logged immediately.
    pub fn start_run(
        &self,
        experiment_id: Option<&str>,
        params: Option<&Params>,
    ) -> Result<ExperimentRun<'_>> {
        let experiment_id = match experiment_id {
            Some(id) => id.to_string(),
            None => generate_experiment_id(),
        };
        ExperimentRun::begin(self, experiment_id, params)
    }

    /// Run `f` inside a scoped run and flush its metrics afterwards
    ///
    /// Metrics recorded before an error or a panic are still written.
    pub fn track<T, F>(
        &self,
        experiment_id: Option<&str>,
        params: Option<&Params>,
        f: F,
    ) -> Result<T>
    where
        F: FnOnce(&mut ExperimentRun<'_>) -> Result<T>,
    {
        let mut run = self.start_run(experiment_id, params)?;
        let span = pipewatch_utils::tracing::experiment_span(run.experiment_id());
        let _guard = span.enter();

        let value = f(&mut run)?;
        run.finish()?;
        Ok(value)
    }
}

/// `exp_` followed by the first eight hex digits of a random UUID
pub fn generate_experiment_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{GENERATED_EXPERIMENT_PREFIX}{}", &hex[..8])
}

/// Experiment ids become file names
pub fn validate_experiment_id(experiment_id: &str) -> Result<()> {
    if experiment_id.trim().is_empty() {
        return Err(Error::experiment(
            experiment_id,
            "experiment id must not be empty",
        ));
    }
    if experiment_id.contains(['/', '\\']) || experiment_id == "." || experiment_id == ".." {
        return Err(Error::experiment(
            experiment_id,
            "experiment id must not contain path separators",
        ));
    }
    Ok(())
}

/// JSON has no encoding for NaN or infinity; serde_json would write `null`
pub fn validate_metric(experiment_id: &str, name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::experiment(
            experiment_id,
            format!("metric '{name}' must be finite, got {value}"),
        ));
    }
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serialize '{}'", path.display()))?;
    write_atomic_string(path, &json)
}

fn read_json_if_exists<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        debug!(path = %path.display(), "experiment_file_absent");
        return Ok(None);
    }
    let content =
        fs::read_to_string(path).map_err(|e| Error::file_system(path, "read experiment file", e))?;
    serde_json::from_str(&content)
        .map(Some)
        .with_context(|| format!("parse '{}'", path.display()))
}
