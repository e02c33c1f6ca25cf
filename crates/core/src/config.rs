//! Monitor configuration resolved from defaults and the environment

use crate::constants::{
    DEFAULT_PIPELINE_NAME, DEFAULT_REPORTS_DIR, MONITORING_SUBDIR, PIPEWATCH_PIPELINE_NAME_VAR,
    PIPEWATCH_REPORTS_DIR_VAR,
};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Where a pipeline monitor writes and what it calls the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Root reports directory; reports go into its `monitoring` subdirectory
    pub reports_dir: PathBuf,
    /// Name embedded in report documents and file names
    pub pipeline_name: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            pipeline_name: DEFAULT_PIPELINE_NAME.to_string(),
        }
    }
}

impl MonitorConfig {
    /// Create a configuration rooted at `reports_dir` with the default pipeline name
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
            ..Self::default()
        }
    }

    /// Resolve the configuration from `PIPEWATCH_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve the configuration through an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(PIPEWATCH_REPORTS_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            config.reports_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup(PIPEWATCH_PIPELINE_NAME_VAR).filter(|v| !v.trim().is_empty()) {
            config.pipeline_name = name;
        }

        config.validate()?;
        tracing::debug!(
            reports_dir = %config.reports_dir.display(),
            pipeline_name = %config.pipeline_name,
            "monitor_config_resolved"
        );
        Ok(config)
    }

    /// Set the pipeline name
    #[must_use]
    pub fn with_pipeline_name(mut self, name: impl Into<String>) -> Self {
        self.pipeline_name = name.into();
        self
    }

    /// Check that the configuration can be used to build report paths
    pub fn validate(&self) -> Result<()> {
        validate_pipeline_name(&self.pipeline_name)?;
        if self.reports_dir.as_os_str().is_empty() {
            return Err(Error::configuration("reports directory must not be empty"));
        }
        Ok(())
    }

    /// Directory the monitor writes its reports into
    pub fn monitoring_dir(&self) -> PathBuf {
        monitoring_dir_for(&self.reports_dir)
    }
}

/// `<reports_dir>/monitoring`
pub fn monitoring_dir_for(reports_dir: &Path) -> PathBuf {
    reports_dir.join(MONITORING_SUBDIR)
}

/// A pipeline name ends up inside a file name, so it must be a single path component
pub fn validate_pipeline_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::configuration("pipeline name must not be empty"));
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(Error::configuration(format!(
            "pipeline name '{name}' must not contain path separators"
        )));
    }
    Ok(())
}
