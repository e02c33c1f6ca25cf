//! Path utilities for pipewatch-specific file locations

use chrono::{DateTime, TimeZone};
use pipewatch_core::{
    Error, Result, LATEST_REPORT_FILENAME, METRICS_FILE_SUFFIX, PARAMS_FILE_SUFFIX,
    REPORT_TIMESTAMP_FORMAT,
};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

/// Ensure a directory exists, creating missing parents
pub fn ensure_dir_exists(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::file_system(dir, "create directory", e))
}

/// Name of a timestamped report file: `<pipeline>_<YYYYmmdd_HHMMSS>.json`
///
/// Second granularity: two reports saved within the same second share a name
/// and the later one replaces the earlier one.
pub fn report_file_name<Tz>(pipeline_name: &str, timestamp: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{pipeline_name}_{}.json",
        timestamp.format(REPORT_TIMESTAMP_FORMAT)
    )
}

/// Full path of a timestamped report inside the monitoring directory
pub fn report_file_path<Tz>(
    monitoring_dir: &Path,
    pipeline_name: &str,
    timestamp: &DateTime<Tz>,
) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    monitoring_dir.join(report_file_name(pipeline_name, timestamp))
}

/// Stable location of the most recently published report
pub fn latest_report_path(monitoring_dir: &Path) -> PathBuf {
    monitoring_dir.join(LATEST_REPORT_FILENAME)
}

/// `<dir>/<id>_params.json`
pub fn params_file_path(experiments_dir: &Path, experiment_id: &str) -> PathBuf {
    experiments_dir.join(format!("{experiment_id}{PARAMS_FILE_SUFFIX}"))
}

/// `<dir>/<id>_metrics.json`
pub fn metrics_file_path(experiments_dir: &Path, experiment_id: &str) -> PathBuf {
    experiments_dir.join(format!("{experiment_id}{METRICS_FILE_SUFFIX}"))
}

/// Recover the experiment id from a params file name, if it is one
pub fn experiment_id_from_params_file(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let id = name.strip_suffix(PARAMS_FILE_SUFFIX)?;
    (!id.is_empty()).then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_report_file_name_embeds_timestamp_to_the_second() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            report_file_name("ml_pipeline", &ts),
            "ml_pipeline_20240309_070501.json"
        );
        assert_eq!(
            report_file_path(Path::new("reports/monitoring"), "nightly", &ts),
            PathBuf::from("reports/monitoring/nightly_20240309_070501.json")
        );
    }

    #[test]
    fn test_experiment_paths() {
        let dir = Path::new("experiments");
        let params = params_file_path(dir, "exp_1a2b3c4d");
        assert_eq!(
            params,
            PathBuf::from("experiments/exp_1a2b3c4d_params.json")
        );
        assert_eq!(
            metrics_file_path(dir, "exp_1a2b3c4d"),
            PathBuf::from("experiments/exp_1a2b3c4d_metrics.json")
        );
        assert_eq!(
            experiment_id_from_params_file(&params),
            Some("exp_1a2b3c4d".to_string())
        );
        assert_eq!(
            experiment_id_from_params_file(Path::new("experiments/exp_metrics.json")),
            None
        );
        assert_eq!(
            experiment_id_from_params_file(Path::new("_params.json")),
            None
        );
    }

    #[test]
    fn test_ensure_dir_exists_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("reports").join("monitoring");
        ensure_dir_exists(&nested).unwrap();
        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(
            latest_report_path(&nested),
            nested.join("pipeline_report.json")
        );
    }
}
