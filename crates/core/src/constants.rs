/// Constants used throughout the pipewatch codebase
// Environment variable names
pub const PIPEWATCH_REPORTS_DIR_VAR: &str = "PIPEWATCH_REPORTS_DIR";
pub const PIPEWATCH_PIPELINE_NAME_VAR: &str = "PIPEWATCH_PIPELINE_NAME";
pub const PIPEWATCH_LOG_VAR: &str = "PIPEWATCH_LOG";

// Defaults
pub const DEFAULT_REPORTS_DIR: &str = "reports";
pub const DEFAULT_PIPELINE_NAME: &str = "ml_pipeline";
pub const DEFAULT_EXPERIMENTS_DIR: &str = "experiments";
pub const DEFAULT_LOG_FILTER: &str = "info";

// Report layout
pub const MONITORING_SUBDIR: &str = "monitoring";
pub const LATEST_REPORT_FILENAME: &str = "pipeline_report.json";
pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// Experiment files
pub const PARAMS_FILE_SUFFIX: &str = "_params.json";
pub const METRICS_FILE_SUFFIX: &str = "_metrics.json";
pub const GENERATED_EXPERIMENT_PREFIX: &str = "exp_";

// Metrics key read for skip / unknown-duration display
pub const REASON_METRIC_KEY: &str = "reason";
pub const UNKNOWN_REASON: &str = "unknown";
