use pipewatch_core::{DEFAULT_LOG_FILTER, PIPEWATCH_LOG_VAR};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// The filter comes from `PIPEWATCH_LOG` (any `EnvFilter` directive), falling
/// back to `info`. Structured events go to stderr so they never interleave
/// with the console narrative the monitor prints on stdout.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_env(PIPEWATCH_LOG_VAR)
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span covering one monitored pipeline run
pub fn pipeline_span(pipeline_name: &str) -> Span {
    span!(Level::INFO, "pipeline", pipeline_name = %pipeline_name)
}

/// Create a span covering one tracked experiment run
pub fn experiment_span(experiment_id: &str) -> Span {
    span!(Level::INFO, "experiment", experiment_id = %experiment_id)
}
