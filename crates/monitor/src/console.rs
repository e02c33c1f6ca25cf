//! Console narrative for pipeline runs

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// Width of the `=====` separators around summaries and banners
pub const SEPARATOR_WIDTH: usize = 50;

/// Console output destination
#[derive(Clone)]
enum ConsoleWriter {
    Stdout,
    Stderr,
    Silent,
    Buffer(Arc<Mutex<Vec<u8>>>),
}

/// Human-readable output sink used by the monitor
///
/// Write failures are swallowed: printing a status line must never turn a
/// stage transition into an error.
#[derive(Clone)]
pub struct Console {
    writer: ConsoleWriter,
}

impl Console {
    /// Print to standard output (the default)
    pub fn stdout() -> Self {
        Self {
            writer: ConsoleWriter::Stdout,
        }
    }

    /// Print to standard error
    pub fn stderr() -> Self {
        Self {
            writer: ConsoleWriter::Stderr,
        }
    }

    /// Discard all output
    pub fn silent() -> Self {
        Self {
            writer: ConsoleWriter::Silent,
        }
    }

    /// Collect output in memory; read it back with [`Console::contents`]
    pub fn buffered() -> Self {
        Self {
            writer: ConsoleWriter::Buffer(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    /// Write one line
    pub fn line(&self, text: impl AsRef<str>) {
        let text = text.as_ref();
        let _ = match &self.writer {
            ConsoleWriter::Stdout => writeln!(io::stdout().lock(), "{text}"),
            ConsoleWriter::Stderr => writeln!(io::stderr().lock(), "{text}"),
            ConsoleWriter::Silent => Ok(()),
            ConsoleWriter::Buffer(buffer) => writeln!(buffer.lock(), "{text}"),
        };
    }

    /// Write a `=====` separator line
    pub fn separator(&self) {
        self.line("=".repeat(SEPARATOR_WIDTH));
    }

    /// Everything written so far, for buffered consoles
    pub fn contents(&self) -> Option<String> {
        match &self.writer {
            ConsoleWriter::Buffer(buffer) => {
                Some(String::from_utf8_lossy(&buffer.lock()).into_owned())
            }
            _ => None,
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdout()
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.writer {
            ConsoleWriter::Stdout => "stdout",
            ConsoleWriter::Stderr => "stderr",
            ConsoleWriter::Silent => "silent",
            ConsoleWriter::Buffer(_) => "buffered",
        };
        f.debug_struct("Console").field("writer", &kind).finish()
    }
}

/// Seconds with two decimals and an `s` suffix
pub fn format_seconds(seconds: f64) -> String {
    format!("{seconds:.2}s")
}

/// Like [`format_seconds`], but `unknown` when there is no duration
pub fn format_duration(duration: Option<f64>) -> String {
    match duration {
        Some(seconds) => format_seconds(seconds),
        None => "unknown".to_string(),
    }
}
