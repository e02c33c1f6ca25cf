//! Shared utilities for pipewatch
//!
//! Filesystem helpers used by both the pipeline monitor and the experiment
//! tracker, plus the tracing subscriber setup.

pub mod atomic_file;
pub mod paths;
pub mod tracing;

pub use atomic_file::*;
pub use paths::*;
