//! Core errors, constants and configuration for `pipewatch`.
//!
//! Every other crate in the workspace builds on the items defined here:
//!
//! - **`errors`**: the workspace `Error` enum and `Result` alias. Stage
//!   transitions are infallible; only filesystem and serialization work
//!   surfaces through this type.
//! - **`constants`**: environment variable names, default directories and
//!   file names shared by the monitor and the experiment tracker.
//! - **`config`**: `MonitorConfig`, resolved from defaults and the
//!   environment.

pub mod config;
pub mod constants;
pub mod errors;

pub use self::{
    config::MonitorConfig,
    constants::*,
    errors::{Error, Result, ResultExt},
};
