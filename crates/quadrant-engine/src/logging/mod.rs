//! Logging utilities.
//!
//! This module centralizes logger initialization. The engine itself only
//! talks to the `log` facade; binaries pick the backend through [`init_logging`].

mod init;

pub use init::{init_logging, LoggingConfig};
