//! Logging utilities.
//!
//! Centralizes logger initialization behind the standard `log` facade.
//! Acquisition failures and device-loss events are reported through it.

mod init;

pub use init::{init_logging, LoggingConfig};
