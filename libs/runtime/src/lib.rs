//! Process-level plumbing shared by the device registry binaries:
//! layered configuration and logging setup.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{AppConfig, CliArgs, DatabaseConfig, LoggingConfig};
