//! Execution sessions.
//!
//! This module provides:
//! - Per-run configuration with the well-known host key names
//! - File resolution over host-supplied search directories
//! - The session handle extensions receive during lifecycle calls

mod config;
mod execution;
mod resolver;

pub use config::{configuration_keys, ConfigValue, Configuration};
pub use execution::ExecutionSession;
pub use resolver::{FileResolver, SearchPathResolver};
