//! Trace-context propagation.
//!
//! This module provides:
//! - Registered trace keys with a process-lifetime registry
//! - Thread-scoped slots binding each key to an opaque host blob
//! - Snapshots that carry slot contents across suspend/resume boundaries

mod keys;
mod snapshot;
mod store;
#[cfg(test)]
mod trace_tests;

pub use keys::{TraceKey, TraceKeyRegistry};
pub use snapshot::TraceSnapshot;
pub use store::{TraceBlob, TraceContextStore};
