//! # Traceflow
//!
//! Execution-context propagation for an embeddable graph-evaluation engine.
//!
//! Traceflow lets a host application stash opaque, per-thread "trace" data
//! alongside repeated graph evaluations so that persistent object
//! identities survive across runs, and defines the lifecycle contract
//! between the engine and host-supplied extensions:
//!
//! - **Trace keys and stores**: registered keys, thread-scoped slots, and
//!   explicit snapshot/restore across thread boundaries
//! - **Execution sessions**: per-run configuration and file resolution
//! - **Extension lifecycle**: a validated state machine over startup,
//!   begin, suspend, resume, end, and shutdown phases
//! - **Engine orchestration**: broadcasting phases to installed extensions
//!   and carrying trace data across suspend/resume boundaries
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use traceflow::prelude::*;
//!
//! let registry = Arc::new(TraceKeyRegistry::with_keys(["host-channel"])?);
//! let engine = ExecutionEngine::new(registry);
//! engine.install(Arc::new(MyExtension::default()));
//! engine.startup()?;
//!
//! let session = engine.begin_execution()?;
//! // ... evaluate the graph ...
//! engine.end_execution(&session)?;
//! engine.shutdown()?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod engine;
pub mod errors;
pub mod extension;
pub mod host;
pub mod observability;
pub mod session;
pub mod testing;
pub mod trace;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::engine::ExecutionEngine;
    pub use crate::errors::{
        DuplicateKeyError, LifecycleOrderError, ShutdownError, TraceflowError,
        UnknownKeyError,
    };
    pub use crate::extension::{Extension, ExtensionState, LifecycleDriver};
    pub use crate::host::HostApplication;
    pub use crate::session::{
        configuration_keys, ConfigValue, Configuration, ExecutionSession,
        FileResolver, SearchPathResolver,
    };
    pub use crate::trace::{
        TraceBlob, TraceContextStore, TraceKey, TraceKeyRegistry, TraceSnapshot,
    };
}
