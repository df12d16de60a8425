//! Error types for the traceflow engine surface.
//!
//! Registry and lifecycle violations are programming errors in the
//! host/engine integration and always propagate to the caller. A missing
//! file or a never-set configuration name is an ordinary outcome and is
//! represented as `Option::None`, not as an error.

use crate::extension::ExtensionState;
use thiserror::Error;

/// The main error type for traceflow operations.
#[derive(Debug, Error)]
pub enum TraceflowError {
    /// A trace key was registered more than once.
    #[error("{0}")]
    DuplicateKey(#[from] DuplicateKeyError),

    /// An unregistered trace key was written to a store.
    #[error("{0}")]
    UnknownKey(#[from] UnknownKeyError),

    /// A lifecycle phase method was called out of sequence.
    #[error("{0}")]
    LifecycleOrder(#[from] LifecycleOrderError),

    /// A lifecycle method was called at or after shutdown.
    #[error("{0}")]
    Shutdown(#[from] ShutdownError),
}

/// Error raised when registering an already-known trace key.
#[derive(Debug, Clone, Error)]
#[error("Duplicate trace key: '{key}' is already registered")]
pub struct DuplicateKeyError {
    /// The offending key.
    pub key: String,
}

impl DuplicateKeyError {
    /// Creates a new duplicate key error.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Error raised when writing a trace key that was never registered.
///
/// An unregistered key can never be retrieved through a registry-driven
/// snapshot, so the write is rejected before any slot is touched.
#[derive(Debug, Clone, Error)]
#[error("Unknown trace key: '{key}' is not in the registry")]
pub struct UnknownKeyError {
    /// The first offending key of the rejected write.
    pub key: String,
}

impl UnknownKeyError {
    /// Creates a new unknown key error.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Error raised when a lifecycle phase method is called out of sequence.
///
/// The diagnostic names the attempted transition and the state the
/// extension was observed in; the offending call is aborted before the
/// extension callback fires.
#[derive(Debug, Clone, Error)]
#[error("Lifecycle order violation: cannot {attempted} while extension is {state}{detail}")]
pub struct LifecycleOrderError {
    /// The phase method that was attempted.
    pub attempted: String,
    /// The state the extension was in when the call arrived.
    pub state: ExtensionState,
    /// Additional context, pre-rendered; empty when none.
    pub detail: String,
}

impl LifecycleOrderError {
    /// Creates a new lifecycle order error.
    #[must_use]
    pub fn new(attempted: impl Into<String>, state: ExtensionState) -> Self {
        Self {
            attempted: attempted.into(),
            state,
            detail: String::new(),
        }
    }

    /// Appends context to the diagnostic.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = format!(", {}", detail.into());
        self
    }
}

/// Error raised when any lifecycle method is called after `shutdown`.
#[derive(Debug, Clone, Error)]
#[error("Extension is shut down: '{attempted}' is no longer valid")]
pub struct ShutdownError {
    /// The phase method that was attempted.
    pub attempted: String,
}

impl ShutdownError {
    /// Creates a new shutdown error.
    #[must_use]
    pub fn new(attempted: impl Into<String>) -> Self {
        Self {
            attempted: attempted.into(),
        }
    }
}
