//! The lifecycle state machine driven for each installed extension.

use super::Extension;
use crate::errors::{LifecycleOrderError, ShutdownError, TraceflowError};
use crate::session::ExecutionSession;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// The lifecycle phase an extension instance is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtensionState {
    /// No lifecycle call has been delivered yet.
    Uninitialized,
    /// `startup` completed; no run observed yet.
    Started,
    /// A previous run ended; ready for the next one.
    AwaitingExecution,
    /// A run is active.
    Executing,
    /// The active run is suspended for inspection.
    Suspended,
    /// The `shutdown` callback is in flight.
    ShuttingDown,
    /// Terminal; no further lifecycle calls are valid.
    Shutdown,
}

impl ExtensionState {
    /// True when the extension can accept a `begin_execution` or a
    /// `shutdown`.
    #[must_use]
    pub fn is_idle(self) -> bool {
        matches!(self, Self::Started | Self::AwaitingExecution)
    }
}

impl fmt::Display for ExtensionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Started => "started",
            Self::AwaitingExecution => "awaiting-execution",
            Self::Executing => "executing",
            Self::Suspended => "suspended",
            Self::ShuttingDown => "shutting-down",
            Self::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
struct DriverInner {
    state: ExtensionState,
    active_run: Option<Uuid>,
}

/// Drives one extension through the lifecycle contract.
///
/// Ordering is validated and the state transitioned before the extension
/// callback fires; a rejected call returns an error and leaves the state
/// machine untouched. Violations are host/engine integration bugs and are
/// never retried here.
pub struct LifecycleDriver {
    extension: Arc<dyn Extension>,
    inner: Mutex<DriverInner>,
}

impl LifecycleDriver {
    /// Creates a driver for an extension instance.
    #[must_use]
    pub fn new(extension: Arc<dyn Extension>) -> Self {
        Self {
            extension,
            inner: Mutex::new(DriverInner {
                state: ExtensionState::Uninitialized,
                active_run: None,
            }),
        }
    }

    /// Returns the extension's diagnostic name.
    #[must_use]
    pub fn extension_name(&self) -> &str {
        self.extension.name()
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ExtensionState {
        self.inner.lock().state
    }

    /// Delivers `startup`. Valid at most once, before any execution call.
    pub fn startup(&self) -> Result<(), TraceflowError> {
        {
            let mut inner = self.inner.lock();
            match inner.state {
                ExtensionState::Uninitialized => inner.state = ExtensionState::Started,
                ExtensionState::ShuttingDown | ExtensionState::Shutdown => {
                    return Err(ShutdownError::new("startup").into());
                }
                state => {
                    return Err(LifecycleOrderError::new("startup", state)
                        .with_detail("startup is called at most once per extension")
                        .into());
                }
            }
        }

        debug!(extension = self.extension.name(), "extension started");
        self.extension.startup();
        Ok(())
    }

    /// Delivers `begin_execution` for a new run.
    pub fn begin_execution(&self, session: &ExecutionSession) -> Result<(), TraceflowError> {
        {
            let mut inner = self.inner.lock();
            match inner.state {
                state if state.is_idle() => {
                    inner.state = ExtensionState::Executing;
                    inner.active_run = Some(session.run_id());
                }
                ExtensionState::ShuttingDown | ExtensionState::Shutdown => {
                    return Err(ShutdownError::new("begin_execution").into());
                }
                state => {
                    return Err(LifecycleOrderError::new("begin_execution", state).into());
                }
            }
        }

        debug!(
            extension = self.extension.name(),
            run_id = %session.run_id(),
            "execution began"
        );
        self.extension.on_begin_execution(session);
        Ok(())
    }

    /// Delivers `suspend_execution` for the active run.
    pub fn suspend_execution(&self, session: &ExecutionSession) -> Result<(), TraceflowError> {
        {
            let mut inner = self.inner.lock();
            match inner.state {
                ExtensionState::Executing => {
                    Self::ensure_active_run(&inner, "suspend_execution", session)?;
                    inner.state = ExtensionState::Suspended;
                }
                ExtensionState::ShuttingDown | ExtensionState::Shutdown => {
                    return Err(ShutdownError::new("suspend_execution").into());
                }
                state => {
                    return Err(LifecycleOrderError::new("suspend_execution", state).into());
                }
            }
        }

        debug!(
            extension = self.extension.name(),
            run_id = %session.run_id(),
            "execution suspended"
        );
        self.extension.on_suspend_execution(session);
        Ok(())
    }

    /// Delivers `resume_execution` for the suspended run. The session may
    /// be a rebound sibling when resumption happens on a different thread.
    pub fn resume_execution(&self, session: &ExecutionSession) -> Result<(), TraceflowError> {
        {
            let mut inner = self.inner.lock();
            match inner.state {
                ExtensionState::Suspended => {
                    Self::ensure_active_run(&inner, "resume_execution", session)?;
                    inner.state = ExtensionState::Executing;
                }
                ExtensionState::ShuttingDown | ExtensionState::Shutdown => {
                    return Err(ShutdownError::new("resume_execution").into());
                }
                state => {
                    return Err(LifecycleOrderError::new("resume_execution", state).into());
                }
            }
        }

        debug!(
            extension = self.extension.name(),
            run_id = %session.run_id(),
            "execution resumed"
        );
        self.extension.on_resume_execution(session);
        Ok(())
    }

    /// Delivers `end_execution` for the active run.
    ///
    /// Accepted from `Suspended` as well as `Executing`, so an aborted run
    /// can still release its per-session resources.
    pub fn end_execution(&self, session: &ExecutionSession) -> Result<(), TraceflowError> {
        {
            let mut inner = self.inner.lock();
            match inner.state {
                ExtensionState::Executing | ExtensionState::Suspended => {
                    Self::ensure_active_run(&inner, "end_execution", session)?;
                    inner.state = ExtensionState::AwaitingExecution;
                    inner.active_run = None;
                }
                ExtensionState::ShuttingDown | ExtensionState::Shutdown => {
                    return Err(ShutdownError::new("end_execution").into());
                }
                state => {
                    return Err(LifecycleOrderError::new("end_execution", state).into());
                }
            }
        }

        debug!(
            extension = self.extension.name(),
            run_id = %session.run_id(),
            "execution ended"
        );
        self.extension.on_end_execution(session);
        Ok(())
    }

    /// Delivers `shutdown`. Terminal; any later call fails.
    pub fn shutdown(&self) -> Result<(), TraceflowError> {
        {
            let mut inner = self.inner.lock();
            match inner.state {
                state if state.is_idle() => inner.state = ExtensionState::ShuttingDown,
                ExtensionState::ShuttingDown | ExtensionState::Shutdown => {
                    return Err(ShutdownError::new("shutdown").into());
                }
                state => {
                    return Err(LifecycleOrderError::new("shutdown", state)
                        .with_detail("the active run must end before shutdown")
                        .into());
                }
            }
        }

        self.extension.shutdown();
        self.inner.lock().state = ExtensionState::Shutdown;
        debug!(extension = self.extension.name(), "extension shut down");
        Ok(())
    }

    fn ensure_active_run(
        inner: &DriverInner,
        attempted: &str,
        session: &ExecutionSession,
    ) -> Result<(), TraceflowError> {
        match inner.active_run {
            Some(run) if run == session.run_id() => Ok(()),
            Some(run) => Err(LifecycleOrderError::new(attempted, inner.state)
                .with_detail(format!(
                    "session {} does not match active run {run}",
                    session.run_id()
                ))
                .into()),
            None => Err(LifecycleOrderError::new(attempted, inner.state)
                .with_detail("no run is active")
                .into()),
        }
    }
}
