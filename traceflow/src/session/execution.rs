//! The per-run session handle.

use super::{Configuration, FileResolver};
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use uuid::Uuid;

/// The per-run handle handed to extensions during lifecycle calls.
///
/// A session is created when a run begins and destroyed when the run ends
/// or is abandoned; it is never reused across runs. Extensions may read
/// configuration and resolve files through it but must not retain it
/// beyond the lifecycle call that delivered it.
///
/// A session is bound to the thread that created it. When a suspended run
/// resumes on a different worker, the engine constructs a sibling bound to
/// the new thread via [`rebind`](Self::rebind); the run id is preserved,
/// so lifecycle pairing still recognizes the run.
pub struct ExecutionSession {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    bound_thread: ThreadId,
    configuration: Arc<Configuration>,
    resolver: Arc<dyn FileResolver>,
}

impl ExecutionSession {
    /// Creates a session for a new run, bound to the calling thread.
    #[must_use]
    pub fn new(configuration: Arc<Configuration>, resolver: Arc<dyn FileResolver>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            bound_thread: thread::current().id(),
            configuration,
            resolver,
        }
    }

    /// Creates a sibling session for the same run, bound to the calling
    /// thread.
    #[must_use]
    pub fn rebind(&self) -> Self {
        Self {
            run_id: self.run_id,
            started_at: self.started_at,
            bound_thread: thread::current().id(),
            configuration: Arc::clone(&self.configuration),
            resolver: Arc::clone(&self.resolver),
        }
    }

    /// Returns the run id this session belongs to.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Returns when the run started.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the thread this session is bound to.
    #[must_use]
    pub fn bound_thread(&self) -> ThreadId {
        self.bound_thread
    }

    /// Returns the configuration object for this execution session.
    #[must_use]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Searches the given file and returns its full path, if found.
    #[must_use]
    pub fn search_file(&self, filename: &str) -> Option<PathBuf> {
        self.resolver.search_file(filename)
    }
}

impl fmt::Debug for ExecutionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionSession")
            .field("run_id", &self.run_id)
            .field("started_at", &self.started_at)
            .field("bound_thread", &self.bound_thread)
            .finish_non_exhaustive()
    }
}
