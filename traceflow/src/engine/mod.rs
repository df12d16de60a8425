//! Engine orchestration: phase broadcast and the trace carry.


use crate::errors::TraceflowError;
use crate::extension::{Extension, ExtensionState, LifecycleDriver};
use crate::host::HostApplication;
use crate::session::{Configuration, ExecutionSession, FileResolver, SearchPathResolver};
use crate::trace::{TraceContextStore, TraceKeyRegistry, TraceSnapshot};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Coordinates installed extensions, execution sessions, and the trace
/// carry across suspend/resume boundaries.
///
/// The engine is the only component that moves trace data between
/// threads: it captures a snapshot on the suspending thread and restores
/// it on the resuming thread, strictly between the corresponding
/// lifecycle calls. No trace data ever crosses threads implicitly.
pub struct ExecutionEngine {
    registry: Arc<TraceKeyRegistry>,
    trace_store: Arc<TraceContextStore>,
    drivers: RwLock<Vec<LifecycleDriver>>,
    pending_carries: Mutex<HashMap<Uuid, TraceSnapshot>>,
    resolver: Arc<dyn FileResolver>,
    host: Option<Arc<dyn HostApplication>>,
}

impl ExecutionEngine {
    /// Creates an engine over the given trace key registry.
    #[must_use]
    pub fn new(registry: Arc<TraceKeyRegistry>) -> Self {
        let trace_store = Arc::new(TraceContextStore::new(Arc::clone(&registry)));
        Self {
            registry,
            trace_store,
            drivers: RwLock::new(Vec::new()),
            pending_carries: Mutex::new(HashMap::new()),
            resolver: Arc::new(SearchPathResolver::default()),
            host: None,
        }
    }

    /// Sets the file resolver handed to new sessions.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn FileResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Attaches the host application.
    #[must_use]
    pub fn with_host(mut self, host: Arc<dyn HostApplication>) -> Self {
        self.host = Some(host);
        self
    }

    /// Installs an extension. Its lifecycle starts at `Uninitialized`.
    pub fn install(&self, extension: Arc<dyn Extension>) {
        debug!(extension = extension.name(), "extension installed");
        self.drivers.write().push(LifecycleDriver::new(extension));
    }

    /// Returns the trace key registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<TraceKeyRegistry> {
        &self.registry
    }

    /// Returns the trace store for host integration code.
    #[must_use]
    pub fn trace_store(&self) -> &Arc<TraceContextStore> {
        &self.trace_store
    }

    /// Returns each installed extension's name and lifecycle state.
    #[must_use]
    pub fn extension_states(&self) -> Vec<(String, ExtensionState)> {
        self.drivers
            .read()
            .iter()
            .map(|driver| (driver.extension_name().to_string(), driver.state()))
            .collect()
    }

    /// Drives every installed extension through `startup`.
    pub fn startup(&self) -> Result<(), TraceflowError> {
        let drivers = self.drivers.read();
        for driver in drivers.iter() {
            driver.startup()?;
        }
        info!(extensions = drivers.len(), "engine started");
        Ok(())
    }

    /// Opens a session for a new run and delivers `begin_execution`.
    ///
    /// The session configuration is seeded from the host's configuration
    /// parameters when a host is attached.
    pub fn begin_execution(&self) -> Result<ExecutionSession, TraceflowError> {
        let configuration = match &self.host {
            Some(host) => Configuration::from_values(host.configurations()),
            None => Configuration::new(),
        };
        let session = ExecutionSession::new(Arc::new(configuration), Arc::clone(&self.resolver));

        for driver in self.drivers.read().iter() {
            driver.begin_execution(&session)?;
        }
        debug!(run_id = %session.run_id(), "execution began");
        Ok(session)
    }

    /// Delivers `suspend_execution`, then parks the calling thread's trace
    /// snapshot for the run.
    ///
    /// Must be called on the thread that is executing the run.
    pub fn suspend_execution(&self, session: &ExecutionSession) -> Result<(), TraceflowError> {
        for driver in self.drivers.read().iter() {
            driver.suspend_execution(session)?;
        }

        let snapshot = self.trace_store.get_current();
        debug!(
            run_id = %session.run_id(),
            present = snapshot.present_count(),
            "parked trace snapshot"
        );
        self.pending_carries.lock().insert(session.run_id(), snapshot);
        Ok(())
    }

    /// Restores the parked trace snapshot into the calling thread's slots,
    /// then delivers `resume_execution`.
    ///
    /// Must be called on the thread that will continue the run. When that
    /// thread differs from the session's bound thread, the returned
    /// session is a rebound sibling for the same run; the original must
    /// not be used afterwards. A resume with no parked snapshot (a cold
    /// start) is valid and leaves every key absent.
    pub fn resume_execution(
        &self,
        session: ExecutionSession,
    ) -> Result<ExecutionSession, TraceflowError> {
        let parked = self.pending_carries.lock().remove(&session.run_id());
        if let Some(snapshot) = parked {
            debug!(
                run_id = %session.run_id(),
                present = snapshot.present_count(),
                "restored trace snapshot"
            );
            self.trace_store.set_current(snapshot.present())?;
        }

        let session = if session.bound_thread() == thread::current().id() {
            session
        } else {
            session.rebind()
        };

        for driver in self.drivers.read().iter() {
            driver.resume_execution(&session)?;
        }
        Ok(session)
    }

    /// Delivers `end_execution` and releases the run's resources.
    pub fn end_execution(&self, session: &ExecutionSession) -> Result<(), TraceflowError> {
        for driver in self.drivers.read().iter() {
            driver.end_execution(session)?;
        }

        // A suspend with no matching resume leaves a parked snapshot.
        self.pending_carries.lock().remove(&session.run_id());

        if let Some(host) = &self.host {
            host.post_graph_update();
        }
        debug!(run_id = %session.run_id(), "execution ended");
        Ok(())
    }

    /// Aborts a run. The extensions still observe `end_execution` so they
    /// can release per-session resources; configuration changes are not
    /// rolled back.
    pub fn abort_execution(&self, session: &ExecutionSession) -> Result<(), TraceflowError> {
        warn!(run_id = %session.run_id(), "aborting execution");
        self.end_execution(session)
    }

    /// Drives every installed extension through `shutdown`.
    pub fn shutdown(&self) -> Result<(), TraceflowError> {
        for driver in self.drivers.read().iter() {
            driver.shutdown()?;
        }
        info!("engine shut down");
        Ok(())
    }

    /// Forwards a graph-activation notification to the host.
    pub fn activate_graph(&self, graph_id: u32) {
        if let Some(host) = &self.host {
            host.graph_activated(graph_id);
        }
    }
}
