//! Mock extensions and hosts for testing.

use crate::extension::Extension;
use crate::host::HostApplication;
use crate::session::{ConfigValue, ExecutionSession};
use parking_lot::Mutex;
use std::collections::HashMap;

/// An extension that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpExtension;

impl Extension for NoOpExtension {
    fn name(&self) -> &str {
        "noop"
    }
}

/// An extension that records every phase callback it receives.
///
/// Phase entries carry the run id (`"begin:<run_id>"`) so tests can assert
/// pairing across sessions.
#[derive(Debug, Default)]
pub struct RecordingExtension {
    calls: Mutex<Vec<String>>,
}

impl RecordingExtension {
    /// Creates a new recording extension.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded phase entries in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Returns the number of recorded callbacks.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Clears the recorded callbacks.
    pub fn reset(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, phase: &str, session: Option<&ExecutionSession>) {
        let entry = match session {
            Some(session) => format!("{phase}:{}", session.run_id()),
            None => phase.to_string(),
        };
        self.calls.lock().push(entry);
    }
}

impl Extension for RecordingExtension {
    fn name(&self) -> &str {
        "recording"
    }

    fn startup(&self) {
        self.record("startup", None);
    }

    fn on_begin_execution(&self, session: &ExecutionSession) {
        self.record("begin", Some(session));
    }

    fn on_suspend_execution(&self, session: &ExecutionSession) {
        self.record("suspend", Some(session));
    }

    fn on_resume_execution(&self, session: &ExecutionSession) {
        self.record("resume", Some(session));
    }

    fn on_end_execution(&self, session: &ExecutionSession) {
        self.record("end", Some(session));
    }

    fn shutdown(&self) {
        self.record("shutdown", None);
    }
}

/// A host that seeds fixed configurations and counts notifications.
#[derive(Debug, Default)]
pub struct RecordingHost {
    configurations: HashMap<String, ConfigValue>,
    graph_updates: Mutex<usize>,
    activated_graphs: Mutex<Vec<u32>>,
}

impl RecordingHost {
    /// Creates a host with no seed configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a host seeding the given configurations into each session.
    #[must_use]
    pub fn with_configurations(configurations: HashMap<String, ConfigValue>) -> Self {
        Self {
            configurations,
            ..Self::default()
        }
    }

    /// Returns how many times the graph-updated notification fired.
    #[must_use]
    pub fn graph_update_count(&self) -> usize {
        *self.graph_updates.lock()
    }

    /// Returns the activated graph ids in notification order.
    #[must_use]
    pub fn activated_graphs(&self) -> Vec<u32> {
        self.activated_graphs.lock().clone()
    }
}

impl HostApplication for RecordingHost {
    fn configurations(&self) -> HashMap<String, ConfigValue> {
        self.configurations.clone()
    }

    fn post_graph_update(&self) {
        *self.graph_updates.lock() += 1;
    }

    fn graph_activated(&self, graph_id: u32) {
        self.activated_graphs.lock().push(graph_id);
    }
}
