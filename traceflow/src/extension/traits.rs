//! The extension capability interface.

use crate::session::ExecutionSession;

/// A host-supplied extension notified of execution phase transitions.
///
/// Implementations observe phases and may read configuration or resolve
/// files through the supplied session. The engine validates call ordering
/// before any callback fires, so implementations can assume the state
/// machine contract holds: `startup` precedes everything, begin/end are
/// paired per run, suspend/resume alternate, `shutdown` is terminal.
///
/// Sessions are only valid for the duration of the call that delivered
/// them; implementations must not retain them.
pub trait Extension: Send + Sync {
    /// A short name used in diagnostics.
    fn name(&self) -> &str;

    /// Called when the extension is first loaded, before any run.
    fn startup(&self) {}

    /// Called when script execution starts.
    fn on_begin_execution(&self, _session: &ExecutionSession) {}

    /// Called when script execution is suspended for debugging or
    /// inspection.
    fn on_suspend_execution(&self, _session: &ExecutionSession) {}

    /// Called when script execution resumes, possibly on a different
    /// worker thread than it started on.
    fn on_resume_execution(&self, _session: &ExecutionSession) {}

    /// Called when script execution has ended, including aborted runs.
    fn on_end_execution(&self, _session: &ExecutionSession) {}

    /// Called when the hosting application is shutting down.
    fn shutdown(&self) {}
}
