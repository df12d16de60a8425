//! The host application interface.

use crate::session::ConfigValue;
use std::collections::HashMap;

/// Implemented by the application hosting the graph editor.
///
/// The host passes configuration parameters to the engine and receives
/// the notifications it needs to update itself. Configuration names are
/// mostly drawn from [`configuration_keys`](crate::session::configuration_keys).
pub trait HostApplication: Send + Sync {
    /// Name/value configuration parameters, seeded into the configuration
    /// of each new execution session.
    fn configurations(&self) -> HashMap<String, ConfigValue>;

    /// Notifies the host that graph execution has finished and the graph
    /// is updated, so it can refresh its graphics or perform cleanup.
    fn post_graph_update(&self);

    /// Notifies the host that a different graph was activated, so it can
    /// set up or activate the document corresponding to the given id.
    fn graph_activated(&self, graph_id: u32);
}
