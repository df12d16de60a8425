//! Per-session configuration.

use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Well-known configuration names understood by hosts and the engine core.
///
/// The set is host-extensible; these constants cover the names the
/// graph-editor integration reads today. Names are case-sensitive.
pub mod configuration_keys {
    /// Library filename implementing the geometry factory binding.
    pub const GEOMETRY_FACTORY: &str = "GeometryFactoryFileName";

    /// Library filename implementing the persistence manager binding.
    pub const PERSISTENT_MANAGER: &str = "PersistentManagerFileName";

    /// The host's geometry data provider binding.
    pub const GEOMETRY_PROVIDER: &str = "GeometryProvider";

    /// The host's session database object. Superseded by `SESSION_KEY`.
    pub const SESSION_DATABASE: &str = "SessionDatabase";

    /// Identifies the host document this session belongs to. The value is
    /// a string understood by the persistence manager when telling one
    /// session from another.
    pub const SESSION_KEY: &str = "SessionKey";

    /// Requests an explicit database lock before execution. Boolean value.
    pub const REQUEST_EXPLICIT_LOCK: &str = "RequestExplicitLock";

    /// Whether the host is recording user actions. Boolean value.
    pub const RECORDING_USER_ACTIONS: &str = "RecordingUserActions";

    /// Whether persisted objects are cleared on screen before each run.
    /// Boolean value; live-execution hosts have no clear distinction
    /// between runs.
    pub const CLEAR_PERSISTED_OBJECTS: &str = "ClearPersistedObjects";

    /// Whether the geometric preview render service is enabled. Boolean
    /// value; preview is enabled when the flag is not specified.
    pub const GEOMETRIC_PREVIEW_ENABLED: &str = "GeometricPreviewEnabled";

    /// Classes hidden from the host library browser, as a
    /// `assembly;class;...;assembly;class;` delimited string.
    pub const FILTERED_CLASSES: &str = "FilteredClasses";

    /// Whether the core generates XML properties for geometry. Boolean
    /// value, referenced by the geometry test framework.
    pub const GEOMETRY_XML_PROPERTIES: &str = "GeometryXmlProperties";
}

/// An untyped configuration value.
///
/// Type correctness per name is a contract between host and engine; the
/// store itself does not enforce it.
#[derive(Clone)]
pub enum ConfigValue {
    /// A boolean flag.
    Bool(bool),
    /// A string value.
    Text(String),
    /// A host object reference, opaque to the engine.
    Object(Arc<dyn Any + Send + Sync>),
}

impl ConfigValue {
    /// Creates an opaque object value.
    #[must_use]
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Self::Object(Arc::new(value))
    }

    /// Returns the boolean payload, if this is a boolean value.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string payload, if this is a string value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Downcasts an object value to a concrete host type.
    #[must_use]
    pub fn downcast_object<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Object(value) => Arc::clone(value).downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            Self::Text(value) => f.debug_tuple("Text").field(value).finish(),
            // Object contents are host-opaque.
            Self::Object(_) => f.write_str("Object(..)"),
        }
    }
}

impl PartialEq for ConfigValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Flat name-to-value configuration for one execution session.
///
/// Reads of never-set names return `None`; writes are unconstrained. The
/// host owns the backing values and their consistency for the session's
/// lifetime.
#[derive(Debug, Default)]
pub struct Configuration {
    root_module_path: Option<PathBuf>,
    include_directories: Vec<PathBuf>,
    values: RwLock<HashMap<String, ConfigValue>>,
}

impl Configuration {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from existing values.
    #[must_use]
    pub fn from_values(values: HashMap<String, ConfigValue>) -> Self {
        Self {
            root_module_path: None,
            include_directories: Vec::new(),
            values: RwLock::new(values),
        }
    }

    /// Sets the path of the main executing script.
    #[must_use]
    pub fn with_root_module_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.root_module_path = Some(path.into());
        self
    }

    /// Sets the include directories.
    #[must_use]
    pub fn with_include_directories(mut self, directories: Vec<PathBuf>) -> Self {
        self.include_directories = directories;
        self
    }

    /// Returns the path of the main executing script, if set.
    #[must_use]
    pub fn root_module_path(&self) -> Option<&Path> {
        self.root_module_path.as_deref()
    }

    /// Returns the include directories.
    #[must_use]
    pub fn include_directories(&self) -> &[PathBuf] {
        &self.include_directories
    }

    /// Gets an application-defined configuration value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ConfigValue> {
        self.values.read().get(name).cloned()
    }

    /// Sets an application-defined configuration value, overwriting any
    /// prior value for that name.
    pub fn set(&self, name: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.write().insert(name.into(), value.into());
    }

    /// Gets a configuration value as a boolean.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(|v| v.as_bool())
    }

    /// Gets a configuration value as a string.
    #[must_use]
    pub fn get_text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(|v| v.as_text().map(String::from))
    }

    /// Returns the number of set values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Returns true if no values are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}
