//! Thread-scoped trace storage.

use super::{TraceKey, TraceKeyRegistry, TraceSnapshot};
use crate::errors::UnknownKeyError;
use dashmap::DashMap;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, ThreadId};
use tracing::debug;

/// An opaque value bound to a trace key on one thread.
///
/// The engine stores and carries blobs without interpreting their
/// contents. The `Object` variant holds a host-defined reference that only
/// the owning host can downcast.
#[derive(Clone)]
pub enum TraceBlob {
    /// A string payload.
    Text(String),
    /// A structured JSON payload.
    Json(serde_json::Value),
    /// A host object reference, opaque to the engine.
    Object(Arc<dyn Any + Send + Sync>),
}

impl TraceBlob {
    /// Creates a text blob.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Creates a JSON blob.
    #[must_use]
    pub fn json(value: serde_json::Value) -> Self {
        Self::Json(value)
    }

    /// Creates an opaque object blob.
    #[must_use]
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Self::Object(Arc::new(value))
    }

    /// Returns the text payload, if this is a text blob.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the JSON payload, if this is a JSON blob.
    #[must_use]
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Downcasts an object blob to a concrete host type.
    #[must_use]
    pub fn downcast_object<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Object(value) => Arc::clone(value).downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl fmt::Debug for TraceBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.debug_tuple("Text").field(value).finish(),
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
            // Object contents are host-opaque.
            Self::Object(_) => f.write_str("Object(..)"),
        }
    }
}

impl PartialEq for TraceBlob {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Json(a), Self::Json(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for TraceBlob {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for TraceBlob {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<serde_json::Value> for TraceBlob {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// Per-thread associative storage mapping trace keys to opaque blobs.
///
/// Conceptually a `ThreadId -> (TraceKey -> TraceBlob)` table where each
/// thread only ever touches its own row, so rows need no lock discipline
/// beyond the map shard. The only cross-thread effect is the explicit
/// carry the engine performs: `get_current` on the suspending thread,
/// `set_current` with that snapshot on the resuming thread.
#[derive(Debug)]
pub struct TraceContextStore {
    registry: Arc<TraceKeyRegistry>,
    slots: DashMap<ThreadId, HashMap<TraceKey, TraceBlob>>,
}

impl TraceContextStore {
    /// Creates a store over the given key registry.
    #[must_use]
    pub fn new(registry: Arc<TraceKeyRegistry>) -> Self {
        Self {
            registry,
            slots: DashMap::new(),
        }
    }

    /// Returns the key registry this store validates against.
    #[must_use]
    pub fn registry(&self) -> &Arc<TraceKeyRegistry> {
        &self.registry
    }

    /// Snapshots the calling thread's slots.
    ///
    /// Every registered key appears in the result; keys with no prior
    /// write on this thread resolve to an explicit absence, never a
    /// placeholder value.
    #[must_use]
    pub fn get_current(&self) -> TraceSnapshot {
        let row = self.slots.get(&thread::current().id());

        let entries = self
            .registry
            .keys()
            .into_iter()
            .map(|key| {
                let blob = row.as_ref().and_then(|r| r.get(&key).cloned());
                (key, blob)
            })
            .collect::<HashMap<_, _>>();

        let snapshot = TraceSnapshot::from_entries(entries);
        debug!(
            keys = snapshot.len(),
            present = snapshot.present_count(),
            "captured trace snapshot"
        );
        snapshot
    }

    /// Writes the supplied values into the calling thread's slots.
    ///
    /// Supplied keys overwrite any prior value for that key on this
    /// thread; keys absent from `values` are left untouched, so a resuming
    /// thread can restore a subset captured earlier.
    ///
    /// # Errors
    ///
    /// Returns `UnknownKeyError` if any key is not registered. All keys
    /// are validated before anything is written, so a rejected call leaves
    /// the store unchanged.
    pub fn set_current(
        &self,
        values: HashMap<TraceKey, TraceBlob>,
    ) -> Result<(), UnknownKeyError> {
        for key in values.keys() {
            if !self.registry.contains(key) {
                return Err(UnknownKeyError::new(key.as_str()));
            }
        }

        let written = values.len();
        self.slots
            .entry(thread::current().id())
            .or_default()
            .extend(values);

        debug!(written, "restored trace values");
        Ok(())
    }

    /// Reads one key from the calling thread's slots.
    #[must_use]
    pub fn get_value(&self, key: &TraceKey) -> Option<TraceBlob> {
        self.slots
            .get(&thread::current().id())
            .and_then(|row| row.get(key).cloned())
    }

    /// Writes one key into the calling thread's slots.
    ///
    /// # Errors
    ///
    /// Returns `UnknownKeyError` if the key is not registered.
    pub fn set_value(
        &self,
        key: impl Into<TraceKey>,
        blob: TraceBlob,
    ) -> Result<(), UnknownKeyError> {
        let key = key.into();
        if !self.registry.contains(&key) {
            return Err(UnknownKeyError::new(key.as_str()));
        }

        self.slots
            .entry(thread::current().id())
            .or_default()
            .insert(key, blob);
        Ok(())
    }
}
