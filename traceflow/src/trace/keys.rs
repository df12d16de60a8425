//! Trace key registration.

use crate::errors::DuplicateKeyError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a class of host-opaque trace data.
///
/// One key typically exists per host-integration channel. Keys are
/// registered once and never removed at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceKey(String);

impl TraceKey {
    /// Creates a new trace key.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the key name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TraceKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TraceKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// The set of known trace keys.
///
/// The snapshot/restore protocol iterates a closed, known key set, so the
/// registry returns the same registration-ordered sequence for the
/// lifetime of the process and rejects duplicates. There is no removal
/// operation.
///
/// The registry is an injectable instance shared between the store and the
/// engine rather than ambient global state; tests construct independent
/// registries per case.
#[derive(Debug, Default)]
pub struct TraceKeyRegistry {
    keys: RwLock<Vec<TraceKey>>,
}

impl TraceKeyRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry seeded with the given keys.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKeyError` if the same key appears twice.
    pub fn with_keys<I, K>(keys: I) -> Result<Self, DuplicateKeyError>
    where
        I: IntoIterator<Item = K>,
        K: Into<TraceKey>,
    {
        let registry = Self::new();
        for key in keys {
            registry.register(key)?;
        }
        Ok(registry)
    }

    /// Registers a trace key.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKeyError` if the key is already registered.
    pub fn register(&self, key: impl Into<TraceKey>) -> Result<(), DuplicateKeyError> {
        let key = key.into();
        let mut keys = self.keys.write();

        if keys.contains(&key) {
            return Err(DuplicateKeyError::new(key.as_str()));
        }

        keys.push(key);
        Ok(())
    }

    /// Returns the registered keys in registration order.
    #[must_use]
    pub fn keys(&self) -> Vec<TraceKey> {
        self.keys.read().clone()
    }

    /// Checks whether a key is registered.
    #[must_use]
    pub fn contains(&self, key: &TraceKey) -> bool {
        self.keys.read().contains(key)
    }

    /// Returns the number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    /// Returns true if no keys are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_contains() {
        let registry = TraceKeyRegistry::new();
        registry.register("host-channel").unwrap();

        assert!(registry.contains(&TraceKey::new("host-channel")));
        assert!(!registry.contains(&TraceKey::new("other")));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_duplicate() {
        let registry = TraceKeyRegistry::new();
        registry.register("host-channel").unwrap();

        let result = registry.register("host-channel");
        assert!(result.is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_keys_preserve_registration_order() {
        let registry = TraceKeyRegistry::new();
        registry.register("c").unwrap();
        registry.register("a").unwrap();
        registry.register("b").unwrap();

        let names: Vec<String> = registry
            .keys()
            .iter()
            .map(|k| k.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_keys_stable_across_calls() {
        let registry = TraceKeyRegistry::new();
        registry.register("x").unwrap();
        registry.register("y").unwrap();

        assert_eq!(registry.keys(), registry.keys());
    }

    #[test]
    fn test_with_keys() {
        let registry = TraceKeyRegistry::with_keys(["a", "b"]).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_with_keys_duplicate() {
        let result = TraceKeyRegistry::with_keys(["a", "a"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_key_display() {
        let key = TraceKey::new("session-id");
        assert_eq!(key.to_string(), "session-id");
    }

    #[test]
    fn test_key_serialization() {
        let key = TraceKey::new("session-id");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"session-id\"");

        let back: TraceKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
