//! Role registry keyed by string discriminator
//!
//! Provides [`RoleRegistry`] as the single resolution point for role
//! lookup. Registration maps a key to a shared instance or a constructor;
//! resolution of an unknown key is an explicit failure, never a silent
//! default.

use crate::role::Role;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Constructor invoked each time a factory-registered key resolves
pub type RoleFactory = Box<dyn Fn() -> Arc<dyn Role> + Send + Sync>;

enum Entry {
    Instance(Arc<dyn Role>),
    Factory(RoleFactory),
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(role) => f.debug_tuple("Instance").field(role).finish(),
            Self::Factory(_) => f.debug_tuple("Factory").finish(),
        }
    }
}

/// Registry mapping discriminator keys to roles
///
/// Keys are unique; registering a key twice overwrites the earlier entry.
/// Key listings follow insertion order so diagnostics stay deterministic.
#[derive(Debug, Default)]
pub struct RoleRegistry {
    entries: IndexMap<String, Entry>,
}

impl RoleRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Register a shared role instance under its own key
    pub fn register(&mut self, role: Arc<dyn Role>) {
        let key = role.key().to_string();
        self.register_as(key, role);
    }

    /// Register a shared role instance under an explicit key
    pub fn register_as(&mut self, key: impl Into<String>, role: Arc<dyn Role>) {
        let key = key.into();
        if self.entries.insert(key.clone(), Entry::Instance(role)).is_some() {
            tracing::warn!(key = %key, "overwriting existing role registration");
        } else {
            tracing::debug!(key = %key, "role registered");
        }
    }

    /// Register a constructor invoked on every resolve of `key`
    pub fn register_factory(&mut self, key: impl Into<String>, factory: RoleFactory) {
        let key = key.into();
        if self.entries.insert(key.clone(), Entry::Factory(factory)).is_some() {
            tracing::warn!(key = %key, "overwriting existing role registration");
        } else {
            tracing::debug!(key = %key, "role factory registered");
        }
    }

    /// Resolve a key to a role
    ///
    /// Instance keys return the same shared role on every call; factory
    /// keys return a fresh construction with equivalent behavior.
    ///
    /// # Errors
    /// [`RegistryError::UnknownKey`] when the key was never registered.
    pub fn resolve(&self, key: &str) -> Result<Arc<dyn Role>, RegistryError> {
        match self.entries.get(key) {
            Some(Entry::Instance(role)) => Ok(Arc::clone(role)),
            Some(Entry::Factory(factory)) => Ok(factory()),
            None => {
                tracing::debug!(key = %key, "role lookup missed");
                Err(RegistryError::UnknownKey {
                    key: key.to_string(),
                    known: self.keys().map(str::to_string).collect(),
                })
            }
        }
    }

    /// Whether `key` is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a key; removing an absent key returns `false`
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.shift_remove(key).is_some()
    }

    /// Registered keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered keys
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registry lookup errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Lookup for a key that was never registered
    #[error("unknown role key: {key} (registered: {known:?})")]
    UnknownKey {
        /// The missing key
        key: String,
        /// Keys registered at the time of the lookup
        known: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::{Request, Response, RoleError};

    #[derive(Debug)]
    struct EchoRole {
        key: String,
    }

    impl Role for EchoRole {
        fn key(&self) -> &str {
            &self.key
        }

        fn perform(&self, request: &Request) -> Result<Response, RoleError> {
            Ok(Response::new(format!("{}:{}", self.key, request.operation())))
        }
    }

    fn echo(key: &str) -> Arc<dyn Role> {
        Arc::new(EchoRole {
            key: key.to_string(),
        })
    }

    #[test]
    fn resolve_returns_same_instance() {
        let mut registry = RoleRegistry::new();
        registry.register(echo("a"));

        let first = registry.resolve("a").unwrap();
        let second = registry.resolve("a").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn resolve_unknown_key_fails() {
        let mut registry = RoleRegistry::new();
        registry.register(echo("a"));

        let err = registry.resolve("b").unwrap_err();
        let RegistryError::UnknownKey { key, known } = err;
        assert_eq!(key, "b");
        assert_eq!(known, vec!["a".to_string()]);
    }

    #[test]
    fn register_overwrites_existing_key() {
        let mut registry = RoleRegistry::new();
        registry.register_as("slot", echo("first"));
        registry.register_as("slot", echo("second"));

        assert_eq!(registry.len(), 1);
        let role = registry.resolve("slot").unwrap();
        assert_eq!(role.key(), "second");
    }

    #[test]
    fn factory_resolves_fresh_but_equivalent() {
        let mut registry = RoleRegistry::new();
        registry.register_factory("fresh", Box::new(|| echo("fresh")));

        let first = registry.resolve("fresh").unwrap();
        let second = registry.resolve("fresh").unwrap();
        assert!(!Arc::ptr_eq(&first, &second));

        let request = Request::new("ping");
        assert_eq!(
            first.perform(&request).unwrap(),
            second.perform(&request).unwrap()
        );
    }

    #[test]
    fn keys_follow_insertion_order() {
        let mut registry = RoleRegistry::new();
        registry.register(echo("b"));
        registry.register(echo("a"));
        registry.register(echo("c"));

        let keys: Vec<&str> = registry.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn remove_absent_key_is_noop() {
        let mut registry = RoleRegistry::new();
        registry.register(echo("a"));

        assert!(!registry.remove("missing"));
        assert!(registry.remove("a"));
        assert!(registry.is_empty());
    }
}
