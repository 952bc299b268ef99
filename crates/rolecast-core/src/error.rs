//! Layered error types
//!
//! Each concern keeps its own error enum; this module adds the context and
//! runtime layers and the top-level [`CoreError`] aggregation. Every
//! condition is a recoverable value returned to the caller: nothing here
//! panics, prints, or retries.

use crate::machine::MachineError;
use rolecast_role::{RegistryError, RoleError};

/// Context-level failures
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// Delegation before any role was installed
    #[error("no role set")]
    NoRoleSet,

    /// Active role rejected or failed the operation
    #[error(transparent)]
    Role(#[from] RoleError),

    /// Role resolution failed
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Composition-root lifecycle misuse
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// `init` called while an instance is installed
    #[error("runtime already initialized")]
    AlreadyInitialized,

    /// `global` called before `init`
    #[error("runtime not initialized")]
    NotInitialized,
}

/// Top-level error for core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Context failure
    #[error(transparent)]
    Context(#[from] ContextError),

    /// State machine violation
    #[error(transparent)]
    Machine(#[from] MachineError),

    /// Runtime lifecycle misuse
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// A state role broke the transition protocol
    #[error("state role protocol violation: {0}")]
    StateRole(String),
}

impl CoreError {
    /// True for a lookup of an unregistered key
    #[inline]
    #[must_use]
    pub fn is_unknown_key(&self) -> bool {
        matches!(
            self,
            Self::Context(ContextError::Registry(RegistryError::UnknownKey { .. }))
        )
    }

    /// True for an event the current state does not define
    #[inline]
    #[must_use]
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::Machine(MachineError::UndefinedEvent { .. }))
    }

    /// True for an operation outside the active role's capability set
    #[inline]
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::Context(ContextError::Role(RoleError::Unsupported { .. }))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_error_display() {
        assert_eq!(ContextError::NoRoleSet.to_string(), "no role set");
    }

    #[test]
    fn classification_helpers() {
        let unknown: CoreError = ContextError::Registry(RegistryError::UnknownKey {
            key: "x".to_string(),
            known: vec![],
        })
        .into();
        assert!(unknown.is_unknown_key());
        assert!(!unknown.is_invalid_transition());

        let unsupported: CoreError =
            ContextError::Role(RoleError::unsupported("fly")).into();
        assert!(unsupported.is_unsupported());
    }

    #[test]
    fn runtime_error_display() {
        assert!(RuntimeError::AlreadyInitialized
            .to_string()
            .contains("already"));
        assert!(RuntimeError::NotInitialized.to_string().contains("not"));
    }
}
