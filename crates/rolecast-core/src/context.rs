//! Role-holding context with observable state
//!
//! A [`Context`] owns the current role reference and an embedded
//! [`Subject`]; every successful delegation publishes a snapshot of the
//! observable state to subscribers.

use crate::error::ContextError;
use rolecast_notify::{DeliveryReport, ListenerHandle, ListenerId, Subject};
use rolecast_role::{Request, Response, Role, RoleRegistry};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Event kind emitted after every successful delegation
pub const DELEGATED_EVENT: &str = "delegated";

/// Holds the active role and delegates operations to it
///
/// Exactly one role is active at a time. The role in place when a delegated
/// call starts handles the entire call; a swap takes effect for subsequent
/// calls only.
#[derive(Debug)]
pub struct Context {
    name: String,
    role: Option<Arc<dyn Role>>,
    subject: Subject,
    delegations: u64,
    last_operation: Option<String>,
}

impl Context {
    /// Create a context with no role installed
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            subject: Subject::new(name.clone()),
            name,
            role: None,
            delegations: 0,
            last_operation: None,
        }
    }

    /// Context name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key of the active role, if any
    #[inline]
    #[must_use]
    pub fn role_key(&self) -> Option<&str> {
        self.role.as_deref().map(Role::key)
    }

    /// Install `role` for all subsequent delegated calls
    pub fn set_role(&mut self, role: Arc<dyn Role>) {
        tracing::info!(context = %self.name, role = role.key(), "role installed");
        self.role = Some(role);
    }

    /// Resolve `key` in `registry` and install the result
    ///
    /// # Errors
    /// [`ContextError::Registry`] when the key is unknown; the current role
    /// is left untouched in that case.
    pub fn assign(&mut self, registry: &RoleRegistry, key: &str) -> Result<(), ContextError> {
        let role = registry.resolve(key)?;
        self.set_role(role);
        Ok(())
    }

    /// Drop the active role
    pub fn clear_role(&mut self) {
        self.role = None;
    }

    /// Subscribe a listener to delegation snapshots
    pub fn subscribe(&mut self, listener: ListenerHandle) {
        self.subject.subscribe(listener);
    }

    /// Remove a listener; absent ids are a no-op
    pub fn unsubscribe(&mut self, id: &ListenerId) -> bool {
        self.subject.unsubscribe(id)
    }

    /// Number of subscribed listeners
    #[inline]
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subject.subscriber_count()
    }

    /// Forward `request` to the active role
    ///
    /// The role active when the call starts is pinned for the whole call.
    /// After a successful delegation every listener synchronously receives
    /// an owned snapshot of the observable state.
    ///
    /// # Errors
    /// [`ContextError::NoRoleSet`] before any role is installed; role
    /// failures pass through as [`ContextError::Role`].
    pub fn delegate(&mut self, request: &Request) -> Result<Response, ContextError> {
        let role = self.role.clone().ok_or(ContextError::NoRoleSet)?;
        tracing::debug!(
            context = %self.name,
            role = role.key(),
            operation = request.operation(),
            "delegating"
        );
        let response = role.perform(request)?;
        self.delegations += 1;
        self.last_operation = Some(request.operation().to_string());
        self.publish(&response);
        Ok(response)
    }

    /// Owned copy of the observable state
    #[must_use]
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            context: self.name.clone(),
            role: self.role_key().map(str::to_string),
            delegations: self.delegations,
            last_operation: self.last_operation.clone(),
        }
    }

    fn publish(&mut self, response: &Response) -> DeliveryReport {
        let mut payload = self.snapshot().into_payload();
        payload.insert("summary".to_string(), Value::from(response.summary()));
        self.subject.notify(DELEGATED_EVENT, payload)
    }
}

/// Value-semantics copy of a context's observable state
///
/// Everything is owned; a listener holding a snapshot cannot reach back
/// into the context it describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextSnapshot {
    /// Context name
    pub context: String,
    /// Active role key
    pub role: Option<String>,
    /// Completed delegation count
    pub delegations: u64,
    /// Most recent operation name
    pub last_operation: Option<String>,
}

impl ContextSnapshot {
    fn into_payload(self) -> Map<String, Value> {
        match serde_json::to_value(&self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
