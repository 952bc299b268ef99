//! Identity-provider login roles
//!
//! Each provider is a self-contained [`Role`] whose `login` operation
//! returns the provider's authorisation walk as narration. Providers differ
//! only in their step sequence; callers swap them without touching the
//! login call site.

use crate::registry::RoleRegistry;
use crate::role::{Request, Response, Role, RoleError};
use std::sync::Arc;

/// Operation name accepted by login roles
pub const LOGIN_OPERATION: &str = "login";

/// Login through a named identity provider
#[derive(Debug, Clone)]
pub struct ProviderLogin {
    key: String,
    display_name: String,
    steps: Vec<String>,
}

impl ProviderLogin {
    /// Create a provider with its authorisation steps
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        display_name: impl Into<String>,
        steps: Vec<String>,
    ) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            steps,
        }
    }

    /// Facebook: redirect and authorise
    #[must_use]
    pub fn facebook() -> Self {
        Self::new(
            "facebook",
            "Facebook",
            vec![
                "Redirected to Facebook page for authorisation".to_string(),
                "Successfully logged on".to_string(),
            ],
        )
    }

    /// Google: redirect, mobile verification, authorise
    #[must_use]
    pub fn google() -> Self {
        Self::new(
            "google",
            "Google",
            vec![
                "Redirected to Google page for authorisation".to_string(),
                "Google asking for mobile verification".to_string(),
                "Mobile verification successful".to_string(),
                "Successfully logged on".to_string(),
            ],
        )
    }

    /// LinkedIn: redirect and authorise
    #[must_use]
    pub fn linkedin() -> Self {
        Self::new(
            "linkedin",
            "LinkedIn",
            vec![
                "Redirected to LinkedIn for authorisation".to_string(),
                "Successfully logged on".to_string(),
            ],
        )
    }

    /// Provider display name
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

impl Role for ProviderLogin {
    fn key(&self) -> &str {
        &self.key
    }

    fn perform(&self, request: &Request) -> Result<Response, RoleError> {
        if request.operation() != LOGIN_OPERATION {
            return Err(RoleError::unsupported(request.operation()));
        }

        let mut response = Response::new(format!(
            "Logging in with {} account",
            self.display_name
        ))
        .with_data("provider", self.key.clone());
        for step in &self.steps {
            response = response.with_detail(step.clone());
        }
        Ok(response)
    }
}

/// Register the built-in providers under their own keys
pub fn register_builtin_logins(registry: &mut RoleRegistry) {
    registry.register(Arc::new(ProviderLogin::facebook()));
    registry.register(Arc::new(ProviderLogin::google()));
    registry.register(Arc::new(ProviderLogin::linkedin()));
}
