//! Locale-bound profile roles
//!
//! The locale decides language and currency. Resolution goes through the
//! registry, so an unknown locale surfaces as an explicit lookup failure at
//! the resolution point rather than a message deep in construction code.

use crate::registry::RoleRegistry;
use crate::role::{Request, Response, Role, RoleError};
use std::sync::Arc;

/// Operation name accepted by profile roles
pub const PROFILE_OPERATION: &str = "profile";

/// Profile defaults for one locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleProfile {
    locale: String,
    language: String,
    currency: String,
}

impl LocaleProfile {
    /// Create a profile role for a locale
    #[must_use]
    pub fn new(
        locale: impl Into<String>,
        language: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            locale: locale.into(),
            language: language.into(),
            currency: currency.into(),
        }
    }

    /// United States: English, USD
    #[must_use]
    pub fn us() -> Self {
        Self::new("us", "English", "USD")
    }

    /// United Kingdom: English, GBP
    #[must_use]
    pub fn uk() -> Self {
        Self::new("uk", "English", "GBP")
    }

    /// China: Chinese, RMB
    #[must_use]
    pub fn china() -> Self {
        Self::new("china", "Chinese", "RMB")
    }

    /// Japan: Japanese, JPY
    #[must_use]
    pub fn japan() -> Self {
        Self::new("japan", "Japanese", "JPY")
    }

    /// Profile language
    #[inline]
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Profile currency
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }
}

impl Role for LocaleProfile {
    fn key(&self) -> &str {
        &self.locale
    }

    fn perform(&self, request: &Request) -> Result<Response, RoleError> {
        if request.operation() != PROFILE_OPERATION {
            return Err(RoleError::unsupported(request.operation()));
        }

        Ok(Response::new(format!("Profile for locale {}", self.locale))
            .with_data("language", self.language.clone())
            .with_data("currency", self.currency.clone()))
    }
}

/// Register the built-in locales under their own keys
pub fn register_builtin_locales(registry: &mut RoleRegistry) {
    registry.register(Arc::new(LocaleProfile::us()));
    registry.register(Arc::new(LocaleProfile::uk()));
    registry.register(Arc::new(LocaleProfile::china()));
    registry.register(Arc::new(LocaleProfile::japan()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryError;

    #[test]
    fn profile_data_carries_language_and_currency() {
        let role = LocaleProfile::japan();
        let response = role.perform(&Request::new(PROFILE_OPERATION)).unwrap();

        assert_eq!(
            response.data().get("language").and_then(|v| v.as_str()),
            Some("Japanese")
        );
        assert_eq!(
            response.data().get("currency").and_then(|v| v.as_str()),
            Some("JPY")
        );
    }

    #[test]
    fn unknown_locale_is_a_lookup_failure() {
        let mut registry = RoleRegistry::new();
        register_builtin_locales(&mut registry);

        let err = registry.resolve("mars").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownKey { .. }));
    }

    #[test]
    fn non_profile_operation_is_unsupported() {
        let role = LocaleProfile::us();
        let err = role.perform(&Request::new("checkout")).unwrap_err();

        assert!(matches!(err, RoleError::Unsupported { .. }));
    }
}
