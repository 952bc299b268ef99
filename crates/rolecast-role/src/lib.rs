//! Role contract and registry
//!
//! The common mechanism behind swappable-behavior designs: a [`Role`] is a
//! named, self-contained capability implementation, and a [`RoleRegistry`]
//! is the single resolution point mapping discriminator keys to roles.
//!
//! # Core Concepts
//!
//! - [`Role`]: the capability contract every variant satisfies
//! - [`RoleRegistry`]: key-to-role mapping with explicit lookup failures
//! - [`ProviderLogin`]: built-in identity-provider login variants
//! - [`LocaleProfile`]: built-in locale profile variants
//!
//! # Example
//!
//! ```rust
//! use rolecast_role::{register_builtin_logins, Request, RoleRegistry};
//!
//! let mut registry = RoleRegistry::new();
//! register_builtin_logins(&mut registry);
//!
//! let role = registry.resolve("google").unwrap();
//! let response = role.perform(&Request::new("login")).unwrap();
//! assert!(response.summary().contains("Google"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod login;
mod profile;
mod registry;
mod role;

pub use login::{register_builtin_logins, ProviderLogin, LOGIN_OPERATION};
pub use profile::{register_builtin_locales, LocaleProfile, PROFILE_OPERATION};
pub use registry::{RegistryError, RoleFactory, RoleRegistry};
pub use role::{Request, Response, Role, RoleError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
