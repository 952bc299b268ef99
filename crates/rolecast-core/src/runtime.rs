//! Process-wide composition root
//!
//! One [`Runtime`] per process, installed explicitly and torn down
//! explicitly. Consumers receive it by reference; nothing self-constructs
//! on first use.

use crate::config::CoreConfig;
use crate::error::RuntimeError;
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use rolecast_role::{register_builtin_locales, register_builtin_logins, RoleRegistry};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

static RUNTIME: RwLock<Option<Arc<Runtime>>> = RwLock::new(None);
static TRACING: OnceCell<()> = OnceCell::new();

/// Process-wide service holder
#[derive(Debug)]
pub struct Runtime {
    config: CoreConfig,
    registry: Mutex<RoleRegistry>,
}

impl Runtime {
    /// Install the process-wide instance
    ///
    /// The held registry starts populated with the built-in login and
    /// locale roles.
    ///
    /// # Errors
    /// [`RuntimeError::AlreadyInitialized`] while an instance is installed.
    pub fn init(config: CoreConfig) -> Result<Arc<Self>, RuntimeError> {
        let mut slot = RUNTIME.write();
        if slot.is_some() {
            return Err(RuntimeError::AlreadyInitialized);
        }

        let mut registry = RoleRegistry::new();
        register_builtin_logins(&mut registry);
        register_builtin_locales(&mut registry);

        let runtime = Arc::new(Self {
            config,
            registry: Mutex::new(registry),
        });
        *slot = Some(Arc::clone(&runtime));
        tracing::info!("runtime initialized");
        Ok(runtime)
    }

    /// Fetch the installed instance
    ///
    /// # Errors
    /// [`RuntimeError::NotInitialized`] before [`Runtime::init`].
    pub fn global() -> Result<Arc<Self>, RuntimeError> {
        RUNTIME
            .read()
            .as_ref()
            .map(Arc::clone)
            .ok_or(RuntimeError::NotInitialized)
    }

    /// Tear down the process-wide instance
    ///
    /// Returns whether an instance was installed. Outstanding handles stay
    /// valid; only the global slot is cleared.
    pub fn shutdown() -> bool {
        let had = RUNTIME.write().take().is_some();
        if had {
            tracing::info!("runtime shut down");
        }
        had
    }

    /// Configuration the runtime was installed with
    #[inline]
    #[must_use]
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Run `f` with exclusive access to the shared role registry
    pub fn with_registry<T>(&self, f: impl FnOnce(&mut RoleRegistry) -> T) -> T {
        f(&mut self.registry.lock())
    }

    /// Install the tracing subscriber once per process
    ///
    /// Later calls are no-ops, so tests and embedders may call this freely.
    pub fn init_tracing(&self) {
        TRACING.get_or_init(|| {
            let filter = EnvFilter::try_new(&self.config.log_filter)
                .unwrap_or_else(|_| EnvFilter::new("info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .try_init()
                .ok();
        });
    }
}
