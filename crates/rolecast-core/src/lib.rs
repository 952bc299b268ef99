//! Role-holding contexts and state machines
//!
//! The glue between swappable roles and the outside world:
//! - A [`Context`] holds the active [`rolecast_role::Role`], delegates
//!   operations to it, and notifies listeners with owned snapshots
//! - A [`TransitionTable`] records which transitions each state allows, and
//!   a [`Machine`] commits validated transitions
//! - The [`Dispenser`] wires both together: one role per state, resolved
//!   from a registry, guarded by the table
//! - A [`Runtime`] is the explicit process-wide composition root
//!
//! # Example
//!
//! ```rust
//! use rolecast_core::Dispenser;
//!
//! let mut dispenser = Dispenser::new("lobby", 1);
//! dispenser.insert_coin().unwrap();
//! let response = dispenser.turn_knob().unwrap();
//! assert_eq!(dispenser.stock(), 0);
//! assert!(response.summary().contains("Checking the hopper"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod context;
pub mod dispenser;
pub mod error;
pub mod machine;
pub mod runtime;

pub use config::CoreConfig;
pub use context::{Context, ContextSnapshot, DELEGATED_EVENT};
pub use dispenser::{Dispenser, DispenserEvent, DispenserState, STATE_CHANGED_EVENT};
pub use error::{ContextError, CoreError, RuntimeError};
pub use machine::{Machine, MachineError, TransitionTable};
pub use runtime::Runtime;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with rolecast
    pub use crate::{
        Context, ContextError, CoreConfig, CoreError, Dispenser, DispenserEvent, DispenserState,
        Machine, MachineError, Runtime, TransitionTable,
    };
    pub use rolecast_notify::{
        BufferedFollower, Event, Listener, ListenerError, ListenerHandle, ListenerId, MemorySink,
        NullSink, OutputSink, Subject,
    };
    pub use rolecast_role::{Request, Response, Role, RoleError, RoleRegistry};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
