//! Transition-table state machine
//!
//! States and events are plain `Copy` enums. The table records which
//! targets each `(state, event)` pair may reach; validation rejects both
//! events with no row and handler-proposed targets outside the row.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Allowed-transition table: `(state, event) -> {targets}`
#[derive(Debug, Clone)]
pub struct TransitionTable<S, E> {
    edges: HashMap<(S, E), Vec<S>>,
}

impl<S, E> Default for TransitionTable<S, E> {
    fn default() -> Self {
        Self {
            edges: HashMap::new(),
        }
    }
}

impl<S, E> TransitionTable<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    /// Create an empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `event` in `state` to reach `target`
    #[must_use]
    pub fn allow(mut self, state: S, event: E, target: S) -> Self {
        let targets = self.edges.entry((state, event)).or_default();
        if !targets.contains(&target) {
            targets.push(target);
        }
        self
    }

    /// Targets reachable from `state` via `event`, in registration order
    #[must_use]
    pub fn allowed_targets(&self, state: S, event: E) -> &[S] {
        self.edges
            .get(&(state, event))
            .map_or(&[] as &[S], Vec::as_slice)
    }

    /// Events with at least one target defined for `state`
    #[must_use]
    pub fn events_from(&self, state: S) -> Vec<E> {
        self.edges
            .keys()
            .filter(|(s, _)| *s == state)
            .map(|(_, e)| *e)
            .collect()
    }

    /// Confirm `(state, event)` has at least one allowed target
    ///
    /// # Errors
    /// [`MachineError::UndefinedEvent`] when the pair has no row.
    pub fn ensure_defined(&self, state: S, event: E) -> Result<(), MachineError> {
        if self.edges.contains_key(&(state, event)) {
            Ok(())
        } else {
            Err(MachineError::undefined(state, event))
        }
    }

    /// Validate a proposed transition
    ///
    /// # Errors
    /// [`MachineError::UndefinedEvent`] when `(state, event)` has no row,
    /// [`MachineError::IllegalTarget`] when `target` is not in the row.
    pub fn validate(&self, state: S, event: E, target: S) -> Result<(), MachineError> {
        let targets = self
            .edges
            .get(&(state, event))
            .ok_or_else(|| MachineError::undefined(state, event))?;
        if targets.contains(&target) {
            Ok(())
        } else {
            Err(MachineError::illegal(state, target))
        }
    }
}

/// Table plus current state
#[derive(Debug, Clone)]
pub struct Machine<S, E> {
    table: TransitionTable<S, E>,
    current: S,
}

impl<S, E> Machine<S, E>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    /// Create a machine in its designated initial state
    #[inline]
    #[must_use]
    pub fn new(table: TransitionTable<S, E>, initial: S) -> Self {
        Self {
            table,
            current: initial,
        }
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn current(&self) -> S {
        self.current
    }

    /// The underlying transition table
    #[inline]
    #[must_use]
    pub fn table(&self) -> &TransitionTable<S, E> {
        &self.table
    }

    /// Validate and commit one transition
    ///
    /// The machine is left in exactly one well-defined state whether or not
    /// the transition is accepted: `current` on failure, `target` on
    /// success.
    ///
    /// # Errors
    /// Validation errors pass through from [`TransitionTable::validate`].
    pub fn fire(&mut self, event: E, target: S) -> Result<S, MachineError> {
        self.table.validate(self.current, event, target)?;
        self.current = target;
        Ok(target)
    }
}

/// State-machine violations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MachineError {
    /// Event not defined for the current state
    #[error("no transition defined for event {event} in state {state}")]
    UndefinedEvent {
        /// State the machine was in
        state: String,
        /// The rejected event
        event: String,
    },

    /// Handler proposed a target outside the allowed set
    #[error("illegal transition target {to} from state {from}")]
    IllegalTarget {
        /// State the machine was in
        from: String,
        /// The rejected target
        to: String,
    },
}

impl MachineError {
    fn undefined<S: Debug, E: Debug>(state: S, event: E) -> Self {
        Self::UndefinedEvent {
            state: format!("{state:?}"),
            event: format!("{event:?}"),
        }
    }

    fn illegal<S: Debug>(from: S, to: S) -> Self {
        Self::IllegalTarget {
            from: format!("{from:?}"),
            to: format!("{to:?}"),
        }
    }
}
