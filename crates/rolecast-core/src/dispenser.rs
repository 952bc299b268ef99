//! Candy dispenser state machine
//!
//! The classic coin-and-knob dispenser: each state is a role variant
//! resolved from a registry, the context delegates every event to the
//! current state's role, and the proposed next state is validated against
//! the transition table before it is committed. Undefined events fail with
//! a transition error instead of a scolding message.

use crate::context::Context;
use crate::error::CoreError;
use crate::machine::{Machine, TransitionTable};
use rolecast_notify::{DeliveryReport, ListenerHandle, ListenerId, Subject};
use rolecast_role::{Request, Response, Role, RoleError, RoleRegistry};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Event kind emitted after every accepted dispenser event
pub const STATE_CHANGED_EVENT: &str = "state_changed";

const NEXT_KEY: &str = "next";
const DISPENSE_KEY: &str = "dispense";
const RESTOCK_KEY: &str = "restock";
const STOCK_ARG: &str = "stock";
const UNITS_ARG: &str = "units";

/// Dispenser states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispenserState {
    /// No coin inserted (initial)
    NoCoin,
    /// Coin captured, knob not yet turned
    HasCoin,
    /// Knob turned with stock available; dispensing in progress
    HasCandy,
    /// Knob turned with an empty hopper; coin still captured
    NoCandy,
}

impl DispenserState {
    /// Registry key for this state's role
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::NoCoin => "no_coin",
            Self::HasCoin => "has_coin",
            Self::HasCandy => "has_candy",
            Self::NoCandy => "no_candy",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "no_coin" => Some(Self::NoCoin),
            "has_coin" => Some(Self::HasCoin),
            "has_candy" => Some(Self::HasCandy),
            "no_candy" => Some(Self::NoCandy),
            _ => None,
        }
    }
}

/// Dispenser events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispenserEvent {
    /// A coin enters the slot
    InsertCoin,
    /// The eject lever is pulled
    EjectCoin,
    /// The knob is turned
    TurnKnob,
    /// A candy drops (internal follow-up to a successful knob turn)
    Dispense,
    /// The hopper is refilled
    Restock,
}

impl DispenserEvent {
    /// Operation name used for role requests
    #[must_use]
    pub fn operation(self) -> &'static str {
        match self {
            Self::InsertCoin => "insert_coin",
            Self::EjectCoin => "eject_coin",
            Self::TurnKnob => "turn_knob",
            Self::Dispense => "dispense",
            Self::Restock => "restock",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct NoCoinRole;

impl Role for NoCoinRole {
    fn key(&self) -> &str {
        DispenserState::NoCoin.key()
    }

    fn perform(&self, request: &Request) -> Result<Response, RoleError> {
        match request.operation() {
            "insert_coin" => Ok(Response::new("You inserted a coin")
                .with_data(NEXT_KEY, DispenserState::HasCoin.key())),
            "restock" => {
                let units = request.arg_u64(UNITS_ARG).ok_or_else(|| {
                    RoleError::InvalidArguments(format!("restock requires {UNITS_ARG}"))
                })?;
                Ok(Response::new(format!("Restocked {units} candies"))
                    .with_data(NEXT_KEY, DispenserState::NoCoin.key())
                    .with_data(RESTOCK_KEY, units))
            }
            other => Err(RoleError::unsupported(other)),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct HasCoinRole;

impl Role for HasCoinRole {
    fn key(&self) -> &str {
        DispenserState::HasCoin.key()
    }

    fn perform(&self, request: &Request) -> Result<Response, RoleError> {
        match request.operation() {
            "insert_coin" => Ok(Response::new("You have already got a coin inside")
                .with_data(NEXT_KEY, DispenserState::HasCoin.key())),
            "eject_coin" => Ok(Response::new("The machine returns your coin")
                .with_data(NEXT_KEY, DispenserState::NoCoin.key())),
            "turn_knob" => {
                let stock = request.arg_u64(STOCK_ARG).ok_or_else(|| {
                    RoleError::InvalidArguments(format!("turn_knob requires {STOCK_ARG}"))
                })?;
                if stock > 0 {
                    Ok(Response::new("Checking the hopper for candies")
                        .with_data(NEXT_KEY, DispenserState::HasCandy.key()))
                } else {
                    Ok(Response::new("Checking the hopper for candies")
                        .with_detail("No more candy left, sorry")
                        .with_data(NEXT_KEY, DispenserState::NoCandy.key()))
                }
            }
            other => Err(RoleError::unsupported(other)),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct HasCandyRole;

impl Role for HasCandyRole {
    fn key(&self) -> &str {
        DispenserState::HasCandy.key()
    }

    fn perform(&self, request: &Request) -> Result<Response, RoleError> {
        match request.operation() {
            "dispense" => {
                let stock = request.arg_u64(STOCK_ARG).ok_or_else(|| {
                    RoleError::InvalidArguments(format!("dispense requires {STOCK_ARG}"))
                })?;
                if stock == 0 {
                    return Err(RoleError::Failed(
                        "dispensing from an empty hopper".to_string(),
                    ));
                }
                Ok(Response::new("One candy drops out")
                    .with_detail(format!("Candies left: {}", stock - 1))
                    .with_data(NEXT_KEY, DispenserState::NoCoin.key())
                    .with_data(DISPENSE_KEY, true))
            }
            other => Err(RoleError::unsupported(other)),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct NoCandyRole;

impl Role for NoCandyRole {
    fn key(&self) -> &str {
        DispenserState::NoCandy.key()
    }

    fn perform(&self, request: &Request) -> Result<Response, RoleError> {
        match request.operation() {
            "insert_coin" => Ok(Response::new("Your coin is still inside")
                .with_data(NEXT_KEY, DispenserState::NoCandy.key())),
            "eject_coin" => Ok(Response::new("The machine returns your coin")
                .with_data(NEXT_KEY, DispenserState::NoCoin.key())),
            other => Err(RoleError::unsupported(other)),
        }
    }
}

/// Coin-and-knob candy dispenser
///
/// Starts in [`DispenserState::NoCoin`]. There is no terminal state; the
/// machine cycles for as long as coins and candies keep coming.
#[derive(Debug)]
pub struct Dispenser {
    context: Context,
    machine: Machine<DispenserState, DispenserEvent>,
    registry: RoleRegistry,
    subject: Subject,
    stock: u64,
}

impl Dispenser {
    /// Create a dispenser loaded with `stock` candies
    #[must_use]
    pub fn new(name: impl Into<String>, stock: u64) -> Self {
        let name = name.into();
        let registry = Self::state_registry();
        let mut context = Context::new(format!("{name}-context"));
        // The registry is fully populated above; the initial assignment
        // cannot miss.
        let initial = registry
            .resolve(DispenserState::NoCoin.key())
            .unwrap_or_else(|_| Arc::new(NoCoinRole));
        context.set_role(initial);
        Self {
            context,
            machine: Machine::new(Self::transitions(), DispenserState::NoCoin),
            registry,
            subject: Subject::new(name),
            stock,
        }
    }

    /// The dispenser's allowed-transition table
    #[must_use]
    pub fn transitions() -> TransitionTable<DispenserState, DispenserEvent> {
        use DispenserEvent as E;
        use DispenserState as S;
        TransitionTable::new()
            .allow(S::NoCoin, E::InsertCoin, S::HasCoin)
            .allow(S::NoCoin, E::Restock, S::NoCoin)
            .allow(S::HasCoin, E::InsertCoin, S::HasCoin)
            .allow(S::HasCoin, E::EjectCoin, S::NoCoin)
            .allow(S::HasCoin, E::TurnKnob, S::HasCandy)
            .allow(S::HasCoin, E::TurnKnob, S::NoCandy)
            .allow(S::HasCandy, E::Dispense, S::NoCoin)
            .allow(S::NoCandy, E::InsertCoin, S::NoCandy)
            .allow(S::NoCandy, E::EjectCoin, S::NoCoin)
    }

    fn state_registry() -> RoleRegistry {
        let mut registry = RoleRegistry::new();
        registry.register(Arc::new(NoCoinRole));
        registry.register(Arc::new(HasCoinRole));
        registry.register(Arc::new(HasCandyRole));
        registry.register(Arc::new(NoCandyRole));
        registry
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> DispenserState {
        self.machine.current()
    }

    /// Candies remaining in the hopper
    #[inline]
    #[must_use]
    pub fn stock(&self) -> u64 {
        self.stock
    }

    /// Subscribe a listener to state-change snapshots
    pub fn subscribe(&mut self, listener: ListenerHandle) {
        self.subject.subscribe(listener);
    }

    /// Remove a listener; absent ids are a no-op
    pub fn unsubscribe(&mut self, id: &ListenerId) -> bool {
        self.subject.unsubscribe(id)
    }

    /// Insert a coin
    ///
    /// # Errors
    /// Transition errors for states that define no response to a coin.
    pub fn insert_coin(&mut self) -> Result<Response, CoreError> {
        let request = self.request_for(DispenserEvent::InsertCoin);
        self.dispatch(DispenserEvent::InsertCoin, &request)
    }

    /// Pull the eject lever
    ///
    /// # Errors
    /// [`CoreError::Machine`] with an undefined-event error when there is
    /// no coin to eject.
    pub fn eject_coin(&mut self) -> Result<Response, CoreError> {
        let request = self.request_for(DispenserEvent::EjectCoin);
        self.dispatch(DispenserEvent::EjectCoin, &request)
    }

    /// Turn the knob
    ///
    /// With stock available this dispenses one candy and returns to
    /// [`DispenserState::NoCoin`]; with an empty hopper the machine moves
    /// to [`DispenserState::NoCandy`] and keeps the coin.
    ///
    /// # Errors
    /// Transition errors when the current state defines no knob response.
    pub fn turn_knob(&mut self) -> Result<Response, CoreError> {
        let request = self.request_for(DispenserEvent::TurnKnob);
        let mut response = self.dispatch(DispenserEvent::TurnKnob, &request)?;
        // A successful knob turn advances straight through the dispensing
        // state.
        if self.machine.current() == DispenserState::HasCandy {
            let follow_up = self.request_for(DispenserEvent::Dispense);
            let dropped = self.dispatch(DispenserEvent::Dispense, &follow_up)?;
            response = response.merge(dropped);
        }
        Ok(response)
    }

    /// Refill the hopper
    ///
    /// # Errors
    /// Transition errors while a coin is captured; eject it first.
    pub fn restock(&mut self, units: u64) -> Result<Response, CoreError> {
        let request = self
            .request_for(DispenserEvent::Restock)
            .with_arg(UNITS_ARG, units);
        self.dispatch(DispenserEvent::Restock, &request)
    }

    fn request_for(&self, event: DispenserEvent) -> Request {
        Request::new(event.operation()).with_arg(STOCK_ARG, self.stock)
    }

    fn dispatch(
        &mut self,
        event: DispenserEvent,
        request: &Request,
    ) -> Result<Response, CoreError> {
        let state = self.machine.current();
        self.machine.table().ensure_defined(state, event)?;

        let response = self.context.delegate(request)?;
        let next_key = response
            .data()
            .get(NEXT_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                CoreError::StateRole(format!("role for {state:?} named no target state"))
            })?;
        let next = DispenserState::from_key(next_key).ok_or_else(|| {
            CoreError::StateRole(format!("unknown target state key: {next_key}"))
        })?;
        self.machine.fire(event, next)?;

        if response.data().get(DISPENSE_KEY).and_then(Value::as_bool) == Some(true) {
            self.stock = self.stock.saturating_sub(1);
        }
        if let Some(units) = response.data().get(RESTOCK_KEY).and_then(Value::as_u64) {
            self.stock += units;
        }
        if next != state {
            self.context.assign(&self.registry, next.key())?;
        }
        self.publish(event, &response);
        Ok(response)
    }

    fn publish(&mut self, event: DispenserEvent, response: &Response) -> DeliveryReport {
        let mut payload = Map::new();
        payload.insert(
            "state".to_string(),
            Value::from(self.machine.current().key()),
        );
        payload.insert("stock".to_string(), Value::from(self.stock));
        payload.insert(
            "operation".to_string(),
            Value::from(event.operation()),
        );
        payload.insert("summary".to_string(), Value::from(response.summary()));
        self.subject.notify(STATE_CHANGED_EVENT, payload)
    }
}
