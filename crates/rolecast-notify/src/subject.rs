//! Ordered synchronous fan-out

use crate::event::Event;
use crate::listener::{Listener, ListenerError, ListenerId};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a registered listener
///
/// The caller keeps its own handle to interact with the listener; the
/// subject holds one only for delivery.
pub type ListenerHandle = Arc<Mutex<dyn Listener>>;

/// One-to-many synchronous notification source
///
/// Delivery order equals subscription order. Each delivery pass walks a
/// stable snapshot of the subscription list, so listeners added or removed
/// mid-pass only affect the next pass.
pub struct Subject {
    name: String,
    listeners: Vec<(ListenerId, ListenerHandle)>,
    next_seq: u64,
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("name", &self.name)
            .field("subscribers", &self.listeners.len())
            .field("next_seq", &self.next_seq)
            .finish()
    }
}

impl Subject {
    /// Create a subject with no subscribers
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            listeners: Vec::new(),
            next_seq: 0,
        }
    }

    /// Subject name, used as the event source
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Subscribe a listener
    ///
    /// Re-subscribing an id that is already present replaces the handle in
    /// place and keeps its position in the delivery order.
    pub fn subscribe(&mut self, listener: ListenerHandle) {
        let id = listener.lock().id();
        if let Some(slot) = self
            .listeners
            .iter_mut()
            .find(|(existing, _)| *existing == id)
        {
            tracing::debug!(listener = %id, "listener handle replaced");
            slot.1 = listener;
        } else {
            tracing::debug!(listener = %id, "listener subscribed");
            self.listeners.push((id, listener));
        }
    }

    /// Remove a listener
    ///
    /// Removing an id that was never subscribed is a no-op returning
    /// `false`; other subscriptions are untouched either way.
    pub fn unsubscribe(&mut self, id: &ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| existing != id);
        let removed = self.listeners.len() != before;
        if removed {
            tracing::debug!(listener = %id, "listener unsubscribed");
        } else {
            tracing::debug!(listener = %id, "unsubscribe of unknown listener ignored");
        }
        removed
    }

    /// Number of current subscribers
    #[inline]
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    /// Subscriber ids in delivery order
    pub fn subscribers(&self) -> impl Iterator<Item = &ListenerId> {
        self.listeners.iter().map(|(id, _)| id)
    }

    /// Build the next event and deliver it to every current subscriber
    pub fn notify(
        &mut self,
        kind: impl Into<String>,
        payload: Map<String, Value>,
    ) -> DeliveryReport {
        self.next_seq += 1;
        let event = Event {
            seq: self.next_seq,
            source: self.name.clone(),
            kind: kind.into(),
            payload,
        };
        self.deliver(&event)
    }

    /// Deliver an already-built event
    ///
    /// A listener that fails is recorded in the report; delivery continues
    /// with the remaining subscribers.
    pub fn deliver(&self, event: &Event) -> DeliveryReport {
        // Stable snapshot: list mutation mid-pass affects the next pass only.
        let snapshot: Vec<(ListenerId, ListenerHandle)> = self.listeners.clone();
        let mut report = DeliveryReport::new(event.clone());
        for (id, handle) in snapshot {
            match handle.lock().on_event(event) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    tracing::warn!(listener = %id, error = %err, "listener failed during delivery");
                    report.failures.push((id, err));
                }
            }
        }
        report
    }
}

/// Outcome of one delivery pass
#[derive(Debug, Clone)]
pub struct DeliveryReport {
    /// The event that was delivered
    pub event: Event,
    /// Number of listeners that accepted the event
    pub delivered: usize,
    /// Listeners that failed, in delivery order
    pub failures: Vec<(ListenerId, ListenerError)>,
}

impl DeliveryReport {
    fn new(event: Event) -> Self {
        Self {
            event,
            delivered: 0,
            failures: Vec::new(),
        }
    }

    /// True when every subscriber accepted the event
    #[inline]
    #[must_use]
    pub fn all_delivered(&self) -> bool {
        self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    struct RecordingListener {
        id: ListenerId,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingListener {
        fn handle(name: &str, log: Arc<Mutex<Vec<String>>>) -> ListenerHandle {
            Arc::new(Mutex::new(Self {
                id: ListenerId::from(name),
                log,
            }))
        }
    }

    impl Listener for RecordingListener {
        fn id(&self) -> ListenerId {
            self.id.clone()
        }

        fn on_event(&mut self, event: &Event) -> Result<(), ListenerError> {
            self.log
                .lock()
                .push(format!("{}<-{}", self.id, event.describe()));
            Ok(())
        }
    }

    mockall::mock! {
        Flaky {}

        impl Listener for Flaky {
            fn id(&self) -> ListenerId;
            fn on_event(&mut self, event: &Event) -> Result<(), ListenerError>;
        }
    }

    #[test]
    fn delivery_order_matches_subscription_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut subject = Subject::new("feed");
        subject.subscribe(RecordingListener::handle("first", Arc::clone(&log)));
        subject.subscribe(RecordingListener::handle("second", Arc::clone(&log)));
        subject.subscribe(RecordingListener::handle("third", Arc::clone(&log)));

        let report = subject.notify("ping", Map::new());
        assert_eq!(report.delivered, 3);
        assert!(report.all_delivered());

        let entries = log.lock().clone();
        assert_eq!(
            entries,
            vec![
                "first<-feed#1 ping".to_string(),
                "second<-feed#1 ping".to_string(),
                "third<-feed#1 ping".to_string(),
            ]
        );
    }

    #[test]
    fn notify_with_no_subscribers_is_fine() {
        let mut subject = Subject::new("quiet");
        let report = subject.notify("ping", Map::new());
        assert_eq!(report.delivered, 0);
        assert!(report.all_delivered());
    }

    #[test]
    fn failing_listener_does_not_block_later_delivery() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut subject = Subject::new("feed");

        let mut flaky = MockFlaky::new();
        flaky.expect_id().return_const(ListenerId::from("flaky"));
        flaky
            .expect_on_event()
            .returning(|_| Err(ListenerError::Rejected("boom".to_string())));
        subject.subscribe(Arc::new(Mutex::new(flaky)));
        subject.subscribe(RecordingListener::handle("steady", Arc::clone(&log)));

        let report = subject.notify("ping", Map::new());
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, ListenerId::from("flaky"));
        assert_eq!(log.lock().len(), 1);
    }

    #[test]
    fn unsubscribe_absent_listener_is_noop() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut subject = Subject::new("feed");
        subject.subscribe(RecordingListener::handle("tom", Arc::clone(&log)));

        assert!(!subject.unsubscribe(&ListenerId::from("never-there")));
        assert_eq!(subject.subscriber_count(), 1);

        assert!(subject.unsubscribe(&ListenerId::from("tom")));
        assert_eq!(subject.subscriber_count(), 0);
    }

    #[test]
    fn resubscribe_keeps_position() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut subject = Subject::new("feed");
        subject.subscribe(RecordingListener::handle("a", Arc::clone(&log)));
        subject.subscribe(RecordingListener::handle("b", Arc::clone(&log)));
        subject.subscribe(RecordingListener::handle("a", Arc::clone(&log)));

        assert_eq!(subject.subscriber_count(), 2);
        let ids: Vec<String> = subject.subscribers().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn sequence_numbers_are_monotone() {
        let mut subject = Subject::new("feed");
        let first = subject.notify("ping", Map::new());
        let second = subject.notify("ping", Map::new());
        assert_eq!(first.event.seq, 1);
        assert_eq!(second.event.seq, 2);
    }
}
