//! Buffering follower listener
//!
//! Mirrors a feed follower: offline followers buffer notifications, online
//! followers display them immediately. The buffer is a bounded ring; on
//! overflow the oldest entry is evicted and counted, so an absent follower
//! cannot grow memory without bound.

use crate::event::Event;
use crate::listener::{Listener, ListenerError, ListenerId};
use crate::sink::OutputSink;
use std::collections::VecDeque;
use std::fmt;

/// Default bound on buffered notifications
pub const DEFAULT_CAPACITY: usize = 64;

/// Listener that buffers while offline and displays when online
pub struct BufferedFollower {
    id: ListenerId,
    online: bool,
    capacity: usize,
    buffer: VecDeque<Event>,
    dropped: u64,
    sink: Box<dyn OutputSink>,
}

impl fmt::Debug for BufferedFollower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferedFollower")
            .field("id", &self.id)
            .field("online", &self.online)
            .field("capacity", &self.capacity)
            .field("pending", &self.buffer.len())
            .field("dropped", &self.dropped)
            .finish()
    }
}

impl BufferedFollower {
    /// Create an offline follower with the default buffer bound
    #[must_use]
    pub fn new(name: impl Into<String>, sink: Box<dyn OutputSink>) -> Self {
        Self::with_capacity(name, sink, DEFAULT_CAPACITY)
    }

    /// Create an offline follower with an explicit buffer bound (minimum 1)
    #[must_use]
    pub fn with_capacity(
        name: impl Into<String>,
        sink: Box<dyn OutputSink>,
        capacity: usize,
    ) -> Self {
        Self {
            id: ListenerId::new(name),
            online: false,
            capacity: capacity.max(1),
            buffer: VecDeque::new(),
            dropped: 0,
            sink,
        }
    }

    /// Whether the follower is currently online
    #[inline]
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Buffered, not-yet-displayed notifications
    #[inline]
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Notifications evicted because the buffer was full
    #[inline]
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Toggle presence; coming online flushes the buffer
    pub fn set_online(&mut self, online: bool) {
        self.online = online;
        if online {
            self.flush();
        }
    }

    /// Display and clear everything buffered, oldest first
    pub fn flush(&mut self) {
        while let Some(event) = self.buffer.pop_front() {
            self.display(&event);
        }
    }

    fn display(&mut self, event: &Event) {
        self.sink.write_line(&format!("{}: {}", self.id, event.describe()));
    }

    fn buffer_event(&mut self, event: Event) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
            self.dropped += 1;
            tracing::warn!(follower = %self.id, "buffer full, oldest notification evicted");
        }
        self.buffer.push_back(event);
    }
}

impl Listener for BufferedFollower {
    fn id(&self) -> ListenerId {
        self.id.clone()
    }

    fn on_event(&mut self, event: &Event) -> Result<(), ListenerError> {
        if self.online {
            self.display(event);
        } else {
            self.buffer_event(event.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn post(seq: u64) -> Event {
        Event::new(seq, "chloe", "new_post")
    }

    #[test]
    fn online_follower_displays_immediately() {
        let sink = MemorySink::new();
        let mut follower = BufferedFollower::new("jack", Box::new(sink.clone()));
        follower.set_online(true);

        follower.on_event(&post(1)).unwrap();
        assert_eq!(sink.lines(), vec!["jack: chloe#1 new_post".to_string()]);
        assert_eq!(follower.pending(), 0);
    }

    #[test]
    fn offline_follower_buffers_until_online() {
        let sink = MemorySink::new();
        let mut follower = BufferedFollower::new("tom", Box::new(sink.clone()));

        follower.on_event(&post(1)).unwrap();
        follower.on_event(&post(2)).unwrap();
        assert_eq!(follower.pending(), 2);
        assert!(sink.lines().is_empty());

        follower.set_online(true);
        assert_eq!(follower.pending(), 0);
        assert_eq!(
            sink.lines(),
            vec![
                "tom: chloe#1 new_post".to_string(),
                "tom: chloe#2 new_post".to_string(),
            ]
        );
    }

    #[test]
    fn full_buffer_evicts_oldest() {
        let sink = MemorySink::new();
        let mut follower = BufferedFollower::with_capacity("tom", Box::new(sink.clone()), 2);

        follower.on_event(&post(1)).unwrap();
        follower.on_event(&post(2)).unwrap();
        follower.on_event(&post(3)).unwrap();

        assert_eq!(follower.pending(), 2);
        assert_eq!(follower.dropped(), 1);

        follower.flush();
        assert_eq!(
            sink.lines(),
            vec![
                "tom: chloe#2 new_post".to_string(),
                "tom: chloe#3 new_post".to_string(),
            ]
        );
    }

    #[test]
    fn capacity_is_clamped_to_at_least_one() {
        let mut follower =
            BufferedFollower::with_capacity("tiny", Box::new(MemorySink::new()), 0);

        follower.on_event(&post(1)).unwrap();
        follower.on_event(&post(2)).unwrap();
        assert_eq!(follower.pending(), 1);
        assert_eq!(follower.dropped(), 1);
    }
}
