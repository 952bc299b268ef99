//! Synchronous listener fan-out
//!
//! One-to-many notification with the forgiving subscription semantics of a
//! social feed and the delivery guarantees a library core needs.
//!
//! # Core Concepts
//!
//! - [`Subject`]: ordered, snapshot-stable synchronous fan-out
//! - [`Listener`]: the receiver contract, identified by [`ListenerId`]
//! - [`BufferedFollower`]: bounded buffering for offline receivers
//! - [`OutputSink`]: injectable display seam, nothing writes to the console
//!
//! # Example
//!
//! ```rust
//! use rolecast_notify::{BufferedFollower, MemorySink, Subject};
//! use parking_lot::Mutex;
//! use serde_json::Map;
//! use std::sync::Arc;
//!
//! let sink = MemorySink::new();
//! let jack = Arc::new(Mutex::new(BufferedFollower::new("jack", Box::new(sink.clone()))));
//! jack.lock().set_online(true);
//!
//! let mut feed = Subject::new("chloe");
//! feed.subscribe(jack);
//! let report = feed.notify("new_post", Map::new());
//! assert_eq!(report.delivered, 1);
//! assert_eq!(sink.lines(), vec!["jack: chloe#1 new_post".to_string()]);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod event;
mod follower;
mod listener;
mod sink;
mod subject;

pub use event::Event;
pub use follower::{BufferedFollower, DEFAULT_CAPACITY};
pub use listener::{Listener, ListenerError, ListenerId};
pub use sink::{MemorySink, NullSink, OutputSink};
pub use subject::{DeliveryReport, ListenerHandle, Subject};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::Map;
    use std::sync::Arc;

    fn follower(name: &str, sink: &MemorySink) -> Arc<Mutex<BufferedFollower>> {
        Arc::new(Mutex::new(BufferedFollower::new(
            name,
            Box::new(sink.clone()),
        )))
    }

    fn post(url: &str) -> Map<String, serde_json::Value> {
        let mut payload = Map::new();
        payload.insert("url".to_string(), serde_json::Value::from(url));
        payload
    }

    #[test]
    fn feed_scenario_offline_follower_catches_up() {
        let sink = MemorySink::new();
        let mut feed = Subject::new("chloe");

        let tom = follower("tom", &sink);
        let jack = follower("jack", &sink);
        feed.subscribe(Arc::clone(&tom) as ListenerHandle);
        feed.subscribe(Arc::clone(&jack) as ListenerHandle);

        // Jack is online, Tom is not.
        jack.lock().set_online(true);

        feed.notify("new_post", post("selfie1.png"));
        feed.notify("new_post", post("chloe.png"));
        assert_eq!(
            sink.lines(),
            vec![
                "jack: chloe#1 new_post".to_string(),
                "jack: chloe#2 new_post".to_string(),
            ]
        );
        assert_eq!(tom.lock().pending(), 2);

        // Tom comes online and the backlog flushes in order.
        tom.lock().set_online(true);
        assert_eq!(
            sink.lines(),
            vec![
                "jack: chloe#1 new_post".to_string(),
                "jack: chloe#2 new_post".to_string(),
                "tom: chloe#1 new_post".to_string(),
                "tom: chloe#2 new_post".to_string(),
            ]
        );

        // Both receive the next post, in subscription order.
        sink.clear();
        feed.notify("new_post", post("ootd.png"));
        assert_eq!(
            sink.lines(),
            vec![
                "tom: chloe#3 new_post".to_string(),
                "jack: chloe#3 new_post".to_string(),
            ]
        );

        // Removed follower stops receiving; the other is unaffected.
        sink.clear();
        feed.unsubscribe(&ListenerId::from("tom"));
        feed.notify("new_post", post("ootd2.png"));
        assert_eq!(sink.lines(), vec!["jack: chloe#4 new_post".to_string()]);
    }
}
