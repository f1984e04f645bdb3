//! Test utility for collecting delivered events.
//!
//! `EventCollector` hands out listeners that push every event they receive
//! into shared `Arc<Mutex<Vec<DashboardEvent>>>` storage, so tests can
//! attach it to a runtime and inspect what was delivered afterwards.
//!
//! # Example
//!
//! ```rust
//! use dashcore::command;
//! use dashcore::predicate::EventPredicate;
//! use dashcore_testing::builders::{test_runtime, DashboardStateBuilder};
//! use dashcore_testing::EventCollector;
//!
//! let mut runtime = test_runtime(DashboardStateBuilder::new("Sales").build());
//! let collector = EventCollector::new();
//! let _ = collector.attach(&mut runtime, EventPredicate::any());
//!
//! let _ = runtime.execute(command::rename_dashboard("Revenue", None));
//!
//! assert_eq!(collector.len(), 2);
//! ```

use dashcore::event::{DashboardEvent, DashboardEventType, EventPayloadKind};
use dashcore::predicate::EventPredicate;
use dashcore::runtime::{DashboardRuntime, SubscriptionId};
use parking_lot::Mutex;
use std::sync::Arc;

/// Records events delivered to its listeners.
///
/// Cloning the collector shares the storage, so a clone can be moved into a
/// listener while the original stays with the test.
#[derive(Debug, Clone, Default)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<DashboardEvent>>>,
}

impl EventCollector {
    /// Creates a collector with empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that appends every event it receives.
    pub fn listener(&self) -> impl FnMut(&DashboardEvent) + Send + 'static {
        let events = Arc::clone(&self.events);
        move |event| events.lock().push(event.clone())
    }

    /// Subscribes a listener to `runtime` for events matching `predicate`.
    pub fn attach(&self, runtime: &mut DashboardRuntime, predicate: EventPredicate) -> SubscriptionId {
        runtime.subscribe(predicate, self.listener())
    }

    /// A copy of all collected events, in delivery order.
    pub fn events(&self) -> Vec<DashboardEvent> {
        self.events.lock().clone()
    }

    /// Types of all collected events, in delivery order.
    pub fn event_types(&self) -> Vec<DashboardEventType> {
        self.events.lock().iter().map(DashboardEvent::event_type).collect()
    }

    /// Collected payloads of type `P`, in delivery order.
    pub fn payloads<P>(&self) -> Vec<P>
    where
        P: EventPayloadKind + Clone,
    {
        self.events
            .lock()
            .iter()
            .filter_map(|event| event.payload_as::<P>().cloned())
            .collect()
    }

    /// Number of collected events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Discards everything collected so far.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashcore::event::{self, DashboardRenamed};

    #[test]
    fn new_collector_has_no_events() {
        let collector = EventCollector::new();

        assert!(collector.is_empty());
        assert!(collector.events().is_empty());
    }

    #[test]
    fn listener_feeds_shared_storage() {
        let collector = EventCollector::new();
        let mut listener = collector.listener();

        listener(&event::dashboard_renamed("A".to_string(), None));
        listener(&event::dashboard_renamed("B".to_string(), None));

        let titles: Vec<String> = collector
            .payloads::<DashboardRenamed>()
            .into_iter()
            .map(|p| p.new_title)
            .collect();
        assert_eq!(titles, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn clones_share_storage() {
        let collector = EventCollector::new();
        let clone = collector.clone();

        let mut listener = clone.listener();
        listener(&event::dashboard_renamed("A".to_string(), None));

        assert_eq!(collector.len(), 1);
        collector.clear();
        assert!(clone.is_empty());
    }
}
