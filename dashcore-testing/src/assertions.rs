//! Assertions over emitted dashboard events and subscription streams.

use dashcore::event::{CommandFailed, CommandRejected, DashboardEvent, DashboardEventType};
use futures::StreamExt;

/// Error returned when collecting events from a subscription fails.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    /// Timeout expired before collecting the expected number of events.
    #[error("timeout waiting for {expected} events, received {received}")]
    Timeout {
        /// Events asked for.
        expected: usize,
        /// Events seen before the timeout.
        received: usize,
    },
}

/// Collect `count` events from a subscription stream with a timeout.
pub async fn collect_events(
    subscription: impl futures::Stream<Item = DashboardEvent> + Unpin,
    count: usize,
    timeout: std::time::Duration,
) -> Result<Vec<DashboardEvent>, CollectionError> {
    let mut collected = Vec::with_capacity(count);
    let mut subscription = subscription.take(count);
    let collect_future = async {
        while let Some(event) = subscription.next().await {
            collected.push(event);
        }
    };

    match tokio::time::timeout(timeout, collect_future).await {
        Ok(()) if collected.len() == count => Ok(collected),
        Ok(()) | Err(_) => Err(CollectionError::Timeout {
            expected: count,
            received: collected.len(),
        }),
    }
}

/// Asserts that `events` have exactly the given types, in order.
///
/// # Panics
///
/// Panics with both sequences when they differ.
pub fn assert_event_types(events: &[DashboardEvent], expected: &[DashboardEventType]) {
    let actual: Vec<DashboardEventType> = events.iter().map(DashboardEvent::event_type).collect();
    assert_eq!(actual, expected, "unexpected event sequence");
}

/// Asserts that `event` reports a rejected command and returns its payload.
///
/// # Panics
///
/// Panics if the event is of another type.
pub fn assert_rejected(event: &DashboardEvent) -> &CommandRejected {
    event
        .payload_as::<CommandRejected>()
        .unwrap_or_else(|| panic!("expected a rejection, got {:?}", event.event_type()))
}

/// Asserts that `event` reports a failed command and returns its payload.
///
/// # Panics
///
/// Panics if the event is of another type.
pub fn assert_failed(event: &DashboardEvent) -> &CommandFailed {
    event
        .payload_as::<CommandFailed>()
        .unwrap_or_else(|| panic!("expected a failure, got {:?}", event.event_type()))
}

/// Asserts that no event in `events` reports a rejection or failure.
///
/// # Panics
///
/// Panics naming the first failure found.
pub fn assert_no_failures(events: &[DashboardEvent]) {
    if let Some(failure) = events.iter().find(|event| event.is_failure()) {
        panic!("unexpected failure event: {failure:?}");
    }
}
