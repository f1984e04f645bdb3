//! Event predicates.
//!
//! Listeners select the events they care about with an [`EventPredicate`].
//! The two factories mirror how consumers usually filter:
//!
//! - [`new_dashboard_event_predicate`] matches every event of one type.
//! - [`new_refined_event_predicate`] additionally inspects the payload,
//!   already narrowed to its concrete type.
//!
//! In both cases the type check comes first. A refinement never sees an
//! event of another type.
//!
//! # Example
//!
//! ```rust
//! use dashcore::event::{self, DashboardRenamed};
//! use dashcore::predicate::new_refined_event_predicate;
//!
//! let is_quarterly = new_refined_event_predicate(|renamed: &DashboardRenamed| {
//!     renamed.new_title.starts_with('Q')
//! });
//!
//! assert!(is_quarterly.matches(&event::dashboard_renamed("Q3 sales".into(), None)));
//! assert!(!is_quarterly.matches(&event::dashboard_renamed("Sales".into(), None)));
//! ```

use crate::event::{DashboardEvent, DashboardEventType, EventPayloadKind};
use crate::types::CorrelationId;
use std::fmt;
use std::sync::Arc;

type PredicateFn = dyn Fn(&DashboardEvent) -> bool + Send + Sync;

/// A cloneable, thread-safe event filter.
#[derive(Clone)]
pub struct EventPredicate(Arc<PredicateFn>);

impl EventPredicate {
    /// Wraps an arbitrary filter.
    pub fn new(predicate: impl Fn(&DashboardEvent) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// Matches every event.
    pub fn any() -> Self {
        Self::new(|_| true)
    }

    /// Evaluates the predicate.
    pub fn matches(&self, event: &DashboardEvent) -> bool {
        (self.0)(event)
    }

    /// Matches when both predicates match.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::new(move |event| self.matches(event) && other.matches(event))
    }

    /// Matches when either predicate matches.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::new(move |event| self.matches(event) || other.matches(event))
    }

    /// Matches when this predicate does not.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::new(move |event| !self.matches(event))
    }

    /// Restricts the predicate to events carrying `correlation_id`.
    #[must_use]
    pub fn correlated_with(self, correlation_id: CorrelationId) -> Self {
        self.and(Self::new(move |event| {
            event.correlation_id.as_ref() == Some(&correlation_id)
        }))
    }
}

impl fmt::Debug for EventPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventPredicate").finish_non_exhaustive()
    }
}

/// Matches every event of `event_type`.
pub fn new_dashboard_event_predicate(event_type: DashboardEventType) -> EventPredicate {
    EventPredicate::new(move |event| event.event_type() == event_type)
}

/// Matches events of type `P::EVENT_TYPE` whose payload passes `refine`.
///
/// `refine` is only called for events of the matching type and its answer
/// is final. It sees the narrowed payload only; to also constrain envelope
/// fields such as the correlation ID, chain
/// [`correlated_with`](EventPredicate::correlated_with) onto the result.
pub fn new_refined_event_predicate<P, F>(refine: F) -> EventPredicate
where
    P: EventPayloadKind,
    F: Fn(&P) -> bool + Send + Sync + 'static,
{
    EventPredicate::new(move |event| {
        if event.event_type() != P::EVENT_TYPE {
            return false;
        }
        P::narrow(&event.payload).is_some_and(&refine)
    })
}
