//! Synchronous command driver.
//!
//! [`DashboardRuntime`] ties the pieces together. For every command it
//! announces the start, runs the handler against the current snapshot,
//! commits the resulting mutations and delivers the resulting events to
//! matching listeners. Failures never escape as `Err`: they become
//! `CommandRejected` or `CommandFailed` events.
//!
//! `execute` takes `&mut self`, so commands run one at a time to completion
//! and each command sees every mutation committed by the previous one.
//!
//! # Example
//!
//! ```rust
//! use dashcore::command;
//! use dashcore::config::DashboardConfig;
//! use dashcore::context::DashboardContext;
//! use dashcore::event::DashboardEventType;
//! use dashcore::model::DashboardState;
//! use dashcore::runtime::DashboardRuntime;
//! use dashcore::types::Identifier;
//!
//! let ctx = DashboardContext::new(Identifier::try_new("workspace").unwrap());
//! let mut runtime = DashboardRuntime::new(ctx, DashboardState::new("Sales"), &DashboardConfig::default());
//!
//! let outcome = runtime.execute(command::rename_dashboard("Revenue", None));
//! assert_eq!(outcome.event_type(), DashboardEventType::DashboardRenamed);
//! assert_eq!(runtime.state().title(), "Revenue");
//!
//! runtime.undo();
//! assert_eq!(runtime.state().title(), "Sales");
//! ```

use crate::command::{self, DashboardCommand};
use crate::config::DashboardConfig;
use crate::context::DashboardContext;
use crate::errors::CommandError;
use crate::event::{self, DashboardEvent};
use crate::handlers;
use crate::model::DashboardState;
use crate::predicate::EventPredicate;
use crate::store::DashboardStore;
use std::fmt;
use tracing::{info, warn};

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&DashboardEvent) + Send>;

struct Subscription {
    id: SubscriptionId,
    predicate: EventPredicate,
    listener: Listener,
}

/// Delivers events to the listeners whose predicate matches.
///
/// Listeners are called synchronously, in subscription order.
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl EventBus {
    /// Creates a bus with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` for events matching `predicate`.
    pub fn subscribe(
        &mut self,
        predicate: EventPredicate,
        listener: impl FnMut(&DashboardEvent) + Send + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            predicate,
            listener: Box::new(listener),
        });
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id != id);
        self.subscriptions.len() != before
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Delivers `event` to every matching listener.
    pub fn publish(&mut self, event: &DashboardEvent) {
        for subscription in &mut self.subscriptions {
            if subscription.predicate.matches(event) {
                (subscription.listener)(event);
            }
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

/// Runs commands against a dashboard, one at a time.
#[derive(Debug)]
pub struct DashboardRuntime {
    ctx: DashboardContext,
    store: DashboardStore,
    bus: EventBus,
}

impl DashboardRuntime {
    /// Creates a runtime around an initial state.
    pub fn new(ctx: DashboardContext, state: DashboardState, config: &DashboardConfig) -> Self {
        Self {
            ctx,
            store: DashboardStore::new(state, config.undo_history_limit),
            bus: EventBus::new(),
        }
    }

    /// The handler context.
    pub const fn context(&self) -> &DashboardContext {
        &self.ctx
    }

    /// The latest committed state.
    pub const fn state(&self) -> &DashboardState {
        self.store.state()
    }

    /// Consumes the runtime, returning the final state.
    pub fn into_state(self) -> DashboardState {
        self.store.into_state()
    }

    /// See [`EventBus::subscribe`].
    pub fn subscribe(
        &mut self,
        predicate: EventPredicate,
        listener: impl FnMut(&DashboardEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(predicate, listener)
    }

    /// See [`EventBus::unsubscribe`].
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Processes one command to completion and returns its outcome event.
    ///
    /// The outcome is the last event the handler emitted, or the
    /// `CommandRejected` / `CommandFailed` event when processing stopped.
    #[tracing::instrument(
        name = "execute",
        skip(self, cmd),
        fields(
            command_type = %cmd.command_type(),
            correlation_id = ?cmd.correlation_id,
        )
    )]
    pub fn execute(&mut self, cmd: DashboardCommand) -> DashboardEvent {
        let started = event::command_started(cmd.clone());
        self.bus.publish(&started);

        let transition = match handlers::handle(&self.ctx, self.store.state(), &cmd) {
            Ok(transition) => transition,
            Err(error) => return self.fail(cmd, &error),
        };

        let (mutations, events) = transition.into_parts();
        if let Err(error) = self.store.commit(&mutations) {
            return self.fail(cmd, &CommandError::from(error));
        }

        for event in &events {
            self.bus.publish(event);
        }
        info!(
            mutations = mutations.len(),
            events = events.len(),
            "Command processed"
        );

        events.into_iter().last().unwrap_or(started)
    }

    /// Reverts the most recent reversible change.
    pub fn undo(&mut self) -> DashboardEvent {
        self.execute(command::undo_layout_changes(None))
    }

    fn fail(&mut self, cmd: DashboardCommand, error: &CommandError) -> DashboardEvent {
        let outcome = if error.is_rejection() {
            warn!(error = %error, "Command rejected");
            event::command_rejected(
                cmd.command_type(),
                error.to_string(),
                cmd.correlation_id.clone(),
            )
        } else {
            warn!(error = %error, kind = error.kind(), "Command failed");
            event::command_failed(cmd, error)
        };
        self.bus.publish(&outcome);
        outcome
    }
}
