//! Command handlers.
//!
//! A handler is a pure transition: given the context, the current state
//! snapshot and a command, it either fails with a [`CommandError`] or returns
//! a [`Transition`] listing the mutations to commit and the events to emit,
//! in order. Handlers never touch the store. The
//! [`DashboardRuntime`](crate::runtime::DashboardRuntime) drives them.
//!
//! [`handle`] is the single entry point. It matches every
//! [`CommandPayload`] kind exhaustively, so a new command kind does not
//! compile until it has a handler.
//!
//! [`CommandError`]: crate::errors::CommandError

mod dashboard;
mod drill_down;
mod widget;

use crate::command::{CommandPayload, DashboardCommand};
use crate::context::DashboardContext;
use crate::errors::CommandResult;
use crate::event::DashboardEvent;
use crate::model::DashboardState;
use crate::mutation::StateMutation;

pub use dashboard::{rename_dashboard, undo_layout_changes};
pub use drill_down::{add_drill_down_for_insight_widget, remove_drill_down_for_insight_widget};
pub use widget::{
    change_insight_widget_description, change_insight_widget_header, change_kpi_widget_header,
};

/// One step of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Commit a mutation to the store.
    Mutate(StateMutation),
    /// Deliver an event to listeners.
    Emit(DashboardEvent),
}

/// The ordered effects of a successfully handled command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transition {
    effects: Vec<Effect>,
}

impl Transition {
    /// An empty transition.
    pub const fn new() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    /// Appends a mutation.
    #[must_use]
    pub fn mutate(mut self, mutation: StateMutation) -> Self {
        self.effects.push(Effect::Mutate(mutation));
        self
    }

    /// Appends an event.
    #[must_use]
    pub fn emit(mut self, event: DashboardEvent) -> Self {
        self.effects.push(Effect::Emit(event));
        self
    }

    /// All effects in yielded order.
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// The mutations, in yielded order.
    pub fn mutations(&self) -> impl Iterator<Item = &StateMutation> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Mutate(mutation) => Some(mutation),
            Effect::Emit(_) => None,
        })
    }

    /// The events, in yielded order.
    pub fn events(&self) -> impl Iterator<Item = &DashboardEvent> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Emit(event) => Some(event),
            Effect::Mutate(_) => None,
        })
    }

    /// Splits the transition into mutations and events, each in yielded order.
    pub fn into_parts(self) -> (Vec<StateMutation>, Vec<DashboardEvent>) {
        let mut mutations = Vec::new();
        let mut events = Vec::new();
        for effect in self.effects {
            match effect {
                Effect::Mutate(mutation) => mutations.push(mutation),
                Effect::Emit(event) => events.push(event),
            }
        }
        (mutations, events)
    }
}

/// Runs the handler for `cmd` against `state`.
pub fn handle(
    ctx: &DashboardContext,
    state: &DashboardState,
    cmd: &DashboardCommand,
) -> CommandResult<Transition> {
    match &cmd.payload {
        CommandPayload::AddDrillDownForInsightWidget(payload) => {
            add_drill_down_for_insight_widget(ctx, state, cmd, payload)
        }
        CommandPayload::RemoveDrillDownForInsightWidget(payload) => {
            remove_drill_down_for_insight_widget(ctx, state, cmd, payload)
        }
        CommandPayload::ChangeInsightWidgetHeader(payload) => {
            change_insight_widget_header(ctx, state, cmd, payload)
        }
        CommandPayload::ChangeInsightWidgetDescription(payload) => {
            change_insight_widget_description(ctx, state, cmd, payload)
        }
        CommandPayload::ChangeKpiWidgetHeader(payload) => {
            change_kpi_widget_header(ctx, state, cmd, payload)
        }
        CommandPayload::RenameDashboard(payload) => rename_dashboard(ctx, state, cmd, payload),
        CommandPayload::UndoLayoutChanges => undo_layout_changes(ctx, state, cmd),
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::command;
    use crate::errors::CommandError;
    use crate::event::DashboardEventType;
    use crate::types::WidgetHeader;

    #[test]
    fn into_parts_keeps_yielded_order() {
        let first = crate::event::dashboard_renamed("a".into(), None);
        let second = crate::event::dashboard_renamed("b".into(), None);
        let transition = Transition::new().emit(first.clone()).emit(second.clone());

        let (mutations, events) = transition.into_parts();
        assert!(mutations.is_empty());
        assert_eq!(events, vec![first, second]);
    }

    #[test]
    fn every_command_kind_reaches_a_handler() {
        let state = state(None);
        let commands = [
            command::change_insight_widget_header(insight_ref(), WidgetHeader::new("x"), None),
            command::change_insight_widget_description(insight_ref(), "x", None),
            command::change_kpi_widget_header(kpi_ref(), WidgetHeader::new("x"), None),
            command::rename_dashboard("x", None),
        ];

        for cmd in commands {
            let transition = handle(&ctx(), &state, &cmd).unwrap();
            assert_eq!(transition.mutations().count(), 1);
            assert_eq!(transition.events().count(), 1);
        }
    }

    #[test]
    fn handler_errors_propagate() {
        let state = state(None);
        let cmd = command::change_kpi_widget_header(insight_ref(), WidgetHeader::new("x"), None);

        assert!(matches!(
            handle(&ctx(), &state, &cmd),
            Err(CommandError::InvalidEntityKind { .. })
        ));
    }

    #[test]
    fn events_carry_command_correlation_id() {
        let state = state(None);
        let id = crate::types::CorrelationId::try_new("corr").unwrap();
        let cmd = command::rename_dashboard("x", Some(id.clone()));

        let transition = handle(&ctx(), &state, &cmd).unwrap();
        let event = transition.events().next().unwrap();
        assert_eq!(event.event_type(), DashboardEventType::DashboardRenamed);
        assert_eq!(event.correlation_id, Some(id));
    }
}
