//! Dashboard-level handlers: rename and undo.

use super::Transition;
use crate::command::{DashboardCommand, RenameDashboard};
use crate::context::DashboardContext;
use crate::errors::{CommandError, CommandResult};
use crate::event;
use crate::model::DashboardState;
use crate::mutation::{DashboardAction, StateMutation};
use crate::validation::validate_title;
use tracing::debug;

/// Renames the dashboard.
pub fn rename_dashboard(
    ctx: &DashboardContext,
    _state: &DashboardState,
    cmd: &DashboardCommand,
    payload: &RenameDashboard,
) -> CommandResult<Transition> {
    validate_title(&payload.new_title)?;

    debug!(workspace = %ctx.workspace, "Renaming dashboard");

    Ok(Transition::new()
        .mutate(
            StateMutation::new(DashboardAction::SetDashboardTitle {
                title: payload.new_title.clone(),
            })
            .with_undo(cmd.clone()),
        )
        .emit(event::dashboard_renamed(
            payload.new_title.clone(),
            cmd.correlation_id.clone(),
        )))
}

/// Reverts the most recent reversible change.
///
/// The undo mutation itself is not recorded, so repeated undos walk back
/// through the history.
pub fn undo_layout_changes(
    ctx: &DashboardContext,
    state: &DashboardState,
    cmd: &DashboardCommand,
) -> CommandResult<Transition> {
    let latest = state
        .history()
        .latest()
        .ok_or(CommandError::NothingToUndo)?;

    debug!(
        workspace = %ctx.workspace,
        undone = %latest.cmd().command_type(),
        "Undoing last change"
    );

    Ok(Transition::new()
        .mutate(StateMutation::new(DashboardAction::Undo))
        .emit(event::layout_changed(
            latest.cmd().clone(),
            cmd.correlation_id.clone(),
        )))
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::handle;
    use crate::command;
    use crate::config::UndoHistoryLimit;
    use crate::errors::CommandError;
    use crate::event::LayoutChanged;
    use crate::store::DashboardStore;

    #[test]
    fn undo_with_empty_history_fails() {
        let cmd = command::undo_layout_changes(None);

        assert_eq!(
            handle(&ctx(), &state(None), &cmd),
            Err(CommandError::NothingToUndo)
        );
    }

    #[test]
    fn undo_names_the_latest_reversible_command() {
        let mut store = DashboardStore::new(state(None), UndoHistoryLimit::default());
        let rename = command::rename_dashboard("Renamed", None);
        let (mutations, _) = handle(&ctx(), store.state(), &rename)
            .unwrap()
            .into_parts();
        store.commit(&mutations).unwrap();

        let transition = handle(&ctx(), store.state(), &command::undo_layout_changes(None)).unwrap();

        let undone = transition
            .events()
            .next()
            .and_then(|e| e.payload_as::<LayoutChanged>())
            .map(|p| p.undone_command.clone());
        assert_eq!(undone, Some(rename));
        assert!(transition.mutations().all(|m| !m.is_undoable()));
    }

    #[test]
    fn rename_rejects_overlong_title() {
        let cmd = command::rename_dashboard("t".repeat(257), None);

        assert!(matches!(
            handle(&ctx(), &state(None), &cmd),
            Err(CommandError::InvalidArgument(_))
        ));
    }
}
