//! The dashboard store.
//!
//! [`DashboardStore`] is the only write path to [`DashboardState`]. It applies
//! batches of [`StateMutation`]s atomically and keeps the undo history: every
//! mutation that carries an undo descriptor records the exact value it
//! replaced, and [`DashboardAction::Undo`] puts that value back.

use crate::command::DashboardCommand;
use crate::config::UndoHistoryLimit;
use crate::errors::{StoreError, StoreResult};
use crate::model::{DashboardState, DrillDownReference, Widget, WidgetKind};
use crate::mutation::{DashboardAction, StateMutation};
use crate::types::{ObjRef, WidgetHeader};
use std::collections::VecDeque;
use tracing::debug;

/// The value a reversible mutation overwrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Restore {
    /// Previous drill-down blacklist of an insight widget, `None` if it was absent.
    WidgetBlacklist {
        /// The insight widget.
        widget_ref: ObjRef,
        /// The list as it was, in its original order.
        previous: Option<Vec<DrillDownReference>>,
    },
    /// Previous header of a widget.
    WidgetHeader {
        /// The widget.
        widget_ref: ObjRef,
        /// The header as it was.
        previous: WidgetHeader,
    },
    /// Previous description of a widget.
    WidgetDescription {
        /// The widget.
        widget_ref: ObjRef,
        /// The description as it was.
        previous: String,
    },
    /// Previous dashboard title.
    DashboardTitle {
        /// The title as it was.
        previous: String,
    },
}

/// One reversible change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoEntry {
    cmd: DashboardCommand,
    restore: Restore,
}

impl UndoEntry {
    /// The command that made the change.
    pub const fn cmd(&self) -> &DashboardCommand {
        &self.cmd
    }

    /// What undoing the change writes back.
    pub const fn restore(&self) -> &Restore {
        &self.restore
    }
}

/// Reversible changes, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UndoHistory {
    entries: VecDeque<UndoEntry>,
}

impl UndoHistory {
    /// Number of recorded changes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The change the next undo reverts.
    pub fn latest(&self) -> Option<&UndoEntry> {
        self.entries.back()
    }

    /// All recorded changes, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &UndoEntry> {
        self.entries.iter()
    }

    fn push(&mut self, entry: UndoEntry, limit: UndoHistoryLimit) {
        self.entries.push_back(entry);
        let limit: usize = limit.into();
        while self.entries.len() > limit {
            let _ = self.entries.pop_front();
        }
    }

    fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop_back()
    }
}

/// Single-writer owner of the dashboard state.
#[derive(Debug, Clone)]
pub struct DashboardStore {
    state: DashboardState,
    history_limit: UndoHistoryLimit,
}

impl DashboardStore {
    /// Creates a store around an initial state.
    pub const fn new(state: DashboardState, history_limit: UndoHistoryLimit) -> Self {
        Self {
            state,
            history_limit,
        }
    }

    /// The current snapshot.
    pub const fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Consumes the store, returning the final state.
    pub fn into_state(self) -> DashboardState {
        self.state
    }

    /// Applies `mutations` in order.
    ///
    /// The batch is all or nothing: mutations are applied to a scratch copy
    /// which replaces the state only if every one of them succeeds.
    pub fn commit(&mut self, mutations: &[StateMutation]) -> StoreResult<()> {
        if mutations.is_empty() {
            return Ok(());
        }

        let mut scratch = self.state.clone();
        for mutation in mutations {
            let restore = reduce(&mut scratch, &mutation.action)?;
            debug!(action = mutation.action.action_type(), "Applied mutation");

            if let (Some(undo), Some(restore)) = (&mutation.undo, restore) {
                scratch.history_mut().push(
                    UndoEntry {
                        cmd: undo.cmd.clone(),
                        restore,
                    },
                    self.history_limit,
                );
            }
        }

        self.state = scratch;
        Ok(())
    }
}

/// Applies one action, returning the value it overwrote.
fn reduce(state: &mut DashboardState, action: &DashboardAction) -> StoreResult<Option<Restore>> {
    match action {
        DashboardAction::ReplaceWidgetBlacklistHierarchies {
            widget_ref,
            blacklist_hierarchies,
        } => {
            let insight = match widget_mut(state, widget_ref)? {
                Widget::Insight(insight) => insight,
                Widget::Kpi(_) => {
                    return Err(StoreError::UnexpectedWidgetKind {
                        widget_ref: widget_ref.clone(),
                        expected: WidgetKind::Insight,
                        actual: WidgetKind::Kpi,
                    })
                }
            };
            let previous = insight
                .ignored_drill_down_hierarchies
                .replace(blacklist_hierarchies.clone());
            Ok(Some(Restore::WidgetBlacklist {
                widget_ref: widget_ref.clone(),
                previous,
            }))
        }
        DashboardAction::ChangeWidgetHeader { widget_ref, header } => {
            let widget = widget_mut(state, widget_ref)?;
            let previous = std::mem::replace(widget.header_mut(), header.clone());
            Ok(Some(Restore::WidgetHeader {
                widget_ref: widget_ref.clone(),
                previous,
            }))
        }
        DashboardAction::ChangeWidgetDescription {
            widget_ref,
            description,
        } => {
            let widget = widget_mut(state, widget_ref)?;
            let previous = std::mem::replace(widget.description_mut(), description.clone());
            Ok(Some(Restore::WidgetDescription {
                widget_ref: widget_ref.clone(),
                previous,
            }))
        }
        DashboardAction::SetDashboardTitle { title } => {
            let previous = state.set_title(title.clone());
            Ok(Some(Restore::DashboardTitle { previous }))
        }
        DashboardAction::Undo => {
            let entry = state.history_mut().pop().ok_or(StoreError::EmptyHistory)?;
            debug!(command = %entry.cmd.command_type(), "Undoing change");
            apply_restore(state, entry.restore)?;
            Ok(None)
        }
    }
}

fn apply_restore(state: &mut DashboardState, restore: Restore) -> StoreResult<()> {
    match restore {
        Restore::WidgetBlacklist {
            widget_ref,
            previous,
        } => match widget_mut(state, &widget_ref)? {
            Widget::Insight(insight) => {
                insight.ignored_drill_down_hierarchies = previous;
                Ok(())
            }
            Widget::Kpi(_) => Err(StoreError::UnexpectedWidgetKind {
                widget_ref,
                expected: WidgetKind::Insight,
                actual: WidgetKind::Kpi,
            }),
        },
        Restore::WidgetHeader {
            widget_ref,
            previous,
        } => {
            *widget_mut(state, &widget_ref)?.header_mut() = previous;
            Ok(())
        }
        Restore::WidgetDescription {
            widget_ref,
            previous,
        } => {
            *widget_mut(state, &widget_ref)?.description_mut() = previous;
            Ok(())
        }
        Restore::DashboardTitle { previous } => {
            let _ = state.set_title(previous);
            Ok(())
        }
    }
}

fn widget_mut<'a>(state: &'a mut DashboardState, widget_ref: &ObjRef) -> StoreResult<&'a mut Widget> {
    state
        .widget_mut(widget_ref)
        .ok_or_else(|| StoreError::WidgetNotFound(widget_ref.clone()))
}
