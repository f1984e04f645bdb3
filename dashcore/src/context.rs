//! Handler context.

use crate::types::{Identifier, ObjRef};

/// Read-only environment passed to every handler.
///
/// Replaces ambient globals: anything a handler needs beyond the state
/// snapshot and the command travels here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardContext {
    /// Workspace the dashboard belongs to.
    pub workspace: Identifier,
    /// The dashboard being edited, once it has been saved.
    pub dashboard_ref: Option<ObjRef>,
}

impl DashboardContext {
    /// Context for an unsaved dashboard in `workspace`.
    pub const fn new(workspace: Identifier) -> Self {
        Self {
            workspace,
            dashboard_ref: None,
        }
    }

    /// Sets the dashboard reference.
    #[must_use]
    pub fn with_dashboard(mut self, dashboard_ref: ObjRef) -> Self {
        self.dashboard_ref = Some(dashboard_ref);
        self
    }
}
