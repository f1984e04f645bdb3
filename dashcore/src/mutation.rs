//! State mutations.
//!
//! Handlers never write to the state. They describe the change as a
//! [`StateMutation`] and the [`DashboardStore`](crate::store::DashboardStore)
//! applies it. A mutation that should be reversible carries an
//! [`UndoDescriptor`] naming the command that caused it.

use crate::command::DashboardCommand;
use crate::model::DrillDownReference;
use crate::types::{ObjRef, WidgetHeader};
use serde::{Deserialize, Serialize};

/// A change to apply to the dashboard state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all_fields = "camelCase")]
pub enum DashboardAction {
    /// Replace an insight widget's drill-down blacklist wholesale.
    #[serde(rename = "layout/replaceWidgetBlacklistHierarchies")]
    ReplaceWidgetBlacklistHierarchies {
        /// The insight widget.
        #[serde(rename = "ref")]
        widget_ref: ObjRef,
        /// The complete new blacklist.
        blacklist_hierarchies: Vec<DrillDownReference>,
    },
    /// Replace a widget's header.
    #[serde(rename = "layout/changeWidgetHeader")]
    ChangeWidgetHeader {
        /// The widget.
        #[serde(rename = "ref")]
        widget_ref: ObjRef,
        /// New header.
        header: WidgetHeader,
    },
    /// Replace a widget's description.
    #[serde(rename = "layout/changeWidgetDescription")]
    ChangeWidgetDescription {
        /// The widget.
        #[serde(rename = "ref")]
        widget_ref: ObjRef,
        /// New description.
        description: String,
    },
    /// Replace the dashboard title.
    #[serde(rename = "meta/setDashboardTitle")]
    SetDashboardTitle {
        /// New title.
        title: String,
    },
    /// Revert the newest entry of the undo history.
    #[serde(rename = "layout/undo")]
    Undo,
}

impl DashboardAction {
    /// Wire name of the action.
    pub const fn action_type(&self) -> &'static str {
        match self {
            Self::ReplaceWidgetBlacklistHierarchies { .. } => {
                "layout/replaceWidgetBlacklistHierarchies"
            }
            Self::ChangeWidgetHeader { .. } => "layout/changeWidgetHeader",
            Self::ChangeWidgetDescription { .. } => "layout/changeWidgetDescription",
            Self::SetDashboardTitle { .. } => "meta/setDashboardTitle",
            Self::Undo => "layout/undo",
        }
    }
}

/// Marks a mutation as reversible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoDescriptor {
    /// The command that caused the mutation.
    pub cmd: DashboardCommand,
}

/// An action plus optional undo metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMutation {
    /// The change.
    #[serde(flatten)]
    pub action: DashboardAction,
    /// Present when the change should be recorded for undo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undo: Option<UndoDescriptor>,
}

impl StateMutation {
    /// A mutation that is not recorded for undo.
    pub const fn new(action: DashboardAction) -> Self {
        Self { action, undo: None }
    }

    /// Records the mutation for undo on behalf of `cmd`.
    #[must_use]
    pub fn with_undo(mut self, cmd: DashboardCommand) -> Self {
        self.undo = Some(UndoDescriptor { cmd });
        self
    }

    /// Whether the store will record this mutation for undo.
    pub const fn is_undoable(&self) -> bool {
        self.undo.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command;
    use crate::types::ObjectType;
    use serde_json::json;

    #[test]
    fn replace_blacklist_uses_redux_style_shape() {
        let widget_ref = ObjRef::try_identifier("w1", ObjectType::Widget).unwrap();
        let mutation = StateMutation::new(DashboardAction::ReplaceWidgetBlacklistHierarchies {
            widget_ref,
            blacklist_hierarchies: vec![],
        })
        .with_undo(command::rename_dashboard("x", None));

        let value = serde_json::to_value(&mutation).unwrap();
        assert_eq!(value["type"], json!("layout/replaceWidgetBlacklistHierarchies"));
        assert_eq!(value["payload"]["blacklistHierarchies"], json!([]));
        assert_eq!(value["payload"]["ref"]["identifier"], json!("w1"));
        assert_eq!(value["undo"]["cmd"]["type"], json!("GDC.DASH/CMD.RENAME"));
    }

    #[test]
    fn undo_action_has_no_undo_descriptor() {
        let mutation = StateMutation::new(DashboardAction::Undo);

        assert!(!mutation.is_undoable());
        assert_eq!(mutation.action.action_type(), "layout/undo");
        assert_eq!(
            serde_json::to_value(&mutation).unwrap(),
            json!({ "type": "layout/undo" })
        );
    }
}
