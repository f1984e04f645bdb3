//! Dashboard commands.
//!
//! A command is an immutable record of intent. It is created by application
//! code through one of the constructor functions in this module and consumed
//! exactly once by the handler matching its [`CommandType`].
//!
//! The set of commands is closed: [`CommandPayload`] enumerates every kind and
//! all dispatch over it is an exhaustive `match`, so adding a command kind
//! fails to compile until a handler exists for it.
//!
//! # Example
//!
//! ```rust
//! use dashcore::command::{self, CommandType};
//! use dashcore::model::CatalogHierarchy;
//! use dashcore::types::{ObjRef, ObjectType};
//!
//! let widget = ObjRef::try_identifier("sales-by-region", ObjectType::Widget).unwrap();
//! let label = ObjRef::try_identifier("label.region", ObjectType::DisplayForm).unwrap();
//! let hierarchy = ObjRef::try_identifier("geo", ObjectType::AttributeHierarchy).unwrap();
//!
//! let cmd = command::add_drill_down_for_insight_widget(
//!     widget,
//!     label,
//!     CatalogHierarchy::Attribute(hierarchy),
//!     None,
//! );
//! assert_eq!(cmd.command_type(), CommandType::AddDrillDownForInsightWidget);
//! ```

use crate::model::CatalogHierarchy;
use crate::types::{CorrelationId, ObjRef, WidgetHeader};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A command together with its optional correlation ID.
///
/// Serialized as `{ "type": ..., "payload": ..., "correlationId": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCommand {
    /// What the command asks for.
    #[serde(flatten)]
    pub payload: CommandPayload,
    /// Pairs the command with the events it produces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<CorrelationId>,
}

impl DashboardCommand {
    /// Wraps a payload into a command.
    pub fn new(payload: impl Into<CommandPayload>, correlation_id: Option<CorrelationId>) -> Self {
        Self {
            payload: payload.into(),
            correlation_id,
        }
    }

    /// Discriminant of the command.
    pub const fn command_type(&self) -> CommandType {
        self.payload.command_type()
    }

    /// Returns a copy of the command carrying the given correlation ID.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: CorrelationId) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}

/// Every command the dashboard understands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum CommandPayload {
    /// Re-enable drilling down along a hierarchy from an attribute.
    #[serde(rename = "GDC.DASH/CMD.INSIGHT_WIDGET.ADD_DRILL_DOWN")]
    AddDrillDownForInsightWidget(AddDrillDownForInsightWidget),
    /// Disable drilling down along a hierarchy from an attribute.
    #[serde(rename = "GDC.DASH/CMD.INSIGHT_WIDGET.REMOVE_DRILL_DOWN")]
    RemoveDrillDownForInsightWidget(RemoveDrillDownForInsightWidget),
    /// Change the header of an insight widget.
    #[serde(rename = "GDC.DASH/CMD.INSIGHT_WIDGET.CHANGE_HEADER")]
    ChangeInsightWidgetHeader(ChangeInsightWidgetHeader),
    /// Change the description of an insight widget.
    #[serde(rename = "GDC.DASH/CMD.INSIGHT_WIDGET.CHANGE_DESCRIPTION")]
    ChangeInsightWidgetDescription(ChangeInsightWidgetDescription),
    /// Change the header of a KPI widget.
    #[serde(rename = "GDC.DASH/CMD.KPI_WIDGET.CHANGE_HEADER")]
    ChangeKpiWidgetHeader(ChangeKpiWidgetHeader),
    /// Rename the dashboard.
    #[serde(rename = "GDC.DASH/CMD.RENAME")]
    RenameDashboard(RenameDashboard),
    /// Revert the most recent reversible change.
    #[serde(rename = "GDC.DASH/CMD.UNDO_LAYOUT_CHANGES")]
    UndoLayoutChanges,
}

impl CommandPayload {
    /// Discriminant of the payload.
    pub const fn command_type(&self) -> CommandType {
        match self {
            Self::AddDrillDownForInsightWidget(_) => CommandType::AddDrillDownForInsightWidget,
            Self::RemoveDrillDownForInsightWidget(_) => {
                CommandType::RemoveDrillDownForInsightWidget
            }
            Self::ChangeInsightWidgetHeader(_) => CommandType::ChangeInsightWidgetHeader,
            Self::ChangeInsightWidgetDescription(_) => CommandType::ChangeInsightWidgetDescription,
            Self::ChangeKpiWidgetHeader(_) => CommandType::ChangeKpiWidgetHeader,
            Self::RenameDashboard(_) => CommandType::RenameDashboard,
            Self::UndoLayoutChanges => CommandType::UndoLayoutChanges,
        }
    }
}

/// Discriminant of [`CommandPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    /// `GDC.DASH/CMD.INSIGHT_WIDGET.ADD_DRILL_DOWN`
    #[serde(rename = "GDC.DASH/CMD.INSIGHT_WIDGET.ADD_DRILL_DOWN")]
    AddDrillDownForInsightWidget,
    /// `GDC.DASH/CMD.INSIGHT_WIDGET.REMOVE_DRILL_DOWN`
    #[serde(rename = "GDC.DASH/CMD.INSIGHT_WIDGET.REMOVE_DRILL_DOWN")]
    RemoveDrillDownForInsightWidget,
    /// `GDC.DASH/CMD.INSIGHT_WIDGET.CHANGE_HEADER`
    #[serde(rename = "GDC.DASH/CMD.INSIGHT_WIDGET.CHANGE_HEADER")]
    ChangeInsightWidgetHeader,
    /// `GDC.DASH/CMD.INSIGHT_WIDGET.CHANGE_DESCRIPTION`
    #[serde(rename = "GDC.DASH/CMD.INSIGHT_WIDGET.CHANGE_DESCRIPTION")]
    ChangeInsightWidgetDescription,
    /// `GDC.DASH/CMD.KPI_WIDGET.CHANGE_HEADER`
    #[serde(rename = "GDC.DASH/CMD.KPI_WIDGET.CHANGE_HEADER")]
    ChangeKpiWidgetHeader,
    /// `GDC.DASH/CMD.RENAME`
    #[serde(rename = "GDC.DASH/CMD.RENAME")]
    RenameDashboard,
    /// `GDC.DASH/CMD.UNDO_LAYOUT_CHANGES`
    #[serde(rename = "GDC.DASH/CMD.UNDO_LAYOUT_CHANGES")]
    UndoLayoutChanges,
}

impl CommandType {
    /// Wire name of the command type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddDrillDownForInsightWidget => "GDC.DASH/CMD.INSIGHT_WIDGET.ADD_DRILL_DOWN",
            Self::RemoveDrillDownForInsightWidget => {
                "GDC.DASH/CMD.INSIGHT_WIDGET.REMOVE_DRILL_DOWN"
            }
            Self::ChangeInsightWidgetHeader => "GDC.DASH/CMD.INSIGHT_WIDGET.CHANGE_HEADER",
            Self::ChangeInsightWidgetDescription => {
                "GDC.DASH/CMD.INSIGHT_WIDGET.CHANGE_DESCRIPTION"
            }
            Self::ChangeKpiWidgetHeader => "GDC.DASH/CMD.KPI_WIDGET.CHANGE_HEADER",
            Self::RenameDashboard => "GDC.DASH/CMD.RENAME",
            Self::UndoLayoutChanges => "GDC.DASH/CMD.UNDO_LAYOUT_CHANGES",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload of [`CommandPayload::AddDrillDownForInsightWidget`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDrillDownForInsightWidget {
    /// Target insight widget.
    #[serde(rename = "ref")]
    pub widget_ref: ObjRef,
    /// Attribute (label) drilling starts from.
    pub attribute_identifier: ObjRef,
    /// Hierarchy to drill along.
    pub attribute_hierarchy: CatalogHierarchy,
}

/// Payload of [`CommandPayload::RemoveDrillDownForInsightWidget`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveDrillDownForInsightWidget {
    /// Target insight widget.
    #[serde(rename = "ref")]
    pub widget_ref: ObjRef,
    /// Attribute (label) drilling starts from.
    pub attribute_identifier: ObjRef,
    /// Hierarchy to stop drilling along.
    pub attribute_hierarchy: CatalogHierarchy,
}

/// Payload of [`CommandPayload::ChangeInsightWidgetHeader`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeInsightWidgetHeader {
    /// Target insight widget.
    #[serde(rename = "ref")]
    pub widget_ref: ObjRef,
    /// New header.
    pub header: WidgetHeader,
}

/// Payload of [`CommandPayload::ChangeInsightWidgetDescription`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeInsightWidgetDescription {
    /// Target insight widget.
    #[serde(rename = "ref")]
    pub widget_ref: ObjRef,
    /// New description.
    pub description: String,
}

/// Payload of [`CommandPayload::ChangeKpiWidgetHeader`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeKpiWidgetHeader {
    /// Target KPI widget.
    #[serde(rename = "ref")]
    pub widget_ref: ObjRef,
    /// New header.
    pub header: WidgetHeader,
}

/// Payload of [`CommandPayload::RenameDashboard`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameDashboard {
    /// New dashboard title.
    pub new_title: String,
}

macro_rules! command_payloads {
    ($($kind:ident),* $(,)?) => {
        $(
            impl From<$kind> for CommandPayload {
                fn from(payload: $kind) -> Self {
                    Self::$kind(payload)
                }
            }
        )*
    };
}

command_payloads!(
    AddDrillDownForInsightWidget,
    RemoveDrillDownForInsightWidget,
    ChangeInsightWidgetHeader,
    ChangeInsightWidgetDescription,
    ChangeKpiWidgetHeader,
    RenameDashboard,
);

/// Creates a command that re-enables drilling down from `attribute_identifier`
/// along `attribute_hierarchy` in the given insight widget.
pub fn add_drill_down_for_insight_widget(
    widget_ref: ObjRef,
    attribute_identifier: ObjRef,
    attribute_hierarchy: CatalogHierarchy,
    correlation_id: Option<CorrelationId>,
) -> DashboardCommand {
    DashboardCommand::new(
        AddDrillDownForInsightWidget {
            widget_ref,
            attribute_identifier,
            attribute_hierarchy,
        },
        correlation_id,
    )
}

/// Creates a command that disables drilling down from `attribute_identifier`
/// along `attribute_hierarchy` in the given insight widget.
pub fn remove_drill_down_for_insight_widget(
    widget_ref: ObjRef,
    attribute_identifier: ObjRef,
    attribute_hierarchy: CatalogHierarchy,
    correlation_id: Option<CorrelationId>,
) -> DashboardCommand {
    DashboardCommand::new(
        RemoveDrillDownForInsightWidget {
            widget_ref,
            attribute_identifier,
            attribute_hierarchy,
        },
        correlation_id,
    )
}

/// Creates a command changing an insight widget's header.
pub fn change_insight_widget_header(
    widget_ref: ObjRef,
    header: WidgetHeader,
    correlation_id: Option<CorrelationId>,
) -> DashboardCommand {
    DashboardCommand::new(
        ChangeInsightWidgetHeader { widget_ref, header },
        correlation_id,
    )
}

/// Creates a command changing an insight widget's description.
pub fn change_insight_widget_description(
    widget_ref: ObjRef,
    description: impl Into<String>,
    correlation_id: Option<CorrelationId>,
) -> DashboardCommand {
    DashboardCommand::new(
        ChangeInsightWidgetDescription {
            widget_ref,
            description: description.into(),
        },
        correlation_id,
    )
}

/// Creates a command changing a KPI widget's header.
pub fn change_kpi_widget_header(
    widget_ref: ObjRef,
    header: WidgetHeader,
    correlation_id: Option<CorrelationId>,
) -> DashboardCommand {
    DashboardCommand::new(ChangeKpiWidgetHeader { widget_ref, header }, correlation_id)
}

/// Creates a command renaming the dashboard.
pub fn rename_dashboard(
    new_title: impl Into<String>,
    correlation_id: Option<CorrelationId>,
) -> DashboardCommand {
    DashboardCommand::new(
        RenameDashboard {
            new_title: new_title.into(),
        },
        correlation_id,
    )
}

/// Creates a command reverting the most recent reversible change.
pub fn undo_layout_changes(correlation_id: Option<CorrelationId>) -> DashboardCommand {
    DashboardCommand::new(CommandPayload::UndoLayoutChanges, correlation_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObjectType;
    use serde_json::json;

    fn widget_ref() -> ObjRef {
        ObjRef::try_identifier("w1", ObjectType::Widget).unwrap()
    }

    #[test]
    fn command_type_matches_serialized_type_tag() {
        let commands = [
            change_insight_widget_header(widget_ref(), WidgetHeader::new("t"), None),
            change_insight_widget_description(widget_ref(), "d", None),
            change_kpi_widget_header(widget_ref(), WidgetHeader::new("t"), None),
            rename_dashboard("Sales", None),
            undo_layout_changes(None),
        ];

        for cmd in commands {
            let value = serde_json::to_value(&cmd).unwrap();
            assert_eq!(value["type"], json!(cmd.command_type().as_str()));
        }
    }

    #[test]
    fn command_serializes_as_type_payload_and_correlation_id() {
        let cmd = rename_dashboard(
            "Quarterly",
            Some(CorrelationId::try_new("corr-1").unwrap()),
        );

        assert_eq!(
            serde_json::to_value(&cmd).unwrap(),
            json!({
                "type": "GDC.DASH/CMD.RENAME",
                "payload": { "newTitle": "Quarterly" },
                "correlationId": "corr-1"
            })
        );
    }

    #[test]
    fn command_without_correlation_id_omits_the_field() {
        let value = serde_json::to_value(undo_layout_changes(None)).unwrap();
        assert_eq!(value, json!({ "type": "GDC.DASH/CMD.UNDO_LAYOUT_CHANGES" }));
    }

    #[test]
    fn drill_down_command_deserializes_from_wire_shape() {
        let cmd: DashboardCommand = serde_json::from_value(json!({
            "type": "GDC.DASH/CMD.INSIGHT_WIDGET.ADD_DRILL_DOWN",
            "payload": {
                "ref": { "identifier": "w1", "type": "widget" },
                "attributeIdentifier": { "identifier": "label.region", "type": "displayForm" },
                "attributeHierarchy": {
                    "type": "attributeHierarchy",
                    "ref": { "identifier": "geo", "type": "attributeHierarchy" }
                }
            },
            "correlationId": "c-42"
        }))
        .unwrap();

        assert_eq!(cmd.command_type(), CommandType::AddDrillDownForInsightWidget);
        assert_eq!(cmd.correlation_id.unwrap().as_ref(), "c-42");
        match cmd.payload {
            CommandPayload::AddDrillDownForInsightWidget(payload) => {
                assert_eq!(payload.widget_ref, widget_ref());
                assert_eq!(payload.attribute_identifier.to_string(), "label.region");
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn unknown_command_type_fails_to_deserialize() {
        let result: Result<DashboardCommand, _> = serde_json::from_value(json!({
            "type": "GDC.DASH/CMD.DOES_NOT_EXIST",
            "payload": {}
        }));
        assert!(result.is_err());
    }
}
