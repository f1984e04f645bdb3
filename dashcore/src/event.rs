//! Dashboard events.
//!
//! Events are immutable facts describing the outcome of processing a command.
//! They carry everything consumers need (the entity reference, all identifying
//! command fields, the correlation ID) so nobody has to re-resolve state to
//! react to them. Events are delivered to listeners and then discarded; they
//! are never persisted or replayed.
//!
//! Like commands, the event set is closed. [`EventPayload`] enumerates every
//! kind, [`DashboardEventType`] is its discriminant, and each payload struct
//! implements [`EventPayloadKind`] so predicates can narrow a
//! [`DashboardEvent`] to the exact payload type.

use crate::command::{CommandType, DashboardCommand};
use crate::errors::CommandError;
use crate::model::CatalogHierarchy;
use crate::types::{CorrelationId, ObjRef, WidgetHeader};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An event together with the correlation ID of the command that caused it.
///
/// Serialized as `{ "type": ..., "payload": ..., "correlationId": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEvent {
    /// What happened.
    #[serde(flatten)]
    pub payload: EventPayload,
    /// Correlation ID copied from the originating command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<CorrelationId>,
}

impl DashboardEvent {
    /// Wraps a payload into an event.
    pub fn new(payload: impl Into<EventPayload>, correlation_id: Option<CorrelationId>) -> Self {
        Self {
            payload: payload.into(),
            correlation_id,
        }
    }

    /// Discriminant of the event.
    pub const fn event_type(&self) -> DashboardEventType {
        self.payload.event_type()
    }

    /// Narrows the event to a concrete payload type.
    pub fn payload_as<P: EventPayloadKind>(&self) -> Option<&P> {
        P::narrow(&self.payload)
    }

    /// Whether the event reports a rejected or failed command.
    pub const fn is_failure(&self) -> bool {
        matches!(
            self.event_type(),
            DashboardEventType::CommandRejected | DashboardEventType::CommandFailed
        )
    }
}

/// Payload narrowing for a single event kind.
///
/// Implemented for every payload struct in this module. `narrow` only
/// succeeds for the variant matching [`EVENT_TYPE`](Self::EVENT_TYPE).
pub trait EventPayloadKind: Sized {
    /// The event type carrying this payload.
    const EVENT_TYPE: DashboardEventType;

    /// Returns the payload if the event is of this kind.
    fn narrow(payload: &EventPayload) -> Option<&Self>;
}

/// Classification carried by [`CommandFailed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionFailedErrorReason {
    /// The command was invalid for the current state or arguments.
    UserError,
    /// Processing broke down; the command itself may be fine.
    InternalError,
}

/// A command has been accepted for processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandStarted {
    /// The command being processed.
    pub command: DashboardCommand,
}

/// A command failed validation and was not processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRejected {
    /// Type of the rejected command.
    pub command_type: CommandType,
    /// Human readable reason.
    pub message: String,
}

/// A command could not be completed. Carries full diagnostic context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandFailed {
    /// Broad classification of the failure.
    pub reason: ActionFailedErrorReason,
    /// Human readable message.
    pub message: String,
    /// Machine readable error kind, e.g. `INVALID_ARGUMENT`.
    pub error_kind: String,
    /// The failed command.
    pub command: DashboardCommand,
}

/// Drilling down along a hierarchy was enabled for an insight widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightWidgetDrillDownAdded {
    /// The insight widget.
    #[serde(rename = "ref")]
    pub widget_ref: ObjRef,
    /// The hierarchy named by the command.
    pub attribute_hierarchy: CatalogHierarchy,
    /// The attribute named by the command.
    pub attribute_identifier: ObjRef,
}

/// Drilling down along a hierarchy was disabled for an insight widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightWidgetDrillDownRemoved {
    /// The insight widget.
    #[serde(rename = "ref")]
    pub widget_ref: ObjRef,
    /// The hierarchy named by the command.
    pub attribute_hierarchy: CatalogHierarchy,
    /// The attribute named by the command.
    pub attribute_identifier: ObjRef,
}

/// An insight widget's header changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightWidgetHeaderChanged {
    /// The insight widget.
    #[serde(rename = "ref")]
    pub widget_ref: ObjRef,
    /// The new header.
    pub header: WidgetHeader,
}

/// An insight widget's description changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightWidgetDescriptionChanged {
    /// The insight widget.
    #[serde(rename = "ref")]
    pub widget_ref: ObjRef,
    /// The new description.
    pub description: String,
}

/// A KPI widget's header changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiWidgetHeaderChanged {
    /// The KPI widget.
    #[serde(rename = "ref")]
    pub widget_ref: ObjRef,
    /// The new header.
    pub header: WidgetHeader,
}

/// The dashboard was renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardRenamed {
    /// The new title.
    pub new_title: String,
}

/// A reversible change was undone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutChanged {
    /// The command whose effect was reverted.
    pub undone_command: DashboardCommand,
}

/// Every event the dashboard emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum EventPayload {
    /// See [`CommandStarted`].
    #[serde(rename = "GDC.DASH/EVT.COMMAND.STARTED")]
    CommandStarted(CommandStarted),
    /// See [`CommandRejected`].
    #[serde(rename = "GDC.DASH/EVT.COMMAND.REJECTED")]
    CommandRejected(CommandRejected),
    /// See [`CommandFailed`].
    #[serde(rename = "GDC.DASH/EVT.COMMAND.FAILED")]
    CommandFailed(CommandFailed),
    /// See [`InsightWidgetDrillDownAdded`].
    #[serde(rename = "GDC.DASH/EVT.INSIGHT_WIDGET.DRILL_DOWN_ADDED")]
    InsightWidgetDrillDownAdded(InsightWidgetDrillDownAdded),
    /// See [`InsightWidgetDrillDownRemoved`].
    #[serde(rename = "GDC.DASH/EVT.INSIGHT_WIDGET.DRILL_DOWN_REMOVED")]
    InsightWidgetDrillDownRemoved(InsightWidgetDrillDownRemoved),
    /// See [`InsightWidgetHeaderChanged`].
    #[serde(rename = "GDC.DASH/EVT.INSIGHT_WIDGET.HEADER_CHANGED")]
    InsightWidgetHeaderChanged(InsightWidgetHeaderChanged),
    /// See [`InsightWidgetDescriptionChanged`].
    #[serde(rename = "GDC.DASH/EVT.INSIGHT_WIDGET.DESCRIPTION_CHANGED")]
    InsightWidgetDescriptionChanged(InsightWidgetDescriptionChanged),
    /// See [`KpiWidgetHeaderChanged`].
    #[serde(rename = "GDC.DASH/EVT.KPI_WIDGET.HEADER_CHANGED")]
    KpiWidgetHeaderChanged(KpiWidgetHeaderChanged),
    /// See [`DashboardRenamed`].
    #[serde(rename = "GDC.DASH/EVT.RENAMED")]
    DashboardRenamed(DashboardRenamed),
    /// See [`LayoutChanged`].
    #[serde(rename = "GDC.DASH/EVT.FLUID_LAYOUT.LAYOUT_CHANGED")]
    LayoutChanged(LayoutChanged),
}

/// Discriminant of [`EventPayload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DashboardEventType {
    /// `GDC.DASH/EVT.COMMAND.STARTED`
    #[serde(rename = "GDC.DASH/EVT.COMMAND.STARTED")]
    CommandStarted,
    /// `GDC.DASH/EVT.COMMAND.REJECTED`
    #[serde(rename = "GDC.DASH/EVT.COMMAND.REJECTED")]
    CommandRejected,
    /// `GDC.DASH/EVT.COMMAND.FAILED`
    #[serde(rename = "GDC.DASH/EVT.COMMAND.FAILED")]
    CommandFailed,
    /// `GDC.DASH/EVT.INSIGHT_WIDGET.DRILL_DOWN_ADDED`
    #[serde(rename = "GDC.DASH/EVT.INSIGHT_WIDGET.DRILL_DOWN_ADDED")]
    InsightWidgetDrillDownAdded,
    /// `GDC.DASH/EVT.INSIGHT_WIDGET.DRILL_DOWN_REMOVED`
    #[serde(rename = "GDC.DASH/EVT.INSIGHT_WIDGET.DRILL_DOWN_REMOVED")]
    InsightWidgetDrillDownRemoved,
    /// `GDC.DASH/EVT.INSIGHT_WIDGET.HEADER_CHANGED`
    #[serde(rename = "GDC.DASH/EVT.INSIGHT_WIDGET.HEADER_CHANGED")]
    InsightWidgetHeaderChanged,
    /// `GDC.DASH/EVT.INSIGHT_WIDGET.DESCRIPTION_CHANGED`
    #[serde(rename = "GDC.DASH/EVT.INSIGHT_WIDGET.DESCRIPTION_CHANGED")]
    InsightWidgetDescriptionChanged,
    /// `GDC.DASH/EVT.KPI_WIDGET.HEADER_CHANGED`
    #[serde(rename = "GDC.DASH/EVT.KPI_WIDGET.HEADER_CHANGED")]
    KpiWidgetHeaderChanged,
    /// `GDC.DASH/EVT.RENAMED`
    #[serde(rename = "GDC.DASH/EVT.RENAMED")]
    DashboardRenamed,
    /// `GDC.DASH/EVT.FLUID_LAYOUT.LAYOUT_CHANGED`
    #[serde(rename = "GDC.DASH/EVT.FLUID_LAYOUT.LAYOUT_CHANGED")]
    LayoutChanged,
}

impl DashboardEventType {
    /// Every event type, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::CommandStarted,
        Self::CommandRejected,
        Self::CommandFailed,
        Self::InsightWidgetDrillDownAdded,
        Self::InsightWidgetDrillDownRemoved,
        Self::InsightWidgetHeaderChanged,
        Self::InsightWidgetDescriptionChanged,
        Self::KpiWidgetHeaderChanged,
        Self::DashboardRenamed,
        Self::LayoutChanged,
    ];

    /// Wire name of the event type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CommandStarted => "GDC.DASH/EVT.COMMAND.STARTED",
            Self::CommandRejected => "GDC.DASH/EVT.COMMAND.REJECTED",
            Self::CommandFailed => "GDC.DASH/EVT.COMMAND.FAILED",
            Self::InsightWidgetDrillDownAdded => "GDC.DASH/EVT.INSIGHT_WIDGET.DRILL_DOWN_ADDED",
            Self::InsightWidgetDrillDownRemoved => "GDC.DASH/EVT.INSIGHT_WIDGET.DRILL_DOWN_REMOVED",
            Self::InsightWidgetHeaderChanged => "GDC.DASH/EVT.INSIGHT_WIDGET.HEADER_CHANGED",
            Self::InsightWidgetDescriptionChanged => {
                "GDC.DASH/EVT.INSIGHT_WIDGET.DESCRIPTION_CHANGED"
            }
            Self::KpiWidgetHeaderChanged => "GDC.DASH/EVT.KPI_WIDGET.HEADER_CHANGED",
            Self::DashboardRenamed => "GDC.DASH/EVT.RENAMED",
            Self::LayoutChanged => "GDC.DASH/EVT.FLUID_LAYOUT.LAYOUT_CHANGED",
        }
    }
}

impl fmt::Display for DashboardEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! event_kinds {
    ($($kind:ident),* $(,)?) => {
        impl EventPayload {
            /// Discriminant of the payload.
            pub const fn event_type(&self) -> DashboardEventType {
                match self {
                    $(Self::$kind(_) => DashboardEventType::$kind,)*
                }
            }
        }

        $(
            impl EventPayloadKind for $kind {
                const EVENT_TYPE: DashboardEventType = DashboardEventType::$kind;

                fn narrow(payload: &EventPayload) -> Option<&Self> {
                    match payload {
                        EventPayload::$kind(inner) => Some(inner),
                        _ => None,
                    }
                }
            }

            impl From<$kind> for EventPayload {
                fn from(payload: $kind) -> Self {
                    Self::$kind(payload)
                }
            }
        )*
    };
}

event_kinds!(
    CommandStarted,
    CommandRejected,
    CommandFailed,
    InsightWidgetDrillDownAdded,
    InsightWidgetDrillDownRemoved,
    InsightWidgetHeaderChanged,
    InsightWidgetDescriptionChanged,
    KpiWidgetHeaderChanged,
    DashboardRenamed,
    LayoutChanged,
);

/// Creates the event announcing that `command` is being processed.
pub fn command_started(command: DashboardCommand) -> DashboardEvent {
    let correlation_id = command.correlation_id.clone();
    DashboardEvent::new(CommandStarted { command }, correlation_id)
}

/// Creates the event reporting a command rejected during validation.
pub fn command_rejected(
    command_type: CommandType,
    message: impl Into<String>,
    correlation_id: Option<CorrelationId>,
) -> DashboardEvent {
    DashboardEvent::new(
        CommandRejected {
            command_type,
            message: message.into(),
        },
        correlation_id,
    )
}

/// Creates the event reporting a command that could not be completed.
pub fn command_failed(command: DashboardCommand, error: &CommandError) -> DashboardEvent {
    let correlation_id = command.correlation_id.clone();
    DashboardEvent::new(
        CommandFailed {
            reason: error.failure_reason(),
            message: error.to_string(),
            error_kind: error.kind().to_string(),
            command,
        },
        correlation_id,
    )
}

/// Creates the event reporting an enabled drill down.
pub fn insight_widget_drill_down_added(
    widget_ref: ObjRef,
    attribute_hierarchy: CatalogHierarchy,
    attribute_identifier: ObjRef,
    correlation_id: Option<CorrelationId>,
) -> DashboardEvent {
    DashboardEvent::new(
        InsightWidgetDrillDownAdded {
            widget_ref,
            attribute_hierarchy,
            attribute_identifier,
        },
        correlation_id,
    )
}

/// Creates the event reporting a disabled drill down.
pub fn insight_widget_drill_down_removed(
    widget_ref: ObjRef,
    attribute_hierarchy: CatalogHierarchy,
    attribute_identifier: ObjRef,
    correlation_id: Option<CorrelationId>,
) -> DashboardEvent {
    DashboardEvent::new(
        InsightWidgetDrillDownRemoved {
            widget_ref,
            attribute_hierarchy,
            attribute_identifier,
        },
        correlation_id,
    )
}

/// Creates the event reporting a changed insight widget header.
pub fn insight_widget_header_changed(
    widget_ref: ObjRef,
    header: WidgetHeader,
    correlation_id: Option<CorrelationId>,
) -> DashboardEvent {
    DashboardEvent::new(
        InsightWidgetHeaderChanged { widget_ref, header },
        correlation_id,
    )
}

/// Creates the event reporting a changed insight widget description.
pub fn insight_widget_description_changed(
    widget_ref: ObjRef,
    description: String,
    correlation_id: Option<CorrelationId>,
) -> DashboardEvent {
    DashboardEvent::new(
        InsightWidgetDescriptionChanged {
            widget_ref,
            description,
        },
        correlation_id,
    )
}

/// Creates the event reporting a changed KPI widget header.
pub fn kpi_widget_header_changed(
    widget_ref: ObjRef,
    header: WidgetHeader,
    correlation_id: Option<CorrelationId>,
) -> DashboardEvent {
    DashboardEvent::new(KpiWidgetHeaderChanged { widget_ref, header }, correlation_id)
}

/// Creates the event reporting a renamed dashboard.
pub fn dashboard_renamed(new_title: String, correlation_id: Option<CorrelationId>) -> DashboardEvent {
    DashboardEvent::new(DashboardRenamed { new_title }, correlation_id)
}

/// Creates the event reporting an undone change.
pub fn layout_changed(
    undone_command: DashboardCommand,
    correlation_id: Option<CorrelationId>,
) -> DashboardEvent {
    DashboardEvent::new(LayoutChanged { undone_command }, correlation_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command;
    use crate::types::ObjectType;
    use serde_json::json;

    fn widget_ref() -> ObjRef {
        ObjRef::try_identifier("w1", ObjectType::Widget).unwrap()
    }

    #[test]
    fn event_type_matches_serialized_type_tag() {
        let event = kpi_widget_header_changed(widget_ref(), WidgetHeader::new("KPI"), None);
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["type"], json!(event.event_type().as_str()));
        assert_eq!(value["payload"]["header"]["title"], json!("KPI"));
    }

    #[test]
    fn every_event_type_has_a_distinct_wire_name() {
        let mut names: Vec<_> = DashboardEventType::ALL.iter().map(|t| t.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DashboardEventType::ALL.len());
    }

    #[test]
    fn payload_narrowing_only_succeeds_for_matching_kind() {
        let event = dashboard_renamed("Q3".to_string(), None);

        assert_eq!(
            event.payload_as::<DashboardRenamed>().map(|p| p.new_title.as_str()),
            Some("Q3")
        );
        assert!(event.payload_as::<KpiWidgetHeaderChanged>().is_none());
    }

    #[test]
    fn command_started_copies_correlation_id() {
        let correlation_id = CorrelationId::try_new("c-1").unwrap();
        let event = command_started(command::undo_layout_changes(Some(correlation_id.clone())));

        assert_eq!(event.correlation_id, Some(correlation_id));
        assert_eq!(event.event_type(), DashboardEventType::CommandStarted);
    }

    #[test]
    fn command_failed_carries_reason_kind_and_command() {
        let cmd = command::rename_dashboard("", None);
        let event = command_failed(
            cmd.clone(),
            &CommandError::InvalidArgument("title must not be empty".to_string()),
        );

        let failed = event.payload_as::<CommandFailed>().unwrap();
        assert_eq!(failed.reason, ActionFailedErrorReason::UserError);
        assert_eq!(failed.error_kind, "INVALID_ARGUMENT");
        assert_eq!(failed.command, cmd);
        assert!(event.is_failure());
    }

    #[test]
    fn event_round_trips_through_json() {
        let event = insight_widget_drill_down_added(
            widget_ref(),
            CatalogHierarchy::Attribute(
                ObjRef::try_identifier("geo", ObjectType::AttributeHierarchy).unwrap(),
            ),
            ObjRef::try_identifier("label.region", ObjectType::DisplayForm).unwrap(),
            Some(CorrelationId::try_new("c-9").unwrap()),
        );

        let json = serde_json::to_string(&event).unwrap();
        let decoded: DashboardEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, event);
    }
}
