//! Property test generators for dashboard types.
//!
//! Each generator respects the validation rules of the type it produces, so
//! values can be unwrapped freely inside properties.

use dashcore::command::{self, DashboardCommand};
use dashcore::event::{self, DashboardEvent, DashboardEventType};
use dashcore::model::{CatalogHierarchy, DrillDownReference};
use dashcore::types::{CorrelationId, Identifier, ObjRef, ObjectType, WidgetHeader};
use proptest::prelude::*;

/// Generates valid identifiers.
pub fn arb_identifier() -> impl Strategy<Value = Identifier> {
    "[a-zA-Z0-9][a-zA-Z0-9._-]{0,40}"
        .prop_filter_map("Invalid Identifier", |s| Identifier::try_new(s).ok())
}

/// Generates identifier references of the given object type.
pub fn arb_obj_ref(object_type: ObjectType) -> impl Strategy<Value = ObjRef> {
    arb_identifier().prop_map(move |identifier| ObjRef::identifier(identifier, object_type))
}

/// Generates a small pool of references so collisions are likely.
///
/// Blacklist logic is only interesting when entries share hierarchies or
/// labels; a pool of a few names makes that the common case.
pub fn arb_pooled_ref(object_type: ObjectType) -> impl Strategy<Value = ObjRef> {
    prop::sample::select(vec!["a", "b", "c", "d"]).prop_map(move |name| {
        ObjRef::try_identifier(name, object_type).expect("pooled names are valid")
    })
}

/// Generates catalog hierarchies of both kinds.
pub fn arb_catalog_hierarchy() -> impl Strategy<Value = CatalogHierarchy> {
    prop_oneof![
        arb_pooled_ref(ObjectType::AttributeHierarchy).prop_map(CatalogHierarchy::Attribute),
        arb_pooled_ref(ObjectType::DateHierarchyTemplate).prop_map(CatalogHierarchy::DateTemplate),
    ]
}

/// Generates blacklist entries of both kinds.
pub fn arb_drill_down_reference() -> impl Strategy<Value = DrillDownReference> {
    (arb_catalog_hierarchy(), arb_pooled_ref(ObjectType::DisplayForm))
        .prop_map(|(hierarchy, attribute)| hierarchy.blacklist_entry(&attribute))
}

/// Generates blacklists, possibly with duplicates, of up to eight entries.
pub fn arb_blacklist() -> impl Strategy<Value = Vec<DrillDownReference>> {
    prop::collection::vec(arb_drill_down_reference(), 0..8)
}

/// Generates optional blacklists; `None` models a widget never modified.
pub fn arb_optional_blacklist() -> impl Strategy<Value = Option<Vec<DrillDownReference>>> {
    prop::option::of(arb_blacklist())
}

/// Generates titles that pass title validation.
pub fn arb_title() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 ]{0,64}"
}

/// Generates correlation IDs.
pub fn arb_correlation_id() -> impl Strategy<Value = CorrelationId> {
    "[a-z0-9-]{1,36}".prop_filter_map("Invalid CorrelationId", |s| CorrelationId::try_new(s).ok())
}

/// Generates event types uniformly.
pub fn arb_event_type() -> impl Strategy<Value = DashboardEventType> {
    prop::sample::select(DashboardEventType::ALL.to_vec())
}

/// Generates commands that target widget `w1` or the dashboard itself.
pub fn arb_command() -> impl Strategy<Value = DashboardCommand> {
    let widget = || Just(ObjRef::try_identifier("w1", ObjectType::Widget).expect("valid"));
    prop_oneof![
        (widget(), arb_pooled_ref(ObjectType::DisplayForm), arb_catalog_hierarchy()).prop_map(
            |(w, a, h)| command::add_drill_down_for_insight_widget(w, a, h, None)
        ),
        (widget(), arb_pooled_ref(ObjectType::DisplayForm), arb_catalog_hierarchy()).prop_map(
            |(w, a, h)| command::remove_drill_down_for_insight_widget(w, a, h, None)
        ),
        (widget(), arb_title()).prop_map(|(w, t)| command::change_insight_widget_header(
            w,
            WidgetHeader::new(t),
            None
        )),
        (widget(), arb_title())
            .prop_map(|(w, d)| command::change_insight_widget_description(w, d, None)),
        arb_title().prop_map(|t| command::rename_dashboard(t, None)),
        Just(command::undo_layout_changes(None)),
    ]
}

/// Generates an event of the requested type with arbitrary contents.
pub fn arb_event_of(event_type: DashboardEventType) -> BoxedStrategy<DashboardEvent> {
    let widget = arb_obj_ref(ObjectType::Widget);
    let attribute = arb_pooled_ref(ObjectType::DisplayForm);
    let correlation = prop::option::of(arb_correlation_id());
    match event_type {
        DashboardEventType::CommandStarted => (arb_command(), correlation)
            .prop_map(|(cmd, id)| {
                event::command_started(match id {
                    Some(id) => cmd.with_correlation_id(id),
                    None => cmd,
                })
            })
            .boxed(),
        DashboardEventType::CommandRejected => (arb_command(), arb_title(), correlation)
            .prop_map(|(cmd, message, id)| event::command_rejected(cmd.command_type(), message, id))
            .boxed(),
        DashboardEventType::CommandFailed => arb_command()
            .prop_map(|cmd| {
                event::command_failed(cmd, &dashcore::CommandError::NothingToUndo)
            })
            .boxed(),
        DashboardEventType::InsightWidgetDrillDownAdded => {
            (widget, arb_catalog_hierarchy(), attribute, correlation)
                .prop_map(|(w, h, a, id)| event::insight_widget_drill_down_added(w, h, a, id))
                .boxed()
        }
        DashboardEventType::InsightWidgetDrillDownRemoved => {
            (widget, arb_catalog_hierarchy(), attribute, correlation)
                .prop_map(|(w, h, a, id)| event::insight_widget_drill_down_removed(w, h, a, id))
                .boxed()
        }
        DashboardEventType::InsightWidgetHeaderChanged => (widget, arb_title(), correlation)
            .prop_map(|(w, t, id)| {
                event::insight_widget_header_changed(w, WidgetHeader::new(t), id)
            })
            .boxed(),
        DashboardEventType::InsightWidgetDescriptionChanged => (widget, arb_title(), correlation)
            .prop_map(|(w, d, id)| event::insight_widget_description_changed(w, d, id))
            .boxed(),
        DashboardEventType::KpiWidgetHeaderChanged => (widget, arb_title(), correlation)
            .prop_map(|(w, t, id)| event::kpi_widget_header_changed(w, WidgetHeader::new(t), id))
            .boxed(),
        DashboardEventType::DashboardRenamed => (arb_title(), correlation)
            .prop_map(|(t, id)| event::dashboard_renamed(t, id))
            .boxed(),
        DashboardEventType::LayoutChanged => (arb_command(), correlation)
            .prop_map(|(cmd, id)| event::layout_changed(cmd, id))
            .boxed(),
    }
}

/// Generates events of every type.
pub fn arb_event() -> impl Strategy<Value = DashboardEvent> {
    arb_event_type().prop_flat_map(arb_event_of)
}
