//! JSON shape of commands and events as seen by external listeners.

use dashcore::command::{self, DashboardCommand};
use dashcore::event::{DashboardEvent, DashboardEventType};
use dashcore::predicate::EventPredicate;
use dashcore::types::WidgetHeader;
use dashcore::CorrelationId;
use dashcore_testing::builders::{test_runtime, widget_ref, DashboardStateBuilder};
use dashcore_testing::{logging, EventCollector};
use serde_json::{json, Value};

fn dashboard() -> dashcore::DashboardState {
    DashboardStateBuilder::new("Sales")
        .insight_widget("w1", "Regions")
        .build()
}

#[test]
fn outcome_event_serializes_type_payload_and_correlation() {
    logging::init();
    let mut runtime = test_runtime(dashboard());
    let id = CorrelationId::try_new("c-1").unwrap();

    let outcome = runtime.execute(command::rename_dashboard("Q3", Some(id)));
    let value = serde_json::to_value(&outcome).unwrap();

    assert_eq!(value["type"], json!("GDC.DASH/EVT.RENAMED"));
    assert_eq!(value["correlationId"], json!("c-1"));
    assert_eq!(value["payload"]["newTitle"], json!("Q3"));
}

#[test]
fn events_without_correlation_omit_the_field() {
    logging::init();
    let mut runtime = test_runtime(dashboard());

    let outcome = runtime.execute(command::change_insight_widget_header(
        widget_ref("w1"),
        WidgetHeader::new("Cities"),
        None,
    ));
    let value = serde_json::to_value(&outcome).unwrap();

    assert_eq!(
        value["type"],
        json!("GDC.DASH/EVT.INSIGHT_WIDGET.HEADER_CHANGED")
    );
    assert!(value.get("correlationId").is_none());
    assert!(value["payload"].get("ref").is_some());
}

#[test]
fn every_emitted_event_reads_back_identically() {
    logging::init();
    let mut runtime = test_runtime(dashboard());
    let collector = EventCollector::new();
    let _ = collector.attach(&mut runtime, EventPredicate::any());

    let _ = runtime.execute(command::change_insight_widget_description(
        widget_ref("w1"),
        "By region",
        None,
    ));
    let _ = runtime.execute(command::undo_layout_changes(None));
    let _ = runtime.execute(command::undo_layout_changes(None));

    let events = collector.events();
    assert_eq!(
        events.last().map(DashboardEvent::event_type),
        Some(DashboardEventType::CommandFailed)
    );
    for event in events {
        let text = serde_json::to_string(&event).unwrap();
        let back: DashboardEvent = serde_json::from_str(&text).unwrap();
        assert_eq!(back, event);
    }
}

#[test]
fn command_type_tag_drives_deserialization() {
    let cmd = command::rename_dashboard("Q4", None);
    let mut value = serde_json::to_value(&cmd).unwrap();
    assert_eq!(value["type"], json!("GDC.DASH/CMD.RENAME"));

    value["correlationId"] = Value::String("from-json".to_string());
    let parsed: DashboardCommand = serde_json::from_value(value).unwrap();

    assert_eq!(parsed.command_type(), cmd.command_type());
    assert_eq!(
        parsed.correlation_id,
        Some(CorrelationId::try_new("from-json").unwrap())
    );
}

#[test]
fn unknown_command_type_is_refused() {
    let result = serde_json::from_value::<DashboardCommand>(json!({
        "type": "GDC.DASH/CMD.NOT_A_COMMAND",
        "payload": {}
    }));

    assert!(result.is_err());
}
