//! Event predicate behavior over generated events of every type.

use dashcore::event::{DashboardEventType, DashboardRenamed, InsightWidgetHeaderChanged};
use dashcore::predicate::{new_dashboard_event_predicate, new_refined_event_predicate};
use dashcore::types::WidgetHeader;
use dashcore_testing::builders::{test_runtime, widget_ref, DashboardStateBuilder};
use dashcore_testing::generators::{arb_event, arb_event_of, arb_event_type};
use dashcore_testing::EventCollector;
use proptest::prelude::*;

proptest! {
    #[test]
    fn unrefined_predicate_matches_exactly_its_type(
        target in arb_event_type(),
        event in arb_event(),
    ) {
        let predicate = new_dashboard_event_predicate(target);

        prop_assert_eq!(predicate.matches(&event), event.event_type() == target);
    }

    #[test]
    fn unrefined_predicate_matches_every_event_of_its_type(
        event in arb_event_of(DashboardEventType::LayoutChanged),
    ) {
        let predicate = new_dashboard_event_predicate(DashboardEventType::LayoutChanged);

        prop_assert!(predicate.matches(&event));
    }

    #[test]
    fn rejecting_refinement_makes_predicate_false(event in arb_event()) {
        let predicate = new_refined_event_predicate(|_: &DashboardRenamed| false);

        prop_assert!(!predicate.matches(&event));
    }

    #[test]
    fn accepting_refinement_matches_like_unrefined_predicate(event in arb_event()) {
        let refined = new_refined_event_predicate(|_: &InsightWidgetHeaderChanged| true);
        let unrefined = new_dashboard_event_predicate(DashboardEventType::InsightWidgetHeaderChanged);

        prop_assert_eq!(refined.matches(&event), unrefined.matches(&event));
    }
}

#[test]
fn listener_only_sees_events_selected_by_refined_predicate() {
    let state = DashboardStateBuilder::new("d")
        .insight_widget("w1", "A")
        .insight_widget("w2", "B")
        .build();
    let mut runtime = test_runtime(state);
    let collector = EventCollector::new();
    let _ = collector.attach(
        &mut runtime,
        new_refined_event_predicate(|changed: &InsightWidgetHeaderChanged| {
            changed.widget_ref == widget_ref("w2")
        }),
    );

    for (id, title) in [("w1", "x"), ("w2", "y"), ("w1", "z")] {
        let _ = runtime.execute(dashcore::command::change_insight_widget_header(
            widget_ref(id),
            WidgetHeader::new(title),
            None,
        ));
    }

    let headers: Vec<String> = collector
        .payloads::<InsightWidgetHeaderChanged>()
        .into_iter()
        .map(|changed| changed.header.title)
        .collect();
    assert_eq!(headers, vec!["y".to_string()]);
}
