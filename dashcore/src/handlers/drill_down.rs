//! Drill-down blacklist handlers for insight widgets.
//!
//! An insight widget keeps a blacklist of (hierarchy, attribute) pairs along
//! which drilling down is disabled. Adding a drill down removes the pair from
//! the blacklist; removing a drill down adds it. Both replace the list
//! wholesale with a single reversible mutation.

use super::Transition;
use crate::command::{
    AddDrillDownForInsightWidget, DashboardCommand, RemoveDrillDownForInsightWidget,
};
use crate::context::DashboardContext;
use crate::errors::CommandResult;
use crate::event;
use crate::model::{DashboardState, DrillDownReference};
use crate::mutation::{DashboardAction, StateMutation};
use crate::validation::validate_existing_insight_widget;
use tracing::debug;

/// Re-enables drilling down along the command's hierarchy from its attribute.
///
/// Every blacklist entry matching the pair is dropped; the others keep
/// their order. A widget with no blacklist ends up with an empty one.
pub fn add_drill_down_for_insight_widget(
    ctx: &DashboardContext,
    state: &DashboardState,
    cmd: &DashboardCommand,
    payload: &AddDrillDownForInsightWidget,
) -> CommandResult<Transition> {
    let insight = validate_existing_insight_widget(state, &payload.widget_ref)?;

    let hierarchy_ref = payload.attribute_hierarchy.hierarchy_ref();
    let attribute_identifier = payload.attribute_identifier.to_string();
    let blacklist: Vec<DrillDownReference> = insight
        .widget
        .ignored_drill_down_hierarchies
        .iter()
        .flatten()
        .filter(|entry| !entry.matches(hierarchy_ref, &attribute_identifier))
        .cloned()
        .collect();

    debug!(
        workspace = %ctx.workspace,
        widget = %insight.widget_ref,
        remaining = blacklist.len(),
        "Enabling drill down"
    );

    Ok(Transition::new()
        .mutate(
            StateMutation::new(DashboardAction::ReplaceWidgetBlacklistHierarchies {
                widget_ref: insight.widget_ref.clone(),
                blacklist_hierarchies: blacklist,
            })
            .with_undo(cmd.clone()),
        )
        .emit(event::insight_widget_drill_down_added(
            insight.widget_ref.clone(),
            payload.attribute_hierarchy.clone(),
            payload.attribute_identifier.clone(),
            cmd.correlation_id.clone(),
        )))
}

/// Disables drilling down along the command's hierarchy from its attribute.
///
/// The pair is appended to the blacklist unless an entry with the same
/// hierarchy and attribute identifier is already there.
pub fn remove_drill_down_for_insight_widget(
    ctx: &DashboardContext,
    state: &DashboardState,
    cmd: &DashboardCommand,
    payload: &RemoveDrillDownForInsightWidget,
) -> CommandResult<Transition> {
    let insight = validate_existing_insight_widget(state, &payload.widget_ref)?;

    let hierarchy_ref = payload.attribute_hierarchy.hierarchy_ref();
    let attribute_identifier = payload.attribute_identifier.to_string();
    let mut blacklist = insight
        .widget
        .ignored_drill_down_hierarchies
        .clone()
        .unwrap_or_default();
    if !blacklist
        .iter()
        .any(|entry| entry.matches(hierarchy_ref, &attribute_identifier))
    {
        blacklist.push(
            payload
                .attribute_hierarchy
                .blacklist_entry(&payload.attribute_identifier),
        );
    }

    debug!(
        workspace = %ctx.workspace,
        widget = %insight.widget_ref,
        blacklisted = blacklist.len(),
        "Disabling drill down"
    );

    Ok(Transition::new()
        .mutate(
            StateMutation::new(DashboardAction::ReplaceWidgetBlacklistHierarchies {
                widget_ref: insight.widget_ref.clone(),
                blacklist_hierarchies: blacklist,
            })
            .with_undo(cmd.clone()),
        )
        .emit(event::insight_widget_drill_down_removed(
            insight.widget_ref.clone(),
            payload.attribute_hierarchy.clone(),
            payload.attribute_identifier.clone(),
            cmd.correlation_id.clone(),
        )))
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use crate::command::{self, CommandPayload};
    use crate::errors::CommandError;
    use crate::event::{DashboardEventType, InsightWidgetDrillDownAdded};
    use crate::model::CatalogHierarchy;
    use crate::types::{CorrelationId, ObjectType};

    fn hierarchy(id: &str) -> CatalogHierarchy {
        CatalogHierarchy::Attribute(obj(id, ObjectType::AttributeHierarchy))
    }

    fn label(id: &str) -> crate::types::ObjRef {
        obj(id, ObjectType::DisplayForm)
    }

    fn add(state: &DashboardState, cmd: &DashboardCommand) -> CommandResult<Transition> {
        match &cmd.payload {
            CommandPayload::AddDrillDownForInsightWidget(payload) => {
                add_drill_down_for_insight_widget(&ctx(), state, cmd, payload)
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    fn remove(state: &DashboardState, cmd: &DashboardCommand) -> CommandResult<Transition> {
        match &cmd.payload {
            CommandPayload::RemoveDrillDownForInsightWidget(payload) => {
                remove_drill_down_for_insight_widget(&ctx(), state, cmd, payload)
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    fn replaced_list(transition: &Transition) -> Vec<DrillDownReference> {
        match &transition.mutations().next().unwrap().action {
            DashboardAction::ReplaceWidgetBlacklistHierarchies {
                blacklist_hierarchies,
                ..
            } => blacklist_hierarchies.clone(),
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn add_drops_matching_pair_and_keeps_order() {
        let state = state(Some(vec![
            entry("h3", "label.c"),
            entry("h1", "label.a"),
            entry("h2", "label.b"),
        ]));
        let cmd = command::add_drill_down_for_insight_widget(
            insight_ref(),
            label("label.a"),
            hierarchy("h1"),
            None,
        );

        let transition = add(&state, &cmd).unwrap();

        assert_eq!(
            replaced_list(&transition),
            vec![entry("h3", "label.c"), entry("h2", "label.b")]
        );
    }

    #[test]
    fn add_normalizes_absent_blacklist_to_empty() {
        let state = state(None);
        let cmd = command::add_drill_down_for_insight_widget(
            insight_ref(),
            label("label.a"),
            hierarchy("h1"),
            None,
        );

        assert_eq!(replaced_list(&add(&state, &cmd).unwrap()), vec![]);
    }

    #[test]
    fn add_for_absent_pair_keeps_list() {
        let list = vec![entry("h1", "label.a"), entry("h2", "label.b")];
        let state = state(Some(list.clone()));
        let cmd = command::add_drill_down_for_insight_widget(
            insight_ref(),
            label("label.z"),
            hierarchy("h1"),
            None,
        );

        assert_eq!(replaced_list(&add(&state, &cmd).unwrap()), list);
    }

    #[test]
    fn add_records_undo_and_emits_full_event() {
        let id = CorrelationId::try_new("corr-1").unwrap();
        let state = state(None);
        let cmd = command::add_drill_down_for_insight_widget(
            insight_ref(),
            label("label.a"),
            hierarchy("h1"),
            Some(id.clone()),
        );

        let transition = add(&state, &cmd).unwrap();

        let mutation = transition.mutations().next().unwrap();
        assert_eq!(mutation.undo.as_ref().map(|u| &u.cmd), Some(&cmd));

        let event = transition.events().next().unwrap();
        assert_eq!(event.correlation_id, Some(id));
        assert_eq!(
            event.payload_as::<InsightWidgetDrillDownAdded>(),
            Some(&InsightWidgetDrillDownAdded {
                widget_ref: insight_ref(),
                attribute_hierarchy: hierarchy("h1"),
                attribute_identifier: label("label.a"),
            })
        );
    }

    #[test]
    fn add_rejects_kpi_widget() {
        let state = state(None);
        let cmd = command::add_drill_down_for_insight_widget(
            kpi_ref(),
            label("label.a"),
            hierarchy("h1"),
            None,
        );

        assert!(matches!(
            add(&state, &cmd),
            Err(CommandError::InvalidEntityKind { .. })
        ));
    }

    #[test]
    fn add_fails_for_unknown_widget() {
        let state = state(None);
        let cmd = command::add_drill_down_for_insight_widget(
            obj("ghost", ObjectType::Widget),
            label("label.a"),
            hierarchy("h1"),
            None,
        );

        assert!(matches!(
            add(&state, &cmd),
            Err(CommandError::EntityNotFound { .. })
        ));
    }

    #[test]
    fn remove_appends_entry() {
        let state = state(Some(vec![entry("h2", "label.b")]));
        let cmd = command::remove_drill_down_for_insight_widget(
            insight_ref(),
            label("label.a"),
            hierarchy("h1"),
            None,
        );

        let transition = remove(&state, &cmd).unwrap();

        assert_eq!(
            replaced_list(&transition),
            vec![entry("h2", "label.b"), entry("h1", "label.a")]
        );
        assert_eq!(
            transition.events().next().unwrap().event_type(),
            DashboardEventType::InsightWidgetDrillDownRemoved
        );
    }

    #[test]
    fn remove_is_idempotent() {
        let list = vec![entry("h1", "label.a")];
        let state = state(Some(list.clone()));
        let cmd = command::remove_drill_down_for_insight_widget(
            insight_ref(),
            label("label.a"),
            hierarchy("h1"),
            None,
        );

        assert_eq!(replaced_list(&remove(&state, &cmd).unwrap()), list);
    }

    #[test]
    fn remove_keys_existing_entry_by_identifier_not_object_type() {
        let list = vec![entry("h1", "label.a")];
        let state = state(Some(list.clone()));
        let cmd = command::remove_drill_down_for_insight_widget(
            insight_ref(),
            obj("label.a", ObjectType::Attribute),
            hierarchy("h1"),
            None,
        );

        let replaced = replaced_list(&remove(&state, &cmd).unwrap());

        assert_eq!(replaced, list);
        assert_eq!(
            replaced
                .iter()
                .filter(|e| e.matches(&obj("h1", ObjectType::AttributeHierarchy), "label.a"))
                .count(),
            1
        );
    }

    #[test]
    fn remove_builds_date_entry_for_date_template() {
        let state = state(None);
        let template = obj("tpl", ObjectType::DateHierarchyTemplate);
        let attribute = obj("date.year", ObjectType::Attribute);
        let cmd = command::remove_drill_down_for_insight_widget(
            insight_ref(),
            attribute.clone(),
            CatalogHierarchy::DateTemplate(template.clone()),
            None,
        );

        assert_eq!(
            replaced_list(&remove(&state, &cmd).unwrap()),
            vec![DrillDownReference::DateHierarchy {
                date_hierarchy_template: template,
                date_dataset_attribute: attribute,
            }]
        );
    }
}
