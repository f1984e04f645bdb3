//! Header and description handlers.

use super::Transition;
use crate::command::{
    ChangeInsightWidgetDescription, ChangeInsightWidgetHeader, ChangeKpiWidgetHeader,
    DashboardCommand,
};
use crate::context::DashboardContext;
use crate::errors::CommandResult;
use crate::event;
use crate::model::DashboardState;
use crate::mutation::{DashboardAction, StateMutation};
use crate::validation::{
    validate_existing_insight_widget, validate_existing_kpi_widget, validate_title,
};
use tracing::debug;

/// Replaces the header of an insight widget.
pub fn change_insight_widget_header(
    ctx: &DashboardContext,
    state: &DashboardState,
    cmd: &DashboardCommand,
    payload: &ChangeInsightWidgetHeader,
) -> CommandResult<Transition> {
    let insight = validate_existing_insight_widget(state, &payload.widget_ref)?;
    validate_title(&payload.header.title)?;

    debug!(workspace = %ctx.workspace, widget = %insight.widget_ref, "Changing insight header");

    Ok(Transition::new()
        .mutate(
            StateMutation::new(DashboardAction::ChangeWidgetHeader {
                widget_ref: insight.widget_ref.clone(),
                header: payload.header.clone(),
            })
            .with_undo(cmd.clone()),
        )
        .emit(event::insight_widget_header_changed(
            insight.widget_ref.clone(),
            payload.header.clone(),
            cmd.correlation_id.clone(),
        )))
}

/// Replaces the description of an insight widget.
pub fn change_insight_widget_description(
    ctx: &DashboardContext,
    state: &DashboardState,
    cmd: &DashboardCommand,
    payload: &ChangeInsightWidgetDescription,
) -> CommandResult<Transition> {
    let insight = validate_existing_insight_widget(state, &payload.widget_ref)?;

    debug!(workspace = %ctx.workspace, widget = %insight.widget_ref, "Changing insight description");

    Ok(Transition::new()
        .mutate(
            StateMutation::new(DashboardAction::ChangeWidgetDescription {
                widget_ref: insight.widget_ref.clone(),
                description: payload.description.clone(),
            })
            .with_undo(cmd.clone()),
        )
        .emit(event::insight_widget_description_changed(
            insight.widget_ref.clone(),
            payload.description.clone(),
            cmd.correlation_id.clone(),
        )))
}

/// Replaces the header of a KPI widget.
pub fn change_kpi_widget_header(
    ctx: &DashboardContext,
    state: &DashboardState,
    cmd: &DashboardCommand,
    payload: &ChangeKpiWidgetHeader,
) -> CommandResult<Transition> {
    let kpi = validate_existing_kpi_widget(state, &payload.widget_ref)?;
    validate_title(&payload.header.title)?;

    debug!(workspace = %ctx.workspace, widget = %kpi.widget_ref, "Changing KPI header");

    Ok(Transition::new()
        .mutate(
            StateMutation::new(DashboardAction::ChangeWidgetHeader {
                widget_ref: kpi.widget_ref.clone(),
                header: payload.header.clone(),
            })
            .with_undo(cmd.clone()),
        )
        .emit(event::kpi_widget_header_changed(
            kpi.widget_ref.clone(),
            payload.header.clone(),
            cmd.correlation_id.clone(),
        )))
}
