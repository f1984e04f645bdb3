//! Command validators.
//!
//! Validators are pure reads of the state snapshot. They either hand back a
//! [`ValidatedWidget`] whose kind is guaranteed by its type parameter, or
//! fail with the [`CommandError`] the runtime turns into a rejection.

use crate::errors::{CommandError, CommandResult};
use crate::model::{DashboardState, InsightWidget, KpiWidget, Widget, WidgetKind};
use crate::types::ObjRef;

/// Longest dashboard or widget title accepted, in characters.
pub const MAX_TITLE_LENGTH: usize = 256;

/// A widget reference that resolved against the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedWidget<'a, W> {
    /// The reference as given in the command.
    pub widget_ref: &'a ObjRef,
    /// The widget found in the state.
    pub widget: &'a W,
}

/// Resolves `widget_ref` to a widget of any kind.
pub fn validate_existing_widget<'a>(
    state: &'a DashboardState,
    widget_ref: &'a ObjRef,
) -> CommandResult<ValidatedWidget<'a, Widget>> {
    state
        .widget(widget_ref)
        .map(|widget| ValidatedWidget { widget_ref, widget })
        .ok_or_else(|| CommandError::EntityNotFound {
            entity_ref: widget_ref.clone(),
        })
}

/// Resolves `widget_ref` to an insight widget.
pub fn validate_existing_insight_widget<'a>(
    state: &'a DashboardState,
    widget_ref: &'a ObjRef,
) -> CommandResult<ValidatedWidget<'a, InsightWidget>> {
    let validated = validate_existing_widget(state, widget_ref)?;
    match validated.widget {
        Widget::Insight(widget) => Ok(ValidatedWidget { widget_ref, widget }),
        Widget::Kpi(_) => Err(wrong_kind(widget_ref, WidgetKind::Insight, WidgetKind::Kpi)),
    }
}

/// Resolves `widget_ref` to a KPI widget.
pub fn validate_existing_kpi_widget<'a>(
    state: &'a DashboardState,
    widget_ref: &'a ObjRef,
) -> CommandResult<ValidatedWidget<'a, KpiWidget>> {
    let validated = validate_existing_widget(state, widget_ref)?;
    match validated.widget {
        Widget::Kpi(widget) => Ok(ValidatedWidget { widget_ref, widget }),
        Widget::Insight(_) => Err(wrong_kind(widget_ref, WidgetKind::Kpi, WidgetKind::Insight)),
    }
}

/// Checks a dashboard or widget title.
pub fn validate_title(title: &str) -> CommandResult<()> {
    let length = title.chars().count();
    if length > MAX_TITLE_LENGTH {
        return Err(CommandError::InvalidArgument(format!(
            "title is {length} characters long, at most {MAX_TITLE_LENGTH} are allowed"
        )));
    }
    Ok(())
}

fn wrong_kind(widget_ref: &ObjRef, expected: WidgetKind, actual: WidgetKind) -> CommandError {
    CommandError::InvalidEntityKind {
        widget_ref: widget_ref.clone(),
        expected,
        actual,
    }
}
