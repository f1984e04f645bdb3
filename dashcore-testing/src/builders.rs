//! Builders for dashboard test fixtures.
//!
//! Test data is described with raw strings; the builders take care of
//! turning them into validated references.
//!
//! ```rust
//! use dashcore_testing::builders::{attribute_entry, DashboardStateBuilder};
//!
//! let state = DashboardStateBuilder::new("Sales")
//!     .insight_widget("w1", "Top regions")
//!     .insight_widget_with_blacklist("w2", "Trend", vec![attribute_entry("geo", "label.region")])
//!     .kpi_widget("k1", "Revenue")
//!     .build();
//!
//! assert_eq!(state.widget_count(), 3);
//! ```

use dashcore::model::{
    CatalogHierarchy, DashboardState, DrillDownReference, InsightWidget, KpiWidget, Widget,
};
use dashcore::runtime::DashboardRuntime;
use dashcore::types::{Identifier, ObjRef, ObjectType, WidgetHeader};
use dashcore::{DashboardConfig, DashboardContext};

/// Reference of a widget by identifier.
///
/// # Panics
///
/// Panics if `id` is not a valid identifier.
pub fn widget_ref(id: &str) -> ObjRef {
    obj_ref(id, ObjectType::Widget)
}

/// Reference of any metadata object by identifier.
///
/// # Panics
///
/// Panics if `id` is not a valid identifier.
pub fn obj_ref(id: &str, object_type: ObjectType) -> ObjRef {
    ObjRef::try_identifier(id, object_type).expect("test identifiers must be valid")
}

/// Reference of an attribute label.
pub fn label_ref(id: &str) -> ObjRef {
    obj_ref(id, ObjectType::DisplayForm)
}

/// A user-defined attribute hierarchy as named by drill-down commands.
pub fn attribute_hierarchy(id: &str) -> CatalogHierarchy {
    CatalogHierarchy::Attribute(obj_ref(id, ObjectType::AttributeHierarchy))
}

/// A date hierarchy template as named by drill-down commands.
pub fn date_hierarchy(id: &str) -> CatalogHierarchy {
    CatalogHierarchy::DateTemplate(obj_ref(id, ObjectType::DateHierarchyTemplate))
}

/// Blacklist entry for a user-defined hierarchy and a label.
pub fn attribute_entry(hierarchy: &str, label: &str) -> DrillDownReference {
    attribute_hierarchy(hierarchy).blacklist_entry(&label_ref(label))
}

/// Blacklist entry for a date hierarchy template and a date attribute.
pub fn date_entry(template: &str, attribute: &str) -> DrillDownReference {
    date_hierarchy(template).blacklist_entry(&obj_ref(attribute, ObjectType::Attribute))
}

/// Handler context for workspace `test-workspace`.
pub fn test_context() -> DashboardContext {
    DashboardContext::new(Identifier::try_new("test-workspace").expect("valid workspace"))
}

/// A runtime with default configuration around `state`.
pub fn test_runtime(state: DashboardState) -> DashboardRuntime {
    DashboardRuntime::new(test_context(), state, &DashboardConfig::default())
}

/// Fluent builder for [`DashboardState`].
#[derive(Debug, Clone)]
pub struct DashboardStateBuilder {
    state: DashboardState,
}

impl DashboardStateBuilder {
    /// Starts an empty dashboard.
    pub fn new(title: &str) -> Self {
        Self {
            state: DashboardState::new(title),
        }
    }

    /// Adds an insight widget without a drill-down blacklist.
    #[must_use]
    pub fn insight_widget(self, id: &str, title: &str) -> Self {
        self.widget(InsightWidget::new(
            widget_ref(id),
            obj_ref(&format!("insight-{id}"), ObjectType::Insight),
            WidgetHeader::new(title),
        ))
    }

    /// Adds an insight widget with the given drill-down blacklist.
    #[must_use]
    pub fn insight_widget_with_blacklist(
        self,
        id: &str,
        title: &str,
        blacklist: Vec<DrillDownReference>,
    ) -> Self {
        self.widget(
            InsightWidget::new(
                widget_ref(id),
                obj_ref(&format!("insight-{id}"), ObjectType::Insight),
                WidgetHeader::new(title),
            )
            .with_ignored_drill_down_hierarchies(blacklist),
        )
    }

    /// Adds a KPI widget.
    #[must_use]
    pub fn kpi_widget(self, id: &str, title: &str) -> Self {
        self.widget(KpiWidget::new(
            widget_ref(id),
            obj_ref(&format!("measure-{id}"), ObjectType::Measure),
            WidgetHeader::new(title),
        ))
    }

    /// Adds an arbitrary widget.
    #[must_use]
    pub fn widget(mut self, widget: impl Into<Widget>) -> Self {
        self.state = self.state.with_widget(widget);
        self
    }

    /// Finishes the state.
    pub fn build(self) -> DashboardState {
        self.state
    }
}

/// Drill-down blacklist of an insight widget in `state`.
///
/// Returns `None` when the widget is missing, not an insight widget, or has
/// no blacklist yet.
pub fn blacklist_of(state: &DashboardState, id: &str) -> Option<Vec<DrillDownReference>> {
    state
        .widget(&widget_ref(id))
        .and_then(Widget::as_insight)
        .and_then(|widget| widget.ignored_drill_down_hierarchies.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashcore::WidgetKind;

    #[test]
    fn builder_creates_widgets_of_requested_kinds() {
        let state = DashboardStateBuilder::new("d")
            .insight_widget("w1", "A")
            .kpi_widget("k1", "B")
            .build();

        assert_eq!(
            state.widget(&widget_ref("w1")).map(Widget::kind),
            Some(WidgetKind::Insight)
        );
        assert_eq!(
            state.widget(&widget_ref("k1")).map(Widget::kind),
            Some(WidgetKind::Kpi)
        );
    }

    #[test]
    fn blacklist_of_reads_insight_blacklist() {
        let state = DashboardStateBuilder::new("d")
            .insight_widget("w1", "A")
            .insight_widget_with_blacklist("w2", "B", vec![date_entry("tpl", "date.year")])
            .build();

        assert_eq!(blacklist_of(&state, "w1"), None);
        assert_eq!(
            blacklist_of(&state, "w2"),
            Some(vec![date_entry("tpl", "date.year")])
        );
    }
}
