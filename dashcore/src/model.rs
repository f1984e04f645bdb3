//! Dashboard state snapshot.
//!
//! The snapshot is what validators and handlers read. It is only ever
//! written by [`DashboardStore`](crate::store::DashboardStore) while applying
//! [`StateMutation`](crate::mutation::StateMutation)s.

use crate::store::UndoHistory;
use crate::types::{ObjRef, WidgetHeader};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// An entry of an insight widget's drill-down blacklist.
///
/// Each entry names a hierarchy together with the attribute (or date
/// dataset attribute) from which drilling down along that hierarchy is
/// disabled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum DrillDownReference {
    /// Blacklisted user-defined attribute hierarchy.
    #[serde(rename = "attributeHierarchyReference")]
    AttributeHierarchy {
        /// The hierarchy.
        attribute_hierarchy: ObjRef,
        /// The label drilling starts from.
        label: ObjRef,
    },
    /// Blacklisted date hierarchy template.
    #[serde(rename = "dateHierarchyReference")]
    DateHierarchy {
        /// The date hierarchy template.
        date_hierarchy_template: ObjRef,
        /// The date dataset attribute drilling starts from.
        date_dataset_attribute: ObjRef,
    },
}

impl DrillDownReference {
    /// The hierarchy part of the compound key.
    pub const fn hierarchy_ref(&self) -> &ObjRef {
        match self {
            Self::AttributeHierarchy {
                attribute_hierarchy,
                ..
            } => attribute_hierarchy,
            Self::DateHierarchy {
                date_hierarchy_template,
                ..
            } => date_hierarchy_template,
        }
    }

    /// The attribute part of the compound key.
    pub const fn attribute_ref(&self) -> &ObjRef {
        match self {
            Self::AttributeHierarchy { label, .. } => label,
            Self::DateHierarchy {
                date_dataset_attribute,
                ..
            } => date_dataset_attribute,
        }
    }

    /// Exact match on (hierarchy reference, attribute identifier string).
    pub fn matches(&self, hierarchy_ref: &ObjRef, attribute_identifier: &str) -> bool {
        self.hierarchy_ref() == hierarchy_ref && self.attribute_ref().as_str() == attribute_identifier
    }
}

/// A hierarchy from the catalog, as named by drill-down commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "ref")]
pub enum CatalogHierarchy {
    /// A user-defined attribute hierarchy.
    #[serde(rename = "attributeHierarchy")]
    Attribute(ObjRef),
    /// A date hierarchy template.
    #[serde(rename = "dateAttributeHierarchy")]
    DateTemplate(ObjRef),
}

impl CatalogHierarchy {
    /// Reference of the hierarchy object.
    pub const fn hierarchy_ref(&self) -> &ObjRef {
        match self {
            Self::Attribute(hierarchy_ref) | Self::DateTemplate(hierarchy_ref) => hierarchy_ref,
        }
    }

    /// Builds the blacklist entry disabling this hierarchy for the attribute.
    pub fn blacklist_entry(&self, attribute_identifier: &ObjRef) -> DrillDownReference {
        match self {
            Self::Attribute(hierarchy_ref) => DrillDownReference::AttributeHierarchy {
                attribute_hierarchy: hierarchy_ref.clone(),
                label: attribute_identifier.clone(),
            },
            Self::DateTemplate(hierarchy_ref) => DrillDownReference::DateHierarchy {
                date_hierarchy_template: hierarchy_ref.clone(),
                date_dataset_attribute: attribute_identifier.clone(),
            },
        }
    }
}

/// Discriminant of [`Widget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetKind {
    /// Widget rendering a saved insight.
    Insight,
    /// Widget rendering a single KPI.
    Kpi,
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insight => f.write_str("insight"),
            Self::Kpi => f.write_str("kpi"),
        }
    }
}

/// Widget rendering a saved insight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightWidget {
    /// Stable reference of the widget.
    #[serde(rename = "ref")]
    pub widget_ref: ObjRef,
    /// The insight rendered by the widget.
    pub insight: ObjRef,
    /// Widget header.
    pub header: WidgetHeader,
    /// Widget description.
    #[serde(default)]
    pub description: String,
    /// Hierarchies excluded from drill down. Absent until first modified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignored_drill_down_hierarchies: Option<Vec<DrillDownReference>>,
}

impl InsightWidget {
    /// Creates an insight widget with an empty description and no blacklist.
    pub fn new(widget_ref: ObjRef, insight: ObjRef, header: WidgetHeader) -> Self {
        Self {
            widget_ref,
            insight,
            header,
            description: String::new(),
            ignored_drill_down_hierarchies: None,
        }
    }

    /// Replaces the drill-down blacklist.
    #[must_use]
    pub fn with_ignored_drill_down_hierarchies(mut self, hierarchies: Vec<DrillDownReference>) -> Self {
        self.ignored_drill_down_hierarchies = Some(hierarchies);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Widget rendering a single KPI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiWidget {
    /// Stable reference of the widget.
    #[serde(rename = "ref")]
    pub widget_ref: ObjRef,
    /// The measure the KPI shows.
    pub measure: ObjRef,
    /// Widget header.
    pub header: WidgetHeader,
    /// Widget description.
    #[serde(default)]
    pub description: String,
}

impl KpiWidget {
    /// Creates a KPI widget with an empty description.
    pub fn new(widget_ref: ObjRef, measure: ObjRef, header: WidgetHeader) -> Self {
        Self {
            widget_ref,
            measure,
            header,
            description: String::new(),
        }
    }
}

/// A widget placed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Widget {
    /// Insight widget.
    Insight(InsightWidget),
    /// KPI widget.
    Kpi(KpiWidget),
}

impl Widget {
    /// Stable reference of the widget.
    pub const fn widget_ref(&self) -> &ObjRef {
        match self {
            Self::Insight(widget) => &widget.widget_ref,
            Self::Kpi(widget) => &widget.widget_ref,
        }
    }

    /// Kind of the widget.
    pub const fn kind(&self) -> WidgetKind {
        match self {
            Self::Insight(_) => WidgetKind::Insight,
            Self::Kpi(_) => WidgetKind::Kpi,
        }
    }

    /// Widget header.
    pub const fn header(&self) -> &WidgetHeader {
        match self {
            Self::Insight(widget) => &widget.header,
            Self::Kpi(widget) => &widget.header,
        }
    }

    /// Widget description.
    pub fn description(&self) -> &str {
        match self {
            Self::Insight(widget) => &widget.description,
            Self::Kpi(widget) => &widget.description,
        }
    }

    /// The insight widget, if this is one.
    pub const fn as_insight(&self) -> Option<&InsightWidget> {
        match self {
            Self::Insight(widget) => Some(widget),
            Self::Kpi(_) => None,
        }
    }

    /// The KPI widget, if this is one.
    pub const fn as_kpi(&self) -> Option<&KpiWidget> {
        match self {
            Self::Kpi(widget) => Some(widget),
            Self::Insight(_) => None,
        }
    }

    pub(crate) fn header_mut(&mut self) -> &mut WidgetHeader {
        match self {
            Self::Insight(widget) => &mut widget.header,
            Self::Kpi(widget) => &mut widget.header,
        }
    }

    pub(crate) fn description_mut(&mut self) -> &mut String {
        match self {
            Self::Insight(widget) => &mut widget.description,
            Self::Kpi(widget) => &mut widget.description,
        }
    }
}

impl From<InsightWidget> for Widget {
    fn from(widget: InsightWidget) -> Self {
        Self::Insight(widget)
    }
}

impl From<KpiWidget> for Widget {
    fn from(widget: KpiWidget) -> Self {
        Self::Kpi(widget)
    }
}

/// Snapshot of dashboard state read by validators and handlers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardState {
    title: String,
    widgets: HashMap<ObjRef, Widget>,
    history: UndoHistory,
}

impl DashboardState {
    /// Creates an empty dashboard with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Adds a widget, replacing any widget with the same reference.
    #[must_use]
    pub fn with_widget(mut self, widget: impl Into<Widget>) -> Self {
        let widget = widget.into();
        let _ = self.widgets.insert(widget.widget_ref().clone(), widget);
        self
    }

    /// Dashboard title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Looks a widget up by its stable reference.
    pub fn widget(&self, widget_ref: &ObjRef) -> Option<&Widget> {
        self.widgets.get(widget_ref)
    }

    /// All widgets, in no particular order.
    pub fn widgets(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.values()
    }

    /// Number of widgets on the dashboard.
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Undo entries recorded for reversible mutations.
    pub const fn history(&self) -> &UndoHistory {
        &self.history
    }

    pub(crate) fn widget_mut(&mut self, widget_ref: &ObjRef) -> Option<&mut Widget> {
        self.widgets.get_mut(widget_ref)
    }

    pub(crate) fn set_title(&mut self, title: String) -> String {
        std::mem::replace(&mut self.title, title)
    }

    pub(crate) fn history_mut(&mut self) -> &mut UndoHistory {
        &mut self.history
    }
}
