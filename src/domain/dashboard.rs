// Dashboard domain model - per-user chart layouts and configurations
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Every user's dashboard, keyed by user id. Persisted as a single document.
pub type DashboardDocument = BTreeMap<String, DashboardState>;

/// Position and size of one chart on a dashboard.
///
/// Stored as the raw field map so that every field, including explicit
/// nulls and ids of any JSON type, is written back exactly as it was read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutEntry(Map<String, Value>);

impl LayoutEntry {
    /// Chart id as a `charts` key: strings verbatim, numbers and booleans
    /// by their JSON text. Absent, null or structured ids yield `None`.
    pub fn chart_id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::String(s) => Some(s.clone()),
            v @ (Value::Number(_) | Value::Bool(_)) => Some(v.to_string()),
            _ => None,
        }
    }

    fn has_id(&self, chart_id: &str) -> bool {
        match self.0.get("id") {
            Some(Value::String(s)) => s == chart_id,
            Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string() == chart_id,
            _ => false,
        }
    }

    fn apply(&mut self, update: &LayoutUpdate) {
        for (field, value) in [
            ("x", &update.x),
            ("y", &update.y),
            ("width", &update.width),
            ("height", &update.height),
        ] {
            self.0.insert(field.to_string(), value.clone());
        }
    }
}

/// New geometry for an existing layout entry. Omitted fields are written
/// as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutUpdate {
    #[serde(default)]
    pub x: Value,
    #[serde(default)]
    pub y: Value,
    #[serde(default)]
    pub width: Value,
    #[serde(default)]
    pub height: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    /// Display order
    #[serde(default)]
    pub dashboard_order: Vec<LayoutEntry>,
    #[serde(default)]
    pub charts: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DashboardState {
    /// Append `layout`; its config is stored only when the layout has a usable id
    pub fn add_chart(&mut self, layout: LayoutEntry, chart: Value) {
        if let Some(chart_id) = layout.chart_id() {
            self.charts.insert(chart_id, chart);
        }
        self.dashboard_order.push(layout);
    }

    /// Drop the chart config and every layout entry carrying `chart_id`
    pub fn delete_chart(&mut self, chart_id: &str) {
        self.charts.remove(chart_id);
        self.dashboard_order.retain(|layout| !layout.has_id(chart_id));
    }

    /// Replace the config of an existing chart and move/resize its layouts.
    ///
    /// A missing config is not created, but matching layouts are still
    /// updated: the two halves of the state are not forced back in sync.
    pub fn update_chart(&mut self, chart_id: &str, update: &LayoutUpdate, chart: Value) {
        if let Some(existing) = self.charts.get_mut(chart_id) {
            *existing = chart;
        }

        for layout in self.dashboard_order.iter_mut().filter(|l| l.has_id(chart_id)) {
            layout.apply(update);
        }
    }
}
