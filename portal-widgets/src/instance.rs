use crate::metadata::RESERVED_KEYS;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Placement inside a grid container. Spans of 1 are stored as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub row: u32,
    pub col: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_span: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_span: Option<u32>,
}

impl GridCell {
    pub fn new(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            col_span: None,
            row_span: None,
        }
    }

    pub fn with_span(mut self, col_span: u32, row_span: u32) -> Self {
        self.col_span = normalize_span(col_span);
        self.row_span = normalize_span(row_span);
        self
    }

    pub fn column_span(&self) -> u32 {
        self.col_span.unwrap_or(1)
    }

    pub fn row_span(&self) -> u32 {
        self.row_span.unwrap_or(1)
    }

    fn normalized(self) -> Self {
        Self {
            col_span: self.col_span.and_then(normalize_span),
            row_span: self.row_span.and_then(normalize_span),
            ..self
        }
    }
}

fn normalize_span(span: u32) -> Option<u32> {
    (span > 1).then_some(span)
}

/// One node of a widget tree. Owns its children exclusively.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetInstance {
    widget_type: String,
    id: String,
    pub(crate) children: Vec<WidgetInstance>,
    pub(crate) cell: Option<GridCell>,
    properties: Map<String, Value>,
}

impl WidgetInstance {
    /// Empty node of `widget_type` with a fresh UUID v4 id
    pub fn new(widget_type: impl Into<String>) -> Self {
        Self::with_id(widget_type, Uuid::new_v4().to_string())
    }

    pub(crate) fn with_id(widget_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            widget_type: widget_type.into(),
            id: id.into(),
            children: Vec::new(),
            cell: None,
            properties: Map::new(),
        }
    }

    pub fn widget_type(&self) -> &str {
        &self.widget_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// First eight characters of the id, for headers and labels
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    pub fn children(&self) -> &[WidgetInstance] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<WidgetInstance> {
        &mut self.children
    }

    pub fn push_child(&mut self, child: WidgetInstance) {
        self.children.push(child);
    }

    pub fn cell(&self) -> Option<&GridCell> {
        self.cell.as_ref()
    }

    pub fn set_cell(&mut self, cell: Option<GridCell>) {
        self.cell = cell.map(GridCell::normalized);
    }

    /// Column span, 1 when the node has no cell or no span
    pub fn grid_column_span(&self) -> u32 {
        self.cell.map_or(1, |c| c.column_span())
    }

    /// No-op when the node has no cell.
    pub fn set_grid_column_span(&mut self, span: u32) {
        if let Some(cell) = self.cell.as_mut() {
            cell.col_span = normalize_span(span);
        }
    }

    pub fn grid_row_span(&self) -> u32 {
        self.cell.map_or(1, |c| c.row_span())
    }

    pub fn set_grid_row_span(&mut self, span: u32) {
        if let Some(cell) = self.cell.as_mut() {
            cell.row_span = normalize_span(span);
        }
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.properties.get_mut(name)
    }

    /// Store a property value, returning the previous one
    pub fn set_property(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.properties.insert(name.into(), value)
    }

    pub fn str_property(&self, name: &str) -> Option<&str> {
        self.property(name).and_then(Value::as_str)
    }

    pub fn f64_property(&self, name: &str) -> Option<f64> {
        self.property(name).and_then(Value::as_f64)
    }

    pub fn bool_property(&self, name: &str) -> Option<bool> {
        self.property(name).and_then(Value::as_bool)
    }

    /// Visit this node and every descendant, parents before children
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a WidgetInstance)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }

    pub fn to_json(&self) -> Value {
        // A map of strings and JSON values always serializes.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Serialize for WidgetInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.widget_type)?;
        map.serialize_entry("id", &self.id)?;
        for (name, value) in &self.properties {
            if RESERVED_KEYS.contains(&name.as_str()) {
                continue;
            }
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("children", &self.children)?;
        if let Some(cell) = &self.cell {
            map.serialize_entry("cell", cell)?;
        }
        map.end()
    }
}
