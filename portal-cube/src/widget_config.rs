//! Cube widget configuration: which cube, measures, dimensions and filters a
//! dashboard chart shows, and how that becomes a cube query.

use crate::descriptor::{CubeDescriptor, DimensionType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Contains,
    NotContains,
    In,
    NotIn,
    BeforeDate,
    AfterDate,
    InDateRange,
}

impl FilterOperator {
    /// Operators that make sense for a dimension of the given type
    pub fn for_dimension_type(dimension_type: DimensionType) -> &'static [FilterOperator] {
        use FilterOperator::*;
        match dimension_type {
            DimensionType::String => &[Equals, NotEquals, Contains, NotContains, In, NotIn],
            DimensionType::Number => &[
                Equals,
                NotEquals,
                GreaterThan,
                LessThan,
                GreaterThanOrEqual,
                LessThanOrEqual,
                In,
                NotIn,
            ],
            DimensionType::Time => &[
                Equals,
                NotEquals,
                GreaterThan,
                LessThan,
                BeforeDate,
                AfterDate,
                InDateRange,
            ],
            DimensionType::Boolean => &[Equals, NotEquals],
        }
    }
}

/// One filter of a cube widget. `dimension` is the bare dimension name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub dimension: String,
    pub operator: FilterOperator,
    pub value: Value,
}

/// Filter in cube API form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeFilter {
    pub member: String,
    pub operator: FilterOperator,
    pub values: Vec<Value>,
}

impl FilterConfig {
    /// Convert to the cube API form. Scalars become a one-element `values` list.
    pub fn to_cube_filter(&self, cube_name: &str) -> CubeFilter {
        let values = match &self.value {
            Value::Array(items) => items.clone(),
            other => vec![other.clone()],
        };
        CubeFilter {
            member: qualify(cube_name, &self.dimension),
            operator: self.operator,
            values,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderingComponent {
    #[default]
    Linechart,
    Barchart,
    Table,
}

impl RenderingComponent {
    pub const ALL: [RenderingComponent; 3] = [
        RenderingComponent::Linechart,
        RenderingComponent::Barchart,
        RenderingComponent::Table,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RenderingComponent::Linechart => "Line Chart",
            RenderingComponent::Barchart => "Bar Chart",
            RenderingComponent::Table => "Table",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RenderingComponent::Linechart => "linechart",
            RenderingComponent::Barchart => "barchart",
            RenderingComponent::Table => "table",
        }
    }

    pub fn is_chart(&self) -> bool {
        !matches!(self, RenderingComponent::Table)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Dimension,
    Measure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    #[serde(rename = "type")]
    pub kind: AxisKind,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartConfig {
    pub x_axis: AxisConfig,
    pub y_axis: AxisConfig,
}

/// Complete configuration of a cube-backed dashboard widget.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CubeWidgetConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub cube_name: String,
    #[serde(default)]
    pub measures: Vec<String>,
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
    #[serde(default)]
    pub rendering_component: RenderingComponent,
    /// Required when `rendering_component` is a chart
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_config: Option<ChartConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CubeWidgetConfig {
    /// Switch to another cube. Member selections and filters belong to the old
    /// cube, so they are cleared.
    pub fn select_cube(&mut self, cube_name: &str) {
        if self.cube_name == cube_name {
            return;
        }
        self.cube_name = cube_name.to_string();
        self.measures.clear();
        self.dimensions.clear();
        self.filters.clear();
        self.chart_config = None;
    }

    /// Add the measure if absent, remove it otherwise. Returns whether it is now selected.
    pub fn toggle_measure(&mut self, name: &str) -> bool {
        toggle(&mut self.measures, name)
    }

    /// Add the dimension if absent, remove it otherwise. Returns whether it is now selected.
    pub fn toggle_dimension(&mut self, name: &str) -> bool {
        toggle(&mut self.dimensions, name)
    }

    pub fn add_filter(&mut self, filter: FilterConfig) {
        self.filters.push(filter);
    }

    pub fn remove_filter(&mut self, index: usize) -> Option<FilterConfig> {
        (index < self.filters.len()).then(|| self.filters.remove(index))
    }

    /// A configuration is renderable once it names a cube and selects at least one measure.
    pub fn is_complete(&self) -> bool {
        !self.cube_name.is_empty() && !self.measures.is_empty()
    }
}

fn toggle(list: &mut Vec<String>, name: &str) -> bool {
    if let Some(pos) = list.iter().position(|n| n == name) {
        list.remove(pos);
        false
    } else {
        list.push(name.to_string());
        true
    }
}

fn qualify(cube_name: &str, member: &str) -> String {
    format!("{}.{}", cube_name, member)
}

/// Query in cube API form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeQuery {
    pub measures: Vec<String>,
    pub dimensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<CubeFilter>>,
}

/// Build the cube query for a widget configuration. Member names are qualified
/// with the cube name; an empty filter list is omitted.
pub fn build_cube_query(config: &CubeWidgetConfig) -> CubeQuery {
    let measures = config
        .measures
        .iter()
        .map(|m| qualify(&config.cube_name, m))
        .collect();
    let dimensions = config
        .dimensions
        .iter()
        .map(|d| qualify(&config.cube_name, d))
        .collect();
    let filters: Vec<CubeFilter> = config
        .filters
        .iter()
        .map(|f| f.to_cube_filter(&config.cube_name))
        .collect();

    CubeQuery {
        measures,
        dimensions,
        filters: if filters.is_empty() { None } else { Some(filters) },
    }
}

/// A member choice offered by the configuration editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    pub name: String,
    pub display_name: String,
    pub kind: AxisKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_type: Option<DimensionType>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AvailableFields {
    pub measures: Vec<FieldOption>,
    pub dimensions: Vec<FieldOption>,
}

pub fn available_fields(cube: &CubeDescriptor) -> AvailableFields {
    let measures = cube
        .measures()
        .iter()
        .map(|m| FieldOption {
            name: m.name.clone(),
            display_name: m.title.clone().unwrap_or_else(|| m.name.clone()),
            kind: AxisKind::Measure,
            dimension_type: None,
        })
        .collect();
    let dimensions = cube
        .dimensions()
        .iter()
        .map(|d| FieldOption {
            name: d.name.clone(),
            display_name: d.title.clone().unwrap_or_else(|| d.name.clone()),
            kind: AxisKind::Dimension,
            dimension_type: Some(d.dimension_type),
        })
        .collect();
    AvailableFields {
        measures,
        dimensions,
    }
}

/// Operators valid for `dimension_name`; unknown dimensions only allow `equals`.
pub fn operators_for_dimension(cube: &CubeDescriptor, dimension_name: &str) -> &'static [FilterOperator] {
    match cube.dimension(dimension_name) {
        Some(d) => FilterOperator::for_dimension_type(d.dimension_type),
        None => &[FilterOperator::Equals],
    }
}

/// HTML input type for a filter value on `dimension_name`.
pub fn input_type_for_dimension(cube: &CubeDescriptor, dimension_name: &str) -> &'static str {
    match cube.dimension(dimension_name).map(|d| d.dimension_type) {
        Some(DimensionType::Number) => "number",
        Some(DimensionType::Time) => "date",
        Some(DimensionType::Boolean) => "select",
        Some(DimensionType::String) | None => "text",
    }
}
