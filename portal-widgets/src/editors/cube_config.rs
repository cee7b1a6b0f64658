//! Editor for the `cubeWidgetConfiguration` property: cube, measure,
//! dimension and filter choices over the cubes known to the editor context.

use super::{ControlKind, EditorControl, EditorInput, SelectOption};
use portal_cube::{
    available_fields, build_cube_query, input_type_for_dimension, operators_for_dimension,
    CubeDescriptor, CubeQuery, CubeWidgetConfig, FieldOption, FilterOperator, RenderingComponent,
};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChoice {
    #[serde(flatten)]
    pub field: FieldOption,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRow {
    pub dimension: String,
    pub operator: FilterOperator,
    pub operators: Vec<FilterOperator>,
    pub input_type: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CubeConfigControl {
    pub cubes: Vec<SelectOption>,
    pub selected_cube: Option<String>,
    pub measures: Vec<FieldChoice>,
    pub dimensions: Vec<FieldChoice>,
    pub filters: Vec<FilterRow>,
    pub rendering_components: Vec<SelectOption>,
    pub rendering_component: RenderingComponent,
    pub complete: bool,
    /// Query the current selection produces, once complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<CubeQuery>,
}

/// Read a stored configuration. `null` and malformed values read as empty.
pub fn read_config(value: &Value) -> CubeWidgetConfig {
    if value.is_null() {
        return CubeWidgetConfig::default();
    }
    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        warn!(error = %e, "unreadable cube widget configuration, starting empty");
        CubeWidgetConfig::default()
    })
}

pub fn config_value(config: &CubeWidgetConfig) -> Value {
    serde_json::to_value(config).unwrap_or(Value::Null)
}

/// Stored configuration, with the first available cube chosen when none is set
pub fn initial_config(value: &Value, cubes: &[CubeDescriptor]) -> CubeWidgetConfig {
    let mut config = read_config(value);
    if config.cube_name.is_empty() {
        if let Some(first) = cubes.first() {
            config.select_cube(&first.name);
        }
    }
    config
}

pub fn cube_config_editor(input: &EditorInput<'_>) -> EditorControl {
    let config = initial_config(input.value, input.cubes);
    let current = input
        .cubes
        .iter()
        .find(|c| c.name == config.cube_name)
        .or_else(|| input.cubes.first());

    let fields = current.map(available_fields).unwrap_or_default();
    let choices = |options: Vec<FieldOption>, selected: &[String]| -> Vec<FieldChoice> {
        options
            .into_iter()
            .map(|field| FieldChoice {
                selected: selected.contains(&field.name),
                field,
            })
            .collect()
    };

    let filters = config
        .filters
        .iter()
        .map(|f| FilterRow {
            dimension: f.dimension.clone(),
            operator: f.operator,
            operators: current
                .map(|c| operators_for_dimension(c, &f.dimension).to_vec())
                .unwrap_or_else(|| vec![FilterOperator::Equals]),
            input_type: current
                .map_or("text", |c| input_type_for_dimension(c, &f.dimension))
                .to_string(),
            value: f.value.clone(),
        })
        .collect();

    let control = CubeConfigControl {
        cubes: input
            .cubes
            .iter()
            .map(|c| SelectOption::new(c.name.clone(), c.display_title()))
            .collect(),
        selected_cube: (!config.cube_name.is_empty()).then(|| config.cube_name.clone()),
        measures: choices(fields.measures, &config.measures),
        dimensions: choices(fields.dimensions, &config.dimensions),
        filters,
        rendering_components: RenderingComponent::ALL
            .iter()
            .map(|r| SelectOption::new(r.as_str(), r.label()))
            .collect(),
        rendering_component: config.rendering_component,
        complete: config.is_complete(),
        query: config.is_complete().then(|| build_cube_query(&config)),
    };

    EditorControl {
        value: config_value(&config),
        ..input.control(ControlKind::CubeConfiguration(Box::new(control)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{PropertyDescriptor, PropertyType};
    use portal_cube::{DimensionDescriptor, DimensionType, MeasureDescriptor, MeasureType};
    use serde_json::json;

    fn cubes() -> Vec<CubeDescriptor> {
        let mut orders = CubeDescriptor::new("orders", "public.orders");
        orders.measures = Some(vec![MeasureDescriptor {
            name: "count".to_string(),
            measure_type: MeasureType::Count,
            column: None,
            expression: None,
            title: Some("Order Count".to_string()),
            description: None,
            filters: None,
        }]);
        orders.dimensions = Some(vec![DimensionDescriptor {
            name: "createdAt".to_string(),
            column: "created_at".to_string(),
            dimension_type: DimensionType::Time,
            primary_key: None,
            granularities: None,
            title: None,
            description: None,
        }]);
        vec![orders, CubeDescriptor::new("users", "public.users")]
    }

    fn control_for(value: Value, cubes: &[CubeDescriptor]) -> (EditorControl, CubeConfigControl) {
        let property = PropertyDescriptor::new("configuration", PropertyType::CubeWidgetConfiguration);
        let control = cube_config_editor(&EditorInput {
            property: &property,
            value: &value,
            cubes,
        });
        let inner = match &control.kind {
            ControlKind::CubeConfiguration(inner) => (**inner).clone(),
            other => panic!("unexpected control {other:?}"),
        };
        (control, inner)
    }

    #[test]
    fn test_empty_config_picks_first_cube() {
        let cubes = cubes();
        let (control, inner) = control_for(Value::Null, &cubes);

        assert_eq!(inner.selected_cube.as_deref(), Some("orders"));
        assert_eq!(control.value["cubeName"], json!("orders"));
        assert_eq!(inner.cubes.len(), 2);
        assert_eq!(inner.measures[0].field.display_name, "Order Count");
        assert!(!inner.complete);
        assert!(inner.query.is_none());
    }

    #[test]
    fn test_selection_and_filter_rows() {
        let cubes = cubes();
        let value = json!({
            "cubeName": "orders",
            "measures": ["count"],
            "dimensions": [],
            "filters": [{ "dimension": "createdAt", "operator": "afterDate", "value": "2024-01-01" }],
            "renderingComponent": "table"
        });
        let (_, inner) = control_for(value, &cubes);

        assert!(inner.measures[0].selected);
        assert!(!inner.dimensions[0].selected);
        assert_eq!(inner.filters[0].input_type, "date");
        assert!(inner.filters[0].operators.contains(&FilterOperator::InDateRange));
        assert_eq!(inner.rendering_component, RenderingComponent::Table);
        assert_eq!(
            inner.query.unwrap().measures,
            vec!["orders.count".to_string()]
        );
    }

    #[test]
    fn test_no_cubes_available() {
        let (control, inner) = control_for(Value::Null, &[]);
        assert!(inner.selected_cube.is_none());
        assert!(inner.measures.is_empty());
        assert_eq!(control.value["cubeName"], json!(""));
    }

    #[test]
    fn test_malformed_config_reads_empty() {
        assert_eq!(read_config(&json!("not a config")), CubeWidgetConfig::default());
    }
}
