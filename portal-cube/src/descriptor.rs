use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasureType {
    Count,
    CountDistinct,
    Sum,
    Avg,
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionType {
    String,
    Number,
    Time,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JoinRelationship {
    BelongsTo,
    HasMany,
    HasOne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeGranularity {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

/// An aggregated value exposed by a cube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub measure_type: MeasureType,
    /// Table column the measure aggregates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    /// Raw SQL expression, used instead of `column`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<BTreeMap<String, Value>>,
}

/// A column a cube can be grouped or filtered by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionDescriptor {
    pub name: String,
    pub column: String,
    #[serde(rename = "type")]
    pub dimension_type: DimensionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<bool>,
    /// Only meaningful for time dimensions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularities: Option<Vec<TimeGranularity>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDescriptor {
    pub name: String,
    /// SQL boolean expression
    pub expression: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinDescriptor {
    /// Target cube name
    pub name: String,
    pub relationship: JoinRelationship,
    /// SQL join condition
    pub on: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_mapping_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreAggregationDescriptor {
    pub name: String,
    pub measures: Vec<String>,
    pub dimensions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub granularity: Option<TimeGranularity>,
    #[serde(default, rename = "refreshKey", skip_serializing_if = "Option::is_none")]
    pub refresh_key: Option<String>,
}

/// A semantic-layer view over one database table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeDescriptor {
    pub name: String,
    /// `schema.table`
    pub table: String,
    /// Optional SQL override for the table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measures: Option<Vec<MeasureDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<DimensionDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<SegmentDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joins: Option<Vec<JoinDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_aggregations: Option<Vec<PreAggregationDescriptor>>,
}

impl CubeDescriptor {
    /// Create a cube with no members over `table`
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            sql: None,
            title: None,
            description: None,
            measures: None,
            dimensions: None,
            segments: None,
            joins: None,
            pre_aggregations: None,
        }
    }

    /// Title if set, otherwise the cube name
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    pub fn measures(&self) -> &[MeasureDescriptor] {
        self.measures.as_deref().unwrap_or_default()
    }

    pub fn dimensions(&self) -> &[DimensionDescriptor] {
        self.dimensions.as_deref().unwrap_or_default()
    }

    pub fn measure(&self, name: &str) -> Option<&MeasureDescriptor> {
        self.measures().iter().find(|m| m.name == name)
    }

    pub fn dimension(&self, name: &str) -> Option<&DimensionDescriptor> {
        self.dimensions().iter().find(|d| d.name == name)
    }
}

/// A full cube schema, as generated from a database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeSchemaDescriptor {
    pub cubes: Vec<CubeDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_from_database: Option<String>,
}

impl CubeSchemaDescriptor {
    pub fn cube(&self, name: &str) -> Option<&CubeDescriptor> {
        self.cubes.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_cube_descriptor() {
        let cube: CubeDescriptor = serde_json::from_value(json!({
            "name": "orders",
            "table": "public.orders",
            "measures": [
                { "name": "count", "type": "count" },
                { "name": "uniqueCustomers", "type": "countDistinct", "column": "customer_id" }
            ],
            "dimensions": [
                { "name": "status", "column": "status", "type": "string" },
                { "name": "createdAt", "column": "created_at", "type": "time",
                  "granularities": ["day", "month"] }
            ],
            "joins": [
                { "name": "customers", "relationship": "belongsTo",
                  "on": "{CUBE}.customer_id = {customers}.id" }
            ]
        }))
        .unwrap();

        assert_eq!(cube.measures().len(), 2);
        assert_eq!(
            cube.measure("uniqueCustomers").unwrap().measure_type,
            MeasureType::CountDistinct
        );
        assert_eq!(
            cube.dimension("createdAt").unwrap().granularities,
            Some(vec![TimeGranularity::Day, TimeGranularity::Month])
        );
        assert_eq!(
            cube.joins.as_ref().unwrap()[0].relationship,
            JoinRelationship::BelongsTo
        );
        assert_eq!(cube.display_title(), "orders");
    }

    #[test]
    fn test_optional_members_are_omitted() {
        let cube = CubeDescriptor::new("products", "public.products");
        let value = serde_json::to_value(&cube).unwrap();
        assert_eq!(value, json!({ "name": "products", "table": "public.products" }));
    }

    #[test]
    fn test_rejects_unknown_measure_type() {
        let result: Result<MeasureDescriptor, _> =
            serde_json::from_value(json!({ "name": "m", "type": "median" }));
        assert!(result.is_err());
    }
}
