//! # Portal Cube
//!
//! Data model for the cube semantic layer used by the portal dashboards.
//!
//! ## Features
//! - Cube descriptors (measures, dimensions, segments, joins, pre-aggregations)
//! - Cube widget configuration and query building
//! - Async HTTP clients for the cube and dashboard services
//!
//! ## Example
//! ```ignore
//! use portal_cube::{CubeService, build_cube_query};
//!
//! let service = CubeService::new("http://localhost:8000/api/cube/")?;
//! let cubes = service.list_cubes().await?;
//! ```

pub mod descriptor;
pub mod error;
pub mod service;
pub mod widget_config;

pub use descriptor::{
    CubeDescriptor, CubeSchemaDescriptor, DimensionDescriptor, DimensionType, JoinDescriptor,
    JoinRelationship, MeasureDescriptor, MeasureType, PreAggregationDescriptor,
    SegmentDescriptor, TimeGranularity,
};
pub use error::{ServiceError, ServiceResult};
pub use service::{CubeService, Dashboard, DashboardService, HttpService};
pub use widget_config::{
    available_fields, build_cube_query, input_type_for_dimension, operators_for_dimension,
    AvailableFields, AxisConfig, AxisKind, ChartConfig, CubeFilter, CubeQuery, CubeWidgetConfig,
    FieldOption, FilterConfig, FilterOperator, RenderingComponent,
};
