//! Property editors: one function per property type tag, each describing the
//! control the inspector shows for a value of that type.

pub mod basic;
pub mod cube_config;
pub mod grid_tracks;
pub mod padding;
pub mod query_expression;

use crate::metadata::{PropertyDescriptor, PropertyType};
use portal_cube::CubeDescriptor;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

pub use cube_config::CubeConfigControl;

/// Everything an editor sees
#[derive(Debug, Clone, Copy)]
pub struct EditorInput<'a> {
    pub property: &'a PropertyDescriptor,
    pub value: &'a Value,
    /// Cubes offered by the cube configuration editor
    pub cubes: &'a [CubeDescriptor],
}

impl<'a> EditorInput<'a> {
    pub fn str_value(&self) -> &'a str {
        self.value.as_str().unwrap_or("")
    }

    /// Control carrying this input's property identity and current value
    pub fn control(&self, kind: ControlKind) -> EditorControl {
        EditorControl {
            property: self.property.name().to_string(),
            label: self.property.display_label().to_string(),
            required: self.property.is_required(),
            value: self.value.clone(),
            kind,
        }
    }
}

pub type EditorFn = fn(&EditorInput<'_>) -> EditorControl;

/// One inspector control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorControl {
    pub property: String,
    pub label: String,
    pub required: bool,
    pub value: Value,
    #[serde(flatten)]
    pub kind: ControlKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Option whose label is its value
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "control", rename_all = "camelCase")]
pub enum ControlKind {
    Text,
    Number {
        integer: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
    },
    Checkbox {
        checked: bool,
    },
    Select {
        options: Vec<SelectOption>,
        selected: String,
    },
    Color {
        swatch: String,
    },
    #[serde(rename_all = "camelCase")]
    Padding {
        amount: String,
        unit: String,
        units: Vec<String>,
    },
    ButtonGroup {
        options: Vec<SelectOption>,
        selected: String,
    },
    #[serde(rename_all = "camelCase")]
    Span {
        col_span: u32,
        row_span: u32,
    },
    TrackList {
        tracks: Vec<String>,
    },
    CubeConfiguration(Box<CubeConfigControl>),
    QueryExpression {
        configured: bool,
        summary: String,
    },
    SearchModel {
        name: String,
        criteria: Vec<String>,
    },
}

/// Editor table keyed by property type tag
#[derive(Debug, Clone, Default)]
pub struct PropertyEditorRegistry {
    editors: HashMap<String, EditorFn>,
    order: Vec<String>,
}

impl PropertyEditorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, property_type: &PropertyType, editor: EditorFn) {
        let tag = property_type.tag().to_string();
        debug!(%tag, "registered property editor");
        if self.editors.insert(tag.clone(), editor).is_none() {
            self.order.push(tag);
        }
    }

    pub fn editor(&self, property_type: &PropertyType) -> Option<EditorFn> {
        self.editors.get(property_type.tag()).copied()
    }

    pub fn has(&self, property_type: &PropertyType) -> bool {
        self.editors.contains_key(property_type.tag())
    }

    /// Registered tags in registration order
    pub fn types(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }
}

/// The editors every context starts with
pub fn builtin_editors() -> Vec<(PropertyType, EditorFn)> {
    vec![
        (PropertyType::String, basic::string_editor as EditorFn),
        (PropertyType::Number, basic::number_editor),
        (PropertyType::Integer, basic::integer_editor),
        (PropertyType::Boolean, basic::boolean_editor),
        (PropertyType::Select, basic::select_editor),
        (PropertyType::Color, basic::color_editor),
        (PropertyType::FontWeight, basic::font_weight_editor),
        (PropertyType::TextAlign, basic::text_align_editor),
        (PropertyType::Span, basic::span_editor),
        (PropertyType::Padding, padding::padding_editor),
        (PropertyType::GridTemplate, grid_tracks::grid_template_editor),
        (PropertyType::CubeWidgetConfiguration, cube_config::cube_config_editor),
        (PropertyType::QueryExpression, query_expression::query_expression_editor),
        (PropertyType::SearchPanelConfiguration, query_expression::search_model_editor),
    ]
}
