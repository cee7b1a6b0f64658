//! Widget and property declarations.
//!
//! A widget type is declared once as a plain [`WidgetTypeDescriptor`] value:
//!
//! ```ignore
//! WidgetTypeDescriptor::new("text")
//!     .label("Text Widget")
//!     .group("basic")
//!     .property(
//!         PropertyDescriptor::new("text", PropertyType::String)
//!             .label("Text Content")
//!             .group("content")
//!             .default_value("Hello World")
//!             .required(),
//!     )
//! ```
//!
//! Descriptors are immutable once registered and shared by every instance of
//! the type.

use crate::error::{WidgetError, WidgetResult};
use crate::instance::{GridCell, WidgetInstance};
use crate::registry::TypeRegistry;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_GROUP: &str = "general";
pub const DEFAULT_ICON: &str = "📦";

/// Keys of the persisted node format that cannot be used as property names.
pub const RESERVED_KEYS: &[&str] = &["type", "id", "children", "cell"];

/// Property type tag. Selects the inspector editor; it is not a storage type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyType {
    String,
    Number,
    Integer,
    Boolean,
    Select,
    Color,
    Padding,
    FontWeight,
    TextAlign,
    Span,
    GridTemplate,
    CubeWidgetConfiguration,
    QueryExpression,
    SearchPanelConfiguration,
    Custom(String),
}

impl PropertyType {
    pub fn tag(&self) -> &str {
        match self {
            PropertyType::String => "string",
            PropertyType::Number => "number",
            PropertyType::Integer => "int",
            PropertyType::Boolean => "boolean",
            PropertyType::Select => "select",
            PropertyType::Color => "color",
            PropertyType::Padding => "padding",
            PropertyType::FontWeight => "fontWeight",
            PropertyType::TextAlign => "textAlign",
            PropertyType::Span => "span",
            PropertyType::GridTemplate => "gridTemplate",
            PropertyType::CubeWidgetConfiguration => "cubeWidgetConfiguration",
            PropertyType::QueryExpression => "queryExpression",
            PropertyType::SearchPanelConfiguration => "searchPanelConfiguration",
            PropertyType::Custom(tag) => tag,
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => PropertyType::String,
            "number" => PropertyType::Number,
            "int" => PropertyType::Integer,
            "boolean" => PropertyType::Boolean,
            "select" => PropertyType::Select,
            "color" => PropertyType::Color,
            "padding" => PropertyType::Padding,
            "fontWeight" => PropertyType::FontWeight,
            "textAlign" => PropertyType::TextAlign,
            "span" => PropertyType::Span,
            "gridTemplate" => PropertyType::GridTemplate,
            "cubeWidgetConfiguration" => PropertyType::CubeWidgetConfiguration,
            "queryExpression" => PropertyType::QueryExpression,
            "searchPanelConfiguration" => PropertyType::SearchPanelConfiguration,
            other => PropertyType::Custom(other.to_string()),
        }
    }

    /// Value used when a property declares no default. Tags without a
    /// natural empty value get `null`.
    pub fn zero_value(&self) -> Value {
        match self {
            PropertyType::String => Value::String(String::new()),
            PropertyType::Number => json!(0),
            PropertyType::Boolean => Value::Bool(false),
            PropertyType::Custom(tag) if tag == "array" => json!([]),
            PropertyType::Custom(tag) if tag == "object" => json!({}),
            _ => Value::Null,
        }
    }
}

impl From<String> for PropertyType {
    fn from(tag: String) -> Self {
        PropertyType::from_tag(&tag)
    }
}

impl From<PropertyType> for String {
    fn from(ty: PropertyType) -> Self {
        ty.tag().to_string()
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// One declared field of a widget type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    group: String,
    #[serde(rename = "type")]
    property_type: PropertyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_value: Option<Value>,
    required: bool,
    hide: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    options: Vec<String>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            label: None,
            group: DEFAULT_GROUP.to_string(),
            property_type,
            default_value: None,
            required: false,
            hide: false,
            options: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Exclude from the property inspector
    pub fn hidden(mut self) -> Self {
        self.hide = true;
        self
    }

    pub fn options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared label, or the property name
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn group_name(&self) -> &str {
        &self.group
    }

    pub fn property_type(&self) -> &PropertyType {
        &self.property_type
    }

    pub fn declared_default(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_hidden(&self) -> bool {
        self.hide
    }

    pub fn option_values(&self) -> &[String] {
        &self.options
    }

    /// Declared default, else the type tag's zero value
    pub fn create_default(&self) -> Value {
        self.default_value
            .clone()
            .unwrap_or_else(|| self.property_type.zero_value())
    }

    pub fn value_of<'a>(&self, instance: &'a WidgetInstance) -> Option<&'a Value> {
        instance.property(&self.name)
    }
}

/// Drag-and-drop acceptance rule: `(parent, candidate_child) -> accepted`.
pub type AcceptChildFn = fn(&WidgetInstance, &WidgetInstance) -> bool;

/// Acceptance rule for containers that take any child.
pub fn accept_any(_parent: &WidgetInstance, _child: &WidgetInstance) -> bool {
    true
}

/// One declared widget type
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetTypeDescriptor {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    properties: Vec<PropertyDescriptor>,
    #[serde(skip)]
    accept_child: Option<AcceptChildFn>,
}

impl WidgetTypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            group: None,
            icon: None,
            properties: Vec::new(),
            accept_child: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Declare a property. Re-declaring a name replaces the earlier declaration
    /// in its original position.
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        match self.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
        self
    }

    pub fn accept_child(mut self, rule: AcceptChildFn) -> Self {
        self.accept_child = Some(rule);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn group_name(&self) -> &str {
        self.group.as_deref().unwrap_or(DEFAULT_GROUP)
    }

    pub fn display_icon(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_ICON)
    }

    /// Properties in declaration order
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    pub fn property_named(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn is_container(&self) -> bool {
        self.accept_child.is_some()
    }

    /// Whether `parent` may take `child`. Types without a rule accept nothing.
    pub fn can_accept_child(&self, parent: &WidgetInstance, child: &WidgetInstance) -> bool {
        self.accept_child.is_some_and(|rule| rule(parent, child))
    }

    pub(crate) fn check_declaration(&self) -> WidgetResult<()> {
        if self.name.trim().is_empty() {
            return Err(WidgetError::UndeclaredWidget);
        }
        if let Some(p) = self
            .properties
            .iter()
            .find(|p| RESERVED_KEYS.contains(&p.name.as_str()))
        {
            return Err(WidgetError::InvalidField {
                widget: self.name.clone(),
                field: p.name.clone(),
                reason: "property name is reserved by the node format".to_string(),
            });
        }
        Ok(())
    }

    /// New instance with every declared property set to its default.
    /// Properties whose default is `null` are left unset.
    pub fn create(&self) -> WidgetInstance {
        let mut instance = WidgetInstance::new(&self.name);
        for property in &self.properties {
            let value = property.create_default();
            if !value.is_null() {
                instance.set_property(&property.name, value);
            }
        }
        instance
    }

    /// Parse a payload of exactly this type. Children are resolved through
    /// `registry`; property values absent from the payload get their defaults.
    pub fn parse(&self, payload: &Value, registry: &TypeRegistry) -> WidgetResult<WidgetInstance> {
        let object = payload.as_object().ok_or_else(|| WidgetError::InvalidPayload {
            found: json_kind(payload).to_string(),
        })?;

        let found = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or(WidgetError::MissingType)?;
        if found != self.name {
            return Err(WidgetError::TypeMismatch {
                expected: self.name.clone(),
                found: found.to_string(),
            });
        }

        let mut instance = match object.get("id") {
            None | Some(Value::Null) => WidgetInstance::new(&self.name),
            Some(Value::String(id)) if id.is_empty() => WidgetInstance::new(&self.name),
            Some(Value::String(id)) => WidgetInstance::with_id(&self.name, id.clone()),
            Some(other) => {
                return Err(WidgetError::InvalidField {
                    widget: self.name.clone(),
                    field: "id".to_string(),
                    reason: format!("expected a string, got {}", json_kind(other)),
                })
            }
        };

        if let Some(Value::Array(children)) = object.get("children") {
            instance.children = children
                .iter()
                .map(|child| registry.parse_node(child))
                .collect::<WidgetResult<_>>()?;
        }

        match object.get("cell") {
            None | Some(Value::Null) => {}
            Some(cell) => {
                let cell = GridCell::deserialize(cell).map_err(|e| WidgetError::InvalidField {
                    widget: self.name.clone(),
                    field: "cell".to_string(),
                    reason: e.to_string(),
                })?;
                instance.set_cell(Some(cell));
            }
        }

        for property in &self.properties {
            match object.get(&property.name) {
                Some(value) => {
                    instance.set_property(&property.name, value.clone());
                }
                None => {
                    let value = property.create_default();
                    if !value.is_null() {
                        instance.set_property(&property.name, value);
                    }
                }
            }
        }

        Ok(instance)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
