use crate::error::{WidgetError, WidgetResult};
use crate::instance::WidgetInstance;
use crate::metadata::{json_kind, WidgetTypeDescriptor};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Catalog of widget types, keyed by type name
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    descriptors: HashMap<String, WidgetTypeDescriptor>,
    order: Vec<String>,
}

/// Widget types sharing a palette group
#[derive(Debug, Clone)]
pub struct PaletteGroup<'a> {
    pub name: &'a str,
    pub widgets: Vec<&'a WidgetTypeDescriptor>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget type. A type registered twice keeps the later
    /// declaration and its original position in [`Self::type_names`].
    pub fn register(&mut self, descriptor: WidgetTypeDescriptor) -> WidgetResult<()> {
        descriptor.check_declaration()?;

        let name = descriptor.name().to_string();
        if self.descriptors.insert(name.clone(), descriptor).is_some() {
            warn!(widget = %name, "widget type registered twice, replacing earlier declaration");
        } else {
            self.order.push(name.clone());
        }
        debug!(widget = %name, "registered widget type");
        Ok(())
    }

    pub fn descriptor(&self, name: &str) -> Option<&WidgetTypeDescriptor> {
        self.descriptors.get(name)
    }

    pub fn descriptor_for_instance(&self, node: &WidgetInstance) -> Option<&WidgetTypeDescriptor> {
        self.descriptor(node.widget_type())
    }

    /// New instance of `name` with every declared property at its default
    pub fn create(&self, name: &str) -> WidgetResult<WidgetInstance> {
        self.descriptor(name)
            .map(WidgetTypeDescriptor::create)
            .ok_or_else(|| WidgetError::UnknownWidgetType {
                name: name.to_string(),
            })
    }

    /// Parse a widget tree. Ids must be unique across the whole payload.
    pub fn parse(&self, payload: &Value) -> WidgetResult<WidgetInstance> {
        let root = self.parse_node(payload)?;
        ensure_unique_ids(&root)?;
        Ok(root)
    }

    pub fn parse_str(&self, text: &str) -> WidgetResult<WidgetInstance> {
        let payload: Value = serde_json::from_str(text)?;
        self.parse(&payload)
    }

    /// Parse one node and its subtree by dispatching on its `type` field.
    /// Does not check id uniqueness.
    pub fn parse_node(&self, payload: &Value) -> WidgetResult<WidgetInstance> {
        let object = payload.as_object().ok_or_else(|| WidgetError::InvalidPayload {
            found: json_kind(payload).to_string(),
        })?;
        let name = object
            .get("type")
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
            .ok_or(WidgetError::MissingType)?;
        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| WidgetError::UnknownWidgetType {
                name: name.to_string(),
            })?;
        descriptor.parse(payload, self)
    }

    /// Whether `parent` may take `child` as a dropped child
    pub fn can_accept_child(&self, parent: &WidgetInstance, child: &WidgetInstance) -> bool {
        self.descriptor_for_instance(parent)
            .is_some_and(|d| d.can_accept_child(parent, child))
    }

    pub fn has(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Type names in registration order
    pub fn type_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Descriptors in registration order
    pub fn descriptors(&self) -> impl Iterator<Item = &WidgetTypeDescriptor> {
        self.order.iter().filter_map(|name| self.descriptors.get(name))
    }

    /// Descriptors grouped by their palette group, groups in first-seen order
    pub fn palette(&self) -> Vec<PaletteGroup<'_>> {
        let mut groups: Vec<PaletteGroup<'_>> = Vec::new();
        for descriptor in self.descriptors() {
            let group = descriptor.group_name();
            match groups.iter_mut().find(|g| g.name == group) {
                Some(existing) => existing.widgets.push(descriptor),
                None => groups.push(PaletteGroup {
                    name: group,
                    widgets: vec![descriptor],
                }),
            }
        }
        groups
    }
}

fn ensure_unique_ids(root: &WidgetInstance) -> WidgetResult<()> {
    let mut seen = HashSet::new();
    let mut duplicate = None;
    root.walk(&mut |node| {
        if duplicate.is_none() && !seen.insert(node.id()) {
            duplicate = Some(node.id().to_string());
        }
    });
    match duplicate {
        Some(id) => Err(WidgetError::DuplicateId { id }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{accept_any, PropertyDescriptor, PropertyType};
    use serde_json::json;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry
            .register(
                WidgetTypeDescriptor::new("label")
                    .group("basic")
                    .property(PropertyDescriptor::new("text", PropertyType::String).default_value("hi")),
            )
            .unwrap();
        registry
            .register(
                WidgetTypeDescriptor::new("stack")
                    .group("layout")
                    .accept_child(accept_any),
            )
            .unwrap();
        registry
            .register(WidgetTypeDescriptor::new("badge").group("basic"))
            .unwrap();
        registry
    }

    #[test]
    fn test_type_names_in_registration_order() {
        assert_eq!(registry().type_names(), vec!["label", "stack", "badge"]);
    }

    #[test]
    fn test_duplicate_registration_last_wins() {
        let mut registry = registry();
        registry
            .register(WidgetTypeDescriptor::new("label").label("Replaced"))
            .unwrap();

        assert_eq!(registry.type_names(), vec!["label", "stack", "badge"]);
        let descriptor = registry.descriptor("label").unwrap();
        assert_eq!(descriptor.display_label(), "Replaced");
        assert!(descriptor.properties().is_empty());
    }

    #[test]
    fn test_register_without_name() {
        let mut registry = TypeRegistry::new();
        assert_eq!(
            registry.register(WidgetTypeDescriptor::new("")),
            Err(WidgetError::UndeclaredWidget)
        );
        assert!(registry.type_names().is_empty());
    }

    #[test]
    fn test_create_unknown() {
        assert_eq!(
            registry().create("chart").unwrap_err(),
            WidgetError::UnknownWidgetType {
                name: "chart".to_string()
            }
        );
    }

    #[test]
    fn test_parse_missing_type() {
        let registry = registry();
        assert_eq!(registry.parse(&json!({ "id": "x" })), Err(WidgetError::MissingType));
        assert_eq!(registry.parse(&json!({ "type": "" })), Err(WidgetError::MissingType));
        assert!(matches!(
            registry.parse(&json!([1, 2])),
            Err(WidgetError::InvalidPayload { .. })
        ));
    }

    #[test]
    fn test_parse_unknown_nested_type() {
        let payload = json!({
            "type": "stack",
            "children": [{ "type": "label" }, { "type": "chart" }]
        });
        assert_eq!(
            registry().parse(&payload),
            Err(WidgetError::UnknownWidgetType {
                name: "chart".to_string()
            })
        );
    }

    #[test]
    fn test_parse_rejects_duplicate_ids() {
        let payload = json!({
            "type": "stack",
            "id": "a",
            "children": [{ "type": "label", "id": "b" }, { "type": "label", "id": "b" }]
        });
        assert_eq!(
            registry().parse(&payload),
            Err(WidgetError::DuplicateId { id: "b".to_string() })
        );
    }

    #[test]
    fn test_parse_non_array_children_ignored() {
        let node = registry()
            .parse(&json!({ "type": "stack", "children": "nope" }))
            .unwrap();
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_parse_str_invalid_json() {
        assert!(matches!(
            registry().parse_str("{ not json"),
            Err(WidgetError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_palette_groups() {
        let registry = registry();
        let palette = registry.palette();
        let summary: Vec<(&str, Vec<&str>)> = palette
            .iter()
            .map(|g| (g.name, g.widgets.iter().map(|d| d.name()).collect()))
            .collect();
        assert_eq!(
            summary,
            vec![("basic", vec!["label", "badge"]), ("layout", vec!["stack"])]
        );
    }

    #[test]
    fn test_acceptance_dispatches_on_parent_type() {
        let registry = registry();
        let stack = registry.create("stack").unwrap();
        let label = registry.create("label").unwrap();
        assert!(registry.can_accept_child(&stack, &label));
        assert!(!registry.can_accept_child(&label, &stack));
    }
}
