//! Property inspector: one control per declared, visible property of the
//! selected node, grouped by the property's group.

use crate::editors::basic::{parse_span, span_value};
use crate::editors::{EditorControl, EditorInput, PropertyEditorRegistry};
use crate::error::{WidgetError, WidgetResult};
use crate::instance::WidgetInstance;
use crate::metadata::{PropertyDescriptor, PropertyType, DEFAULT_ICON, RESERVED_KEYS};
use crate::registry::TypeRegistry;
use portal_cube::CubeDescriptor;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

/// Pseudo-property exposing the grid span of a node placed in a grid cell
pub const CELL_PROPERTY: &str = "cell";
pub const CELL_GROUP: &str = "layout";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelHeader {
    pub icon: String,
    pub label: String,
    pub widget_type: String,
    pub id: String,
    /// `"Type: text | ID: 1a2b3c4d..."`
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PanelEntry {
    Editor(EditorControl),
    #[serde(rename_all = "camelCase")]
    MissingEditor {
        property: String,
        property_type: String,
        message: String,
    },
}

impl PanelEntry {
    pub fn property(&self) -> &str {
        match self {
            PanelEntry::Editor(control) => &control.property,
            PanelEntry::MissingEditor { property, .. } => property,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelGroup {
    pub name: String,
    pub collapsed: bool,
    pub entries: Vec<PanelEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub header: PanelHeader,
    pub groups: Vec<PanelGroup>,
    /// Set when the node's type has no descriptor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl PanelView {
    pub fn group(&self, name: &str) -> Option<&PanelGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn entry(&self, property: &str) -> Option<&PanelEntry> {
        self.groups
            .iter()
            .flat_map(|g| g.entries.iter())
            .find(|e| e.property() == property)
    }
}

#[derive(Debug, Clone)]
pub struct PropertyPanel<'a> {
    types: &'a TypeRegistry,
    editors: &'a PropertyEditorRegistry,
    cubes: &'a [CubeDescriptor],
    collapsed: BTreeSet<String>,
}

impl<'a> PropertyPanel<'a> {
    pub fn new(types: &'a TypeRegistry, editors: &'a PropertyEditorRegistry, cubes: &'a [CubeDescriptor]) -> Self {
        Self {
            types,
            editors,
            cubes,
            collapsed: BTreeSet::new(),
        }
    }

    /// Flip a group's collapse state. Returns true when it is now collapsed.
    pub fn toggle_group(&mut self, group: &str) -> bool {
        if self.collapsed.remove(group) {
            false
        } else {
            self.collapsed.insert(group.to_string());
            true
        }
    }

    pub fn is_collapsed(&self, group: &str) -> bool {
        self.collapsed.contains(group)
    }

    pub fn build(&self, node: &WidgetInstance) -> PanelView {
        let Some(descriptor) = self.types.descriptor_for_instance(node) else {
            return PanelView {
                header: header(DEFAULT_ICON, node.widget_type(), node),
                groups: Vec::new(),
                notice: Some(format!("No descriptor found for widget type: {}", node.widget_type())),
            };
        };

        let mut groups: Vec<PanelGroup> = Vec::new();
        for property in descriptor.properties().iter().filter(|p| !p.is_hidden()) {
            let value = property
                .value_of(node)
                .cloned()
                .unwrap_or_else(|| property.create_default());
            let entry = self.entry(property, &value);
            self.push_entry(&mut groups, property.group_name(), entry);
        }

        if node.cell().is_some() {
            let property = PropertyDescriptor::new(CELL_PROPERTY, PropertyType::Span)
                .label("Grid Span")
                .group(CELL_GROUP);
            let value = span_value(node.grid_column_span(), node.grid_row_span());
            let entry = self.entry(&property, &value);
            self.push_entry(&mut groups, CELL_GROUP, entry);
        }

        PanelView {
            header: header(descriptor.display_icon(), descriptor.display_label(), node),
            groups,
            notice: None,
        }
    }

    /// Write `value` into `property` and report the change through `on_change`.
    /// Values are not checked against the declared type. Returns the previous value.
    pub fn apply_edit<F>(
        &self,
        node: &mut WidgetInstance,
        property: &str,
        value: Value,
        on_change: F,
    ) -> WidgetResult<Option<Value>>
    where
        F: FnOnce(&WidgetInstance),
    {
        let previous = if property == CELL_PROPERTY {
            let Some(cell) = node.cell() else {
                return Err(WidgetError::InvalidField {
                    widget: node.widget_type().to_string(),
                    field: property.to_string(),
                    reason: "node is not placed in a grid cell".to_string(),
                });
            };
            let previous = span_value(cell.column_span(), cell.row_span());
            let (col_span, row_span) = parse_span(&value);
            node.set_grid_column_span(col_span);
            node.set_grid_row_span(row_span);
            Some(previous)
        } else if RESERVED_KEYS.contains(&property) {
            return Err(WidgetError::InvalidField {
                widget: node.widget_type().to_string(),
                field: property.to_string(),
                reason: "reserved by the node format".to_string(),
            });
        } else {
            node.set_property(property, value)
        };

        debug!(id = %node.id(), %property, "property edited");
        on_change(node);
        Ok(previous)
    }

    fn entry(&self, property: &PropertyDescriptor, value: &Value) -> PanelEntry {
        match self.editors.editor(property.property_type()) {
            Some(editor) => PanelEntry::Editor(editor(&EditorInput {
                property,
                value,
                cubes: self.cubes,
            })),
            None => PanelEntry::MissingEditor {
                property: property.name().to_string(),
                property_type: property.property_type().tag().to_string(),
                message: format!(
                    "No editor for type: {} ({})",
                    property.property_type(),
                    property.name()
                ),
            },
        }
    }

    fn push_entry(&self, groups: &mut Vec<PanelGroup>, group: &str, entry: PanelEntry) {
        match groups.iter_mut().find(|g| g.name == group) {
            Some(existing) => existing.entries.push(entry),
            None => groups.push(PanelGroup {
                name: group.to_string(),
                collapsed: self.is_collapsed(group),
                entries: vec![entry],
            }),
        }
    }
}

fn header(icon: &str, label: &str, node: &WidgetInstance) -> PanelHeader {
    PanelHeader {
        icon: icon.to_string(),
        label: label.to_string(),
        widget_type: node.widget_type().to_string(),
        id: node.id().to_string(),
        summary: format!("Type: {} | ID: {}...", node.widget_type(), node.short_id()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editors::{basic, ControlKind};
    use crate::instance::GridCell;
    use crate::metadata::WidgetTypeDescriptor;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn fixtures() -> (TypeRegistry, PropertyEditorRegistry) {
        let mut types = TypeRegistry::new();
        types
            .register(
                WidgetTypeDescriptor::new("label")
                    .label("Label")
                    .icon("🏷️")
                    .property(PropertyDescriptor::new("text", PropertyType::String).group("content"))
                    .property(PropertyDescriptor::new("color", PropertyType::Color).group("style"))
                    .property(PropertyDescriptor::new("note", PropertyType::String).group("content"))
                    .property(PropertyDescriptor::new("secret", PropertyType::String).hidden())
                    .property(PropertyDescriptor::new("matrix", PropertyType::Custom("matrix".into()))),
            )
            .unwrap();
        let mut editors = PropertyEditorRegistry::new();
        editors.register(&PropertyType::String, basic::string_editor);
        editors.register(&PropertyType::Span, basic::span_editor);
        (types, editors)
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let (types, editors) = fixtures();
        let panel = PropertyPanel::new(&types, &editors, &[]);
        let node = types.create("label").unwrap();
        let view = panel.build(&node);

        let names: Vec<_> = view.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["content", "style", "general"]);
        let content: Vec<_> = view.groups[0].entries.iter().map(|e| e.property()).collect();
        assert_eq!(content, vec!["text", "note"]);
        assert!(view.entry("secret").is_none());
        assert_eq!(view.header.label, "Label");
        assert_eq!(view.header.summary, format!("Type: label | ID: {}...", node.short_id()));
    }

    #[test]
    fn test_missing_editor_placeholder() {
        let (types, editors) = fixtures();
        let panel = PropertyPanel::new(&types, &editors, &[]);
        let view = panel.build(&types.create("label").unwrap());

        assert_eq!(
            view.entry("color"),
            Some(&PanelEntry::MissingEditor {
                property: "color".to_string(),
                property_type: "color".to_string(),
                message: "No editor for type: color (color)".to_string(),
            })
        );
        assert!(matches!(view.entry("matrix"), Some(PanelEntry::MissingEditor { .. })));
    }

    #[test]
    fn test_unknown_descriptor_notice() {
        let (types, editors) = fixtures();
        let panel = PropertyPanel::new(&types, &editors, &[]);
        let view = panel.build(&WidgetInstance::new("ghost"));

        assert!(view.groups.is_empty());
        assert_eq!(view.notice.as_deref(), Some("No descriptor found for widget type: ghost"));
        assert_eq!(view.header.icon, DEFAULT_ICON);
    }

    #[test]
    fn test_apply_edit_writes_and_notifies() {
        let (types, editors) = fixtures();
        let panel = PropertyPanel::new(&types, &editors, &[]);
        let mut node = types.create("label").unwrap();
        let mut notified = Vec::new();

        let previous = panel
            .apply_edit(&mut node, "text", json!("hi"), |n| notified.push(n.id().to_string()))
            .unwrap();

        assert_eq!(previous, Some(json!("")));
        assert_eq!(node.property("text"), Some(&json!("hi")));
        assert_eq!(notified, vec![node.id().to_string()]);
        assert!(panel.apply_edit(&mut node, "id", json!("x"), |_| {}).is_err());
    }

    #[test]
    fn test_cell_span_entry_and_edit() {
        let (types, editors) = fixtures();
        let panel = PropertyPanel::new(&types, &editors, &[]);
        let mut node = types.create("label").unwrap();
        assert!(panel.build(&node).entry(CELL_PROPERTY).is_none());
        assert!(panel.apply_edit(&mut node, CELL_PROPERTY, json!({}), |_| {}).is_err());

        node.set_cell(Some(GridCell::new(1, 0)));
        panel
            .apply_edit(&mut node, CELL_PROPERTY, json!({ "colSpan": 2, "rowSpan": 1 }), |_| {})
            .unwrap();
        assert_eq!(node.grid_column_span(), 2);
        assert_eq!(node.grid_row_span(), 1);

        match panel.build(&node).entry(CELL_PROPERTY) {
            Some(PanelEntry::Editor(control)) => {
                assert_eq!(control.kind, ControlKind::Span { col_span: 2, row_span: 1 })
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_collapse_state_is_local() {
        let (types, editors) = fixtures();
        let mut panel = PropertyPanel::new(&types, &editors, &[]);
        assert!(panel.toggle_group("style"));
        assert!(panel.is_collapsed("style"));

        let view = panel.build(&types.create("label").unwrap());
        assert!(view.group("style").unwrap().collapsed);
        assert!(!view.group("content").unwrap().collapsed);

        assert!(!panel.toggle_group("style"));
        assert!(!panel.is_collapsed("style"));
    }
}
