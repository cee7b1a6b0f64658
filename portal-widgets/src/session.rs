//! A single-owner editing session over one widget tree.

use crate::bus::{Message, MessageBus, SELECTION_TOPIC};
use crate::context::EditorContext;
use crate::error::{WidgetError, WidgetResult};
use crate::factory::RenderMode;
use crate::instance::WidgetInstance;
use crate::panel::{PanelView, PropertyPanel};
use crate::render::RenderNode;
use crate::tree;
use crate::versions::VersionMap;
use serde_json::{json, Value};
use tracing::{debug, info};

#[derive(Debug)]
pub struct EditorSession<'a> {
    context: &'a EditorContext,
    root: WidgetInstance,
    versions: VersionMap,
    selected: Option<String>,
    bus: MessageBus,
    panel: PropertyPanel<'a>,
}

impl<'a> EditorSession<'a> {
    pub fn new(context: &'a EditorContext, root: WidgetInstance) -> Self {
        info!(root = %root.id(), widget = %root.widget_type(), nodes = root.node_count(), "editing session opened");
        Self {
            context,
            root,
            versions: VersionMap::new(),
            selected: None,
            bus: MessageBus::new(),
            panel: context.panel(),
        }
    }

    /// Open a session on a persisted tree
    pub fn load(context: &'a EditorContext, payload: &Value) -> WidgetResult<Self> {
        let root = context.types.parse(payload)?;
        Ok(Self::new(context, root))
    }

    pub fn root(&self) -> &WidgetInstance {
        &self.root
    }

    pub fn versions(&self) -> &VersionMap {
        &self.versions
    }

    pub fn bus_mut(&mut self) -> &mut MessageBus {
        &mut self.bus
    }

    pub fn panel_mut(&mut self) -> &mut PropertyPanel<'a> {
        &mut self.panel
    }

    pub fn node(&self, id: &str) -> Option<&WidgetInstance> {
        tree::find_by_id(&self.root, id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&WidgetInstance> {
        self.selected.as_deref().and_then(|id| self.node(id))
    }

    /// Select a node (or clear with `None`) and announce it on the bus.
    pub fn select(&mut self, id: Option<&str>) -> WidgetResult<()> {
        let payload = match id {
            Some(id) => {
                let node = self
                    .node(id)
                    .ok_or_else(|| WidgetError::NodeNotFound { id: id.to_string() })?;
                json!({ "id": node.id(), "type": node.widget_type() })
            }
            None => Value::Null,
        };
        self.selected = id.map(str::to_string);
        let delivered = self
            .bus
            .publish(&Message::new(SELECTION_TOPIC, "select", payload));
        debug!(selected = ?self.selected, delivered, "selection changed");
        Ok(())
    }

    /// Inspector view of the selected node
    pub fn panel_view(&self) -> Option<PanelView> {
        self.selected().map(|node| self.panel.build(node))
    }

    /// Write a property through the inspector and invalidate the node.
    /// Returns the previous value.
    pub fn edit_property(&mut self, id: &str, property: &str, value: Value) -> WidgetResult<Option<Value>> {
        let node = tree::find_by_id_mut(&mut self.root, id)
            .ok_or_else(|| WidgetError::NodeNotFound { id: id.to_string() })?;
        let versions = &mut self.versions;
        self.panel.apply_edit(node, property, value, |n| {
            versions.bump(n.id());
        })
    }

    /// Create a widget of `widget_type` under `parent_id`; returns the new id
    pub fn insert_new(&mut self, widget_type: &str, parent_id: &str, index: Option<usize>) -> WidgetResult<String> {
        let child = self.context.types.create(widget_type)?;
        let id = child.id().to_string();
        tree::attach(&mut self.root, &self.context.types, &mut self.versions, parent_id, child, index)?;
        Ok(id)
    }

    pub fn move_node(&mut self, id: &str, target_id: &str, index: Option<usize>) -> WidgetResult<()> {
        tree::move_node(&mut self.root, &self.context.types, &mut self.versions, id, target_id, index)
    }

    pub fn move_to_cell(&mut self, id: &str, grid_id: &str, row: u32, col: u32) -> WidgetResult<()> {
        tree::move_to_cell(&mut self.root, &self.context.types, &mut self.versions, id, grid_id, row, col)
    }

    /// Remove a node and its subtree. A selection inside it is cleared.
    pub fn delete(&mut self, id: &str) -> WidgetResult<WidgetInstance> {
        let removed = tree::delete_node(&mut self.root, &mut self.versions, id)?;
        let selection_removed = self
            .selected
            .as_deref()
            .is_some_and(|sel| tree::find_by_id(&removed, sel).is_some());
        if selection_removed {
            self.select(None)?;
        }
        Ok(removed)
    }

    /// Path from the root to the selection; just the root when nothing is selected
    pub fn breadcrumb(&self) -> Vec<&WidgetInstance> {
        self.selected
            .as_deref()
            .and_then(|id| tree::path_to(&self.root, id))
            .unwrap_or_else(|| vec![&self.root])
    }

    pub fn render(&self, mode: RenderMode) -> RenderNode {
        self.context
            .renderer(&self.versions, mode)
            .with_selected(self.selected.as_deref())
            .render(&self.root)
    }

    pub fn to_json(&self) -> Value {
        self.root.to_json()
    }

    pub fn into_root(self) -> WidgetInstance {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{grid, list, text};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session(context: &EditorContext) -> EditorSession<'_> {
        let payload = json!({
            "type": list::LIST,
            "id": "root",
            "children": [
                { "type": text::TEXT, "id": "title", "text": "Sales" },
                { "type": grid::GRID, "id": "grid", "children": [
                    { "type": text::TEXT, "id": "cell-a", "cell": { "row": 0, "col": 0 } }
                ]}
            ]
        });
        EditorSession::load(context, &payload).unwrap()
    }

    #[test]
    fn test_select_publishes() {
        let context = EditorContext::bootstrap();
        let mut session = session(&context);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.bus_mut().subscribe(SELECTION_TOPIC, move |m| {
            sink.borrow_mut().push(m.payload.clone());
            Ok(())
        });

        session.select(Some("title")).unwrap();
        assert_eq!(session.selected().unwrap().id(), "title");
        assert!(session.select(Some("missing")).is_err());
        assert_eq!(*seen.borrow(), vec![json!({ "id": "title", "type": "text" })]);
    }

    #[test]
    fn test_edit_bumps_only_the_edited_node() {
        let context = EditorContext::bootstrap();
        let mut session = session(&context);

        let previous = session.edit_property("title", "text", json!("Revenue")).unwrap();
        assert_eq!(previous, Some(json!("Sales")));
        assert_eq!(session.node("title").unwrap().str_property("text"), Some("Revenue"));
        assert_eq!(session.versions().get("title"), 1);
        assert_eq!(session.versions().get("root"), 0);
        assert!(session.edit_property("nope", "text", json!("x")).is_err());
    }

    #[test]
    fn test_insert_move_delete() {
        let context = EditorContext::bootstrap();
        let mut session = session(&context);

        let id = session.insert_new(text::TEXT, "root", Some(0)).unwrap();
        assert_eq!(session.root().children()[0].id(), id);
        assert!(session.insert_new(text::TEXT, "title", None).is_err());

        session.move_to_cell(&id, "grid", 0, 1).unwrap();
        let moved = session.node(&id).unwrap();
        assert_eq!(moved.cell().map(|c| (c.row, c.col)), Some((0, 1)));
        assert_eq!(session.node("grid").unwrap().children().len(), 2);

        session.select(Some(&id)).unwrap();
        session.delete("grid").unwrap();
        assert!(session.node(&id).is_none());
        assert!(session.selected_id().is_none());
        assert!(session.delete("root").is_err());
    }

    #[test]
    fn test_breadcrumb() {
        let context = EditorContext::bootstrap();
        let mut session = session(&context);
        let ids = |s: &EditorSession<'_>| s.breadcrumb().iter().map(|n| n.id().to_string()).collect::<Vec<_>>();

        assert_eq!(ids(&session), vec!["root"]);
        session.select(Some("cell-a")).unwrap();
        assert_eq!(ids(&session), vec!["root", "grid", "cell-a"]);
    }

    #[test]
    fn test_render_marks_selection() {
        let context = EditorContext::bootstrap();
        let mut session = session(&context);
        session.select(Some("title")).unwrap();

        let edit = session.render(RenderMode::Edit);
        let selected = edit.find_by_attr("data-selected", "true").unwrap();
        assert_eq!(selected.attr_value("data-widget-id"), Some("title"));

        let runtime = session.render(RenderMode::Runtime);
        assert!(runtime.find_by_attr("data-selected", "true").is_none());
        assert!(runtime.text_content().contains("Sales"));
    }

    #[test]
    fn test_panel_for_selection() {
        let context = EditorContext::bootstrap();
        let mut session = session(&context);
        assert!(session.panel_view().is_none());

        session.select(Some("cell-a")).unwrap();
        let view = session.panel_view().unwrap();
        assert_eq!(view.header.label, "Text Widget");
        assert!(view.entry("cell").is_some());

        session.edit_property("cell-a", "cell", json!({ "colSpan": 2 })).unwrap();
        assert_eq!(session.node("cell-a").unwrap().grid_column_span(), 2);
    }
}
