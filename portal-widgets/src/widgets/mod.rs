//! Built-in widget types: declarations, typed views and runtime/edit builders.

pub mod cube;
pub mod grid;
pub mod list;
pub mod search_panel;
pub mod text;

use crate::factory::{BuilderFn, RenderMode};
use crate::instance::WidgetInstance;
use crate::metadata::WidgetTypeDescriptor;
use crate::render::{BuildContext, Element};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

pub use cube::CubeWidget;
pub use grid::GridWidget;
pub use list::ListWidget;
pub use search_panel::{SearchModel, SearchPanelWidget};
pub use text::TextWidget;

/// Typed view of a built-in widget node
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Text(TextWidget),
    List(ListWidget),
    Grid(GridWidget),
    Cube(CubeWidget),
    SearchPanel(SearchPanelWidget),
}

impl Widget {
    /// Project a node onto its built-in view. `None` for other widget types.
    pub fn from_instance(node: &WidgetInstance) -> Option<Widget> {
        let widget = match node.widget_type() {
            text::TEXT => Widget::Text(view(node)),
            list::LIST => Widget::List(view(node)),
            grid::GRID => Widget::Grid(view(node)),
            cube::CUBE => Widget::Cube(view(node)),
            search_panel::SEARCH_PANEL => Widget::SearchPanel(view(node)),
            _ => return None,
        };
        Some(widget)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Widget::Text(_) => text::TEXT,
            Widget::List(_) => list::LIST,
            Widget::Grid(_) => grid::GRID,
            Widget::Cube(_) => cube::CUBE,
            Widget::SearchPanel(_) => search_panel::SEARCH_PANEL,
        }
    }
}

/// Read a node's property bag into a typed view. A value of the wrong shape
/// falls back to that field's default; the other fields are kept.
pub fn view<T: DeserializeOwned + Default>(node: &WidgetInstance) -> T {
    let properties = node.properties();
    if let Ok(view) = serde_json::from_value(Value::Object(properties.clone())) {
        return view;
    }

    let readable: Map<String, Value> = properties
        .iter()
        .filter(|(name, value)| {
            let single = Map::from_iter([((*name).clone(), (*value).clone())]);
            match serde_json::from_value::<T>(Value::Object(single)) {
                Ok(_) => true,
                Err(e) => {
                    warn!(widget = %node.widget_type(), id = %node.id(), property = %name, error = %e, "unreadable widget property");
                    false
                }
            }
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    serde_json::from_value(Value::Object(readable)).unwrap_or_else(|e| {
        warn!(widget = %node.widget_type(), id = %node.id(), error = %e, "unreadable widget properties");
        T::default()
    })
}

pub fn builtin_descriptors() -> Vec<WidgetTypeDescriptor> {
    vec![
        text::descriptor(),
        list::descriptor(),
        grid::descriptor(),
        cube::descriptor(),
        search_panel::descriptor(),
    ]
}

pub fn builtin_builders() -> Vec<(&'static str, RenderMode, BuilderFn)> {
    vec![
        (text::TEXT, RenderMode::Runtime, text::build as BuilderFn),
        (text::TEXT, RenderMode::Edit, text::build_edit),
        (list::LIST, RenderMode::Runtime, list::build),
        (list::LIST, RenderMode::Edit, list::build_edit),
        (grid::GRID, RenderMode::Runtime, grid::build),
        (grid::GRID, RenderMode::Edit, grid::build_edit),
        (cube::CUBE, RenderMode::Runtime, cube::build),
        (cube::CUBE, RenderMode::Edit, cube::build_edit),
        (search_panel::SEARCH_PANEL, RenderMode::Runtime, search_panel::build),
        (search_panel::SEARCH_PANEL, RenderMode::Edit, search_panel::build_edit),
    ]
}

const SELECTION_OUTLINE: &str = "2px solid #2196f3";

/// Edit-mode wrapper: node identity, the selection marker and a small type label
pub(crate) fn edit_frame(ctx: &BuildContext<'_>, label: impl Into<String>) -> Element {
    let mut frame = Element::div()
        .attr("data-widget-id", ctx.data.id())
        .attr("data-widget-type", ctx.data.widget_type())
        .style("position", "relative");
    if ctx.is_selected() {
        frame = frame
            .attr("data-selected", "true")
            .style("outline", SELECTION_OUTLINE)
            .style("outline-offset", "2px");
    }
    frame.child(edit_label(label))
}

/// Edit frame of a node that accepts drops
pub(crate) fn container_frame(ctx: &BuildContext<'_>, label: impl Into<String>) -> Element {
    edit_frame(ctx, label).attr("data-drop-target", "true")
}

fn edit_label(label: impl Into<String>) -> Element {
    Element::new("span")
        .attr("data-edit-label", "")
        .style("display", "block")
        .style("font-size", "10px")
        .style("color", "#888")
        .style("margin-bottom", "4px")
        .text(label)
}

/// Grey hint shown inside an empty container in edit mode
pub(crate) fn empty_hint(text: &str) -> Element {
    Element::div()
        .attr("data-empty-hint", "")
        .style("padding", "16px")
        .style("text-align", "center")
        .style("color", "#888")
        .style("font-size", "12px")
        .text(text)
}

pub(crate) fn px(value: f64) -> String {
    if value > 0.0 {
        format!("{}px", value)
    } else {
        String::new()
    }
}
