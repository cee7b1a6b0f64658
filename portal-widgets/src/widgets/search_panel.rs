use super::{container_frame, empty_hint, view};
use crate::editors::query_expression::is_configured;
use crate::metadata::{accept_any, PropertyDescriptor, PropertyType, WidgetTypeDescriptor};
use crate::render::{BuildContext, Element, RenderNode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const SEARCH_PANEL: &str = "search-panel";

const DEFAULT_MIN_HEIGHT: f64 = 300.0;

/// Search model a panel filters with. Criteria are kept as raw JSON; only
/// their names are read here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchModel {
    pub name: String,
    pub criteria: Vec<Value>,
}

impl SearchModel {
    pub fn criterion_names(&self) -> Vec<&str> {
        self.criteria
            .iter()
            .filter_map(|c| c.as_str().or_else(|| c.get("name").and_then(Value::as_str)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchPanelWidget {
    pub title: String,
    pub search_model: SearchModel,
    pub predefined_query: Value,
    pub min_height: f64,
    pub show_clear: bool,
}

pub fn descriptor() -> WidgetTypeDescriptor {
    WidgetTypeDescriptor::new(SEARCH_PANEL)
        .label("Search Panel")
        .group("query")
        .icon("🔍")
        .accept_child(accept_any)
        .property(
            PropertyDescriptor::new("title", PropertyType::String)
                .label("Panel Title")
                .group("General"),
        )
        .property(
            PropertyDescriptor::new("searchModel", PropertyType::SearchPanelConfiguration)
                .label("Search Model")
                .group("Configuration")
                .default_value(json!({ "name": "default", "criteria": [] }))
                .required(),
        )
        .property(
            PropertyDescriptor::new("predefinedQuery", PropertyType::QueryExpression)
                .label("Predefined Query")
                .group("Configuration"),
        )
        .property(
            PropertyDescriptor::new("minHeight", PropertyType::Number)
                .label("Minimum Height (px)")
                .group("Appearance")
                .default_value(300),
        )
        .property(
            PropertyDescriptor::new("showClear", PropertyType::Boolean)
                .label("Show Clear Button")
                .group("Appearance")
                .default_value(true),
        )
}

fn min_height(panel: &SearchPanelWidget) -> String {
    let height = if panel.min_height > 0.0 {
        panel.min_height
    } else {
        DEFAULT_MIN_HEIGHT
    };
    format!("{}px", height)
}

fn title(panel: &SearchPanelWidget) -> Option<Element> {
    (!panel.title.is_empty()).then(|| {
        Element::new("h3")
            .style("margin", "0 0 12px 0")
            .style("font-size", "16px")
            .text(panel.title.as_str())
    })
}

fn chips(panel: &SearchPanelWidget) -> Element {
    let mut bar = Element::div()
        .attr("data-search-model", panel.search_model.name.as_str())
        .style("display", "flex")
        .style("flex-wrap", "wrap")
        .style("gap", "6px")
        .style("margin-bottom", "12px");
    for name in panel.search_model.criterion_names() {
        bar = bar.child(
            Element::new("span")
                .attr("data-criterion", name)
                .style("padding", "2px 8px")
                .style("border-radius", "12px")
                .style("background-color", "#2a2a2a")
                .style("font-size", "12px")
                .text(name),
        );
    }
    if panel.show_clear {
        bar = bar.child(Element::new("button").attr("type", "button").text("Clear"));
    }
    bar
}

fn frame(panel: &SearchPanelWidget) -> Element {
    Element::div()
        .attr(
            "data-predefined-query",
            if is_configured(&panel.predefined_query) { "true" } else { "false" },
        )
        .style("padding", "16px")
        .style("border-radius", "8px")
        .style("min-height", min_height(panel))
}

pub fn build(ctx: &BuildContext<'_>) -> RenderNode {
    let panel: SearchPanelWidget = view(ctx.data);
    let mut out = frame(&panel).style("border", "1px solid #333");
    if let Some(title) = title(&panel) {
        out = out.child(title);
    }
    out.child(chips(&panel)).children(ctx.render_children()).into()
}

pub fn build_edit(ctx: &BuildContext<'_>) -> RenderNode {
    let panel: SearchPanelWidget = view(ctx.data);
    let label = if panel.title.is_empty() {
        "Search Panel Widget".to_string()
    } else {
        format!("Search Panel Widget - {}", panel.title)
    };
    let border = if ctx.is_selected() {
        "2px solid #4caf50"
    } else {
        "1px solid #333"
    };

    let mut out = frame(&panel).style("border", border);
    if let Some(title) = title(&panel) {
        out = out.child(title);
    }
    out = out.child(
        Element::div()
            .style("padding", "8px")
            .style("margin-bottom", "12px")
            .style("border", "1px dashed #333")
            .style("border-radius", "4px")
            .style("font-size", "12px")
            .style("color", "#888")
            .text(format!(
                "🔍 Search Panel Widget ({} criteria defined)",
                panel.search_model.criteria.len()
            )),
    );
    if ctx.data.children().is_empty() {
        out = out.child(empty_hint("Drop child widgets here"));
    } else {
        out = out.children(ctx.render_children());
    }
    container_frame(ctx, label).child(out).into()
}
