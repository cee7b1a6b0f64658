use super::{edit_frame, view};
use crate::editors::cube_config::read_config;
use crate::metadata::{PropertyDescriptor, PropertyType, WidgetTypeDescriptor};
use crate::render::{BuildContext, Element, RenderNode};
use portal_cube::build_cube_query;
use serde::Deserialize;
use serde_json::Value;

pub const CUBE: &str = "cube";

const DEFAULT_BACKGROUND: &str = "#1e2a35";
const DEFAULT_RADIUS: f64 = 8.0;
const MUTED: &str = "#9ca3af";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CubeWidget {
    pub title: String,
    pub icon: String,
    pub footer: String,
    pub value: String,
    pub unit: String,
    pub background_color: String,
    pub border_radius: f64,
    /// Stored `CubeWidgetConfig`, `null` until configured
    pub configuration: Value,
}

fn or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

pub fn descriptor() -> WidgetTypeDescriptor {
    let content = |name: &str, label: &str, default: &str| {
        PropertyDescriptor::new(name, PropertyType::String)
            .label(label)
            .group("content")
            .default_value(default)
    };

    WidgetTypeDescriptor::new(CUBE)
        .label("Cube Chart")
        .group("charts")
        .icon("🧊")
        .property(content("title", "Title", "METRIC TITLE").required())
        .property(content("icon", "Icon", "⏱"))
        .property(content("footer", "Footer", "Last week"))
        .property(content("value", "Value", "865"))
        .property(content("unit", "Unit", "MS"))
        .property(
            PropertyDescriptor::new("backgroundColor", PropertyType::Color)
                .label("Background Color")
                .group("style")
                .default_value(DEFAULT_BACKGROUND),
        )
        .property(
            PropertyDescriptor::new("borderRadius", PropertyType::Number)
                .label("Border Radius")
                .group("style")
                .default_value(8),
        )
        .property(
            PropertyDescriptor::new("configuration", PropertyType::CubeWidgetConfiguration)
                .label("Chart Configuration")
                .group("data"),
        )
}

fn card(cube: &CubeWidget) -> Element {
    let radius = if cube.border_radius > 0.0 {
        cube.border_radius
    } else {
        DEFAULT_RADIUS
    };
    Element::div()
        .style("background-color", or(&cube.background_color, DEFAULT_BACKGROUND))
        .style("border-radius", format!("{}px", radius))
        .style("padding", "16px")
        .style("color", "#fff")
        .style("min-height", "120px")
        .style("box-shadow", "0 4px 12px rgba(0, 0, 0, 0.4)")
}

/// Card content. No query is executed: the configured query is attached as
/// `data-query` next to the static value.
fn body(cube: &CubeWidget) -> Element {
    if cube.configuration.is_null() {
        return card(cube)
            .attr("data-cube-state", "unconfigured")
            .style("display", "flex")
            .style("align-items", "center")
            .style("justify-content", "center")
            .child(
                Element::div()
                    .style("text-align", "center")
                    .style("color", MUTED)
                    .text("Configure chart in properties panel"),
            );
    }

    let config = read_config(&cube.configuration);
    let query = serde_json::to_string(&build_cube_query(&config)).unwrap_or_default();
    let header = Element::div()
        .style("display", "flex")
        .style("align-items", "center")
        .style("gap", "8px")
        .child(Element::new("span").style("font-size", "16px").text(or(&cube.icon, "⏱")))
        .child(
            Element::new("span")
                .style("font-size", "11px")
                .style("text-transform", "uppercase")
                .style("letter-spacing", "0.5px")
                .style("color", MUTED)
                .style("font-weight", "500")
                .text(or(&cube.title, "METRIC TITLE")),
        );
    let value = Element::div()
        .attr("data-query", query)
        .attr("data-rendering-component", config.rendering_component.as_str())
        .style("display", "flex")
        .style("align-items", "center")
        .style("font-size", "48px")
        .style("font-weight", "600")
        .text(or(&cube.value, "865"))
        .child(
            Element::new("span")
                .style("font-size", "14px")
                .style("font-weight", "500")
                .style("color", MUTED)
                .style("margin-left", "8px")
                .text(or(&cube.unit, "MS")),
        );
    let footer = Element::div()
        .style("font-size", "11px")
        .style("color", MUTED)
        .text(cube.footer.as_str());

    card(cube)
        .attr("data-cube-state", "configured")
        .style("display", "flex")
        .style("flex-direction", "column")
        .style("gap", "12px")
        .child(header)
        .child(value)
        .child(footer)
}

pub fn build(ctx: &BuildContext<'_>) -> RenderNode {
    body(&view(ctx.data)).into()
}

pub fn build_edit(ctx: &BuildContext<'_>) -> RenderNode {
    edit_frame(ctx, "Cube Chart").child(body(&view(ctx.data))).into()
}
