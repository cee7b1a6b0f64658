use super::{container_frame, empty_hint, view};
use crate::metadata::{accept_any, PropertyDescriptor, PropertyType, WidgetTypeDescriptor};
use crate::render::{BuildContext, Element, RenderNode};
use serde::Deserialize;

pub const LIST: &str = "list";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListWidget {
    pub gap: String,
    pub padding: String,
    pub background_color: String,
}

pub fn descriptor() -> WidgetTypeDescriptor {
    WidgetTypeDescriptor::new(LIST)
        .label("List")
        .group("layout")
        .icon("☰")
        .accept_child(accept_any)
        .property(
            PropertyDescriptor::new("gap", PropertyType::Padding)
                .label("Gap Between Items")
                .group("layout")
                .default_value("8px"),
        )
        .property(
            PropertyDescriptor::new("padding", PropertyType::Padding)
                .label("Padding")
                .group("layout")
                .default_value("0"),
        )
        .property(
            PropertyDescriptor::new("backgroundColor", PropertyType::Color)
                .label("Background Color")
                .group("style"),
        )
}

fn column(list: &ListWidget) -> Element {
    Element::div()
        .style("display", "flex")
        .style("flex-direction", "column")
        .style("gap", list.gap.as_str())
        .style("padding", list.padding.as_str())
        .style("background-color", list.background_color.as_str())
}

pub fn build(ctx: &BuildContext<'_>) -> RenderNode {
    column(&view(ctx.data)).children(ctx.render_children()).into()
}

pub fn build_edit(ctx: &BuildContext<'_>) -> RenderNode {
    let count = ctx.data.children().len();
    let mut body = column(&view(ctx.data));
    if count == 0 {
        body = body
            .style("min-height", "100px")
            .child(empty_hint("Empty list - drop items here"));
    } else {
        body = body.children(ctx.render_children());
    }
    container_frame(ctx, format!("List Widget ({} items)", count))
        .style("border", "2px dashed #ccc")
        .style("padding", "4px")
        .child(body)
        .into()
}
