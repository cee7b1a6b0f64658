use super::{edit_frame, px, view};
use crate::metadata::{PropertyDescriptor, PropertyType, WidgetTypeDescriptor};
use crate::render::{BuildContext, Element, RenderNode};
use serde::Deserialize;

pub const TEXT: &str = "text";

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextWidget {
    pub text: String,
    pub font_size: f64,
    pub font_weight: String,
    pub color: String,
    pub background_color: String,
    pub text_align: String,
    pub padding: String,
}

pub fn descriptor() -> WidgetTypeDescriptor {
    WidgetTypeDescriptor::new(TEXT)
        .label("Text Widget")
        .group("basic")
        .icon("📝")
        .property(
            PropertyDescriptor::new("text", PropertyType::String)
                .label("Text Content")
                .group("content")
                .default_value("Hello World")
                .required(),
        )
        .property(
            PropertyDescriptor::new("fontSize", PropertyType::Number)
                .label("Font Size")
                .group("style")
                .default_value(16),
        )
        .property(
            PropertyDescriptor::new("fontWeight", PropertyType::FontWeight)
                .label("Font Weight")
                .group("style")
                .default_value("normal"),
        )
        .property(
            PropertyDescriptor::new("color", PropertyType::Color)
                .label("Color")
                .group("style")
                .default_value("#000000"),
        )
        .property(
            PropertyDescriptor::new("backgroundColor", PropertyType::Color)
                .label("Background Color")
                .group("style"),
        )
        .property(
            PropertyDescriptor::new("textAlign", PropertyType::TextAlign)
                .label("Text Align")
                .group("layout")
                .default_value("left"),
        )
        .property(
            PropertyDescriptor::new("padding", PropertyType::Padding)
                .label("Padding")
                .group("layout")
                .default_value("8px"),
        )
}

fn body(text: &TextWidget) -> Element {
    Element::div()
        .style("font-size", px(text.font_size))
        .style("font-weight", text.font_weight.as_str())
        .style("color", text.color.as_str())
        .style("background-color", text.background_color.as_str())
        .style("text-align", text.text_align.as_str())
        .style("padding", text.padding.as_str())
        .text(text.text.as_str())
}

pub fn build(ctx: &BuildContext<'_>) -> RenderNode {
    body(&view(ctx.data)).into()
}

pub fn build_edit(ctx: &BuildContext<'_>) -> RenderNode {
    edit_frame(ctx, "Text Widget")
        .style("border", "1px dashed #ccc")
        .style("padding", "4px")
        .child(body(&view(ctx.data)))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{RenderMode, WidgetFactory};
    use crate::instance::WidgetInstance;
    use crate::render::Renderer;
    use crate::versions::VersionMap;
    use serde_json::json;

    fn factory() -> WidgetFactory {
        let mut factory = WidgetFactory::new();
        factory.register(TEXT, RenderMode::Runtime, build);
        factory.register(TEXT, RenderMode::Edit, build_edit);
        factory
    }

    fn node() -> WidgetInstance {
        let mut node = WidgetInstance::new(TEXT);
        node.set_property("text", json!("Revenue <Q1>"));
        node.set_property("fontSize", json!(18));
        node.set_property("color", json!("#333"));
        node.set_property("backgroundColor", json!(""));
        node
    }

    #[test]
    fn test_runtime_styles() {
        let (factory, versions) = (factory(), VersionMap::new());
        let out = Renderer::new(&factory, &versions, RenderMode::Runtime).render(&node());
        let element = out.as_element().unwrap();

        assert_eq!(element.style_value("font-size"), Some("18px"));
        assert_eq!(element.style_value("color"), Some("#333"));
        assert_eq!(element.style_value("background-color"), None);
        assert!(out.to_html().contains("Revenue &lt;Q1&gt;"));
    }

    #[test]
    fn test_bad_font_size_keeps_other_styles() {
        let (factory, versions) = (factory(), VersionMap::new());
        let mut node = node();
        node.set_property("fontSize", json!("large"));
        let out = Renderer::new(&factory, &versions, RenderMode::Runtime).render(&node);
        let element = out.as_element().unwrap();

        assert_eq!(element.style_value("color"), Some("#333"));
        assert_eq!(element.style_value("font-size"), None);
        assert!(out.to_html().contains("Revenue &lt;Q1&gt;"));
    }

    #[test]
    fn test_edit_frame_and_selection() {
        let (factory, versions) = (factory(), VersionMap::new());
        let node = node();
        let renderer = Renderer::new(&factory, &versions, RenderMode::Edit).with_selected(Some(node.id()));
        let out = renderer.render(&node);
        let element = out.as_element().unwrap();

        assert_eq!(element.attr_value("data-selected"), Some("true"));
        assert_eq!(element.style_value("border"), Some("1px dashed #ccc"));
        assert!(out.text_content().starts_with("Text Widget"));
        assert_eq!(element.attr_value("data-drop-target"), None);
    }
}
