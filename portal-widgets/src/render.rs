//! Render tree and the renderer that walks widget instances through the
//! builder table.

use crate::factory::{RenderMode, WidgetFactory};
use crate::instance::WidgetInstance;
use crate::versions::VersionMap;
use std::fmt::Write;
use tracing::warn;

/// Output of a builder
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode {
    Element(Element),
    Text(String),
    Fragment(Vec<RenderNode>),
}

impl RenderNode {
    pub fn text(text: impl Into<String>) -> Self {
        RenderNode::Text(text.into())
    }

    /// Set the mount key on an element root. Text and fragments carry no key.
    pub fn with_key(self, key: String) -> Self {
        match self {
            RenderNode::Element(element) => RenderNode::Element(element.key(key)),
            other => other,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            RenderNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Concatenated text content of this subtree
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            RenderNode::Text(text) => out.push_str(text),
            RenderNode::Element(element) => element.children.iter().for_each(|c| c.collect_text(out)),
            RenderNode::Fragment(nodes) => nodes.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// Depth-first search for the first element whose attribute `name` equals `value`
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<&Element> {
        match self {
            RenderNode::Text(_) => None,
            RenderNode::Element(element) => {
                if element.attr_value(name) == Some(value) {
                    return Some(element);
                }
                element.children.iter().find_map(|c| c.find_by_attr(name, value))
            }
            RenderNode::Fragment(nodes) => nodes.iter().find_map(|c| c.find_by_attr(name, value)),
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) -> std::fmt::Result {
        match self {
            RenderNode::Text(text) => out.write_str(&escape_html(text)),
            RenderNode::Fragment(nodes) => nodes.iter().try_for_each(|n| n.write_html(out)),
            RenderNode::Element(element) => element.write_html(out),
        }
    }
}

impl From<Element> for RenderNode {
    fn from(element: Element) -> Self {
        RenderNode::Element(element)
    }
}

/// An HTML-like element with inline styles
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub key: Option<String>,
    pub attrs: Vec<(String, String)>,
    pub styles: Vec<(String, String)>,
    pub children: Vec<RenderNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn div() -> Self {
        Self::new("div")
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Add a style declaration. Empty values are skipped.
    pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.styles.push((property.into(), value));
        }
        self
    }

    pub fn style_opt(self, property: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.style(property, value),
            None => self,
        }
    }

    pub fn child(mut self, child: impl Into<RenderNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = RenderNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(RenderNode::text(text))
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.styles
            .iter()
            .rev()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    fn write_html(&self, out: &mut String) -> std::fmt::Result {
        write!(out, "<{}", self.tag)?;
        if let Some(key) = &self.key {
            write!(out, " data-key=\"{}\"", escape_html(key))?;
        }
        for (name, value) in &self.attrs {
            write!(out, " {}=\"{}\"", name, escape_html(value))?;
        }
        if !self.styles.is_empty() {
            let css = self
                .styles
                .iter()
                .map(|(p, v)| format!("{}:{}", p, v))
                .collect::<Vec<_>>()
                .join(";");
            write!(out, " style=\"{}\"", escape_html(&css))?;
        }
        out.write_char('>')?;
        for child in &self.children {
            child.write_html(out)?;
        }
        write!(out, "</{}>", self.tag)
    }
}

impl From<String> for RenderNode {
    fn from(text: String) -> Self {
        RenderNode::Text(text)
    }
}

impl From<&str> for RenderNode {
    fn from(text: &str) -> Self {
        RenderNode::Text(text.to_string())
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Wrap a rendered fragment in a standalone HTML document
pub fn html_document(title: &str, body: &RenderNode) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title>\
<style>html,body{{margin:0;font-family:sans-serif;background:#121212;color:#e0e0e0;}}</style>\
</head><body>{}</body></html>\n",
        escape_html(title),
        body.to_html()
    )
}

/// Walks widget instances and dispatches each one to its `(type, mode)` builder
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    factory: &'a WidgetFactory,
    versions: &'a VersionMap,
    mode: RenderMode,
    selected: Option<&'a str>,
}

impl<'a> Renderer<'a> {
    pub fn new(factory: &'a WidgetFactory, versions: &'a VersionMap, mode: RenderMode) -> Self {
        Self {
            factory,
            versions,
            mode,
            selected: None,
        }
    }

    /// Mark the node with this id as selected (edit mode only)
    pub fn with_selected(mut self, selected: Option<&'a str>) -> Self {
        self.selected = selected;
        self
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn selected(&self) -> Option<&'a str> {
        self.selected
    }

    /// `"{id}-{version}"`; changes whenever the node's version is bumped
    pub fn mount_key(&self, node: &WidgetInstance) -> String {
        format!("{}-{}", node.id(), self.versions.get(node.id()))
    }

    /// Render one node. A node without a builder becomes an inline placeholder.
    pub fn render(&self, node: &WidgetInstance) -> RenderNode {
        let key = self.mount_key(node);
        match self.factory.builder(node.widget_type(), self.mode) {
            Some(build) => {
                let context = BuildContext {
                    data: node,
                    renderer: self,
                };
                build(&context).with_key(key)
            }
            None => {
                warn!(widget = %node.widget_type(), id = %node.id(), mode = %self.mode, "no builder for widget type");
                placeholder(node.widget_type()).with_key(key)
            }
        }
    }

    pub fn render_all(&self, nodes: &[WidgetInstance]) -> RenderNode {
        RenderNode::Fragment(nodes.iter().map(|n| self.render(n)).collect())
    }
}

/// Red dashed box shown in place of a node whose type has no builder
pub fn placeholder(widget_type: &str) -> RenderNode {
    Element::div()
        .attr("data-placeholder", "unknown-widget")
        .style("padding", "16px")
        .style("margin", "8px")
        .style("border", "2px dashed red")
        .style("border-radius", "4px")
        .style("color", "red")
        .style("font-family", "monospace")
        .text(format!("⚠️ Unknown widget type: {}", widget_type))
        .into()
}

/// What a builder receives: the node and the renderer to recurse with
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub data: &'a WidgetInstance,
    pub renderer: &'a Renderer<'a>,
}

impl<'a> BuildContext<'a> {
    pub fn mode(&self) -> RenderMode {
        self.renderer.mode()
    }

    pub fn is_edit(&self) -> bool {
        self.mode().is_edit()
    }

    pub fn is_selected(&self) -> bool {
        self.is_edit() && self.renderer.selected() == Some(self.data.id())
    }

    pub fn render_child(&self, child: &WidgetInstance) -> RenderNode {
        self.renderer.render(child)
    }

    pub fn render_children(&self) -> Vec<RenderNode> {
        self.data
            .children()
            .iter()
            .map(|c| self.renderer.render(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn caption(ctx: &BuildContext<'_>) -> RenderNode {
        Element::new("p")
            .text(ctx.data.str_property("text").unwrap_or_default())
            .into()
    }

    fn column(ctx: &BuildContext<'_>) -> RenderNode {
        Element::div()
            .attr("data-selected", ctx.is_selected().to_string())
            .children(ctx.render_children())
            .into()
    }

    fn factory() -> WidgetFactory {
        let mut factory = WidgetFactory::new();
        factory.register("caption", RenderMode::Runtime, caption);
        factory.register("column", RenderMode::Runtime, column);
        factory.register("column", RenderMode::Edit, column);
        factory
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn test_element_html() {
        let node: RenderNode = Element::div()
            .key("k-0")
            .attr("data-widget-id", "w")
            .style("color", "red")
            .style("background-color", "")
            .text("a < b")
            .into();
        assert_eq!(
            node.to_html(),
            r#"<div data-key="k-0" data-widget-id="w" style="color:red">a &lt; b</div>"#
        );
    }

    #[test]
    fn test_render_recurses_through_containers() {
        let factory = factory();
        let versions = VersionMap::new();
        let renderer = Renderer::new(&factory, &versions, RenderMode::Runtime);

        let mut root = WidgetInstance::with_id("column", "root");
        let mut child = WidgetInstance::with_id("caption", "c1");
        child.set_property("text", serde_json::json!("hello"));
        root.push_child(child);

        let html = renderer.render(&root).to_html();
        assert_eq!(
            html,
            r#"<div data-key="root-0" data-selected="false"><p data-key="c1-0">hello</p></div>"#
        );
    }

    #[test]
    fn test_missing_builder_is_local() {
        let factory = factory();
        let versions = VersionMap::new();
        let renderer = Renderer::new(&factory, &versions, RenderMode::Edit);

        let mut root = WidgetInstance::with_id("column", "root");
        root.push_child(WidgetInstance::with_id("caption", "c1"));
        root.push_child(WidgetInstance::with_id("column", "c2"));

        let rendered = renderer.render(&root);
        let placeholder = rendered
            .find_by_attr("data-placeholder", "unknown-widget")
            .unwrap();
        assert_eq!(placeholder.key.as_deref(), Some("c1-0"));
        assert!(rendered.text_content().contains("Unknown widget type: caption"));
        assert_eq!(rendered.as_element().unwrap().children.len(), 2);
    }

    #[test]
    fn test_mount_key_follows_version() {
        let factory = factory();
        let mut versions = VersionMap::new();
        let node = WidgetInstance::with_id("caption", "n");
        versions.bump("n");
        versions.bump("n");
        let renderer = Renderer::new(&factory, &versions, RenderMode::Runtime);
        assert_eq!(renderer.mount_key(&node), "n-2");
    }

    #[test]
    fn test_selection_only_in_edit_mode() {
        let factory = factory();
        let versions = VersionMap::new();
        let node = WidgetInstance::with_id("column", "sel");

        let edit = Renderer::new(&factory, &versions, RenderMode::Edit).with_selected(Some("sel"));
        let runtime = Renderer::new(&factory, &versions, RenderMode::Runtime).with_selected(Some("sel"));

        assert!(edit.render(&node).find_by_attr("data-selected", "true").is_some());
        assert!(runtime.render(&node).find_by_attr("data-selected", "true").is_none());
    }
}
