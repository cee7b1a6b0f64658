//! # Portal Widgets
//!
//! Widget type registry, builder dispatch and property inspector for the
//! portal dashboard editor.
//!
//! ## Features
//! - Declared widget types with typed, grouped properties and defaults
//! - JSON round-trip of widget trees (`type`, `id`, `children`, `cell`, properties)
//! - Per-mode (runtime / edit) builders rendering to an HTML element tree
//! - Property inspector built from the declared properties of the selected node
//! - Tree editing with render invalidation and a selection message bus
//!
//! ## Example
//! ```ignore
//! use portal_widgets::{EditorContext, RenderMode, Renderer, VersionMap};
//!
//! let context = EditorContext::bootstrap();
//! let root = context.types.parse_str(r#"{ "type": "list", "children": [ { "type": "text" } ] }"#)?;
//!
//! let versions = VersionMap::new();
//! let html = context.renderer(&versions, RenderMode::Runtime).render(&root).to_html();
//! ```
//!
//! ## Editing session
//! ```ignore
//! use portal_widgets::{EditorContext, EditorSession};
//!
//! let context = EditorContext::bootstrap();
//! let mut session = EditorSession::new(&context, context.types.create("grid")?);
//! let root_id = session.root().id().to_string();
//! let id = session.insert_new("text", &root_id, None)?;
//! session.select(Some(&id))?;
//! session.edit_property(&id, "text", serde_json::json!("Revenue"))?;
//! ```

pub mod bus;
pub mod config;
pub mod context;
pub mod editors;
pub mod error;
pub mod factory;
pub mod instance;
pub mod metadata;
pub mod panel;
pub mod registry;
pub mod render;
pub mod session;
pub mod tree;
pub mod versions;
pub mod widgets;

// --- Core types ---
pub use context::EditorContext;
pub use error::{WidgetError, WidgetResult};
pub use instance::{GridCell, WidgetInstance};
pub use metadata::{accept_any, AcceptChildFn, PropertyDescriptor, PropertyType, WidgetTypeDescriptor};
pub use registry::{PaletteGroup, TypeRegistry};

// --- Rendering ---
pub use factory::{BuilderFn, RenderMode, WidgetFactory};
pub use render::{html_document, BuildContext, Element, RenderNode, Renderer};
pub use versions::VersionMap;

// --- Editing ---
pub use bus::{Message, MessageBus, Subscription, SELECTION_TOPIC};
pub use config::PortalConfig;
pub use editors::{ControlKind, EditorControl, EditorFn, EditorInput, PropertyEditorRegistry};
pub use panel::{PanelEntry, PanelView, PropertyPanel};
pub use session::EditorSession;
pub use widgets::Widget;

/// Parse a widget tree against the built-in widget types
pub fn parse_dashboard(json: &str) -> WidgetResult<WidgetInstance> {
    EditorContext::bootstrap().types.parse_str(json)
}
