//! The three registries an editor works against, built in one place.

use crate::editors::{builtin_editors, PropertyEditorRegistry};
use crate::factory::{RenderMode, WidgetFactory};
use crate::panel::PropertyPanel;
use crate::registry::TypeRegistry;
use crate::render::Renderer;
use crate::versions::VersionMap;
use crate::widgets::{builtin_builders, builtin_descriptors};
use portal_cube::CubeDescriptor;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct EditorContext {
    pub types: TypeRegistry,
    pub factory: WidgetFactory,
    pub editors: PropertyEditorRegistry,
    /// Cubes offered by the cube configuration editor
    pub cubes: Vec<CubeDescriptor>,
}

impl EditorContext {
    /// Empty context with no widget types, builders or editors
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with every built-in widget type, builder and editor
    pub fn bootstrap() -> Self {
        Self::bootstrap_with_cubes(Vec::new())
    }

    pub fn bootstrap_with_cubes(cubes: Vec<CubeDescriptor>) -> Self {
        let mut context = Self {
            cubes,
            ..Self::default()
        };

        for descriptor in builtin_descriptors() {
            let name = descriptor.name().to_string();
            if let Err(e) = context.types.register(descriptor) {
                warn!(widget = %name, error = %e, "skipping widget declaration");
            }
        }
        for (widget_type, mode, builder) in builtin_builders() {
            context.factory.register(widget_type, mode, builder);
        }
        for (property_type, editor) in builtin_editors() {
            context.editors.register(&property_type, editor);
        }

        info!(
            widgets = context.types.type_names().len(),
            builders = context.factory.type_names(RenderMode::Runtime).len(),
            editors = context.editors.types().len(),
            cubes = context.cubes.len(),
            "editor context ready"
        );
        context
    }

    pub fn set_cubes(&mut self, cubes: Vec<CubeDescriptor>) {
        self.cubes = cubes;
    }

    pub fn renderer<'a>(&'a self, versions: &'a VersionMap, mode: RenderMode) -> Renderer<'a> {
        Renderer::new(&self.factory, versions, mode)
    }

    pub fn panel(&self) -> PropertyPanel<'_> {
        PropertyPanel::new(&self.types, &self.editors, &self.cubes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PropertyType;
    use crate::widgets::{cube, grid, list, search_panel, text};

    #[test]
    fn test_bootstrap_registers_builtins() {
        let context = EditorContext::bootstrap();

        assert_eq!(
            context.types.type_names(),
            vec![text::TEXT, list::LIST, grid::GRID, cube::CUBE, search_panel::SEARCH_PANEL]
        );
        for name in context.types.type_names() {
            assert!(context.factory.has(name, RenderMode::Runtime), "{name}");
            assert!(context.factory.has(name, RenderMode::Edit), "{name}");
        }
        assert!(context.editors.has(&PropertyType::GridTemplate));
        assert!(context.editors.has(&PropertyType::CubeWidgetConfiguration));
    }

    #[test]
    fn test_every_builtin_property_has_an_editor() {
        let context = EditorContext::bootstrap();
        for descriptor in context.types.descriptors() {
            for property in descriptor.properties() {
                assert!(
                    context.editors.has(property.property_type()),
                    "{}.{} ({})",
                    descriptor.name(),
                    property.name(),
                    property.property_type()
                );
            }
        }
    }

    #[test]
    fn test_empty_context() {
        let context = EditorContext::new();
        assert!(context.types.type_names().is_empty());
        assert!(context.factory.builder(text::TEXT, RenderMode::Runtime).is_none());
    }
}
