use crate::render::{BuildContext, RenderNode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Which of a widget's two builders to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Read-only dashboard rendering
    #[default]
    Runtime,
    /// Designer rendering with selection and drop affordances
    Edit,
}

impl RenderMode {
    pub fn is_edit(self) -> bool {
        self == RenderMode::Edit
    }
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderMode::Runtime => f.write_str("runtime"),
            RenderMode::Edit => f.write_str("edit"),
        }
    }
}

pub type BuilderFn = fn(&BuildContext<'_>) -> RenderNode;

/// Builder table keyed by `(type, mode)`. Each mode is an independent slot.
#[derive(Debug, Clone, Default)]
pub struct WidgetFactory {
    builders: HashMap<(String, RenderMode), BuilderFn>,
    order: Vec<(String, RenderMode)>,
}

impl WidgetFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, widget_type: impl Into<String>, mode: RenderMode, builder: BuilderFn) {
        let key = (widget_type.into(), mode);
        debug!(widget = %key.0, %mode, "registered builder");
        if self.builders.insert(key.clone(), builder).is_none() {
            self.order.push(key);
        }
    }

    pub fn builder(&self, widget_type: &str, mode: RenderMode) -> Option<BuilderFn> {
        self.builders.get(&(widget_type.to_string(), mode)).copied()
    }

    pub fn has(&self, widget_type: &str, mode: RenderMode) -> bool {
        self.builder(widget_type, mode).is_some()
    }

    /// Types with a builder for `mode`, in registration order
    pub fn type_names(&self, mode: RenderMode) -> Vec<&str> {
        self.order
            .iter()
            .filter(|(_, m)| *m == mode)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
