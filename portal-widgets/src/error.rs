use thiserror::Error;

pub type WidgetResult<T> = Result<T, WidgetError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WidgetError {
    // --- declaration errors ---

    #[error("Widget declaration has no name; declare it with a non-empty type name before registering")]
    UndeclaredWidget,

    // --- lookup errors ---

    #[error("Unknown widget type: {name}")]
    UnknownWidgetType { name: String },

    #[error("Widget '{id}' not found in the tree")]
    NodeNotFound { id: String },

    // --- parse errors ---

    #[error("JSON data must have a 'type' field")]
    MissingType,

    #[error("Type mismatch: expected '{expected}', got '{found}'")]
    TypeMismatch { expected: String, found: String },

    #[error("Widget payload must be a JSON object, got {found}")]
    InvalidPayload { found: String },

    #[error("Invalid field '{field}' for widget '{widget}': {reason}")]
    InvalidField {
        widget: String,
        field: String,
        reason: String,
    },

    #[error("Duplicate id '{id}': widget ids must be unique within the tree")]
    DuplicateId { id: String },

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    // --- tree edit errors ---

    #[error("Cannot move widget '{id}': {reason}")]
    InvalidMove { id: String, reason: String },

    #[error("Widget '{id}' is the tree root and cannot be removed")]
    RootRemoval { id: String },

    #[error("Widget '{parent}' ({parent_type}) does not accept a '{child_type}' child")]
    DropRejected {
        parent: String,
        parent_type: String,
        child_type: String,
    },

    // --- configuration ---

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Service error: {0}")]
    Service(String),
}

impl From<serde_json::Error> for WidgetError {
    fn from(err: serde_json::Error) -> Self {
        WidgetError::InvalidJson(err.to_string())
    }
}

impl From<serde_yaml::Error> for WidgetError {
    fn from(err: serde_yaml::Error) -> Self {
        WidgetError::Config(err.to_string())
    }
}

impl From<portal_cube::ServiceError> for WidgetError {
    fn from(err: portal_cube::ServiceError) -> Self {
        WidgetError::Service(err.to_string())
    }
}
