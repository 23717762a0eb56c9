use thiserror::Error;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum ActionSchemaError {
    #[error("not a JSON object")]
    NotAnObject,
    #[error("missing or invalid 'type' field")]
    MissingType,
    #[error("unknown action type '{0}'")]
    UnknownType(String),
    #[error("field '{field}': {reason}")]
    Field { field: String, reason: String },
    #[error("unknown field '{0}' for this action type")]
    UnknownField(String),
}

impl From<ActionSchemaError> for auspex_core_types::ActionValidationError {
    fn from(value: ActionSchemaError) -> Self {
        auspex_core_types::ActionValidationError(value.to_string())
    }
}
