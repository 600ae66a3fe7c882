use thiserror::Error;

use crate::executor::EngineError;

#[derive(Debug, Error)]
pub enum QueryBuilderError {
    #[error("Missing required parameter: {0} (bind it at execute time or as a builder default)")]
    MissingParameter(String),

    #[error("Unsupported parameter value: {0}")]
    UnsupportedParameter(String),

    #[error("Invalid sort direction '{0}' (expected ASC or DESC)")]
    InvalidSortDirection(String),

    #[error("No executor attached to this query builder (create it with QueryBuilder::new)")]
    NoExecutor,

    /// Failure reported by the engine, passed through as-is.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl QueryBuilderError {
    /// The engine error, if this failure came from the executor.
    pub fn as_engine_error(&self) -> Option<&EngineError> {
        match self {
            QueryBuilderError::Engine(err) => Some(err),
            _ => None,
        }
    }
}
