//! Boundary to the graph engine.
//!
//! The builder never talks to an engine directly. It renders query text and
//! hands it, together with the bound parameters, to a [`QueryExecutor`].
//! Connection handling, transactions and result streaming all live behind
//! this trait.

use std::collections::HashMap;
use std::error::Error as StdError;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Parameter values keyed by placeholder name (`{search}` -> `"search"`).
pub type Parameters = HashMap<String, Value>;

/// One result row, column name to value, in engine column order.
pub type Row = serde_json::Map<String, Value>;

/// Failure reported by the engine.
///
/// The builder wraps this in [`crate::QueryBuilderError::Engine`] without
/// touching it, so callers can still inspect the original message and source.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct EngineError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap a lower-level error (driver, I/O) keeping it as the source.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Capability the builder needs from a graph engine.
///
/// Implementations are expected to bind `params` natively (engine-side
/// `{name}` substitution). Each call is a single request/response; retries,
/// timeouts and cancellation are the implementation's business.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run `query` and return every row.
    async fn execute_query(&self, query: &str, params: &Parameters)
        -> Result<Vec<Row>, EngineError>;

    /// Run a query whose single row holds one scalar cardinality.
    async fn count_query(&self, query: &str, params: &Parameters) -> Result<u64, EngineError>;
}
