//! Fluent Cypher query builder.
//!
//! A [`QueryBuilder`] owns the `START` bindings, the root [`Scope`] (and
//! through it the whole `WITH` chain), builder-level default parameters and
//! an optional handle to a [`QueryExecutor`]. Clause methods live on
//! [`Scope`]; the builder dereferences to its root scope so they can be
//! called on it directly.
//!
//! ```
//! use cypher_builder::{QueryBuilder, SortDirection};
//!
//! let mut query = QueryBuilder::detached();
//! query.start_at([("lisa", "node:SIMPSONS({search})")]);
//! query
//!     .match_("(lisa)-[:CHILD_OF]->(parent)")
//!     .returns("parent")
//!     .order_by("parent.name", SortDirection::Asc);
//!
//! assert_eq!(
//!     query.build_query(),
//!     "START lisa=node:SIMPSONS({search}) MATCH (lisa)-[:CHILD_OF]->(parent) RETURN parent ORDER BY parent.name ASC"
//! );
//! ```
//!
//! A builder is meant for one logical query and one caller at a time;
//! build separate builders for concurrent queries. They may share one
//! executor.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::BuilderConfig;
use crate::executor::{Parameters, QueryExecutor, Row};
use crate::utils::lucene;

pub mod errors;
pub mod parameters;
mod render;
pub mod scope;

use render::QueryForm;

pub use errors::QueryBuilderError;
pub use scope::{OrderBy, Scope, ScopeChain, SortDirection, StartEntry};

/// One page of results together with the unpaged total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub rows: Vec<Row>,
    pub total: u64,
}

#[derive(Clone, Default)]
pub struct QueryBuilder {
    start_entries: Vec<StartEntry>,
    root: Scope,
    defaults: Parameters,
    executor: Option<Arc<dyn QueryExecutor>>,
    config: BuilderConfig,
}

impl QueryBuilder {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            executor: Some(executor),
            ..Self::default()
        }
    }

    /// A builder with no executor: it can render queries but not run them.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Add `START` bindings. A binding that already exists keeps its
    /// position and takes the new expression.
    pub fn start_at<I, K, V>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (binding, expression) in entries {
            let binding = binding.into();
            let expression = expression.into();
            match self
                .start_entries
                .iter_mut()
                .find(|entry| entry.binding == binding)
            {
                Some(entry) => entry.expression = expression,
                None => self.start_entries.push(StartEntry {
                    binding,
                    expression,
                }),
            }
        }
        self
    }

    pub fn start_entries(&self) -> &[StartEntry] {
        &self.start_entries
    }

    /// Set a default parameter used by every execution of this builder.
    pub fn param(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.defaults.insert(name.into(), value.into());
        self
    }

    pub fn default_parameters(&self) -> &Parameters {
        &self.defaults
    }

    pub fn root(&self) -> &Scope {
        &self.root
    }

    /// Escape Lucene special tokens for use inside an index start expression.
    pub fn escape(text: &str) -> String {
        lucene::escape(text)
    }

    /// Render the accumulated clauses. Pure: the builder is left untouched.
    pub fn build_query(&self) -> String {
        render::render_query(&self.start_entries, &self.root, QueryForm::Rows)
    }

    /// Render the query that counts the rows [`build_query`](Self::build_query)
    /// would return before the last scope's paging. `DELETE` is left out.
    pub fn build_count_query(&self) -> String {
        render::render_query(
            &self.start_entries,
            &self.root,
            QueryForm::Count(&self.config.count_alias),
        )
    }

    /// Render with every placeholder replaced by a literal of its value.
    pub fn build_inline_query(&self, params: Parameters) -> Result<String, QueryBuilderError> {
        let params = parameters::merge(&self.defaults, params);
        parameters::substitute_parameters(&self.build_query(), &params)
    }

    /// Render, bind and run the query, returning every row.
    pub async fn execute(&self, params: Parameters) -> Result<Vec<Row>, QueryBuilderError> {
        let executor = self.executor()?;
        let query = self.build_query();
        let params = self.prepare(&query, params)?;

        executor
            .execute_query(&query, &params)
            .await
            .map_err(|e| {
                log::warn!("Query execution failed: {}", e);
                QueryBuilderError::Engine(e)
            })
    }

    /// Run the count form of the query and return the cardinality.
    pub async fn get_count(&self, params: Parameters) -> Result<u64, QueryBuilderError> {
        let executor = self.executor()?;
        let query = self.build_count_query();
        let params = self.prepare(&query, params)?;

        executor.count_query(&query, &params).await.map_err(|e| {
            log::warn!("Count query failed: {}", e);
            QueryBuilderError::Engine(e)
        })
    }

    /// Run the query and its count with the same parameters.
    pub async fn execute_paged(&self, params: Parameters) -> Result<Page, QueryBuilderError> {
        let rows = self.execute(params.clone()).await?;
        let total = self.get_count(params).await?;
        Ok(Page { rows, total })
    }

    fn executor(&self) -> Result<&Arc<dyn QueryExecutor>, QueryBuilderError> {
        self.executor.as_ref().ok_or(QueryBuilderError::NoExecutor)
    }

    fn prepare(&self, query: &str, params: Parameters) -> Result<Parameters, QueryBuilderError> {
        let params = parameters::merge(&self.defaults, params);
        if self.config.strict_parameters {
            parameters::ensure_bound(query, &params)?;
        }
        if self.config.log_queries {
            let mut names: Vec<&str> = params.keys().map(String::as_str).collect();
            names.sort_unstable();
            log::debug!("Executing Cypher: {} (parameters: {:?})", query, names);
        }
        Ok(params)
    }
}

impl Deref for QueryBuilder {
    type Target = Scope;

    fn deref(&self) -> &Scope {
        &self.root
    }
}

impl DerefMut for QueryBuilder {
    fn deref_mut(&mut self) -> &mut Scope {
        &mut self.root
    }
}

impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("start_entries", &self.start_entries)
            .field("root", &self.root)
            .field("defaults", &self.defaults)
            .field("has_executor", &self.executor.is_some())
            .field("config", &self.config)
            .finish()
    }
}
