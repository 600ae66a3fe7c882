//! Cypher query builder
//!
//! This crate renders Cypher query text from fluent clause calls:
//! - `START`/`MATCH`/`WHERE`/`DELETE`/`RETURN` accumulation with paging
//! - `WITH`-chained scopes, each with its own clause state
//! - `{name}` parameter validation and optional literal inlining
//! - Lucene escaping for index start expressions
//!
//! Running a query is delegated to a [`QueryExecutor`] supplied by the caller.

pub mod config;
pub mod executor;
pub mod query_builder;
pub mod utils;

pub use config::{BuilderConfig, ConfigError};
pub use executor::{EngineError, Parameters, QueryExecutor, Row};
pub use query_builder::{
    OrderBy, Page, QueryBuilder, QueryBuilderError, Scope, SortDirection, StartEntry,
};
