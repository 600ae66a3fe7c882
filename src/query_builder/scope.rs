//! One stage of a `WITH`-chained query.
//!
//! A [`Scope`] accumulates the clause fragments of a single query part. List
//! clauses (`MATCH`, `WHERE`, `DELETE`) append in call order; single-valued
//! clauses (projection, `ORDER BY`, `SKIP`/`LIMIT`) are last-wins cells.
//! [`Scope::with`] opens the next stage, owned by this one.

use std::fmt;
use std::str::FromStr;

use super::errors::QueryBuilderError;

/// Direction of an `ORDER BY` item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "ASC"),
            SortDirection::Desc => write!(f, "DESC"),
        }
    }
}

/// Case-sensitive: only `ASC` and `DESC` are accepted.
impl FromStr for SortDirection {
    type Err = QueryBuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            other => Err(QueryBuilderError::InvalidSortDirection(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

/// `START` binding: `binding=expression`, e.g. `lisa=node:SIMPSONS({search})`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartEntry {
    pub binding: String,
    pub expression: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub(crate) match_entries: Vec<String>,
    pub(crate) where_entries: Vec<String>,
    pub(crate) return_projection: Option<String>,
    pub(crate) order_by: Option<OrderBy>,
    pub(crate) skip: Option<u64>,
    pub(crate) limit: Option<u64>,
    pub(crate) delete_entries: Vec<String>,
    pub(crate) child: Option<Box<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pattern to this scope's `MATCH`. Patterns from repeated calls
    /// are comma-joined into a single `MATCH` clause.
    pub fn match_(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.match_entries.push(pattern.into());
        self
    }

    /// Add a predicate; multiple predicates are joined with `AND`.
    pub fn where_(&mut self, expr: impl Into<String>) -> &mut Self {
        self.where_entries.push(expr.into());
        self
    }

    /// Set the projection of this scope. Rendered as `WITH` when another
    /// scope follows, as `RETURN` on the last scope. Last call wins.
    pub fn returns(&mut self, expr: impl Into<String>) -> &mut Self {
        self.return_projection = Some(expr.into());
        self
    }

    /// Alias of [`Scope::returns`].
    pub fn return_(&mut self, expr: impl Into<String>) -> &mut Self {
        self.returns(expr)
    }

    pub fn order_by(&mut self, field: impl Into<String>, direction: SortDirection) -> &mut Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    /// Page this scope's projection: `SKIP skip LIMIT limit`.
    pub fn limit(&mut self, skip: u64, limit: u64) -> &mut Self {
        self.skip = Some(skip);
        self.limit = Some(limit);
        self
    }

    /// Add delete targets (`"r, marge"` is one entry and renders verbatim).
    pub fn delete(&mut self, expr: impl Into<String>) -> &mut Self {
        self.delete_entries.push(expr.into());
        self
    }

    /// Open (or reopen) the scope that follows this one.
    ///
    /// This scope's projection becomes the `WITH` between the two. Calling
    /// `with` again returns the same child instead of replacing it.
    pub fn with(&mut self) -> &mut Scope {
        self.child.get_or_insert_with(Box::default)
    }

    pub fn child(&self) -> Option<&Scope> {
        self.child.as_deref()
    }

    pub fn projection(&self) -> Option<&str> {
        self.return_projection.as_deref()
    }

    /// True when no clause has been recorded in this scope (children are
    /// not considered).
    pub fn is_empty(&self) -> bool {
        self.match_entries.is_empty()
            && self.where_entries.is_empty()
            && self.return_projection.is_none()
            && self.order_by.is_none()
            && self.skip.is_none()
            && self.limit.is_none()
            && self.delete_entries.is_empty()
    }

    /// This scope followed by every scope chained after it.
    pub fn chain(&self) -> ScopeChain<'_> {
        ScopeChain { next: Some(self) }
    }

    /// Number of scopes from this one to the end of the chain.
    pub fn depth(&self) -> usize {
        self.chain().count()
    }
}

/// Forward iterator over a scope chain.
pub struct ScopeChain<'a> {
    next: Option<&'a Scope>,
}

impl<'a> Iterator for ScopeChain<'a> {
    type Item = &'a Scope;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.child.as_deref();
        Some(current)
    }
}
