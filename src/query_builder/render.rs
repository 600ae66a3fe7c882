//! Serialization of a scope chain into query text.
//!
//! Rendering is a pure fold over `START` entries and the scope chain. For
//! every scope, non-empty groups are emitted in this order:
//!
//! ```text
//! MATCH .. WHERE .. DELETE .. (WITH|RETURN) .. ORDER BY .. SKIP .. LIMIT ..
//! ```
//!
//! `START` is emitted once, before the first scope. A scope followed by
//! another projects through `WITH` (`WITH *` if it has no projection); the
//! last scope projects through `RETURN`, or not at all if it has none.
//! `ORDER BY`/`SKIP`/`LIMIT` page the projection they follow.
//!
//! The count form is read-only: no scope emits `DELETE`. The last scope's
//! projection becomes a `WITH` so `DISTINCT` and aggregates shape the rows
//! being counted, and its paging is dropped.

use super::scope::{Scope, StartEntry};

/// Which projection the last scope gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryForm<'a> {
    /// The caller's own `RETURN` and paging.
    Rows,
    /// `[WITH <projection>] RETURN count(*) AS <alias>`, without `DELETE`
    /// and without the last scope's paging.
    Count(&'a str),
}

pub fn render_query(start: &[StartEntry], root: &Scope, form: QueryForm<'_>) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !start.is_empty() {
        let bindings: Vec<String> = start
            .iter()
            .map(|entry| format!("{}={}", entry.binding, entry.expression))
            .collect();
        parts.push(format!("START {}", bindings.join(", ")));
    }

    for scope in root.chain() {
        let is_last = scope.child.is_none();

        if !scope.match_entries.is_empty() {
            parts.push(format!("MATCH {}", scope.match_entries.join(", ")));
        }
        if !scope.where_entries.is_empty() {
            parts.push(format!("WHERE {}", scope.where_entries.join(" AND ")));
        }
        if !scope.delete_entries.is_empty() && form == QueryForm::Rows {
            parts.push(format!("DELETE {}", scope.delete_entries.join(", ")));
        }

        if !is_last {
            parts.push(format!("WITH {}", scope.projection().unwrap_or("*")));
        } else {
            match form {
                QueryForm::Rows => {
                    if let Some(projection) = scope.projection() {
                        parts.push(format!("RETURN {}", projection));
                    }
                }
                QueryForm::Count(alias) => {
                    if let Some(projection) = scope.projection() {
                        parts.push(format!("WITH {}", projection));
                    }
                    parts.push(format!("RETURN count(*) AS {}", alias));
                    continue;
                }
            }
        }

        push_paging(&mut parts, scope);
    }

    parts.join(" ")
}

fn push_paging(parts: &mut Vec<String>, scope: &Scope) {
    if let Some(order_by) = &scope.order_by {
        parts.push(format!("ORDER BY {} {}", order_by.field, order_by.direction));
    }
    if let Some(skip) = scope.skip {
        parts.push(format!("SKIP {}", skip));
    }
    if let Some(limit) = scope.limit {
        parts.push(format!("LIMIT {}", limit));
    }
}
