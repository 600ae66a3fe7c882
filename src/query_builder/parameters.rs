/// Parameter placeholders in rendered Cypher
///
/// Queries reference parameters as `{name}` placeholders. Engines bind them
/// natively, so the builder normally passes them through untouched and only
/// checks that every placeholder has a value before dispatch.
/// [`substitute_parameters`] inlines values as Cypher literals for logging and
/// for engines that cannot bind parameters.
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::errors::QueryBuilderError;
use crate::executor::Parameters;

/// Regex to match a `{name}` placeholder, or a quoted string literal to skip
/// Captures: (1) parameter name, absent when a literal matched
///
/// Map literals such as `{name: 'Lisa'}` do not match: only the name (and
/// optional whitespace) may sit between the braces. Braces inside `'...'` or
/// `"..."` are literal text, so `node:IDX("name:{x}")` has no placeholder.
static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*"|\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}"#,
    )
    .unwrap()
});

/// Escape a string value for a single-quoted Cypher string literal
fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\") // Must be first!
        .replace('\'', "\\'")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Format a parameter value as a Cypher literal
fn format_literal(value: &Value) -> Result<String, QueryBuilderError> {
    match value {
        Value::String(s) => Ok(format!("'{}'", escape_string(s))),

        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Ok(u.to_string())
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() => Ok(f.to_string()),
                    _ => Err(QueryBuilderError::UnsupportedParameter(format!(
                        "Non-finite float: {}",
                        n
                    ))),
                }
            }
        }

        Value::Bool(b) => Ok(b.to_string()),

        Value::Null => Ok("null".to_string()),

        Value::Array(items) => {
            let items: Result<Vec<String>, _> = items.iter().map(format_literal).collect();
            Ok(format!("[{}]", items?.join(", ")))
        }

        Value::Object(map) => {
            let entries: Result<Vec<String>, QueryBuilderError> = map
                .iter()
                .map(|(key, value)| {
                    let key = if is_identifier(key) {
                        key.clone()
                    } else {
                        format!("`{}`", key.replace('`', "``"))
                    };
                    Ok(format!("{}: {}", key, format_literal(value)?))
                })
                .collect();
            Ok(format!("{{{}}}", entries?.join(", ")))
        }
    }
}

/// Names of all `{name}` placeholders in `query`, first occurrence order,
/// without duplicates.
pub fn placeholders(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PLACEHOLDER_PATTERN
        .captures_iter(query)
        .filter_map(|caps| caps.get(1).map(|name| name.as_str().to_string()))
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Fail with `MissingParameter` for the first placeholder without a value.
pub fn ensure_bound(query: &str, parameters: &Parameters) -> Result<(), QueryBuilderError> {
    match placeholders(query)
        .into_iter()
        .find(|name| !parameters.contains_key(name))
    {
        Some(missing) => Err(QueryBuilderError::MissingParameter(missing)),
        None => Ok(()),
    }
}

/// Overlay call-time parameters on builder defaults. Call-time values win.
pub fn merge(defaults: &Parameters, overrides: Parameters) -> Parameters {
    let mut merged = defaults.clone();
    merged.extend(overrides);
    merged
}

/// Replace every `{name}` placeholder with the literal form of its value.
///
/// # Errors
/// - `MissingParameter` if a placeholder has no value
/// - `UnsupportedParameter` if a value has no Cypher literal form
///
/// # Example
/// ```ignore
/// let mut params = HashMap::new();
/// params.insert("search".to_string(), json!("name: Lisa"));
///
/// let query = "START lisa=node:SIMPSONS({search}) RETURN lisa";
/// let result = substitute_parameters(query, &params).unwrap();
/// // Result: "START lisa=node:SIMPSONS('name: Lisa') RETURN lisa"
/// ```
pub fn substitute_parameters(
    query: &str,
    parameters: &Parameters,
) -> Result<String, QueryBuilderError> {
    let mut result = String::with_capacity(query.len() * 2);
    let mut last_end = 0;

    for caps in PLACEHOLDER_PATTERN.captures_iter(query) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = parameters
            .get(name.as_str())
            .ok_or_else(|| QueryBuilderError::MissingParameter(name.as_str().to_string()))?;

        result.push_str(&query[last_end..whole.start()]);
        result.push_str(&format_literal(value)?);
        last_end = whole.end();
    }
    result.push_str(&query[last_end..]);

    Ok(result)
}
