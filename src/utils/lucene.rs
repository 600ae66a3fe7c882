//! Lucene query-syntax escaping for index start expressions.
//!
//! Free text that ends up inside `node:INDEX("field:value")` is parsed by the
//! index as Lucene query syntax. [`escape`] makes such text literal.
//!
//! ## Escaped tokens
//! - single characters: `+ - ! ( ) { } [ ] ^ " ~ * ? : \`
//! - two-character operators: `&&`, `||` (a lone `&` or `|` is literal)
//! - the boolean keywords `AND`, `OR`, `NOT` as whole, upper-case words,
//!   together with one whitespace character directly following the keyword
//!
//! ## Examples
//! - `"AND OR"` → `"\AND\ \OR"`
//! - `"name: Lisa"` → `"name\: Lisa"`
//! - `"ANDROID"` → `"ANDROID"`

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Captures: (kw) boolean keyword, (sep) one whitespace character after it
static LUCENE_SPECIAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"&&|\|\||[+\-!(){}\[\]^"~*?:\\]|\b(?P<kw>AND|OR|NOT)\b(?P<sep>\s)?"#).unwrap()
});

/// Escape Lucene special tokens in `text`.
///
/// Not idempotent: escaping already escaped text escapes the backslashes
/// again. Escape each raw literal exactly once.
///
/// # Examples
/// ```
/// use cypher_builder::utils::lucene::escape;
///
/// assert_eq!(escape("AND OR"), "\\AND\\ \\OR");
/// assert_eq!(escape("Homer Simpson"), "Homer Simpson");
/// ```
pub fn escape(text: &str) -> String {
    LUCENE_SPECIAL
        .replace_all(text, |caps: &Captures| {
            match (caps.name("kw"), caps.name("sep")) {
                (Some(kw), Some(sep)) => format!("\\{}\\{}", kw.as_str(), sep.as_str()),
                (Some(kw), None) => format!("\\{}", kw.as_str()),
                _ => format!("\\{}", &caps[0]),
            }
        })
        .into_owned()
}
