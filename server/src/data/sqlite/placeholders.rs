//! Placeholder adaptation for compiled filters
//!
//! The filter compiler names its parameters `@p0`, `@p1`, ... which the SQLite
//! driver cannot bind. They are rewritten to numbered `?N` placeholders
//! (`@p0` becomes `?1`), so values are still bound positionally and never
//! spliced into the SQL text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static NAMED_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@p(\d+)").expect("Invalid regex"));

/// Rewrite `@pN` parameter names to SQLite `?{N+1}` placeholders
pub fn to_sqlite_placeholders(sql: &str) -> String {
    NAMED_PARAM
        .replace_all(sql, |caps: &Captures| match caps[1].parse::<usize>() {
            Ok(index) => format!("?{}", index + 1),
            Err(_) => caps[0].to_string(),
        })
        .into_owned()
}
