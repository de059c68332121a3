//! Column whitelists
//!
//! The compiler copies column names into SQL untouched, so every compiled
//! filter must pass [`validate_columns`] before it reaches the database.

use super::compiler::CompiledFilter;
use super::error::FilterError;

pub const USER_FILTERABLE: &[&str] = &["Id", "Username", "Email", "LastLoginAt", "Active"];

pub const USER_SORTABLE: &[&str] = &["Username", "Email", "LastLoginAt", "Active"];

/// Reject the filter if it references a column outside `allowed`
pub fn validate_columns(filter: &CompiledFilter, allowed: &[&str]) -> Result<(), FilterError> {
    match filter
        .columns()
        .iter()
        .find(|column| !allowed.contains(&column.as_str()))
    {
        Some(column) => Err(FilterError::ColumnNotAllowed {
            column: column.clone(),
        }),
        None => Ok(()),
    }
}
