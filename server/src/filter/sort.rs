//! Sort order parsing
//!
//! Accepts `Column [asc|desc]` terms separated by commas, e.g.
//! `Username desc, Email`, and renders them for an ORDER BY clause.

use serde::Serialize;

use super::error::SortError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortTerm {
    pub column: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SortOrder {
    terms: Vec<SortTerm>,
}

impl SortOrder {
    /// Parse a sort order, checking every column against `allowed`
    ///
    /// Blank input yields an empty order.
    pub fn parse(input: &str, allowed: &[&str]) -> Result<Self, SortError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }

        let terms = input
            .split(',')
            .map(|term| parse_term(term, allowed))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { terms })
    }

    pub fn terms(&self) -> &[SortTerm] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Body of the ORDER BY clause, `None` when there is nothing to sort by
    pub fn to_sql(&self) -> Option<String> {
        if self.terms.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .terms
            .iter()
            .map(|t| format!("{} {}", t.column, t.direction.as_sql()))
            .collect();
        Some(parts.join(", "))
    }
}

fn parse_term(term: &str, allowed: &[&str]) -> Result<SortTerm, SortError> {
    let invalid = || SortError::InvalidSortTerm {
        term: term.trim().to_string(),
    };

    let mut parts = term.split_whitespace();
    let column = parts.next().ok_or_else(invalid)?;
    let direction = match parts.next() {
        None => SortDirection::Asc,
        Some(d) if d.eq_ignore_ascii_case("asc") => SortDirection::Asc,
        Some(d) if d.eq_ignore_ascii_case("desc") => SortDirection::Desc,
        Some(_) => return Err(invalid()),
    };
    if parts.next().is_some() {
        return Err(invalid());
    }

    if !allowed.contains(&column) {
        return Err(SortError::ColumnNotAllowed {
            column: column.to_string(),
        });
    }

    Ok(SortTerm {
        column: column.to_string(),
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::columns::USER_SORTABLE;

    #[test]
    fn test_parse_multiple_terms() {
        let order = SortOrder::parse("Username desc, Email", USER_SORTABLE).unwrap();
        assert_eq!(
            order.terms(),
            &[
                SortTerm {
                    column: "Username".to_string(),
                    direction: SortDirection::Desc,
                },
                SortTerm {
                    column: "Email".to_string(),
                    direction: SortDirection::Asc,
                },
            ]
        );
        assert_eq!(order.to_sql().unwrap(), "Username DESC, Email ASC");
    }

    #[test]
    fn test_direction_is_case_insensitive() {
        let order = SortOrder::parse("LastLoginAt DESC", USER_SORTABLE).unwrap();
        assert_eq!(order.terms()[0].direction, SortDirection::Desc);
    }

    #[test]
    fn test_blank_is_empty() {
        let order = SortOrder::parse("  ", USER_SORTABLE).unwrap();
        assert!(order.is_empty());
        assert!(order.to_sql().is_none());
    }

    #[test]
    fn test_invalid_terms() {
        for input in ["Username sideways", "Username desc extra", "Username,", ",Email"] {
            assert!(
                matches!(
                    SortOrder::parse(input, USER_SORTABLE),
                    Err(SortError::InvalidSortTerm { .. })
                ),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_column_not_allowed() {
        assert_eq!(
            SortOrder::parse("PasswordHash", USER_SORTABLE),
            Err(SortError::ColumnNotAllowed {
                column: "PasswordHash".to_string()
            })
        );
    }
}
