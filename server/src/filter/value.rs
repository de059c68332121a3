//! Value literal parsing

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::error::ParseError;

/// ISO-8601 UTC timestamps accepted as string literals without quotes
const ISO_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A typed value bound to a query parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Str(String),
    Bool(bool),
    Int(i64),
    /// Unquoted text that is neither a boolean nor an integer
    Raw(String),
}

impl Literal {
    /// Text form used when a value is embedded in a LIKE pattern
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Literal::Str(s) | Literal::Raw(s) => Cow::Borrowed(s),
            Literal::Bool(b) => Cow::Owned(b.to_string()),
            Literal::Int(i) => Cow::Owned(i.to_string()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => write!(f, "\"{}\"", s),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::Raw(s) => write!(f, "{}", s),
        }
    }
}

/// Parse a value token. Quoted text is always a string.
pub fn parse_value(text: &str, quoted: bool) -> Literal {
    if quoted {
        Literal::Str(text.to_string())
    } else {
        parse_bareword(text)
    }
}

fn parse_bareword(text: &str) -> Literal {
    if text.eq_ignore_ascii_case("true") {
        return Literal::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Literal::Bool(false);
    }
    if let Ok(n) = text.parse::<i64>() {
        return Literal::Int(n);
    }
    if NaiveDateTime::parse_from_str(text, ISO_DATETIME_FORMAT).is_ok() {
        return Literal::Str(text.to_string());
    }
    Literal::Raw(text.to_string())
}

/// Parse the inside of a `[ ... ]` list into one literal per item
///
/// `position` is the offset of the list token, used for error reporting.
pub fn parse_list(raw: &str, position: usize) -> Result<Vec<Literal>, ParseError> {
    let invalid = |reason: &str| ParseError::InvalidListLiteral {
        position,
        reason: reason.to_string(),
    };

    if raw.trim().is_empty() {
        return Err(invalid("list is empty"));
    }

    let mut items = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in raw.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                current.push(c);
            }
            None => match c {
                '"' | '\'' => {
                    quote = Some(c);
                    current.push(c);
                }
                ',' => {
                    items.push(finish_item(&current, &invalid)?);
                    current.clear();
                }
                '[' | ']' => return Err(invalid("nested brackets are not allowed")),
                _ => current.push(c),
            },
        }
    }

    if quote.is_some() {
        return Err(invalid("unterminated string in list"));
    }
    items.push(finish_item(&current, &invalid)?);

    Ok(items)
}

fn finish_item(item: &str, invalid: &impl Fn(&str) -> ParseError) -> Result<Literal, ParseError> {
    parse_item(item).ok_or_else(|| {
        if item.trim().is_empty() {
            invalid("empty list item")
        } else {
            invalid(&format!("malformed list item '{}'", item.trim()))
        }
    })
}

/// Parse one comma-separated list item; `None` when it is malformed
fn parse_item(item: &str) -> Option<Literal> {
    let item = item.trim();
    if item.is_empty() {
        return None;
    }

    let first = item.chars().next()?;
    if first == '"' || first == '\'' {
        let inner = item.strip_prefix(first)?.strip_suffix(first)?;
        if inner.contains(first) {
            return None;
        }
        return Some(Literal::Str(inner.to_string()));
    }

    if item.contains(['"', '\'']) || item.contains(char::is_whitespace) {
        return None;
    }
    Some(parse_bareword(item))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_is_string() {
        assert_eq!(parse_value("true", true), Literal::Str("true".to_string()));
        assert_eq!(parse_value("18", true), Literal::Str("18".to_string()));
    }

    #[test]
    fn test_booleans_any_case() {
        assert_eq!(parse_value("true", false), Literal::Bool(true));
        assert_eq!(parse_value("FALSE", false), Literal::Bool(false));
        assert_eq!(parse_value("True", false), Literal::Bool(true));
    }

    #[test]
    fn test_integers() {
        assert_eq!(parse_value("18", false), Literal::Int(18));
        assert_eq!(parse_value("-7", false), Literal::Int(-7));
        assert_eq!(
            parse_value("99999999999999999999", false),
            Literal::Raw("99999999999999999999".to_string())
        );
        assert_eq!(parse_value("1.5", false), Literal::Raw("1.5".to_string()));
    }

    #[test]
    fn test_iso_datetime_is_string() {
        assert_eq!(
            parse_value("2024-01-01T00:00:00Z", false),
            Literal::Str("2024-01-01T00:00:00Z".to_string())
        );
        // not the accepted shape, kept as raw text
        assert_eq!(
            parse_value("2024-01-01", false),
            Literal::Raw("2024-01-01".to_string())
        );
    }

    #[test]
    fn test_raw_fallback() {
        assert_eq!(parse_value("OtherColumn", false), Literal::Raw("OtherColumn".to_string()));
    }

    #[test]
    fn test_as_text() {
        assert_eq!(Literal::Int(3).as_text(), "3");
        assert_eq!(Literal::Bool(false).as_text(), "false");
        assert_eq!(Literal::Str("a b".to_string()).as_text(), "a b");
    }

    #[test]
    fn test_parse_list_mixed() {
        let items = parse_list(r#" "A", 'B,C' , 3, true, x "#, 0).unwrap();
        assert_eq!(
            items,
            vec![
                Literal::Str("A".to_string()),
                Literal::Str("B,C".to_string()),
                Literal::Int(3),
                Literal::Bool(true),
                Literal::Raw("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_list_single_item() {
        assert_eq!(parse_list("\"A\"", 0).unwrap(), vec![Literal::Str("A".to_string())]);
    }

    #[test]
    fn test_parse_list_errors() {
        for raw in ["", "  ", "\"A\",", ",\"A\"", "\"A\" \"B\"", "\"A", "[1]", "a b"] {
            let err = parse_list(raw, 12).unwrap_err();
            assert!(
                matches!(err, ParseError::InvalidListLiteral { position: 12, .. }),
                "expected invalid list for {:?}, got {:?}",
                raw,
                err
            );
        }
    }

    #[test]
    fn test_literal_serializes_tagged() {
        let json = serde_json::to_value(Literal::Int(18)).unwrap();
        assert_eq!(json, serde_json::json!({"type": "int", "value": 18}));
    }
}
