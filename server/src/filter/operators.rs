//! Operator table
//!
//! Maps every filter symbol to its SQL keyword and a rendering rule. The
//! compiler only looks symbols up here, so a new operator is one new row.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use super::value::Literal;

use LikePattern::{Contains, Prefix};
use OperatorKind::{Combinator, Comparison, Phonetic, SetMembership};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Comparison,
    Combinator,
    SetMembership,
    Phonetic,
}

/// How a LIKE value is turned into a pattern before binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikePattern {
    /// `value%`
    Prefix,
    /// `%value%`
    Contains,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderRule {
    /// `col <kw> @p`
    Binary,
    /// `col <kw> @p COLLATE <collation>`
    Like(LikePattern),
    /// `SOUNDEX(col) <kw> SOUNDEX(@p)`
    Phonetic,
    /// `col <kw> (@p0, @p1, ...)`
    InList,
    /// Joins two predicates, takes no operand
    Combinator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorSpec {
    pub symbol: &'static str,
    pub sql_keyword: &'static str,
    pub kind: OperatorKind,
    pub rule: RenderRule,
}

const fn spec(
    symbol: &'static str,
    sql_keyword: &'static str,
    kind: OperatorKind,
    rule: RenderRule,
) -> OperatorSpec {
    OperatorSpec {
        symbol,
        sql_keyword,
        kind,
        rule,
    }
}

pub static OPERATORS: &[OperatorSpec] = &[
    spec("==", "=", Comparison, RenderRule::Binary),
    spec("!=", "<>", Comparison, RenderRule::Binary),
    spec(">=", ">=", Comparison, RenderRule::Binary),
    spec("<=", "<=", Comparison, RenderRule::Binary),
    spec(">", ">", Comparison, RenderRule::Binary),
    spec("<", "<", Comparison, RenderRule::Binary),
    spec("_=", "LIKE", Comparison, RenderRule::Like(Prefix)),
    spec("!_=", "NOT LIKE", Comparison, RenderRule::Like(Prefix)),
    spec("_-=", "LIKE", Comparison, RenderRule::Like(Contains)),
    spec("!_-=", "NOT LIKE", Comparison, RenderRule::Like(Contains)),
    spec("@=", "LIKE", Comparison, RenderRule::Like(Contains)),
    spec("!@=", "NOT LIKE", Comparison, RenderRule::Like(Contains)),
    spec("~~", "=", Phonetic, RenderRule::Phonetic),
    spec("!~~", "<>", Phonetic, RenderRule::Phonetic),
    spec("^$", "IN", SetMembership, RenderRule::InList),
    spec("!^$", "NOT IN", SetMembership, RenderRule::InList),
    spec("^^", "IN", SetMembership, RenderRule::InList),
    spec("!^^", "NOT IN", SetMembership, RenderRule::InList),
    spec("&&", "AND", Combinator, RenderRule::Combinator),
    spec("||", "OR", Combinator, RenderRule::Combinator),
];

static BY_SYMBOL: LazyLock<FxHashMap<&'static str, &'static OperatorSpec>> =
    LazyLock::new(|| OPERATORS.iter().map(|op| (op.symbol, op)).collect());

/// Look up an operator by its filter symbol
pub fn lookup(symbol: &str) -> Option<&'static OperatorSpec> {
    BY_SYMBOL.get(symbol).copied()
}

impl OperatorSpec {
    pub fn is_combinator(&self) -> bool {
        self.kind == OperatorKind::Combinator
    }

    pub fn takes_list(&self) -> bool {
        self.kind == OperatorKind::SetMembership
    }

    /// Shape a value before it is bound (LIKE patterns gain `%` wildcards)
    pub fn prepare_value(&self, value: Literal) -> Literal {
        match self.rule {
            RenderRule::Like(Prefix) => Literal::Str(format!("{}%", value.as_text())),
            RenderRule::Like(Contains) => Literal::Str(format!("%{}%", value.as_text())),
            _ => value,
        }
    }

    /// Render the SQL comparison for `column` against already-bound placeholders
    pub fn render(&self, column: &str, placeholders: &[String], collation: &str) -> String {
        let kw = self.sql_keyword;
        let first = placeholders.first().map(String::as_str).unwrap_or_default();
        match self.rule {
            RenderRule::Binary => format!("{} {} {}", column, kw, first),
            RenderRule::Like(_) => format!("{} {} {} COLLATE {}", column, kw, first, collation),
            RenderRule::Phonetic => format!("SOUNDEX({}) {} SOUNDEX({})", column, kw, first),
            RenderRule::InList => format!("{} {} ({})", column, kw, placeholders.join(", ")),
            RenderRule::Combinator => kw.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("@p{}", i)).collect()
    }

    #[test]
    fn test_symbols_are_unique() {
        assert_eq!(BY_SYMBOL.len(), OPERATORS.len());
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup("=~").is_none());
        assert!(lookup("#==").is_none());
        assert!(lookup("=").is_none());
    }

    #[test]
    fn test_binary_rendering() {
        let cases = [
            ("==", "Age = @p0"),
            ("!=", "Age <> @p0"),
            (">=", "Age >= @p0"),
            ("<=", "Age <= @p0"),
            (">", "Age > @p0"),
            ("<", "Age < @p0"),
        ];
        for (symbol, expected) in cases {
            let op = lookup(symbol).unwrap();
            assert_eq!(op.render("Age", &params(1), "NOCASE"), expected);
        }
    }

    #[test]
    fn test_like_rendering_appends_collation() {
        let op = lookup("!@=").unwrap();
        assert_eq!(
            op.render("Email", &params(1), "SQL_Latin1_General_CP1_CI_AI"),
            "Email NOT LIKE @p0 COLLATE SQL_Latin1_General_CP1_CI_AI"
        );
    }

    #[test]
    fn test_phonetic_rendering() {
        assert_eq!(
            lookup("~~").unwrap().render("Username", &params(1), "NOCASE"),
            "SOUNDEX(Username) = SOUNDEX(@p0)"
        );
        assert_eq!(
            lookup("!~~").unwrap().render("Username", &params(1), "NOCASE"),
            "SOUNDEX(Username) <> SOUNDEX(@p0)"
        );
    }

    #[test]
    fn test_in_list_rendering() {
        assert_eq!(
            lookup("!^$").unwrap().render("Status", &params(3), "NOCASE"),
            "Status NOT IN (@p0, @p1, @p2)"
        );
    }

    #[test]
    fn test_prepare_value_patterns() {
        let starts = lookup("_=").unwrap();
        assert_eq!(
            starts.prepare_value(Literal::Str("Bo".to_string())),
            Literal::Str("Bo%".to_string())
        );

        let contains = lookup("_-=").unwrap();
        assert_eq!(
            contains.prepare_value(Literal::Int(42)),
            Literal::Str("%42%".to_string())
        );

        let eq = lookup("==").unwrap();
        assert_eq!(eq.prepare_value(Literal::Bool(true)), Literal::Bool(true));
    }

    #[test]
    fn test_kinds() {
        assert!(lookup("&&").unwrap().is_combinator());
        assert!(lookup("||").unwrap().is_combinator());
        assert!(lookup("^^").unwrap().takes_list());
        assert!(!lookup("==").unwrap().takes_list());
        assert_eq!(lookup("~~").unwrap().kind, OperatorKind::Phonetic);
    }
}
