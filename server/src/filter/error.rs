//! Filter compilation error types

use thiserror::Error;

/// Errors raised while splitting filter text into tokens
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("Unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("Unterminated list starting at offset {offset}")]
    UnterminatedList { offset: usize },

    #[error("Unexpected character '{ch}' at offset {offset}")]
    UnexpectedCharacter { ch: char, offset: usize },
}

/// Errors raised while compiling a token stream into SQL
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown operator '{symbol}' at offset {position}")]
    UnknownOperator { symbol: String, position: usize },

    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("Unbalanced parentheses at offset {position}")]
    UnbalancedParens { position: usize },

    #[error("Invalid list literal at offset {position}: {reason}")]
    InvalidListLiteral { position: usize, reason: String },

    #[error("Unexpected token '{token}' at offset {position}")]
    UnexpectedToken { token: String, position: usize },
}

/// Top-level error for everything a caller can get back from the filter module
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Filter is {len} bytes, maximum is {max}")]
    TooLong { len: usize, max: usize },

    #[error("Cannot filter by column: {column}")]
    ColumnNotAllowed { column: String },
}

/// Errors raised while parsing a sort order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    #[error("Invalid sort term: '{term}'")]
    InvalidSortTerm { term: String },

    #[error("Cannot sort by column: {column}")]
    ColumnNotAllowed { column: String },
}
