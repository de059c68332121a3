//! Filter expression compiler
//!
//! Compiles the text filter language accepted by list endpoints into a
//! parameterized SQL predicate. Values never enter the SQL text; each one is
//! bound to an `@pN` parameter.
//!
//! ## Usage
//!
//! ```
//! use usermanagement_server::filter::{Literal, columns, compile, validate_columns};
//!
//! let filter = compile(r#"Username == "bob" && Active == true"#).unwrap();
//! validate_columns(&filter, columns::USER_FILTERABLE).unwrap();
//!
//! assert_eq!(filter.sql(), "Username = @p0 AND Active = @p1");
//! assert_eq!(filter.parameters()[1].value, Literal::Bool(true));
//! ```

pub mod columns;
mod compiler;
mod error;
pub mod operators;
mod sort;
mod token;
mod value;

pub use columns::validate_columns;
pub use compiler::{
    CompiledFilter, CompilerOptions, FilterCompiler, MATCH_ALL, Parameter, compile,
};
pub use error::{FilterError, ParseError, SortError, TokenizeError};
pub use sort::{SortDirection, SortOrder, SortTerm};
pub use token::{SpannedToken, Token, tokenize};
pub use value::{Literal, parse_list, parse_value};
