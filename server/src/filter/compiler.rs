//! Filter expression compiler
//!
//! Turns filter text into a parameterized SQL predicate in a single pass.
//! Comparisons (`column op value`) are rendered as soon as they are read and
//! every value is bound to its own `@pN` parameter. Each parenthesis depth
//! keeps one pending `&&`/`||`, emitted when its right operand starts.
//!
//! AND and OR share one precedence level and chains read left to right. SQL
//! binds AND tighter, so a switch between the two at one depth wraps what
//! came before in parentheses: `A || B && C` becomes `(A OR B) AND C`.

use serde::Serialize;

use crate::core::constants::{DEFAULT_FILTER_COLLATION, DEFAULT_FILTER_MAX_LENGTH};

use super::error::{FilterError, ParseError};
use super::operators::{self, OperatorSpec};
use super::token::{SpannedToken, Token, tokenize};
use super::value::{Literal, parse_list, parse_value};

/// Predicate returned for an empty filter
pub const MATCH_ALL: &str = "1 = 1";

/// Settings shared by every compilation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Collation appended to every LIKE / NOT LIKE comparison
    pub collation: String,
    /// Maximum filter length in bytes
    pub max_length: usize,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            collation: DEFAULT_FILTER_COLLATION.to_string(),
            max_length: DEFAULT_FILTER_MAX_LENGTH,
        }
    }
}

/// A bound value and the placeholder that refers to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub value: Literal,
}

/// Compiled predicate: SQL text with `@pN` placeholders plus their values
///
/// Column names appear verbatim in `sql`. Check [`CompiledFilter::columns`]
/// against an allow-list before running the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledFilter {
    sql: String,
    parameters: Vec<Parameter>,
    columns: Vec<String>,
}

impl CompiledFilter {
    pub fn match_all() -> Self {
        Self {
            sql: MATCH_ALL.to_string(),
            parameters: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Column names referenced by the filter, in source order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_match_all(&self) -> bool {
        self.parameters.is_empty() && self.sql == MATCH_ALL
    }
}

/// Stateless filter compiler; safe to share across threads
#[derive(Debug, Clone, Default)]
pub struct FilterCompiler {
    options: CompilerOptions,
}

impl FilterCompiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile filter text into a parameterized predicate
    pub fn compile(&self, input: &str) -> Result<CompiledFilter, FilterError> {
        tracing::debug!(filter = %input, "Compiling filter");

        if input.len() > self.options.max_length {
            return Err(FilterError::TooLong {
                len: input.len(),
                max: self.options.max_length,
            });
        }

        if input.trim().is_empty() {
            return Ok(CompiledFilter::match_all());
        }

        let tokens = tokenize(input)?;
        let compiled = Compilation::new(tokens, &self.options.collation).run()?;

        tracing::trace!(
            sql = %compiled.sql,
            params = compiled.parameters.len(),
            "Filter compiled"
        );
        Ok(compiled)
    }
}

/// Compile with default options
pub fn compile(input: &str) -> Result<CompiledFilter, FilterError> {
    FilterCompiler::default().compile(input)
}

/// Output state for one parenthesis depth
struct Group {
    /// Offset of the `(` that opened this group; `None` at top level
    open: Option<usize>,
    /// Byte offset in the output where this group's contents begin
    start: usize,
    /// Combinator read but not yet emitted
    pending: Option<&'static OperatorSpec>,
    /// Last combinator emitted at this depth
    applied: Option<&'static OperatorSpec>,
}

impl Group {
    fn new(open: Option<usize>, start: usize) -> Self {
        Self {
            open,
            start,
            pending: None,
            applied: None,
        }
    }
}

struct Compilation<'a> {
    tokens: std::vec::IntoIter<SpannedToken>,
    collation: &'a str,
    output: String,
    parameters: Vec<Parameter>,
    columns: Vec<String>,
    /// Never empty; the bottom entry is the top-level group
    groups: Vec<Group>,
    expect_operand: bool,
}

fn unexpected(token: &Token, position: usize) -> ParseError {
    ParseError::UnexpectedToken {
        token: token.to_string(),
        position,
    }
}

impl<'a> Compilation<'a> {
    fn new(tokens: Vec<SpannedToken>, collation: &'a str) -> Self {
        Self {
            tokens: tokens.into_iter(),
            collation,
            output: String::new(),
            parameters: Vec::new(),
            columns: Vec::new(),
            groups: vec![Group::new(None, 0)],
            expect_operand: true,
        }
    }

    fn current(&mut self) -> &mut Group {
        let last = self.groups.len() - 1;
        &mut self.groups[last]
    }

    fn run(mut self) -> Result<CompiledFilter, ParseError> {
        while let Some(SpannedToken { token, offset }) = self.tokens.next() {
            match token {
                Token::LeftParen => {
                    if !self.expect_operand {
                        return Err(unexpected(&token, offset));
                    }
                    self.flush_combinator();
                    self.output.push('(');
                    let start = self.output.len();
                    self.groups.push(Group::new(Some(offset), start));
                }
                Token::RightParen => self.close_paren(&token, offset)?,
                Token::Operator(symbol) => {
                    let op = lookup(&symbol, offset)?;
                    if !op.is_combinator() || self.expect_operand {
                        return Err(ParseError::UnexpectedToken {
                            token: symbol,
                            position: offset,
                        });
                    }
                    self.current().pending = Some(op);
                    self.expect_operand = true;
                }
                Token::Identifier(column) => {
                    if !self.expect_operand {
                        return Err(ParseError::UnexpectedToken {
                            token: column,
                            position: offset,
                        });
                    }
                    let comparison = self.comparison(column)?;
                    self.flush_combinator();
                    self.output.push_str(&comparison);
                    self.expect_operand = false;
                }
                Token::Quoted(_) | Token::ListLiteral(_) => return Err(unexpected(&token, offset)),
            }
        }

        if self.expect_operand {
            return Err(ParseError::UnexpectedEndOfInput);
        }
        if let Some(position) = self.groups.last().and_then(|group| group.open) {
            return Err(ParseError::UnbalancedParens { position });
        }
        Ok(CompiledFilter {
            sql: self.output,
            parameters: self.parameters,
            columns: self.columns,
        })
    }

    fn close_paren(&mut self, token: &Token, offset: usize) -> Result<(), ParseError> {
        if self.groups.len() < 2 {
            return Err(ParseError::UnbalancedParens { position: offset });
        }
        // `()` or a combinator right before `)`
        if self.expect_operand {
            return Err(unexpected(token, offset));
        }
        self.groups.pop();
        self.output.push(')');
        Ok(())
    }

    /// Emit the combinator waiting for this operand, if any
    ///
    /// `&&` and `||` share one precedence level. When the combinator differs
    /// from the previous one at the same depth, everything emitted so far at
    /// that depth is wrapped in parentheses so SQL cannot bind AND first.
    fn flush_combinator(&mut self) {
        let group = self.current();
        let Some(op) = group.pending.take() else {
            return;
        };
        let start = group.start;
        let regroup = group
            .applied
            .is_some_and(|prev| prev.symbol != op.symbol);
        group.applied = Some(op);

        if regroup {
            self.output.insert(start, '(');
            self.output.push(')');
        }
        self.output.push(' ');
        self.output.push_str(op.sql_keyword);
        self.output.push(' ');
    }

    /// Read `op value` after a column and render the comparison
    fn comparison(&mut self, column: String) -> Result<String, ParseError> {
        let SpannedToken { token, offset } = self.next_token()?;
        let op = match token {
            Token::Operator(symbol) => lookup(&symbol, offset)?,
            other => return Err(unexpected(&other, offset)),
        };
        if op.is_combinator() {
            return Err(ParseError::UnexpectedToken {
                token: op.symbol.to_string(),
                position: offset,
            });
        }

        let SpannedToken { token, offset } = self.next_token()?;
        let placeholders: Vec<String> = match (token, op.takes_list()) {
            (Token::ListLiteral(raw), true) => parse_list(&raw, offset)?
                .into_iter()
                .map(|value| self.bind(op.prepare_value(value)))
                .collect(),
            (Token::ListLiteral(_), false) => {
                return Err(ParseError::InvalidListLiteral {
                    position: offset,
                    reason: format!("operator '{}' does not take a list", op.symbol),
                });
            }
            (Token::Identifier(text), false) => {
                vec![self.bind(op.prepare_value(parse_value(&text, false)))]
            }
            (Token::Quoted(text), false) => {
                vec![self.bind(op.prepare_value(parse_value(&text, true)))]
            }
            (Token::LeftParen | Token::RightParen, _) => {
                return Err(ParseError::UnbalancedParens { position: offset });
            }
            (other, _) => return Err(unexpected(&other, offset)),
        };

        let sql = op.render(&column, &placeholders, self.collation);
        self.columns.push(column);
        Ok(sql)
    }

    fn next_token(&mut self) -> Result<SpannedToken, ParseError> {
        self.tokens.next().ok_or(ParseError::UnexpectedEndOfInput)
    }

    /// Bind a value to the next `@pN` name
    fn bind(&mut self, value: Literal) -> String {
        let name = format!("@p{}", self.parameters.len());
        self.parameters.push(Parameter {
            name: name.clone(),
            value,
        });
        name
    }
}

fn lookup(symbol: &str, position: usize) -> Result<&'static OperatorSpec, ParseError> {
    operators::lookup(symbol).ok_or_else(|| ParseError::UnknownOperator {
        symbol: symbol.to_string(),
        position,
    })
}
