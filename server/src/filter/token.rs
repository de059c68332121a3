//! Filter tokenizer
//!
//! Splits raw filter text into an ordered token stream. Quoted runs and
//! bracketed lists are captured whole, and every maximal run of operator
//! characters becomes a single operator symbol (`==`, `!_-=`, `&&`).

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use super::error::TokenizeError;

/// Characters that make up operator symbols outside quotes
const OPERATOR_CHARS: &[char] = &['=', '<', '>', '!', '&', '|', '_', '@', '^', '~', '$', '#'];

type Cursor<'a> = Peekable<CharIndices<'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Bareword: column name, bare number, `true`/`false`, anything unquoted
    Identifier(String),
    /// Quoted run with the quotes stripped
    Quoted(String),
    Operator(String),
    LeftParen,
    RightParen,
    /// Raw text between `[` and `]`
    ListLiteral(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(text) => write!(f, "{}", text),
            Token::Quoted(text) => write!(f, "\"{}\"", text),
            Token::Operator(symbol) => write!(f, "{}", symbol),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::ListLiteral(raw) => write!(f, "[{}]", raw),
        }
    }
}

/// A token together with the byte offset where it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    pub token: Token,
    pub offset: usize,
}

impl SpannedToken {
    fn new(token: Token, offset: usize) -> Self {
        Self { token, offset }
    }
}

pub fn is_operator_char(c: char) -> bool {
    OPERATOR_CHARS.contains(&c)
}

/// Tokenize filter text
pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let token = match c {
            '"' | '\'' => {
                chars.next();
                Token::Quoted(read_quoted(input, &mut chars, c, offset)?)
            }
            '(' => {
                chars.next();
                Token::LeftParen
            }
            ')' => {
                chars.next();
                Token::RightParen
            }
            '[' => {
                chars.next();
                Token::ListLiteral(read_list(input, &mut chars, offset)?)
            }
            ']' => return Err(TokenizeError::UnexpectedCharacter { ch: c, offset }),
            c if is_operator_char(c) => Token::Operator(read_operator(&mut chars)),
            _ => Token::Identifier(read_bareword(&mut chars)),
        };
        tokens.push(SpannedToken::new(token, offset));
    }

    Ok(tokens)
}

/// Read up to the closing quote; the opening quote is already consumed
fn read_quoted(
    input: &str,
    chars: &mut Cursor<'_>,
    quote: char,
    offset: usize,
) -> Result<String, TokenizeError> {
    let start = offset + quote.len_utf8();
    for (i, c) in chars.by_ref() {
        if c == quote {
            return Ok(input[start..i].to_string());
        }
    }
    Err(TokenizeError::UnterminatedString { offset })
}

/// Read up to the closing `]`, skipping over quoted runs
fn read_list(input: &str, chars: &mut Cursor<'_>, offset: usize) -> Result<String, TokenizeError> {
    let start = offset + 1;
    while let Some((i, c)) = chars.next() {
        match c {
            ']' => return Ok(input[start..i].to_string()),
            '"' | '\'' => {
                read_quoted(input, chars, c, i)?;
            }
            _ => {}
        }
    }
    Err(TokenizeError::UnterminatedList { offset })
}

fn read_operator(chars: &mut Cursor<'_>) -> String {
    let mut symbol = String::new();
    while let Some(&(_, c)) = chars.peek() {
        // `-` only appears inside symbols such as `_-=`
        let joins = is_operator_char(c) || (c == '-' && !symbol.is_empty() && next_is_operator(chars));
        if !joins {
            break;
        }
        symbol.push(c);
        chars.next();
    }
    symbol
}

fn read_bareword(chars: &mut Cursor<'_>) -> String {
    let mut word = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '"' | '\'') {
            break;
        }
        // snake_case and trailing underscores stay in the word; `Name_=x` still splits
        let inner_underscore = c == '_'
            && word.chars().last().is_some_and(char::is_alphanumeric)
            && next_continues_word(chars);
        if is_operator_char(c) && !inner_underscore {
            break;
        }
        word.push(c);
        chars.next();
    }
    word
}

fn next_is_operator(chars: &Cursor<'_>) -> bool {
    let mut ahead = chars.clone();
    ahead.next();
    ahead.peek().is_some_and(|&(_, c)| is_operator_char(c))
}

/// True when the character after the current one is alphanumeric or ends the word
fn next_continues_word(chars: &Cursor<'_>) -> bool {
    let mut ahead = chars.clone();
    ahead.next();
    match ahead.peek() {
        None => true,
        Some(&(_, c)) => {
            c.is_alphanumeric() || c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']')
        }
    }
}
