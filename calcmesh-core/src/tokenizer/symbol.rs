//! # Symbol Token Handling
//!
//! Operators and delimiters recognized in arithmetic expressions.
//!
//! * [`Operator`]: the four binary arithmetic operators
//! * [`Delimiter`]: grouping parentheses
//!
//! All symbols are single characters, so matching order does not matter here;
//! precedence is the analyzer's concern, not the tokenizer's.

use strum_macros::{AsRefStr, Display, EnumString};

use nom::{
    branch::alt,
    bytes::complete::tag,
    combinator::{map, value},
    error::context,
};

use super::token::{ParserResult, Token};

/// Arithmetic operator tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Operator {
    /// Addition operator (`+`)
    #[strum(serialize = "+")]
    Plus,
    /// Subtraction operator (`-`)
    #[strum(serialize = "-")]
    Minus,
    /// Multiplication operator (`*`)
    #[strum(serialize = "*")]
    Star,
    /// Division operator (`/`)
    #[strum(serialize = "/")]
    Slash,
}

/// Grouping delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr)]
pub enum Delimiter {
    /// Opening parenthesis (`(`)
    #[strum(serialize = "(")]
    OpenParen,
    /// Closing parenthesis (`)`)
    #[strum(serialize = ")")]
    CloseParen,
}

/// Parses an operator token from the input string.
///
/// # Examples
///
/// ```
/// # use calcmesh_core::tokenizer::symbol::{parse_operator, Operator};
/// # use calcmesh_core::tokenizer::token::Token;
/// let (rest, token) = parse_operator("* 2").unwrap();
/// assert_eq!(token, Token::Operator(Operator::Star));
/// assert_eq!(rest, " 2");
/// ```
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_operator(input: &str) -> ParserResult<Token> {
    context(
        "operator",
        map(
            alt((
                value(Operator::Plus, tag("+")),
                value(Operator::Minus, tag("-")),
                value(Operator::Star, tag("*")),
                value(Operator::Slash, tag("/")),
            )),
            Token::Operator,
        ),
    )(input)
}

/// Parses a delimiter token from the input string.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_delimiter(input: &str) -> ParserResult<Token> {
    context(
        "delimiter",
        map(
            alt((
                value(Delimiter::OpenParen, tag("(")),
                value(Delimiter::CloseParen, tag(")")),
            )),
            Token::Delimiter,
        ),
    )(input)
}
