//! # Whitespace Token Handling
//!
//! Whitespace (including line breaks) is kept as [`Token::Whitespace`] so that
//! every token span maps back onto the original input. The preprocessor drops
//! these tokens before parsing.

use nom::{bytes::complete::take_while1, combinator::map, error::context};

use super::token::{ParserResult, Token};

/// Parses a run of whitespace characters.
///
/// # Examples
///
/// ```
/// # use calcmesh_core::tokenizer::whitespace::parse_whitespace;
/// # use calcmesh_core::tokenizer::token::Token;
/// let (rest, token) = parse_whitespace(" \t1").unwrap();
/// assert_eq!(token, Token::Whitespace(" \t".to_string()));
/// assert_eq!(rest, "1");
/// ```
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_whitespace(input: &str) -> ParserResult<Token> {
    context(
        "whitespace expected",
        map(take_while1(char::is_whitespace), |ws: &str| {
            Token::Whitespace(ws.to_string())
        }),
    )(input)
}
