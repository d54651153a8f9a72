use nom::{
    character::complete::{char, digit0, digit1},
    combinator::{map_res, opt, recognize},
    error::context,
    sequence::pair,
};

use super::token::{ParserResult, Token};

/// Parses an unsigned integer or decimal literal (`12`, `3.5`, `7.`).
///
/// Signs are not part of the literal; a leading `-` is an operator token.
#[tracing::instrument(level = "debug", skip(input))]
pub fn parse_number(input: &str) -> ParserResult<Token> {
    context(
        "number literal",
        map_res(
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            |s: &str| s.parse::<f64>().map(Token::Number),
        ),
    )(input)
}
