use thiserror::Error;

use crate::tokenizer::token::TokenizerError;

/// Result of a grammar rule: the position after the consumed tokens and the
/// produced value.
pub type ParseResult<O> = Result<(usize, O), ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Empty expression")]
    EmptyExpression,
    #[error("Invalid character '{found}' at position {position}")]
    InvalidCharacter { found: char, position: usize },
    #[error("Unexpected token: {found} at position {position}")]
    UnexpectedToken { found: String, position: usize },
    #[error("Missing closing parenthesis for '(' at position {position}")]
    MissingClosingParenthesis { position: usize },
    #[error("Unexpected end of expression")]
    UnexpectedEnd,
}

impl From<TokenizerError> for ParseError {
    fn from(err: TokenizerError) -> Self {
        match err {
            TokenizerError::UnrecognizedCharacter { found, span } => ParseError::InvalidCharacter {
                found,
                position: span.start,
            },
        }
    }
}
