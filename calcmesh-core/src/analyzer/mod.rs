//! Syntactic analysis: tokens to [`AstNode`].
//!
//! [`parse`] runs the full pipeline (tokenizer, preprocessor, grammar) and
//! additionally requires the whole input to be consumed.

pub mod core;
pub mod expression;

pub use core::ParseError;
pub use core::ParseResult;

use crate::ast::AstNode;
use crate::preprocessor::{Preprocessor, TokenPreprocessor};
use crate::tokenizer::token::Tokenizer;

/// Parses an arithmetic expression into its AST.
#[tracing::instrument(level = "debug")]
pub fn parse(input: &str) -> Result<AstNode, ParseError> {
    let spans = Tokenizer::new().tokenize(input)?;
    let tokens = TokenPreprocessor::new().process(spans);
    if tokens.is_empty() {
        return Err(ParseError::EmptyExpression);
    }

    let (pos, ast) = expression::parse_expression(&tokens, 0)?;
    if let Some(extra) = tokens.get(pos) {
        return Err(expression::unexpected(extra));
    }
    Ok(ast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operator;

    #[test]
    fn test_parse_scenarios() {
        assert_eq!(
            parse("5 + 3").unwrap(),
            AstNode::operation(Operator::Add, AstNode::number(5.0), AstNode::number(3.0))
        );
        assert_eq!(parse("  2.5 ").unwrap(), AstNode::number(2.5));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), Err(ParseError::EmptyExpression));
        assert_eq!(parse("   \t "), Err(ParseError::EmptyExpression));
    }

    #[test]
    fn test_invalid_character() {
        assert_eq!(
            parse("2 ^ 3"),
            Err(ParseError::InvalidCharacter {
                found: '^',
                position: 2
            })
        );
    }

    #[test]
    fn test_trailing_tokens() {
        assert_eq!(
            parse("5 5"),
            Err(ParseError::UnexpectedToken {
                found: "5".to_string(),
                position: 2
            })
        );
        assert_eq!(
            parse("(1 + 2))"),
            Err(ParseError::UnexpectedToken {
                found: ")".to_string(),
                position: 7
            })
        );
    }

    #[test]
    fn test_unary_minus_is_not_supported() {
        assert!(matches!(
            parse("-3 + 1"),
            Err(ParseError::UnexpectedToken { ref found, .. }) if found == "-"
        ));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(parse("").unwrap_err().to_string(), "Empty expression");
        assert_eq!(
            parse("1 +").unwrap_err().to_string(),
            "Unexpected end of expression"
        );
        assert_eq!(
            parse("(1").unwrap_err().to_string(),
            "Missing closing parenthesis for '(' at position 0"
        );
    }
}
