//! Recursive-descent rules for the expression grammar.
//!
//! ```text
//! expression := term (('+' | '-') term)*
//! term       := factor (('*' | '/') factor)*
//! factor     := NUMBER | '(' expression ')'
//! ```
//!
//! Each rule takes the token slice and a start position and returns the
//! position after what it consumed. Operators of equal precedence fold into a
//! left-deep tree.

use super::core::{ParseError, ParseResult};
use crate::ast::{AstNode, Operator as AstOperator};
use crate::tokenizer::{
    symbol::{Delimiter, Operator},
    token::{Token, TokenSpan},
};

// Additive level (+, -), lowest precedence
pub fn parse_expression(tokens: &[TokenSpan], pos: usize) -> ParseResult<AstNode> {
    parse_binary_level(tokens, pos, additive_operator, parse_term)
}

// Multiplicative level (*, /)
fn parse_term(tokens: &[TokenSpan], pos: usize) -> ParseResult<AstNode> {
    parse_binary_level(tokens, pos, multiplicative_operator, parse_factor)
}

fn parse_factor(tokens: &[TokenSpan], pos: usize) -> ParseResult<AstNode> {
    let span = tokens.get(pos).ok_or(ParseError::UnexpectedEnd)?;
    match span.token {
        Token::Number(value) => Ok((pos + 1, AstNode::number(value))),
        Token::Delimiter(Delimiter::OpenParen) => {
            let (next, inner) = parse_expression(tokens, pos + 1)?;
            match tokens.get(next) {
                Some(TokenSpan {
                    token: Token::Delimiter(Delimiter::CloseParen),
                    ..
                }) => Ok((next + 1, inner)),
                Some(other) => Err(unexpected(other)),
                None => Err(ParseError::MissingClosingParenthesis {
                    position: span.start,
                }),
            }
        }
        _ => Err(unexpected(span)),
    }
}

/// One precedence level: `operand (op operand)*`, folded to the left.
fn parse_binary_level(
    tokens: &[TokenSpan],
    pos: usize,
    operator_at: fn(&Token) -> Option<AstOperator>,
    operand: fn(&[TokenSpan], usize) -> ParseResult<AstNode>,
) -> ParseResult<AstNode> {
    let (mut pos, mut left) = operand(tokens, pos)?;
    while let Some(op) = tokens.get(pos).and_then(|span| operator_at(&span.token)) {
        let (next, right) = operand(tokens, pos + 1)?;
        left = AstNode::operation(op, left, right);
        pos = next;
    }
    Ok((pos, left))
}

fn additive_operator(token: &Token) -> Option<AstOperator> {
    match token {
        Token::Operator(Operator::Plus) => Some(AstOperator::Add),
        Token::Operator(Operator::Minus) => Some(AstOperator::Subtract),
        _ => None,
    }
}

fn multiplicative_operator(token: &Token) -> Option<AstOperator> {
    match token {
        Token::Operator(Operator::Star) => Some(AstOperator::Multiply),
        Token::Operator(Operator::Slash) => Some(AstOperator::Divide),
        _ => None,
    }
}

pub(super) fn unexpected(span: &TokenSpan) -> ParseError {
    ParseError::UnexpectedToken {
        found: span.token.to_string(),
        position: span.start,
    }
}
