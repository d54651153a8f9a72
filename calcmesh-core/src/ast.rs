//! Abstract syntax tree for arithmetic expressions.
//!
//! The tree has exactly two node shapes, a literal [`AstNode::Number`] and a
//! binary [`AstNode::Operation`]. On the wire nodes are encoded as
//!
//! ```json
//! {"type": "number", "value": 5}
//! {"type": "operation", "operator": "+", "left": {...}, "right": {...}}
//! ```
//!
//! Decoding additionally accepts a bare JSON number wherever a node is
//! expected. Anything else fails with [`DecodeError`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use thiserror::Error;
use utoipa::ToSchema;

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROWTH: usize = 1024 * 1024;

/// The four binary operators, each owned by exactly one peer service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    AsRefStr,
    EnumIter,
    ToSchema,
)]
pub enum Operator {
    #[serde(rename = "+")]
    #[strum(serialize = "+")]
    Add,
    #[serde(rename = "-")]
    #[strum(serialize = "-")]
    Subtract,
    #[serde(rename = "*")]
    #[strum(serialize = "*")]
    Multiply,
    #[serde(rename = "/")]
    #[strum(serialize = "/")]
    Divide,
}

impl Operator {
    /// Symbol as it appears in expressions and on the wire.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }

    /// Human readable operation name, used in service names and messages.
    pub fn name(self) -> &'static str {
        match self {
            Operator::Add => "addition",
            Operator::Subtract => "subtraction",
            Operator::Multiply => "multiplication",
            Operator::Divide => "division",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AstNode {
    Number {
        value: f64,
    },
    Operation {
        operator: Operator,
        #[schema(no_recursion)]
        left: Box<AstNode>,
        #[schema(no_recursion)]
        right: Box<AstNode>,
    },
}

impl AstNode {
    pub fn number(value: f64) -> Self {
        AstNode::Number { value }
    }

    pub fn operation(operator: Operator, left: AstNode, right: AstNode) -> Self {
        AstNode::Operation {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, AstNode::Number { .. })
    }

    /// Number of operation nodes in the tree, i.e. how many audit entries a
    /// full evaluation produces.
    pub fn operation_count(&self) -> usize {
        match self {
            AstNode::Number { .. } => 0,
            AstNode::Operation { left, right, .. } => {
                1 + left.operation_count() + right.operation_count()
            }
        }
    }

    /// Decodes a node from an arbitrary JSON value.
    ///
    /// Left-leaning chains nest one level per operation, so the stack is
    /// grown on demand while descending.
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || Self::decode_node(value))
    }

    fn decode_node(value: &Value) -> Result<Self, DecodeError> {
        let invalid = || DecodeError::InvalidFormat(value.to_string());
        if let Some(number) = value.as_f64() {
            return Ok(AstNode::number(number));
        }

        let node = value.as_object().ok_or_else(invalid)?;
        match node.get("type").and_then(Value::as_str) {
            Some("number") => node
                .get("value")
                .and_then(Value::as_f64)
                .map(AstNode::number)
                .ok_or_else(invalid),
            Some("operation") => {
                let (Some(operator), Some(left), Some(right)) = (
                    node.get("operator").and_then(Value::as_str),
                    node.get("left"),
                    node.get("right"),
                ) else {
                    return Err(invalid());
                };
                let operator = Operator::from_str(operator)
                    .map_err(|_| DecodeError::UnknownOperator(operator.to_string()))?;
                Ok(AstNode::operation(
                    operator,
                    Self::decode(left)?,
                    Self::decode(right)?,
                ))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNode::Number { value } => write!(f, "{}", value),
            AstNode::Operation {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Invalid operand format: {0}")]
    InvalidFormat(String),
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),
}

impl<'de> Deserialize<'de> for AstNode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        AstNode::decode(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use strum::IntoEnumIterator;

    #[test]
    fn test_serialize_tagged_shape() {
        let node = AstNode::operation(
            Operator::Add,
            AstNode::number(5.0),
            AstNode::number(3.0),
        );
        assert_eq!(
            serde_json::to_value(&node).unwrap(),
            json!({
                "type": "operation",
                "operator": "+",
                "left": {"type": "number", "value": 5.0},
                "right": {"type": "number", "value": 3.0}
            })
        );
    }

    #[test]
    fn test_decode_accepts_bare_numbers_at_any_depth() {
        let value = json!({
            "type": "operation",
            "operator": "*",
            "left": 5,
            "right": {"type": "operation", "operator": "-", "left": 10, "right": {"type": "number", "value": 2}}
        });
        let node = AstNode::decode(&value).unwrap();
        assert_eq!(
            node,
            AstNode::operation(
                Operator::Multiply,
                AstNode::number(5.0),
                AstNode::operation(
                    Operator::Subtract,
                    AstNode::number(10.0),
                    AstNode::number(2.0)
                ),
            )
        );
        assert_eq!(node.operation_count(), 2);
    }

    #[test]
    fn test_decode_unknown_operator() {
        let value = json!({"type": "operation", "operator": "%", "left": 1, "right": 2});
        assert_eq!(
            AstNode::decode(&value),
            Err(DecodeError::UnknownOperator("%".to_string()))
        );
    }

    #[test]
    fn test_decode_rejects_other_shapes() {
        for value in [
            json!("5"),
            json!({"type": "variable", "name": "x"}),
            json!({"value": 5}),
            json!({"type": "operation", "operator": "+", "left": 1}),
            json!(null),
        ] {
            assert!(
                matches!(AstNode::decode(&value), Err(DecodeError::InvalidFormat(_))),
                "expected format error for {}",
                value
            );
        }
    }

    #[test]
    fn test_deserialize_round_trip() {
        let node = AstNode::operation(
            Operator::Divide,
            AstNode::number(1.5),
            AstNode::number(0.5),
        );
        let text = serde_json::to_string(&node).unwrap();
        let back: AstNode = serde_json::from_str(&text).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn test_display_is_fully_parenthesized() {
        let node = AstNode::operation(
            Operator::Add,
            AstNode::number(10.0),
            AstNode::operation(Operator::Multiply, AstNode::number(5.0), AstNode::number(2.0)),
        );
        assert_eq!(node.to_string(), "(10 + (5 * 2))");
    }

    #[test]
    fn test_operator_symbols_match_strum() {
        for op in Operator::iter() {
            assert_eq!(op.symbol(), op.to_string());
            assert_eq!(Operator::from_str(op.symbol()).unwrap(), op);
        }
    }
}
