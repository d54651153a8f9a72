use thiserror::Error;

use crate::analyzer::ParseError;
use crate::ast::{DecodeError, Operator};
use crate::transport::DelegationError;

/// How a failure is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The request itself was bad.
    Client,
    /// A delegated call failed.
    Upstream,
    Internal,
}

impl ErrorCategory {
    pub fn status_code(self) -> u16 {
        match self {
            ErrorCategory::Client => 400,
            ErrorCategory::Upstream => 502,
            ErrorCategory::Internal => 500,
        }
    }

    pub fn from_status(status: u16) -> Self {
        match status {
            400..=499 => ErrorCategory::Client,
            502..=504 => ErrorCategory::Upstream,
            _ => ErrorCategory::Internal,
        }
    }
}

/// Failures of a single `/execute` call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Missing 'operation' field")]
    MissingOperation,
    #[error("Invalid operation format")]
    InvalidFormat,
    #[error("{0}")]
    Format(String),
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),
    #[error("This service only handles {} ({}), got: {found}", .expected.name(), .expected.symbol())]
    OperatorMismatch { expected: Operator, found: String },
    #[error("Missing left or right operand")]
    MissingOperand,
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Result of {} is not a finite number", .0.name())]
    NonFinite(Operator),
    #[error("Service delegation failed: {0}")]
    Delegation(#[from] DelegationError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EvalError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EvalError::Delegation(_) => ErrorCategory::Upstream,
            EvalError::Internal(_) => ErrorCategory::Internal,
            _ => ErrorCategory::Client,
        }
    }
}

impl From<DecodeError> for EvalError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::InvalidFormat(_) => EvalError::Format(err.to_string()),
            DecodeError::UnknownOperator(op) => EvalError::UnknownOperator(op),
        }
    }
}

/// Failures of a whole `calculate` run at the root.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculateError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    /// A remote parser rejected the expression.
    #[error("{0}")]
    RemoteParse(String),
    #[error("Parser service unavailable: {0}")]
    ParserUnavailable(DelegationError),
    #[error("{0}")]
    Eval(#[from] EvalError),
}

impl CalculateError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CalculateError::Parse(_) | CalculateError::RemoteParse(_) => ErrorCategory::Client,
            CalculateError::ParserUnavailable(_) => ErrorCategory::Upstream,
            CalculateError::Eval(err) => err.category(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(EvalError::DivisionByZero.category(), ErrorCategory::Client);
        assert_eq!(
            EvalError::Delegation(DelegationError::Timeout {
                address: "http://x".to_string()
            })
            .category(),
            ErrorCategory::Upstream
        );
        assert_eq!(
            CalculateError::Parse(ParseError::EmptyExpression)
                .category()
                .status_code(),
            400
        );
        assert_eq!(ErrorCategory::Internal.status_code(), 500);
    }

    #[test]
    fn test_mismatch_message() {
        let err = EvalError::OperatorMismatch {
            expected: Operator::Divide,
            found: "%".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "This service only handles division (/), got: %"
        );
    }

    #[test]
    fn test_status_round_trip() {
        for category in [
            ErrorCategory::Client,
            ErrorCategory::Upstream,
            ErrorCategory::Internal,
        ] {
            assert_eq!(ErrorCategory::from_status(category.status_code()), category);
        }
    }
}
