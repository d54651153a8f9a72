use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::EvalError;
use super::operand::{EvaluationResult, OperandEvaluator};
use crate::ast::{AstNode, Operator};
use crate::config::InstanceIdentity;
use crate::event::{Delegations, EventLogEntry, Operands};
use crate::protocol::{ExecuteEnvelope, ExecuteResponse, OperationRequest};
use crate::timestamp::Timestamp;

/// Divisors closer to zero than this are rejected.
pub const ZERO_TOLERANCE: f64 = 1e-10;

/// Applies `operator` to two resolved operands.
pub fn combine(operator: Operator, left: f64, right: f64) -> Result<f64, EvalError> {
    let result = match operator {
        Operator::Add => left + right,
        Operator::Subtract => left - right,
        Operator::Multiply => left * right,
        Operator::Divide if right.abs() < ZERO_TOLERANCE => return Err(EvalError::DivisionByZero),
        Operator::Divide => left / right,
    };
    // JSON has no encoding for inf or NaN
    if !result.is_finite() {
        return Err(EvalError::NonFinite(operator));
    }
    Ok(result)
}

/// The `/execute` contract of the peer owning one operator.
#[derive(Clone)]
pub struct OperationExecutor {
    operator: Operator,
    identity: InstanceIdentity,
    evaluator: OperandEvaluator,
}

impl OperationExecutor {
    pub fn new(operator: Operator, identity: InstanceIdentity, evaluator: OperandEvaluator) -> Self {
        Self {
            operator,
            identity,
            evaluator,
        }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn identity(&self) -> &InstanceIdentity {
        &self.identity
    }

    #[tracing::instrument(level = "debug", skip_all, fields(service = %self.identity.service))]
    pub async fn execute(&self, envelope: ExecuteEnvelope) -> Result<ExecuteResponse, EvalError> {
        let started = Instant::now();
        let (left, right) = self.validate(envelope)?;

        let (left, right) = self.evaluator.evaluate_pair(&left, &right).await?;
        let result = combine(self.operator, left.value, right.value)
            .inspect_err(|e| warn!("{}: {}", self.identity.service, e))?;
        info!("{} {} {} = {}", left.value, self.operator, right.value, result);

        let duration = started.elapsed().as_millis() as u64;
        Ok(ExecuteResponse {
            result,
            event_log: self.merge(left, right, result, duration),
        })
    }

    /// Checks the request shape in a fixed order and decodes both operands.
    fn validate(&self, envelope: ExecuteEnvelope) -> Result<(AstNode, AstNode), EvalError> {
        let operation = envelope.operation.ok_or(EvalError::MissingOperation)?;
        if !operation.is_object() {
            return Err(EvalError::InvalidFormat);
        }
        let request: OperationRequest =
            serde_json::from_value(operation).map_err(|_| EvalError::InvalidFormat)?;

        let found = request.operator.as_deref().unwrap_or("null");
        if found != self.operator.symbol() {
            return Err(EvalError::OperatorMismatch {
                expected: self.operator,
                found: found.to_string(),
            });
        }

        let (Some(left), Some(right)) = (request.left, request.right) else {
            return Err(EvalError::MissingOperand);
        };
        debug!("operands received: {} and {}", left, right);
        Ok((decode(&left)?, decode(&right)?))
    }

    /// Subtree entries of the left side, then the right side, then our own.
    fn merge(
        &self,
        left: EvaluationResult,
        right: EvaluationResult,
        result: f64,
        duration: u64,
    ) -> Vec<EventLogEntry> {
        let own = EventLogEntry {
            timestamp: Timestamp::now(),
            hostname: self.identity.hostname.clone(),
            service: self.identity.service.clone(),
            operation: self.operator,
            operands: Operands {
                left: left.value,
                right: right.value,
            },
            result,
            delegations: Delegations {
                left: left.delegation,
                right: right.delegation,
            },
            duration,
        };

        let mut log = left.event_logs;
        log.extend(right.event_logs);
        log.push(own);
        log
    }
}

fn decode(value: &Value) -> Result<AstNode, EvalError> {
    Ok(AstNode::decode(value)?)
}
