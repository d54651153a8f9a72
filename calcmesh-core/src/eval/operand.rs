use std::sync::Arc;

use tracing::debug;

use super::error::EvalError;
use crate::ast::AstNode;
use crate::config::PeerAddressTable;
use crate::event::{Delegation, EventLogEntry};
use crate::protocol::ExecuteRequest;
use crate::transport::PeerTransport;

/// Resolved value of one operand together with what its resolution produced.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub value: f64,
    /// Set iff the operand was an operation node.
    pub delegation: Option<Delegation>,
    pub event_logs: Vec<EventLogEntry>,
}

impl EvaluationResult {
    pub fn literal(value: f64) -> Self {
        Self {
            value,
            delegation: None,
            event_logs: Vec::new(),
        }
    }
}

/// Resolves operands to numbers, delegating operation nodes to the peer that
/// owns their operator.
#[derive(Clone)]
pub struct OperandEvaluator {
    peers: Arc<PeerAddressTable>,
    transport: Arc<dyn PeerTransport>,
}

impl OperandEvaluator {
    pub fn new(peers: Arc<PeerAddressTable>, transport: Arc<dyn PeerTransport>) -> Self {
        Self { peers, transport }
    }

    pub fn peers(&self) -> &PeerAddressTable {
        &self.peers
    }

    #[tracing::instrument(level = "debug", skip_all, fields(operand = %operand))]
    pub async fn evaluate(&self, operand: &AstNode) -> Result<EvaluationResult, EvalError> {
        let operator = match operand {
            AstNode::Number { value } => return Ok(EvaluationResult::literal(*value)),
            AstNode::Operation { operator, .. } => *operator,
        };

        let address = self.peers.address_for(operator);
        debug!("delegating {} to {}", operator, address);
        let response = self
            .transport
            .execute(address, ExecuteRequest::new(operand.clone()))
            .await?;

        let delegation =
            Delegation::from_peer_log(operator, response.result, &response.event_log);
        Ok(EvaluationResult {
            value: response.result,
            delegation: Some(delegation),
            event_logs: response.event_log,
        })
    }

    /// Resolves `left` completely, including every call it triggers, before
    /// starting on `right`.
    pub async fn evaluate_pair(
        &self,
        left: &AstNode,
        right: &AstNode,
    ) -> Result<(EvaluationResult, EvaluationResult), EvalError> {
        let left = self.evaluate(left).await?;
        let right = self.evaluate(right).await?;
        Ok((left, right))
    }
}
