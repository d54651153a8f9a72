use std::collections::HashMap;
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use strum::IntoEnumIterator;
use tracing::debug;

use super::{DelegationError, PeerTransport};
use crate::ast::Operator;
use crate::config::{InstanceIdentity, PeerAddressTable};
use crate::eval::{OperandEvaluator, OperationExecutor};
use crate::protocol::{ExecuteEnvelope, ExecuteRequest, ExecuteResponse};

/// A whole peer mesh inside one process.
///
/// Each address of the table is served by an [`OperationExecutor`] for its
/// operator, and those executors delegate back through this transport.
/// Requests and responses still go through JSON so behavior matches the
/// networked deployment.
pub struct LoopbackTransport {
    executors: HashMap<String, OperationExecutor>,
}

impl LoopbackTransport {
    pub fn mesh(peers: PeerAddressTable, hostname: &str) -> Arc<Self> {
        let peers = Arc::new(peers);
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let handle: Arc<dyn PeerTransport> = Arc::new(LoopbackHandle(weak.clone()));
            let evaluator = OperandEvaluator::new(peers.clone(), handle);
            let executors = Operator::iter()
                .map(|op| {
                    let identity =
                        InstanceIdentity::new(InstanceIdentity::service_name_for(op), hostname);
                    (
                        normalize(peers.address_for(op)).to_string(),
                        OperationExecutor::new(op, identity, evaluator.clone()),
                    )
                })
                .collect();
            Self { executors }
        })
    }

    pub fn executor_at(&self, address: &str) -> Option<&OperationExecutor> {
        self.executors.get(normalize(address))
    }
}

#[async_trait]
impl PeerTransport for LoopbackTransport {
    async fn execute(
        &self,
        address: &str,
        request: ExecuteRequest,
    ) -> Result<ExecuteResponse, DelegationError> {
        let executor = self
            .executor_at(address)
            .ok_or_else(|| DelegationError::UnknownPeer(address.to_string()))?;
        debug!("loopback execute at {}", address);

        let envelope: ExecuteEnvelope = round_trip(address, &request)?;
        match executor.execute(envelope).await {
            Ok(response) => round_trip(address, &response),
            Err(err) => Err(DelegationError::Status {
                address: address.to_string(),
                status: err.category().status_code(),
                message: err.to_string(),
            }),
        }
    }
}

/// Non-owning handle given to the executors of a mesh.
struct LoopbackHandle(Weak<LoopbackTransport>);

#[async_trait]
impl PeerTransport for LoopbackHandle {
    async fn execute(
        &self,
        address: &str,
        request: ExecuteRequest,
    ) -> Result<ExecuteResponse, DelegationError> {
        match self.0.upgrade() {
            Some(mesh) => mesh.execute(address, request).await,
            None => Err(DelegationError::Unreachable {
                address: address.to_string(),
                message: "loopback mesh has been dropped".to_string(),
            }),
        }
    }
}

fn round_trip<T: Serialize, U: DeserializeOwned>(
    address: &str,
    value: &T,
) -> Result<U, DelegationError> {
    serde_json::to_value(value)
        .and_then(serde_json::from_value)
        .map_err(|e| DelegationError::InvalidResponse {
            address: address.to_string(),
            message: e.to_string(),
        })
}

fn normalize(address: &str) -> &str {
    address.trim_end_matches('/')
}
