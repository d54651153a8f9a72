//! In-process wiring for tests: every role backed by a loopback mesh instead
//! of the network.

use std::sync::Arc;

use calcmesh_core::{
    InstanceIdentity, LocalParser, LoopbackTransport, OperandEvaluator, OperationExecutor,
    Operator, Orchestrator, PeerAddressTable,
};

use crate::server::{GatewayState, ParserState, PeerState, Service};

pub const TEST_HOSTNAME: &str = "test-host";
pub const TEST_MAX_EXPRESSION_LENGTH: usize = 64;

fn loopback_evaluator() -> OperandEvaluator {
    let peers = PeerAddressTable::default();
    let mesh = LoopbackTransport::mesh(peers.clone(), TEST_HOSTNAME);
    OperandEvaluator::new(Arc::new(peers), mesh)
}

pub fn test_identity(service: &str) -> InstanceIdentity {
    InstanceIdentity::new(service, TEST_HOSTNAME)
}

pub fn loopback_gateway() -> Service {
    let parser = LocalParser::new(test_identity("parser-service"));
    Service::Gateway(GatewayState {
        orchestrator: Orchestrator::new(Arc::new(parser), loopback_evaluator()),
        max_expression_length: TEST_MAX_EXPRESSION_LENGTH,
    })
}

pub fn test_parser() -> Service {
    Service::Parser(ParserState {
        parser: LocalParser::new(test_identity("parser-service")),
        max_expression_length: TEST_MAX_EXPRESSION_LENGTH,
    })
}

pub fn loopback_peer(operator: Operator) -> Service {
    let identity = test_identity(&InstanceIdentity::service_name_for(operator));
    Service::Peer(PeerState {
        executor: OperationExecutor::new(operator, identity, loopback_evaluator()),
    })
}
