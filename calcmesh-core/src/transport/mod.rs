//! Delivery of `/execute` and `/parse` calls to other services.
//!
//! [`PeerTransport`] is the seam between the evaluator and the network.
//! [`http::HttpTransport`] talks to real services; [`loopback::LoopbackTransport`]
//! routes to executors living in the same process.

pub mod http;
pub mod loopback;

use async_trait::async_trait;
use thiserror::Error;

use crate::protocol::{ExecuteRequest, ExecuteResponse};

pub use self::http::HttpTransport;
pub use self::loopback::LoopbackTransport;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DelegationError {
    #[error("{address} is unreachable: {message}")]
    Unreachable { address: String, message: String },
    #[error("{address} timed out")]
    Timeout { address: String },
    #[error("{address} returned {status}: {message}")]
    Status {
        address: String,
        status: u16,
        message: String,
    },
    #[error("Invalid response from {address}: {message}")]
    InvalidResponse { address: String, message: String },
    #[error("No peer registered at {0}")]
    UnknownPeer(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PeerTransport: Send + Sync {
    /// Posts `request` to the execute endpoint of the service at `address`.
    async fn execute(
        &self,
        address: &str,
        request: ExecuteRequest,
    ) -> Result<ExecuteResponse, DelegationError>;
}
