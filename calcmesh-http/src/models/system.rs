use std::collections::BTreeMap;

use calcmesh_core::InstanceIdentity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Probe answer for `/health` and `/ready`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProbeResponse {
    /// `healthy` or `ready`
    pub status: String,

    /// Service name
    pub service: String,

    /// Host the instance runs on
    pub hostname: String,
}

impl ProbeResponse {
    pub fn new(status: &str, identity: &InstanceIdentity) -> Self {
        Self {
            status: status.to_string(),
            service: identity.service.clone(),
            hostname: identity.hostname.clone(),
        }
    }
}

/// Answer of `GET /`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// Service name
    pub service: String,

    /// Crate version
    pub version: String,

    /// Host the instance runs on
    pub hostname: String,

    /// Endpoint name to `METHOD /path`
    pub endpoints: BTreeMap<String, String>,
}
