use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use super::{DelegationError, PeerTransport};
use crate::protocol::{ErrorResponse, ExecuteRequest, ExecuteResponse, from_json_slice};
use crate::{Error, InternalResult};

pub const EXECUTE_PATH: &str = "/execute";
pub const PARSE_PATH: &str = "/parse";

/// JSON over HTTP with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> InternalResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl PeerTransport for HttpTransport {
    async fn execute(
        &self,
        address: &str,
        request: ExecuteRequest,
    ) -> Result<ExecuteResponse, DelegationError> {
        let url = format!("{}{}", address.trim_end_matches('/'), EXECUTE_PATH);
        post_json(&self.client, &url, &request).await
    }
}

/// Posts `body` to `url` and decodes a successful JSON answer.
///
/// A non-success status becomes [`DelegationError::Status`] carrying the
/// `error` field of the body when there is one.
pub async fn post_json<Req, Resp>(
    client: &reqwest::Client,
    url: &str,
    body: &Req,
) -> Result<Resp, DelegationError>
where
    Req: Serialize + ?Sized,
    Resp: DeserializeOwned,
{
    debug!("POST {}", url);
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| transport_error(url, e))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| transport_error(url, e))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| format!("service returned status {}", status.as_u16()));
        return Err(DelegationError::Status {
            address: url.to_string(),
            status: status.as_u16(),
            message,
        });
    }

    from_json_slice(text.as_bytes()).map_err(|e| DelegationError::InvalidResponse {
        address: url.to_string(),
        message: e.to_string(),
    })
}

fn transport_error(url: &str, err: reqwest::Error) -> DelegationError {
    if err.is_timeout() {
        DelegationError::Timeout {
            address: url.to_string(),
        }
    } else {
        DelegationError::Unreachable {
            address: url.to_string(),
            message: err.to_string(),
        }
    }
}
