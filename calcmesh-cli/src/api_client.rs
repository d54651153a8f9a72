use calcmesh_core::protocol::{CalculateRequest, CalculateResponse, ErrorResponse};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
}

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `POST /calculate` on the gateway.
    pub async fn calculate(&self, expression: &str) -> Result<CalculateResponse, ApiError> {
        let url = format!("{}/calculate", self.base_url);
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .json(&CalculateRequest::new(expression))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<CalculateResponse>().await?);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        };
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
