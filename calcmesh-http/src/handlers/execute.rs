use axum::{extract::State, response::Json};
use tracing::debug;

use crate::error::AppError;
use crate::extract::TreeJson;
use crate::models::{ErrorResponse, ExecuteEnvelope, ExecuteRequest, ExecuteResponse};
use crate::server::PeerState;

/// Evaluate one operation node owned by this peer
///
/// Operand subtrees are delegated to their owning peers, left before right.
#[utoipa::path(
    post,
    path = "/execute",
    request_body = ExecuteRequest,
    responses(
        (status = 200, description = "Operation evaluated", body = ExecuteResponse),
        (status = 400, description = "Invalid operation, wrong operator or division by zero", body = ErrorResponse),
        (status = 502, description = "Delegation to another peer failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn execute(
    State(state): State<PeerState>,
    TreeJson(envelope): TreeJson<ExecuteEnvelope>,
) -> Result<Json<ExecuteResponse>, AppError> {
    debug!("execute on {}", state.executor.identity().service);

    let response = state.executor.execute(envelope).await?;
    Ok(Json(response))
}
