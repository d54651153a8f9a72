use axum::{extract::State, response::Json};
use tracing::info;

use crate::error::{AppError, check_expression};
use crate::extract::TreeJson;
use crate::models::{CalculateRequest, CalculateResponse, ErrorResponse};
use crate::server::GatewayState;

/// Evaluate an expression across the peer mesh
///
/// Parses the expression, delegates the tree and returns the result with the
/// merged audit log.
#[utoipa::path(
    post,
    path = "/calculate",
    request_body = CalculateRequest,
    responses(
        (status = 200, description = "Expression evaluated", body = CalculateResponse),
        (status = 400, description = "Invalid request or expression", body = ErrorResponse),
        (status = 502, description = "A peer or the parser failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn calculate(
    State(state): State<GatewayState>,
    TreeJson(request): TreeJson<CalculateRequest>,
) -> Result<Json<CalculateResponse>, AppError> {
    check_expression(&request.expression, state.max_expression_length)?;

    info!("calculate {:?}", request.expression);
    let response = state.orchestrator.calculate(&request.expression).await?;
    Ok(Json(response))
}
