use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::error::{AppError, check_expression};
use crate::extract::TreeJson;
use crate::models::{ErrorResponse, ParseErrorResponse, ParseRequest, ParseResponse};
use crate::server::ParserState;

/// Parse an expression into its AST
///
/// A parse record is part of the answer whether or not parsing succeeds.
#[utoipa::path(
    post,
    path = "/parse",
    request_body = ParseRequest,
    responses(
        (status = 200, description = "Expression parsed", body = ParseResponse),
        (status = 400, description = "Expression rejected", body = ParseErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn parse(
    State(state): State<ParserState>,
    TreeJson(request): TreeJson<ParseRequest>,
) -> Result<Response, AppError> {
    check_expression(&request.expression, state.max_expression_length)?;

    let (result, record) = state.parser.parse_with_record(&request.expression);
    let response = match result {
        Ok(ast) => Json(ParseResponse {
            ast,
            event_log: vec![record.into()],
        })
        .into_response(),
        Err(err) => (
            StatusCode::BAD_REQUEST,
            Json(ParseErrorResponse {
                error: err.to_string(),
                event_log: vec![record.into()],
            }),
        )
            .into_response(),
    };
    Ok(response)
}
