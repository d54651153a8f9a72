//! Error handling for calcmesh-http
//!
//! Every failure leaves the service as a JSON body `{"error": "..."}` with the
//! status of its category.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use calcmesh_core::{CalculateError, ErrorCategory, EvalError};
use serde_json::json;
use std::cmp::PartialEq;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Body was not valid JSON for the endpoint
    InvalidJson,

    /// `expression` absent or empty
    MissingExpression,

    /// `expression` longer than the configured bound
    ExpressionTooLong { length: usize, max: usize },

    /// Failure of an `/execute` call
    Eval(EvalError),

    /// Failure of a `/calculate` call
    Calculate(CalculateError),

    /// Internal error
    Internal(String),
}

impl From<EvalError> for AppError {
    fn from(err: EvalError) -> Self {
        Self::Eval(err)
    }
}

impl From<CalculateError> for AppError {
    fn from(err: CalculateError) -> Self {
        Self::Calculate(err)
    }
}

impl PartialEq<StatusCode> for AppError {
    fn eq(&self, status_code: &StatusCode) -> bool {
        let (error_status, _) = self.status_and_message();
        &error_status == status_code
    }
}

impl AppError {
    /// Get the status code and error message for this error
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::InvalidJson => (
                StatusCode::BAD_REQUEST,
                "Invalid JSON request body".to_string(),
            ),
            Self::MissingExpression => (
                StatusCode::BAD_REQUEST,
                "Missing 'expression' field in request".to_string(),
            ),
            Self::ExpressionTooLong { length, max } => (
                StatusCode::BAD_REQUEST,
                format!(
                    "Expression too long: {} characters (maximum {})",
                    length, max
                ),
            ),
            Self::Eval(err) => (status_for(err.category()), err.to_string()),
            Self::Calculate(err) => (status_for(err.category()), err.to_string()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        }
    }
}

pub fn status_for(category: ErrorCategory) -> StatusCode {
    StatusCode::from_u16(category.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!("{}", error_message);
        }

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Checks an incoming expression before any work is done on it.
pub fn check_expression(expression: &str, max: usize) -> Result<(), AppError> {
    if expression.is_empty() {
        return Err(AppError::MissingExpression);
    }
    let length = expression.chars().count();
    if length > max {
        return Err(AppError::ExpressionTooLong { length, max });
    }
    Ok(())
}
