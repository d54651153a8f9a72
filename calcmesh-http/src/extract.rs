use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use calcmesh_core::protocol::from_json_slice;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::AppError;

/// JSON body extractor without a nesting limit
///
/// Operation trees arrive one JSON level per node, so deep but short
/// expressions must still decode. Any failure is [`AppError::InvalidJson`].
pub struct TreeJson<T>(pub T);

impl<T, S> FromRequest<S> for TreeJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|_| AppError::InvalidJson)?;

        from_json_slice(&body).map(TreeJson).map_err(|e| {
            debug!("rejected request body: {}", e);
            AppError::InvalidJson
        })
    }
}
