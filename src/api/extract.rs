use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::api::errors::ApiError;

/// JSON body extractor that rejects with the standard envelope
///
/// Behaves like `axum::Json`, but a body that cannot be decoded for the
/// endpoint produces a 500 envelope with the decoder's message in `error`
/// instead of axum's plain-text rejection.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            ApiError::internal_server_error("Invalid request body").with_error(rejection.body_text())
        })?;

        Ok(ApiJson(value))
    }
}
