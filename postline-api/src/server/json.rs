use crate::server::{Result, ServerError};
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use axum_extra::TypedHeader;
use headers::ContentType;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// JSON response body. Serialization failures surface as [`ServerError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(json) => (TypedHeader(ContentType::json()), json).into_response(),
            Err(err) => ServerError::JsonResponse(err).into_response(),
        }
    }
}

/// Raw request body, decoded as JSON only when the handler asks for it.
///
/// The `Content-Type` header is not consulted. An empty body or a bare `null`
/// decodes to `T::default()`, and a repeated key keeps its last value.
#[derive(Clone, Debug, Default)]
pub struct JsonBody(Bytes);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(Bytes::from_request(request, state).await?))
    }
}

impl JsonBody {
    pub fn decode<T>(&self) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        if self.0.trim_ascii().is_empty() {
            return Ok(T::default());
        }

        // Going through `Value` collapses duplicate keys before the typed
        // deserializer sees them.
        let value: Value = serde_json::from_slice(&self.0).map_err(ServerError::MalformedBody)?;
        if value.is_null() {
            return Ok(T::default());
        }

        T::deserialize(value).map_err(ServerError::MalformedBody)
    }
}

impl From<&'static str> for JsonBody {
    fn from(value: &'static str) -> Self {
        Self(Bytes::from_static(value.as_bytes()))
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Serialize)]
pub struct Message {
    pub message: &'static str,
}

impl Message {
    #[must_use]
    pub fn new(message: &'static str) -> Json<Self> {
        Json(Self { message })
    }
}
