use axum::{
    Router,
    extract::{
        FromRef, Request,
        rejection::{BytesRejection, PathRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use postline_common::model::InvalidPostIndexError;
use postline_store::store::{PostStore, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error};

mod json;
mod routes;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, Debug, Default, FromRef)]
pub struct ServerState {
    pub store: Arc<PostStore>,
}

impl ServerState {
    #[must_use]
    pub fn new(store: PostStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub fn routes() -> ServerRouter {
    routes::routes().fallback(fallback)
}

pub async fn fallback(request: Request) -> ServerError {
    ServerError::UnknownRoute(request.into_parts().0.uri)
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Request body could not be read: {0}")]
    Body(#[from] BytesRejection),
    #[error("Request body could not be decoded: {0}")]
    MalformedBody(serde_json::Error),
    #[error("JSON response could not be serialized: {0}")]
    JsonResponse(serde_json::Error),
    #[error(transparent)]
    InvalidIndexFormat(#[from] InvalidPostIndexError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_) | ServerError::Store(StoreError::IndexOutOfRange(_)) => {
                StatusCode::NOT_FOUND
            }
            ServerError::Body(rejection) => rejection.status(),
            ServerError::PathRejection(_)
            | ServerError::MalformedBody(_)
            | ServerError::InvalidIndexFormat(_) => StatusCode::BAD_REQUEST,
            ServerError::JsonResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, %status, "Replying with error");
        } else {
            debug!(error = ?self, %status, "Rejecting request");
        }

        (status, self.to_string()).into_response()
    }
}
