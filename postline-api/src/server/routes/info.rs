use crate::server::{ServerError, ServerRouter, json::Json};
use axum_extra::routing::{RouterExt, TypedPath};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Serialize)]
pub struct ServiceInfo {
    name: &'static str,
    version: &'static str,
}

pub fn routes() -> ServerRouter {
    ServerRouter::new().typed_get(get_info)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/", rejection(ServerError))]
struct InfoPath();

async fn get_info(InfoPath(): InfoPath) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}
