use crate::server::ServerRouter;
use axum::Router;

mod info;
mod posts;

pub fn routes() -> ServerRouter {
    Router::new().merge(info::routes()).merge(posts::routes())
}
