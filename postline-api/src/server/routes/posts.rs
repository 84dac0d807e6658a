use crate::server::{
    Result, ServerError, ServerRouter,
    json::{Json, JsonBody, Message},
};
use axum::extract::State;
use axum_extra::routing::{RouterExt, TypedPath};
use postline_common::model::{Post, PostIndex, PostPatch};
use postline_store::store::{PostStore, StoreError};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(list_posts)
        .typed_post(create_post)
        .typed_get(get_post)
        .typed_put(replace_post)
        .typed_patch(patch_post)
        .typed_delete(delete_post)
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts", rejection(ServerError))]
struct PostsPath();

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{index}", rejection(ServerError))]
struct PostPath {
    index: String,
}

async fn list_posts(
    PostsPath(): PostsPath,
    State(store): State<Arc<PostStore>>,
) -> Json<Vec<Post>> {
    Json(store.fetch_posts().await)
}

async fn create_post(
    PostsPath(): PostsPath,
    State(store): State<Arc<PostStore>>,
    body: JsonBody,
) -> Result<Json<Message>> {
    store.create_post(body.decode()?).await;

    Ok(Message::new("Data Added Successfully"))
}

async fn get_post(
    PostPath { index }: PostPath,
    State(store): State<Arc<PostStore>>,
) -> Result<Json<Post>> {
    let index: PostIndex = index.parse()?;
    let post = store
        .fetch_post(index)
        .await
        .ok_or(StoreError::IndexOutOfRange(index))?;

    Ok(Json(post))
}

// The body is only decoded once the index is known to address a post, so
// an unknown index is reported before a malformed body.
async fn replace_post(
    PostPath { index }: PostPath,
    State(store): State<Arc<PostStore>>,
    body: JsonBody,
) -> Result<Json<Message>> {
    let index: PostIndex = index.parse()?;
    store
        .replace_post_with(index, || body.decode::<Post>())
        .await?;

    Ok(Message::new("Data Updated Successfully"))
}

async fn patch_post(
    PostPath { index }: PostPath,
    State(store): State<Arc<PostStore>>,
    body: JsonBody,
) -> Result<Json<Post>> {
    let index: PostIndex = index.parse()?;
    let post = store
        .patch_post_with(index, || body.decode::<PostPatch>())
        .await?;

    Ok(Json(post))
}

async fn delete_post(
    PostPath { index }: PostPath,
    State(store): State<Arc<PostStore>>,
) -> Result<Json<Message>> {
    let index: PostIndex = index.parse()?;
    store.delete_post(index).await?;

    Ok(Message::new("Data Deleted Successfully"))
}
