use crate::server::{JsonBody, Result, ServerError, ServerRouter, session::DbConn};
use axum::{Json, extract::State};
use axum_extra::{
    extract::WithRejection,
    routing::{RouterExt, TypedPath},
};
use board_common::model::{
    Id,
    post::{CreatePost, Post, PostMarker},
    user::UserMarker,
};
use board_db::client::DbClient;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

pub(super) const PATHS: &[&str] = &[PostsPath::PATH, GetPostPath::PATH, GetUserPostsPath::PATH];

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(get_posts)
        .typed_post(create_post)
        .typed_get(get_post)
        .typed_get(get_user_posts)
}

#[derive(TypedPath)]
#[typed_path("/posts/")]
struct PostsPath;

async fn get_posts(PostsPath: PostsPath, DbConn(mut db): DbConn) -> Result<Json<Vec<Post>>> {
    let posts = db.fetch_posts().await?;

    Ok(Json(posts))
}

async fn create_post(
    PostsPath: PostsPath,
    State(db_client): State<Arc<DbClient>>,
    WithRejection(Json(post), _): JsonBody<CreatePost>,
) -> Result<Json<Post>> {
    let post = db_client.session().await?.create_post(&post).await?;
    info!(post_id = %post.id, author_id = %post.author_id, "Created post");

    Ok(Json(post))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/posts/{post_id}", rejection(ServerError))]
struct GetPostPath {
    post_id: Id<PostMarker>,
}

async fn get_post(
    GetPostPath { post_id }: GetPostPath,
    DbConn(mut db): DbConn,
) -> Result<Json<Post>> {
    let post = db
        .fetch_post(post_id)
        .await?
        .ok_or(ServerError::PostByIdNotFound(post_id))?;

    Ok(Json(post))
}

#[derive(TypedPath, Deserialize)]
#[typed_path("/myPosts/{user_id}", rejection(ServerError))]
struct GetUserPostsPath {
    user_id: Id<UserMarker>,
}

async fn get_user_posts(
    GetUserPostsPath { user_id }: GetUserPostsPath,
    DbConn(mut db): DbConn,
) -> Result<Json<Vec<Post>>> {
    let posts = db.fetch_user_posts(user_id).await?;

    Ok(Json(posts))
}
