use crate::server::{JsonBody, Result, ServerError, ServerRouter};
use axum::{Json, extract::State};
use axum_extra::{
    extract::WithRejection,
    routing::{RouterExt, TypedPath},
};
use board_common::model::user::{Credentials, LoginResponse, SignupResponse};
use board_db::client::DbClient;
use std::sync::Arc;
use tracing::info;

pub(super) const PATHS: &[&str] = &[SignupPath::PATH, LoginPath::PATH];

pub fn routes() -> ServerRouter {
    ServerRouter::new().typed_post(signup).typed_post(login)
}

#[derive(TypedPath)]
#[typed_path("/signup/")]
struct SignupPath;

async fn signup(
    SignupPath: SignupPath,
    State(db_client): State<Arc<DbClient>>,
    WithRejection(Json(credentials), _): JsonBody<Credentials>,
) -> Result<Json<SignupResponse>> {
    let mut db = db_client.session().await?;

    // Nothing in the store stops two concurrent signups from both passing this check.
    if db
        .fetch_user_by_username(&credentials.username)
        .await?
        .is_some()
    {
        return Err(ServerError::UserAlreadyExists(credentials.username));
    }

    let user = db.create_user(&credentials).await?;
    info!(user_id = %user.id, username = %user.username, "Signed up new user");

    Ok(Json(SignupResponse::new(user)))
}

#[derive(TypedPath)]
#[typed_path("/login/")]
struct LoginPath;

async fn login(
    LoginPath: LoginPath,
    State(db_client): State<Arc<DbClient>>,
    WithRejection(Json(credentials), _): JsonBody<Credentials>,
) -> Result<Json<LoginResponse>> {
    let user = db_client
        .session()
        .await?
        .fetch_user_by_credentials(&credentials)
        .await?
        .ok_or(ServerError::InvalidCredentials)?;

    Ok(Json(LoginResponse::new(user)))
}
