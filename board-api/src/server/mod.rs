use axum::{
    Json, Router,
    extract::{
        FromRef, Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::WithRejection;
use board_common::model::{Id, post::PostMarker};
use board_db::client::{DbClient, DbError};
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc};
use thiserror::Error;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, error};

mod routes;
mod session;

pub type ServerRouter = Router<ServerState>;

#[derive(Clone, Debug, FromRef)]
pub struct ServerState {
    pub db_client: Arc<DbClient>,
}

pub fn routes() -> ServerRouter {
    routes::routes().fallback(fallback)
}

/// The complete application: HTML pages, the JSON API and `/static` files from `static_dir`.
pub fn app(state: ServerState, static_dir: &Path) -> Router {
    routes()
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// A JSON request body whose rejection is reported as a [`ServerError`], so clients get the
/// same error shape everywhere.
pub type JsonBody<T> = WithRejection<Json<T>, ServerError>;

/// Sends requests that only missed a route by a trailing slash on to that route with a
/// `307`, which keeps the method and body. Everything else is an unknown route.
pub async fn fallback(request: Request) -> Response {
    let uri = request.into_parts().0.uri;

    match routes::slash_redirect(uri.path()) {
        Some(mut location) => {
            if let Some(query) = uri.query() {
                location.push('?');
                location.push_str(query);
            }
            debug!(from = %uri, to = %location, "Redirecting to route with matching slash");
            Redirect::temporary(&location).into_response()
        }
        None => ServerError::UnknownRoute(uri).into_response(),
    }
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Unknown route requested: {0}")]
    UnknownRoute(Uri),
    #[error("Path rejected: {0}")]
    PathRejection(#[from] PathRejection),
    #[error("Incoming JSON rejected: {0}")]
    JsonRejection(#[from] JsonRejection),
    #[error("Page could not be rendered: {0}")]
    Template(#[from] askama::Error),
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("User already exists")]
    UserAlreadyExists(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Post not found")]
    PostByIdNotFound(Id<PostMarker>),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::UnknownRoute(_)
            | ServerError::PathRejection(_)
            | ServerError::PostByIdNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::JsonRejection(rejection) => rejection.status(),
            ServerError::UserAlreadyExists(_) => StatusCode::BAD_REQUEST,
            ServerError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ServerError::Database(err) if err.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Template(_) | ServerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the client. Server-side failures are not described.
    pub fn detail(&self) -> String {
        match self.status() {
            StatusCode::SERVICE_UNAVAILABLE => "Service unavailable".to_owned(),
            status if status.is_server_error() => "Internal server error".to_owned(),
            _ => self.to_string(),
        }
    }
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub detail: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, %status, "Replying with error");
        } else {
            debug!(error = ?self, %status, "Replying with error");
        }

        let error_response = ErrorResponse {
            status: status.as_u16(),
            detail: self.detail(),
        };
        (status, Json(error_response)).into_response()
    }
}
