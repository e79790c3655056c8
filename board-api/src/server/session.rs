use crate::server::ServerError;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use board_db::client::{DbClient, DbSession};
use std::sync::Arc;

/// A store connection scoped to the current request.
///
/// It is checked out before the handler runs and returned to the pool when the handler's
/// future is dropped, whether the handler succeeded, failed or was cancelled.
///
/// Request-parts extractors run before the body is read, so handlers that take a body open
/// their session from `State<Arc<DbClient>>` once the body has arrived instead. A client
/// stalling mid-upload then holds no connection.
#[derive(Debug)]
pub struct DbConn(pub DbSession);

impl<S> FromRequestParts<S> for DbConn
where
    Arc<DbClient>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Arc::<DbClient>::from_ref(state).session().await?;

        Ok(Self(session))
    }
}
