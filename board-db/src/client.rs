use crate::{
    record::{PostRecord, UserRecord},
    schema::Backend,
};
use board_common::model::{
    Id,
    post::{CreatePost, Post, PostMarker},
    user::{Credentials, User, UserMarker},
};
use sqlx::{
    Any, AnyPool, Row,
    any::{AnyArguments, AnyPoolOptions},
    pool::PoolConnection,
    query::Query,
    query_as, raw_sql,
};
use thiserror::Error;
use tracing::{debug, info};

pub use sqlx::Error as SqlxError;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

pub type Result<T, E = DbError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unsupported database backend: {0}")]
    UnsupportedBackend(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DbError {
    /// Whether the store could not be reached at all, as opposed to rejecting a query.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            DbError::Sqlx(
                sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
                    | sqlx::Error::WorkerCrashed
            )
        )
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct DbConfig {
    /// `postgres://…`, `mysql://…` or `sqlite:…`
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug)]
pub struct DbClient {
    pool: AnyPool,
}

impl DbClient {
    pub async fn connect(config: &DbConfig) -> Result<Self> {
        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    /// Opens a private in-memory SQLite store.
    ///
    /// The pool keeps exactly one connection alive forever, since every SQLite memory
    /// connection is its own database.
    pub async fn connect_in_memory() -> Result<Self> {
        sqlx::any::install_default_drivers();

        let pool = AnyPoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Ok(Self { pool })
    }

    pub async fn create_schema(&self) -> Result<()> {
        let mut session = self.session().await?;
        debug!(backend = ?session.backend, "Creating missing tables");

        for statement in session.backend.statements() {
            raw_sql(&statement).execute(&mut *session.conn).await?;
        }

        Ok(())
    }

    /// Checks out a connection for the lifetime of the returned session.
    pub async fn session(&self) -> Result<DbSession> {
        let conn = self.pool.acquire().await?;

        let backend_name = conn.backend_name();
        let backend = Backend::from_name(backend_name)
            .ok_or_else(|| DbError::UnsupportedBackend(backend_name.to_owned()))?;

        Ok(DbSession { conn, backend })
    }

    pub async fn close(&self) {
        info!("Closing database pool");
        self.pool.close().await;
    }
}

/// A checked-out store connection. It goes back to the pool on drop.
///
/// Statements run in autocommit mode, so every write is committed as soon as it returns.
#[derive(Debug)]
pub struct DbSession {
    conn: PoolConnection<Any>,
    backend: Backend,
}

impl DbSession {
    /// Runs an `INSERT` and returns the id the store assigned to the new row.
    async fn insert<'q>(&mut self, query: Query<'q, Any, AnyArguments<'q>>) -> Result<i64> {
        if self.backend.supports_returning() {
            let row = query.fetch_one(&mut *self.conn).await?;
            return Ok(row.try_get("id")?);
        }

        query
            .execute(&mut *self.conn)
            .await?
            .last_insert_id()
            .ok_or(DbError::Sqlx(sqlx::Error::RowNotFound))
    }

    pub async fn fetch_user_by_username(&mut self, username: &str) -> Result<Option<User>> {
        let record = query_as::<_, UserRecord>(&self.backend.sql(
            "
            SELECT
                users.id AS id,
                users.username AS username
            FROM
                users
            WHERE
                users.username = $1
            ORDER BY
                users.id
            LIMIT 1
            ",
        ))
        .bind(username)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(record.map(User::from))
    }

    /// Finds the user whose username and password both match exactly.
    pub async fn fetch_user_by_credentials(
        &mut self,
        credentials: &Credentials,
    ) -> Result<Option<User>> {
        let record = query_as::<_, UserRecord>(&self.backend.sql(
            "
            SELECT
                users.id AS id,
                users.username AS username
            FROM
                users
            WHERE
                users.username = $1
                AND users.password = $2
            ORDER BY
                users.id
            LIMIT 1
            ",
        ))
        .bind(&credentials.username)
        .bind(credentials.password)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(record.map(User::from))
    }

    pub async fn create_user(&mut self, credentials: &Credentials) -> Result<User> {
        let sql = self.backend.returning_id(
            "
            INSERT INTO users (username, password)
            VALUES ($1, $2)
            ",
        );
        let query = sqlx::query(&sql)
            .bind(&credentials.username)
            .bind(credentials.password);
        let user_id = self.insert(query).await?;

        Ok(User {
            id: user_id.into(),
            username: credentials.username.clone(),
        })
    }

    pub async fn fetch_post(&mut self, post_id: Id<PostMarker>) -> Result<Option<Post>> {
        let record = query_as::<_, PostRecord>(&self.backend.sql(
            "
            SELECT
                posts.id AS id,
                posts.title AS title,
                posts.content AS content,
                posts.author_id AS author_id,
                users.username AS author_username
            FROM
                posts LEFT JOIN users ON users.id = posts.author_id
            WHERE
                posts.id = $1
            ",
        ))
        .bind(post_id.get())
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(record.map(Post::from))
    }

    pub async fn fetch_posts(&mut self) -> Result<Vec<Post>> {
        let records = query_as::<_, PostRecord>(&self.backend.sql(
            "
            SELECT
                posts.id AS id,
                posts.title AS title,
                posts.content AS content,
                posts.author_id AS author_id,
                users.username AS author_username
            FROM
                posts LEFT JOIN users ON users.id = posts.author_id
            ORDER BY
                posts.id
            ",
        ))
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(records.into_iter().map(Post::from).collect())
    }

    /// Posts written by `author_id`; empty when the user has none or does not exist.
    pub async fn fetch_user_posts(&mut self, author_id: Id<UserMarker>) -> Result<Vec<Post>> {
        let records = query_as::<_, PostRecord>(&self.backend.sql(
            "
            SELECT
                posts.id AS id,
                posts.title AS title,
                posts.content AS content,
                posts.author_id AS author_id,
                users.username AS author_username
            FROM
                posts LEFT JOIN users ON users.id = posts.author_id
            WHERE
                posts.author_id = $1
            ORDER BY
                posts.id
            ",
        ))
        .bind(author_id.get())
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(records.into_iter().map(Post::from).collect())
    }

    /// Inserts the post without checking that its author exists.
    pub async fn create_post(&mut self, post: &CreatePost) -> Result<Post> {
        let sql = self.backend.returning_id(
            "
            INSERT INTO posts (title, content, author_id)
            VALUES ($1, $2, $3)
            ",
        );
        let query = sqlx::query(&sql)
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.author_id.get());
        let post_id = self.insert(query).await?;

        self.fetch_post(post_id.into())
            .await?
            .ok_or(DbError::Sqlx(sqlx::Error::RowNotFound))
    }
}
