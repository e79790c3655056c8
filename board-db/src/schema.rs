//! Table definitions, created at start-up when missing.
//!
//! The store does not enforce unique usernames or that `posts.author_id` names an existing
//! user; both are left to the request handlers.

use board_common::model::{
    post::{POST_CONTENT_MAX_LEN, POST_TITLE_MAX_LEN},
    user::USERNAME_MAX_LEN,
};
use std::borrow::Cow;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub(crate) enum Backend {
    Postgres,
    Sqlite,
    MySql,
}

impl Backend {
    /// Maps the name reported by `AnyConnection::backend_name`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "PostgreSQL" => Some(Self::Postgres),
            "SQLite" => Some(Self::Sqlite),
            "MySQL" => Some(Self::MySql),
            _ => None,
        }
    }

    /// MySQL has no `INSERT … RETURNING`; the new id comes from `last_insert_id` instead.
    pub fn supports_returning(self) -> bool {
        !matches!(self, Backend::MySql)
    }

    /// Rewrites `$1, $2, …` placeholders into the `?` form MySQL expects.
    ///
    /// Every query here binds its parameters in the order the placeholders appear.
    pub fn sql(self, query: &str) -> Cow<'_, str> {
        if self != Backend::MySql {
            return Cow::Borrowed(query);
        }

        let mut rewritten = String::with_capacity(query.len());
        let mut chars = query.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '$' && chars.peek().is_some_and(char::is_ascii_digit) {
                while chars.next_if(char::is_ascii_digit).is_some() {}
                rewritten.push('?');
            } else {
                rewritten.push(c);
            }
        }

        Cow::Owned(rewritten)
    }

    /// Adapts an `INSERT` so the new row's id can be read back as an `id` column.
    pub fn returning_id(self, statement: &str) -> Cow<'_, str> {
        let statement = self.sql(statement);
        if self.supports_returning() {
            Cow::Owned(format!("{} RETURNING id", statement.trim_end()))
        } else {
            statement
        }
    }

    fn id_column(self) -> &'static str {
        match self {
            Backend::Postgres => "id BIGSERIAL PRIMARY KEY",
            Backend::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
            Backend::MySql => "id BIGINT AUTO_INCREMENT PRIMARY KEY",
        }
    }

    fn integer_type(self) -> &'static str {
        match self {
            Backend::Postgres | Backend::MySql => "BIGINT",
            Backend::Sqlite => "INTEGER",
        }
    }

    pub fn statements(self) -> Vec<String> {
        let id = self.id_column();
        let integer = self.integer_type();

        let users = format!(
            "
            CREATE TABLE IF NOT EXISTS users (
                {id},
                username VARCHAR({USERNAME_MAX_LEN}) NOT NULL,
                password {integer} NOT NULL{users_index}
            )
            ",
            users_index = self.inline_index("users_username_idx", "username"),
        );
        let posts = format!(
            "
            CREATE TABLE IF NOT EXISTS posts (
                {id},
                title VARCHAR({POST_TITLE_MAX_LEN}) NOT NULL,
                content VARCHAR({POST_CONTENT_MAX_LEN}) NOT NULL,
                author_id {integer} NOT NULL{posts_index}
            )
            ",
            posts_index = self.inline_index("posts_author_id_idx", "author_id"),
        );

        match self {
            // MySQL has no `CREATE INDEX IF NOT EXISTS`, so its indexes live in the table.
            Backend::MySql => vec![users, posts],
            Backend::Postgres | Backend::Sqlite => vec![
                users,
                "CREATE INDEX IF NOT EXISTS users_username_idx ON users (username)".to_owned(),
                posts,
                "CREATE INDEX IF NOT EXISTS posts_author_id_idx ON posts (author_id)".to_owned(),
            ],
        }
    }

    fn inline_index(self, name: &str, column: &str) -> String {
        match self {
            Backend::MySql => format!(",\n                INDEX {name} ({column})"),
            Backend::Postgres | Backend::Sqlite => String::new(),
        }
    }
}
