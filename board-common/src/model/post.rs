use crate::{
    model::{Id, user::UserMarker},
    util::lenient_int,
};
use serde::{Deserialize, Serialize};

pub const POST_TITLE_MAX_LEN: usize = 200;
pub const POST_CONTENT_MAX_LEN: usize = 500;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct PostMarker;

/// A post joined with its author's username.
///
/// `author_username` is `None` when `author_id` does not name an existing user, which the
/// store allows.
#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct Post {
    pub id: Id<PostMarker>,
    pub title: String,
    pub content: String,
    pub author_id: Id<UserMarker>,
    pub author_username: Option<String>,
}

#[derive(Clone, Eq, PartialEq, Debug, Default, Hash, Deserialize, Serialize)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
    #[serde(deserialize_with = "lenient_int::deserialize")]
    pub author_id: Id<UserMarker>,
}
