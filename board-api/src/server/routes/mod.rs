use crate::server::ServerRouter;

mod pages;
mod posts;
mod users;

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .merge(pages::routes())
        .merge(users::routes())
        .merge(posts::routes())
}

/// Where a request for `path` should go if it only missed a route by a trailing slash.
///
/// `/signup` leads to `/signup/` and `/posts/5/` to `/posts/5`. Paths that match no route
/// either way get `None`.
pub fn slash_redirect(path: &str) -> Option<String> {
    let toggled = match path.strip_suffix('/') {
        Some("") => return None,
        Some(trimmed) => trimmed.to_owned(),
        None => format!("{path}/"),
    };

    let known = [pages::PATHS, users::PATHS, posts::PATHS]
        .concat()
        .into_iter()
        .any(|pattern| matches_pattern(pattern, &toggled));

    known.then_some(toggled)
}

/// Segment-wise match, where a `{param}` segment stands for any non-empty segment.
fn matches_pattern(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(expected), Some(actual)) => {
                let is_param = expected.starts_with('{') && expected.ends_with('}');
                if !(expected == actual || (is_param && !actual.is_empty())) {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
