use crate::server::{Result, ServerRouter};
use askama::Template;
use axum::response::Html;
use axum_extra::routing::{RouterExt, TypedPath};

pub(super) const PATHS: &[&str] = &[
    LoginPagePath::PATH,
    SignupPagePath::PATH,
    PostsPagePath::PATH,
];

pub fn routes() -> ServerRouter {
    ServerRouter::new()
        .typed_get(login_page)
        .typed_get(signup_page)
        .typed_get(posts_page)
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginPage {
    title: &'static str,
}

#[derive(Template)]
#[template(path = "signup.html")]
struct SignupPage {
    title: &'static str,
}

#[derive(Template)]
#[template(path = "posts.html")]
struct PostsPage {
    title: &'static str,
}

fn render(page: &impl Template) -> Result<Html<String>> {
    Ok(Html(page.render()?))
}

#[derive(TypedPath)]
#[typed_path("/")]
struct LoginPagePath;

async fn login_page(LoginPagePath: LoginPagePath) -> Result<Html<String>> {
    render(&LoginPage { title: "Log in" })
}

#[derive(TypedPath)]
#[typed_path("/signup-page")]
struct SignupPagePath;

async fn signup_page(SignupPagePath: SignupPagePath) -> Result<Html<String>> {
    render(&SignupPage { title: "Sign up" })
}

#[derive(TypedPath)]
#[typed_path("/posts-page")]
struct PostsPagePath;

async fn posts_page(PostsPagePath: PostsPagePath) -> Result<Html<String>> {
    render(&PostsPage { title: "Posts" })
}
