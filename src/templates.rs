//! Browser pages rendered from askama templates under `templates/`.
//!
//! Templates escape every interpolated value as HTML.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

#[derive(Template)]
#[template(path = "index.html", escape = "html")]
pub struct IndexTemplate<'a> {
    pub login_path: &'a str,
}

#[derive(Template)]
#[template(path = "authorized.html", escape = "html")]
pub struct AuthorizedTemplate<'a> {
    pub username: &'a str,
    /// Labels of the backends that accepted the token, comma separated.
    pub stored_in: &'a str,
}

#[derive(Template)]
#[template(path = "error.html", escape = "html")]
pub struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub message: &'a str,
}

/// Renders a page with the given status, or a plain 500 if the template fails.
pub fn render_page<T: Template>(status: StatusCode, template: &T) -> Response {
    match template.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page template: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}
