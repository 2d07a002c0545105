//! Front-end page handler.

use axum::response::Html;

/// Single-page UI that drives the upload and listing endpoints.
pub const INDEX_HTML: &str = include_str!("../static/index.html");

/// GET / - Serve the script library page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
