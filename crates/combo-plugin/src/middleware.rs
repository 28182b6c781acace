//! Dev-server middleware.

use axum::{
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Page shown when someone opens the dev server itself in a browser.
pub const DEV_SERVER_INDEX_HTML: &str = include_str!("../assets/dev-server-index.html");

/// Answer `/index.html` with a 404 explaining that the application, not
/// the dev server, serves pages. Everything else passes through.
pub async fn dev_server_index(request: Request, next: Next) -> Response {
    let is_index = request
        .uri()
        .path_and_query()
        .is_some_and(|pq| pq.as_str() == "/index.html");

    if is_index {
        return (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            DEV_SERVER_INDEX_HTML,
        )
            .into_response();
    }

    next.run(request).await
}
