//! The dev-server index middleware installed by `configure_server`.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    routing::get,
};
use combo_config::PluginOptions;
use combo_plugin::{ComboPlugin, DEV_SERVER_INDEX_HTML, PluginSession};
use http_body_util::BodyExt;
use tower::ServiceExt;

fn router() -> (ComboPlugin, Router) {
    let plugin = ComboPlugin::new(PluginOptions::new("js/app.js"))
        .unwrap()
        .with_session(Arc::new(PluginSession::new().with_stdin_watch(false)));

    let router = Router::new()
        .route("/index.html", get(|| async { "vite index" }))
        .route("/src/app.js", get(|| async { "console.log('app')" }));

    let router = plugin.configure_server(router);
    (plugin, router)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn index_html_is_not_served() {
    let (_plugin, router) = router();

    let response = router
        .oneshot(Request::get("/index.html").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()["content-type"],
        "text/html; charset=utf-8"
    );
    assert_eq!(body_text(response).await, DEV_SERVER_INDEX_HTML);
}

#[tokio::test]
async fn other_requests_pass_through() {
    let (_plugin, router) = router();

    let response = router
        .oneshot(Request::get("/src/app.js").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "console.log('app')");
}

#[tokio::test]
async fn configure_server_installs_handlers_once() {
    let (plugin, _router) = router();
    assert!(plugin.session().handlers_bound());

    let _ = plugin.configure_server(Router::<()>::new());
    assert!(plugin.session().handlers_bound());
}
