//! Documentation assets served next to the admin API

use std::path::Path;

use axum::Router;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use conduit_config::StaticAssetsConfig;
use http::header::{CACHE_CONTROL, CONTENT_TYPE, ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH};
use http::{HeaderValue, StatusCode};
use tower_http::services::{ServeDir, ServeFile};

use crate::router::{method_not_allowed_problem, route_not_found_problem};

/// Router for `/dist/*`, `/admin.html` and `/admin.yaml` under the asset root
pub fn static_router(config: &StaticAssetsConfig) -> Router {
    let max_age = config.max_age;

    Router::new()
        .nest_service("/dist", ServeDir::new(config.root.join("dist")))
        .route_service("/admin.html", ServeFile::new(config.root.join("admin.html")))
        .route_service("/admin.yaml", ServeFile::new(config.root.join("admin.yaml")))
        .layer(axum::middleware::from_fn(move |req, next| static_cache_middleware(max_age, req, next)))
}

/// Cache headers for static assets
///
/// Any conditional request header is answered with 304 immediately; the
/// presented validator is not compared with the ETag, which is the current
/// unix second in hex.
pub async fn static_cache_middleware(max_age: u64, request: Request, next: Next) -> Response {
    let cache_control = HeaderValue::from_str(&format!("public, max-age={max_age}"));
    let etag = HeaderValue::from_str(&format!("\"{:x}\"", jiff::Timestamp::now().as_second()));

    let conditional = request.headers().contains_key(IF_NONE_MATCH) || request.headers().contains_key(IF_MODIFIED_SINCE);

    let path = request.uri().path().to_owned();
    let content_type = content_type_for(&path);

    let mut response = if conditional {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        let method = request.method().clone();
        let response = next.run(request).await;

        match response.status() {
            StatusCode::NOT_FOUND => return route_not_found_problem(&path).into_response(),
            StatusCode::METHOD_NOT_ALLOWED => return method_not_allowed_problem(&method, &path).into_response(),
            _ => response,
        }
    };

    let headers = response.headers_mut();
    if let Ok(value) = cache_control {
        headers.insert(CACHE_CONTROL, value);
    }
    if let Ok(value) = etag {
        headers.insert(ETAG, value);
    }

    if response.status().is_success()
        && let Some(content_type) = content_type
    {
        response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }

    response
}

/// Content type for recognized asset extensions
pub fn content_type_for(path: &str) -> Option<&'static str> {
    let extension = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();

    let content_type = match extension.as_str() {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => return None,
    };

    Some(content_type)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;

    fn assets() -> (tempfile::TempDir, StaticAssetsConfig) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("dist")).unwrap();
        std::fs::write(dir.path().join("dist/app.js"), "console.log(1)").unwrap();
        std::fs::write(dir.path().join("admin.html"), "<html></html>").unwrap();
        std::fs::write(dir.path().join("admin.yaml"), "openapi: 3.0.0").unwrap();

        let config = StaticAssetsConfig {
            enabled: true,
            root: dir.path().to_path_buf(),
            max_age: 3600,
        };

        (dir, config)
    }

    fn get(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[test]
    fn recognizes_extensions_case_insensitively() {
        assert_eq!(content_type_for("/dist/app.JS"), Some("application/javascript"));
        assert_eq!(content_type_for("/admin.html"), Some("text/html; charset=utf-8"));
        assert_eq!(content_type_for("/dist/logo.jpeg"), Some("image/jpeg"));
        assert_eq!(content_type_for("/admin.yaml"), None);
        assert_eq!(content_type_for("/dist/"), None);
    }

    #[tokio::test]
    async fn serves_file_with_cache_headers() {
        let (_dir, config) = assets();

        let response = static_router(&config).oneshot(get("/dist/app.js")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CACHE_CONTROL], "public, max-age=3600");
        assert_eq!(response.headers()[CONTENT_TYPE], "application/javascript");
        let etag = response.headers()[ETAG].to_str().unwrap().to_owned();
        assert!(etag.starts_with('"') && etag.ends_with('"'));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"console.log(1)");
    }

    #[tokio::test]
    async fn any_if_none_match_yields_not_modified() {
        let (_dir, config) = assets();

        let request = Request::builder()
            .uri("/admin.html")
            .header(IF_NONE_MATCH, "anything")
            .body(Body::empty())
            .unwrap();
        let response = static_router(&config).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
        assert!(response.headers().contains_key(ETAG));
        assert!(response.headers().get(CONTENT_TYPE).is_none());
    }

    #[tokio::test]
    async fn if_modified_since_also_yields_not_modified() {
        let (_dir, config) = assets();

        let request = Request::builder()
            .uri("/dist/app.js")
            .header(IF_MODIFIED_SINCE, "Wed, 21 Oct 2015 07:28:00 GMT")
            .body(Body::empty())
            .unwrap();
        let response = static_router(&config).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn unknown_extension_keeps_served_content_type() {
        let (_dir, config) = assets();

        let response = static_router(&config).oneshot(get("/admin.yaml")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_ne!(
            response.headers().get(CONTENT_TYPE).map(HeaderValue::as_bytes),
            Some(b"application/json".as_slice())
        );
    }

    #[tokio::test]
    async fn missing_asset_is_a_problem_response() {
        let (_dir, config) = assets();

        let response = static_router(&config).oneshot(get("/dist/missing.css")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let problem: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(problem["type"], "/errors/route-not-found");
        assert_eq!(problem["status"], 404);
    }
}
