mod harness;

use harness::config::ConfigBuilder;
use harness::server::TestServer;

fn docs() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("dist")).unwrap();
    std::fs::write(dir.path().join("dist/app.css"), "body {}").unwrap();
    std::fs::write(dir.path().join("admin.html"), "<html></html>").unwrap();
    std::fs::write(dir.path().join("admin.yaml"), "openapi: 3.0.0").unwrap();
    dir
}

#[tokio::test]
async fn assets_are_served_with_cache_headers() {
    let dir = docs();
    let server = TestServer::start(ConfigBuilder::new().with_static_root(dir.path()).build())
        .await
        .unwrap();

    let resp = server.client().get(server.url("/dist/app.css")).send().await.unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["cache-control"], "public, max-age=60");
    assert_eq!(resp.headers()["content-type"], "text/css");
    assert!(resp.headers().contains_key("etag"));
    assert_eq!(resp.text().await.unwrap(), "body {}");

    let resp = server.client().get(server.url("/admin.html")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "text/html; charset=utf-8");
}

#[tokio::test]
async fn conditional_requests_are_not_modified() {
    let dir = docs();
    let server = TestServer::start(ConfigBuilder::new().with_static_root(dir.path()).build())
        .await
        .unwrap();

    let resp = server
        .client()
        .get(server.url("/admin.yaml"))
        .header("if-none-match", "\"0\"")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 304);
}

#[tokio::test]
async fn missing_asset_is_not_found_problem() {
    let dir = docs();
    let server = TestServer::start(ConfigBuilder::new().with_static_root(dir.path()).build())
        .await
        .unwrap();

    let resp = server.client().get(server.url("/dist/missing.js")).send().await.unwrap();

    assert_eq!(resp.status(), 404);
    let problem: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(problem["type"], "/errors/route-not-found");
}
