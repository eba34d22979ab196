use std::sync::Arc;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use crate::problem::ProblemResponse;

/// Header carrying the admin password
pub const ADMIN_KEY_HEADER: &str = "x-api-key";

/// Reject admin requests whose `X-API-KEY` does not equal the admin password
///
/// Paths in `public_paths` (the health check) are always let through.
pub async fn admin_auth_middleware(
    password: SecretString,
    public_paths: Arc<[String]>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();

    if public_paths.iter().any(|p| p == path) {
        return next.run(request).await;
    }

    let provided = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if provided == Some(password.expose_secret()) {
        return next.run(request).await;
    }

    let instance = request
        .extensions()
        .get::<MatchedPath>()
        .map_or(path, MatchedPath::as_str);

    tracing::debug!(path, "admin request rejected: X-API-KEY missing or wrong");

    ProblemResponse::new(
        StatusCode::UNAUTHORIZED,
        "/errors/unauthorized",
        "unauthorized",
        "X-API-KEY header is missing or does not match the admin password",
        instance,
    )
    .into_response()
}
