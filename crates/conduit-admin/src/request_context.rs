use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use conduit_core::RequestContext;

/// Middleware that attaches a `RequestContext` and writes the access log
///
/// Handlers reject requests that did not pass through here.
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned());
    let path = request.uri().path().to_owned();

    let context = RequestContext::new(request.method().clone(), route);
    request.extensions_mut().insert(context.clone());

    let response = next.run(request).await;

    tracing::info!(
        method = %context.method,
        route = context.route.as_deref().unwrap_or(&path),
        status = response.status().as_u16(),
        latency_ms = context.received_at.elapsed().as_secs_f64() * 1000.0,
        request_id = %context.request_id,
        "admin request"
    );

    response
}
