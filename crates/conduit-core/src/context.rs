use std::time::Instant;

/// Per-request context inserted by the admin server's middleware
///
/// Handlers refuse to run without it; its absence means the request did
/// not pass through the server's middleware stack.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Random identifier used to correlate log lines of one request
    pub request_id: String,
    /// HTTP method of the request
    pub method: http::Method,
    /// Route template that matched, if any (e.g. `/api/routes/{id}`)
    pub route: Option<String>,
    /// When the middleware first saw the request
    pub received_at: Instant,
}

impl RequestContext {
    /// Create a context with a fresh request id
    pub fn new(method: http::Method, route: Option<String>) -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            method,
            route,
            received_at: Instant::now(),
        }
    }
}
