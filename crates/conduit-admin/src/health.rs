use http::StatusCode;

/// Liveness check, always 200 with an empty body
pub async fn health_handler() -> StatusCode {
    StatusCode::OK
}
