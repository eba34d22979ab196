//! Problem-detail error payloads

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

pub const VALIDATION: &str = "/errors/validation";
pub const NOT_FOUND: &str = "/errors/not-found";

/// Body of every non-2xx admin response
///
/// `status` always equals the transport status and `instance` is the route
/// template that produced the error, not the interpolated URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemResponse {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub instance: String,
}

impl ProblemResponse {
    pub fn new(
        status: StatusCode,
        r#type: impl Into<String>,
        title: impl Into<String>,
        detail: impl Into<String>,
        instance: impl Into<String>,
    ) -> Self {
        Self {
            r#type: r#type.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: instance.into(),
        }
    }

    /// Problem built from a fixed `(type, title)` pair
    pub fn from_entry(status: StatusCode, entry: ProblemEntry, detail: impl Into<String>, instance: &str) -> Self {
        Self::new(status, entry.r#type, entry.title, detail, instance)
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// A fixed `(type, title)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemEntry {
    pub r#type: &'static str,
    pub title: &'static str,
}

impl ProblemEntry {
    pub const fn new(r#type: &'static str, title: &'static str) -> Self {
        Self { r#type, title }
    }
}

/// Per-endpoint problem pairs, one per manager error kind
#[derive(Debug, Clone, Copy)]
pub struct ProblemTable {
    pub validation: ProblemEntry,
    pub not_found: ProblemEntry,
    pub internal: ProblemEntry,
}

impl ProblemTable {
    /// Table using the shared validation and not-found types
    pub const fn new(
        manager: &'static str,
        internal_title: &'static str,
        validation_title: &'static str,
        not_found_title: &'static str,
    ) -> Self {
        Self {
            validation: ProblemEntry::new(VALIDATION, validation_title),
            not_found: ProblemEntry::new(NOT_FOUND, not_found_title),
            internal: ProblemEntry::new(manager, internal_title),
        }
    }

    #[must_use]
    pub const fn with_not_found(mut self, entry: ProblemEntry) -> Self {
        self.not_found = entry;
        self
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;

    use super::*;

    #[test]
    fn serializes_problem_fields() {
        let problem = ProblemResponse::new(
            StatusCode::NOT_FOUND,
            NOT_FOUND,
            "key is not found",
            "key abc does not exist",
            "/api/key-management/keys/:id",
        );

        insta::assert_json_snapshot!(problem, @r#"
        {
          "type": "/errors/not-found",
          "title": "key is not found",
          "status": 404,
          "detail": "key abc does not exist",
          "instance": "/api/key-management/keys/:id"
        }
        "#);
    }

    #[tokio::test]
    async fn response_status_matches_body_status() {
        let problem = ProblemResponse::new(
            StatusCode::BAD_REQUEST,
            "/errors/missing-param-id",
            "id is empty",
            "",
            "/api/routes/:id",
        );

        let response = problem.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let decoded: ProblemResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(decoded.status, 400);
        assert_eq!(decoded.r#type, "/errors/missing-param-id");
    }

    #[test]
    fn table_overrides_not_found() {
        let table = ProblemTable::new("/errors/key-reporting-manager", "key reporting error", "", "")
            .with_not_found(ProblemEntry::new("/errors/key-not-found", "key not found error"));

        assert_eq!(table.not_found.r#type, "/errors/key-not-found");
        assert_eq!(table.validation.r#type, VALIDATION);
        assert_eq!(table.internal.r#type, "/errors/key-reporting-manager");
    }
}
