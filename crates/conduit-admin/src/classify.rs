use conduit_core::{ErrorKind, ManagerError};
use http::StatusCode;

use crate::decode::DecodeError;
use crate::problem::{ProblemResponse, ProblemTable};

/// Outcome category of a failed admin request
///
/// The snake_case name is the `error_type` telemetry tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    EmptyContext,
    RequestBodyRead,
    JsonUnmarshal,
    MissingParam,
    MissingFilters,
    InvalidParam,
    Validation,
    NotFound,
    Internal,
}

impl Category {
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::EmptyContext | Self::RequestBodyRead | Self::JsonUnmarshal | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::MissingParam | Self::MissingFilters | Self::InvalidParam | Self::Validation => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }

    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl From<ErrorKind> for Category {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Validation => Self::Validation,
            ErrorKind::NotFound => Self::NotFound,
            ErrorKind::Internal => Self::Internal,
        }
    }
}

/// A classified failure ready to be written
#[derive(Debug)]
pub struct Failure {
    pub category: Category,
    pub problem: ProblemResponse,
}

/// Classify a manager failure using the endpoint's problem table
///
/// Only the error kind is consulted; the message becomes the detail.
pub fn classify(error: &ManagerError, table: &ProblemTable, instance: &str) -> Failure {
    let category = Category::from(error.kind());
    let entry = match error.kind() {
        ErrorKind::Validation => table.validation,
        ErrorKind::NotFound => table.not_found,
        ErrorKind::Internal => table.internal,
    };

    Failure {
        category,
        problem: ProblemResponse::from_entry(category.status_code(), entry, error.message(), instance),
    }
}

/// Problem for a request whose transport context is unusable
pub fn empty_context(instance: &str) -> Failure {
    let category = Category::EmptyContext;

    Failure {
        category,
        problem: ProblemResponse::new(
            category.status_code(),
            "/errors/empty-context",
            "context is empty error",
            "request context is missing",
            instance,
        ),
    }
}

/// Problem for a decode-time rejection
///
/// `purpose` completes the sentence "it is required for ..." in the detail
/// of missing-parameter problems.
pub fn decode_failure(error: &DecodeError, purpose: &str, instance: &str) -> Failure {
    let category = error.category();
    let status = category.status_code();

    let problem = match error {
        DecodeError::BodyRead(reason) => ProblemResponse::new(
            status,
            "/errors/request-body-read",
            "request body reader error",
            reason.as_str(),
            instance,
        ),
        DecodeError::JsonUnmarshal(reason) => {
            ProblemResponse::new(status, "/errors/json-unmarshal", "json unmarshaller error", reason.as_str(), instance)
        }
        DecodeError::MissingParam { name } => ProblemResponse::new(
            status,
            format!("/errors/missing-param-{}", kebab(name)),
            format!("{name} is empty"),
            format!("{name} param is missing from the request url. it is required for {purpose}."),
            instance,
        ),
        DecodeError::MissingFilters => ProblemResponse::new(
            status,
            "/errors/missing-filteres",
            "filters are not found",
            format!("filters are missing from the request url. it is required for {purpose}."),
            instance,
        ),
        DecodeError::InvalidParam { name, reason } => ProblemResponse::new(
            status,
            format!("/errors/invalid-param-{}", kebab(name)),
            format!("{name} is invalid"),
            reason.as_str(),
            instance,
        ),
    };

    Failure { category, problem }
}

fn kebab(name: &str) -> String {
    use convert_case::{Case, Casing};

    name.to_case(Case::Kebab)
}
