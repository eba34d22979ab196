/// Closed set of failure kinds a manager can report
///
/// Every manager failure carries exactly one kind. The admin server maps
/// the kind to a status code and problem type without looking at the
/// message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The manager rejected the input
    Validation,
    /// A referenced resource does not exist
    NotFound,
    /// Anything else (storage failure, bug, unavailable dependency)
    Internal,
}

/// Failure returned by every manager operation
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ManagerError {
    kind: ErrorKind,
    message: String,
}

impl ManagerError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_message() {
        let err = ManagerError::not_found("key abc does not exist");
        assert_eq!(err.to_string(), "key abc does not exist");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
