//! Remote operation error types

use thiserror::Error;

/// Classification of a provider failure
///
/// Only the kinds the deployment engine branches on are distinguished;
/// everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The addressed resource does not exist
    NotFound,
    /// An update was rejected because it would change nothing
    NoChanges,
    /// The provider rejected the request payload (e.g. a template)
    Validation,
    Other,
}

/// A failed call to a remote service
#[derive(Error, Debug, Clone)]
#[error("{operation} failed{}: {message}", code_suffix(.code))]
pub struct CloudError {
    /// Remote operation name (e.g. "HeadBucket")
    pub operation: &'static str,

    pub kind: ErrorKind,

    /// Provider error code, if the provider returned one
    pub code: Option<String>,

    pub message: String,
}

impl CloudError {
    pub fn new(operation: &'static str, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            code: None,
            message: message.into(),
        }
    }

    pub fn not_found(operation: &'static str, message: impl Into<String>) -> Self {
        Self::new(operation, ErrorKind::NotFound, message)
    }

    pub fn other(operation: &'static str, message: impl Into<String>) -> Self {
        Self::new(operation, ErrorKind::Other, message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    pub fn is_no_changes(&self) -> bool {
        self.kind == ErrorKind::NoChanges
    }
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_ref().map(|c| format!(" ({c})")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, CloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_code() {
        let err = CloudError::not_found("HeadBucket", "bucket svc-prod-us-east-1 not found")
            .with_code("NotFound");
        assert_eq!(
            err.to_string(),
            "HeadBucket failed (NotFound): bucket svc-prod-us-east-1 not found"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_display_without_code() {
        let err = CloudError::other("PutObject", "connection reset");
        assert_eq!(err.to_string(), "PutObject failed: connection reset");
        assert!(!err.is_not_found());
        assert!(!err.is_no_changes());
    }
}
