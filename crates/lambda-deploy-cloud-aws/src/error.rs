//! Mapping SDK failures onto `CloudError`

use lambda_deploy_cloud::{CloudError, ErrorKind};
// The smithy error types are shared by every aws-sdk-* crate.
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

/// Convert an SDK failure, keeping the provider code and message
pub(crate) fn remote_error<E, R>(
    operation: &'static str,
    kind: ErrorKind,
    err: &SdkError<E, R>,
) -> CloudError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(err).to_string());

    let error = CloudError::new(operation, kind, message);
    match err.code() {
        Some(code) => error.with_code(code),
        None => error,
    }
}

/// Classify a CloudFormation failure by its code and message
///
/// CloudFormation reports both a missing stack and an empty update as a
/// generic `ValidationError`; only the message tells them apart.
pub(crate) fn classify_cloudformation(code: Option<&str>, message: Option<&str>) -> ErrorKind {
    let message = message.unwrap_or_default();
    match code {
        Some("ValidationError") if message.contains("does not exist") => ErrorKind::NotFound,
        Some("ValidationError") if message.contains("No updates are to be performed") => {
            ErrorKind::NoChanges
        }
        _ => ErrorKind::Other,
    }
}

/// S3 codes meaning the bucket is absent
pub(crate) fn is_missing_bucket_code(code: Option<&str>) -> bool {
    matches!(code, Some("NotFound") | Some("NoSuchBucket") | Some("404"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_stack() {
        assert_eq!(
            classify_cloudformation(
                Some("ValidationError"),
                Some("Stack with id svc-us-east-1-prod does not exist")
            ),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_no_updates() {
        assert_eq!(
            classify_cloudformation(
                Some("ValidationError"),
                Some("No updates are to be performed.")
            ),
            ErrorKind::NoChanges
        );
    }

    #[test]
    fn test_other_validation_errors() {
        assert_eq!(
            classify_cloudformation(Some("ValidationError"), Some("Template format error")),
            ErrorKind::Other
        );
        assert_eq!(
            classify_cloudformation(Some("Throttling"), Some("Rate exceeded")),
            ErrorKind::Other
        );
        assert_eq!(classify_cloudformation(None, None), ErrorKind::Other);
    }

    #[test]
    fn test_missing_bucket_codes() {
        assert!(is_missing_bucket_code(Some("NotFound")));
        assert!(is_missing_bucket_code(Some("NoSuchBucket")));
        assert!(!is_missing_bucket_code(Some("Forbidden")));
        assert!(!is_missing_bucket_code(None));
    }
}
