//! Error types for S3 operations

use std::io;
use thiserror::Error;

/// Result type alias for S3 operations
pub type S3Result<T> = Result<T, S3Error>;

/// Errors that can occur during S3 operations
#[derive(Error, Debug)]
pub enum S3Error {
    /// The connection could not be established. Fatal for the whole run.
    ///
    /// `message` names the endpoint and signing region, or the region, that
    /// was in effect when the failure happened.
    #[error("{message}")]
    Authentication {
        message: String,
        #[source]
        cause: ConnectCause,
    },

    /// Listing a prefix failed
    #[error("Failed to list objects under prefix '{prefix}': {message}")]
    List { prefix: String, message: String },

    /// Object not found in bucket
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// Access denied error
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// S3 service error with specific error code
    #[error("S3 service error ({code}): {message}")]
    Service { code: String, message: String },

    /// AWS SDK error
    #[error("AWS SDK error: {0}")]
    Sdk(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Underlying reason a connection could not be established
#[derive(Error, Debug)]
pub enum ConnectCause {
    /// The endpoint is not a valid absolute URL
    #[error("invalid endpoint URL '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// Neither an endpoint nor a region could be resolved
    #[error("no endpoint was configured and no region could be resolved")]
    MissingLocation,

    /// Explicit credentials were supplied but are incomplete
    #[error("explicit credentials require a non-empty access key and secret key")]
    IncompleteCredentials,

    /// The connection probe was rejected by the service
    #[error("connection probe failed: {0}")]
    Probe(String),
}

impl S3Error {
    /// Create an error from an AWS SDK error
    pub fn from_sdk<E: std::error::Error>(error: E) -> Self {
        S3Error::Sdk(error.to_string())
    }

    /// Check if this error aborts the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, S3Error::Authentication { .. })
    }
}

/// Convert AWS SDK errors to S3Error
impl<E> From<aws_sdk_s3::error::SdkError<E>> for S3Error
where
    E: std::error::Error + 'static,
{
    fn from(error: aws_sdk_s3::error::SdkError<E>) -> Self {
        use aws_sdk_s3::error::SdkError;

        match error {
            SdkError::DispatchFailure(e) => {
                S3Error::Network(format!("Network dispatch failure: {:?}", e))
            }
            SdkError::ResponseError(e) => S3Error::Network(format!("Response error: {:?}", e)),
            SdkError::TimeoutError(_) => S3Error::Network("Request timed out".to_string()),
            SdkError::ServiceError(e) => {
                let err_str = format!("{:?}", e.err());

                if err_str.contains("NoSuchBucket") {
                    S3Error::Service {
                        code: "NoSuchBucket".to_string(),
                        message: "The specified bucket does not exist".to_string(),
                    }
                } else if err_str.contains("AccessDenied") {
                    S3Error::AccessDenied("Access denied to resource".to_string())
                } else {
                    S3Error::Service {
                        code: "Unknown".to_string(),
                        message: err_str,
                    }
                }
            }
            other => S3Error::from_sdk(other),
        }
    }
}
