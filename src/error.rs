/*!
 * Error types for s3-download
 */

use std::fmt;
use std::io;

use crate::protocol::s3::S3Error;

pub type Result<T> = std::result::Result<T, DownloadError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PARTIAL: i32 = 1;
pub const EXIT_FATAL: i32 = 2;

/// Hint shown in front of any authentication failure
const AUTHENTICATION_HINT: &str = "Unable to authenticate to S3 with the available credentials. \
     Make sure to either pass explicit credentials, select a profile, or define the \
     environment variables / shared config files read by the default AWS credential chain.";

/// Errors that abort a whole run
#[derive(Debug)]
pub enum DownloadError {
    /// Invalid or missing inputs, unreadable configuration file
    Config(String),

    /// The connection to the storage service could not be established
    Authentication(S3Error),

    /// I/O error outside of a single object transfer
    Io(io::Error),
}

impl DownloadError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            DownloadError::Config(_) | DownloadError::Authentication(_) => EXIT_FATAL,
            DownloadError::Io(_) => EXIT_PARTIAL,
        }
    }

    /// Check if this error is fatal for the run
    pub fn is_fatal(&self) -> bool {
        self.exit_code() == EXIT_FATAL
    }
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            DownloadError::Authentication(err) => {
                write!(f, "{}\nDetail: {}", AUTHENTICATION_HINT, err)?;
                if let Some(cause) = std::error::Error::source(err) {
                    write!(f, " ({})", cause)?;
                }
                Ok(())
            }
            DownloadError::Io(err) => {
                write!(f, "I/O error: {}", err)
            }
        }
    }
}

impl std::error::Error for DownloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DownloadError::Authentication(err) => Some(err),
            DownloadError::Io(err) => Some(err),
            DownloadError::Config(_) => None,
        }
    }
}

impl From<io::Error> for DownloadError {
    fn from(err: io::Error) -> Self {
        DownloadError::Io(err)
    }
}

impl From<S3Error> for DownloadError {
    fn from(err: S3Error) -> Self {
        match err {
            S3Error::Authentication { .. } => DownloadError::Authentication(err),
            S3Error::Io(io_err) => DownloadError::Io(io_err),
            other => DownloadError::Config(other.to_string()),
        }
    }
}

impl From<toml::de::Error> for DownloadError {
    fn from(err: toml::de::Error) -> Self {
        DownloadError::Config(format!("TOML parse error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::s3::ConnectCause;

    #[test]
    fn test_authentication_error_message() {
        let err = DownloadError::from(S3Error::Authentication {
            message: "Failed to connect to endpoint [http://minio:9000] using region [us-east-1]"
                .to_string(),
            cause: ConnectCause::MissingLocation,
        });

        let rendered = err.to_string();
        assert!(rendered.starts_with("Unable to authenticate to S3"));
        assert!(rendered.contains("Detail: Failed to connect to endpoint [http://minio:9000]"));
        assert!(rendered.contains("no endpoint was configured"));
        assert_eq!(err.exit_code(), EXIT_FATAL);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_config_error_is_fatal() {
        let err = DownloadError::Config("no keys".to_string());
        assert_eq!(err.to_string(), "Configuration error: no keys");
        assert_eq!(err.exit_code(), EXIT_FATAL);
    }

    #[test]
    fn test_io_conversion() {
        let err: DownloadError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, DownloadError::Io(_)));
        assert!(!err.is_fatal());
    }
}
