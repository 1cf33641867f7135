/*!
 * Configuration types for s3-download
 */

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::DownloadRequest;
use crate::error::{DownloadError, Result};
use crate::protocol::s3::{ConnectOptions, CredentialsMode};

/// Inputs for one download run
///
/// Loaded from a TOML file and/or filled in from command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Bucket to download from
    pub bucket: String,

    /// Keys or prefixes, processed in order
    pub keys: Vec<String>,

    /// Local file (single object) or directory (prefixes)
    pub download_path: String,

    /// Remove the requested prefix from local file names
    pub strip_prefix: bool,

    /// AWS region (e.g., "us-east-1")
    pub region: Option<String>,

    /// Custom endpoint URL (for S3-compatible services like MinIO)
    pub endpoint: Option<String>,

    /// Path-style addressing (None = SDK default)
    pub path_style: Option<bool>,

    /// AWS profile name to use
    pub profile: Option<String>,

    /// AWS access key ID (optional - uses profile or credential chain if not provided)
    pub access_key: Option<String>,

    /// AWS secret access key
    pub secret_key: Option<String>,

    /// Session token (for temporary credentials)
    pub session_token: Option<String>,

    /// Maximum keys per listing page
    pub page_size: Option<i32>,

    /// Probe the bucket with HeadBucket before downloading
    pub verify_connection: bool,

    /// Log level for diagnostic output
    pub log_level: LogLevel,

    /// Log file path (None = stderr)
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    pub verbose: bool,
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl DownloadConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            DownloadError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Credential source: explicit keys, then profile, then the default chain
    pub fn credentials(&self) -> Result<CredentialsMode> {
        match (&self.access_key, &self.secret_key) {
            (Some(access_key), Some(secret_key)) => Ok(CredentialsMode::Explicit {
                access_key: access_key.clone(),
                secret_key: secret_key.clone(),
                session_token: self.session_token.clone(),
            }),
            (None, None) => Ok(match &self.profile {
                Some(profile) => CredentialsMode::Profile(profile.clone()),
                None => CredentialsMode::DefaultChain,
            }),
            _ => Err(DownloadError::Config(
                "Both access_key and secret_key must be provided together".to_string(),
            )),
        }
    }

    /// Connection inputs for [`crate::protocol::s3::S3Client::connect`]
    pub fn connect_options(&self) -> Result<ConnectOptions> {
        Ok(ConnectOptions {
            auth: None,
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            path_style: self.path_style,
            credentials: self.credentials()?,
            bucket: Some(self.bucket.clone()),
            verify_connection: self.verify_connection,
        })
    }

    /// Validated download request
    pub fn download_request(&self) -> Result<DownloadRequest> {
        Ok(DownloadRequest::new(
            self.bucket.clone(),
            self.keys.clone(),
            self.download_path.clone(),
            self.strip_prefix,
        )?
        .with_page_size(self.page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DownloadMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = DownloadConfig::default();
        assert!(!config.strip_prefix);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.path_style, None);
        assert_eq!(config.credentials().unwrap(), CredentialsMode::DefaultChain);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            bucket = "artifacts"
            keys = ["releases/", "docs/"]
            download_path = "/tmp/out"
            strip_prefix = true
            endpoint = "http://localhost:9000"
            path_style = true
            profile = "ci"
            page_size = 100
            log_level = "debug"
        "#;

        let config: DownloadConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bucket, "artifacts");
        assert_eq!(config.keys, vec!["releases/", "docs/"]);
        assert_eq!(config.path_style, Some(true));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(
            config.credentials().unwrap(),
            CredentialsMode::Profile("ci".to_string())
        );

        let request = config.download_request().unwrap();
        assert!(matches!(request.mode(), DownloadMode::Prefixes(keys) if keys.len() == 2));

        let options = config.connect_options().unwrap();
        assert_eq!(options.endpoint.as_deref(), Some("http://localhost:9000"));
        assert_eq!(options.bucket.as_deref(), Some("artifacts"));
    }

    #[test]
    fn test_explicit_keys_win_over_profile() {
        let config = DownloadConfig {
            access_key: Some("AKIA".to_string()),
            secret_key: Some("secret".to_string()),
            profile: Some("ci".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.credentials().unwrap(),
            CredentialsMode::explicit("AKIA", "secret")
        );
    }

    #[test]
    fn test_half_credentials_rejected() {
        let config = DownloadConfig {
            access_key: Some("AKIA".to_string()),
            ..Default::default()
        };
        assert!(matches!(config.credentials(), Err(DownloadError::Config(_))));
        assert!(config.connect_options().is_err());
    }

    #[test]
    fn test_empty_keys_rejected() {
        let config = DownloadConfig {
            bucket: "b".to_string(),
            download_path: "/out".to_string(),
            ..Default::default()
        };
        assert!(config.download_request().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "bucket = \"b\"\nkeys = [\"readme.txt\"]\ndownload_path = \"/out/readme.txt\"").unwrap();

        let config = DownloadConfig::from_file(file.path()).unwrap();
        let request = config.download_request().unwrap();
        assert_eq!(request.mode(), DownloadMode::SingleObject("readme.txt"));
    }

    #[test]
    fn test_from_missing_file() {
        let err = DownloadConfig::from_file(Path::new("/nonexistent/s3-download.toml")).unwrap_err();
        assert!(matches!(err, DownloadError::Config(_)));
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
        assert_eq!(LogLevel::Info.to_tracing_level(), tracing::Level::INFO);
        assert_eq!(LogLevel::Debug.to_tracing_level(), tracing::Level::DEBUG);
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
    }
}
