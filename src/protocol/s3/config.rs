//! Connection configuration for the S3 client
//!
//! A [`ConnectionConfig`] is resolved once per run from caller inputs and is
//! immutable afterwards. Invalid combinations are rejected by
//! [`ConnectionConfig::new`] so that the client builder never sees them.

use super::error::{ConnectCause, S3Error, S3Result};
use std::fmt;
use url::Url;

/// Signing region used with a custom endpoint when nothing else resolves
pub const DEFAULT_SIGNING_REGION: &str = "us-east-1";

/// Username/password pair handed over by a caller that thinks in terms of
/// generic authentication rather than access keys
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticationInfo {
    pub username: String,
    pub password: String,
}

impl AuthenticationInfo {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for AuthenticationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationInfo")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where credentials come from
#[derive(Clone, PartialEq, Eq, Default)]
pub enum CredentialsMode {
    /// Static access key / secret key pair
    Explicit {
        access_key: String,
        secret_key: String,
        session_token: Option<String>,
    },

    /// Named profile from the shared AWS config/credentials files
    Profile(String),

    /// Environment, shared files, web identity, container and instance metadata
    #[default]
    DefaultChain,
}

impl CredentialsMode {
    /// Static credentials without a session token
    pub fn explicit(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        CredentialsMode::Explicit {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
        }
    }

    /// Apply credential precedence: explicit authentication beats whatever
    /// mode was requested, then explicit keys, then profile, then the chain.
    pub fn resolve(auth: Option<&AuthenticationInfo>, requested: CredentialsMode) -> Self {
        match auth {
            Some(auth) => CredentialsMode::explicit(&auth.username, &auth.password),
            None => requested,
        }
    }

    /// Short description of the credential source, safe to log
    pub fn source_name(&self) -> String {
        match self {
            CredentialsMode::Explicit { .. } => "explicit credentials".to_string(),
            CredentialsMode::Profile(name) => format!("profile '{}'", name),
            CredentialsMode::DefaultChain => "default credential chain".to_string(),
        }
    }
}

impl fmt::Debug for CredentialsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialsMode::Explicit {
                access_key,
                session_token,
                ..
            } => f
                .debug_struct("Explicit")
                .field("access_key", access_key)
                .field("secret_key", &"<redacted>")
                .field("session_token", &session_token.as_ref().map(|_| "<redacted>"))
                .finish(),
            CredentialsMode::Profile(name) => f.debug_tuple("Profile").field(name).finish(),
            CredentialsMode::DefaultChain => f.write_str("DefaultChain"),
        }
    }
}

/// Request routing target. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Standard AWS endpoint for the region
    Region(String),

    /// Custom endpoint; the region is only used to sign requests
    Endpoint { url: String, signing_region: String },
}

impl Location {
    /// Region used for request signing
    pub fn signing_region(&self) -> &str {
        match self {
            Location::Region(region) => region,
            Location::Endpoint { signing_region, .. } => signing_region,
        }
    }

    /// Custom endpoint, if one is in effect
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Location::Region(_) => None,
            Location::Endpoint { url, .. } => Some(url),
        }
    }

    /// Diagnostic prefix used when a connection attempt fails
    pub fn failure_message(&self) -> String {
        describe_failure(self.endpoint(), Some(self.signing_region()))
    }
}

/// Caller inputs for establishing a connection
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    /// Generic authentication; when set it is used as explicit credentials
    pub auth: Option<AuthenticationInfo>,

    /// AWS region (e.g., "us-east-1")
    pub region: Option<String>,

    /// Custom endpoint URL (for S3-compatible services like MinIO)
    pub endpoint: Option<String>,

    /// Path-style addressing; `None` keeps the SDK default
    pub path_style: Option<bool>,

    /// Requested credential source
    pub credentials: CredentialsMode,

    /// Bucket to probe with `HeadBucket` when `verify_connection` is set
    pub bucket: Option<String>,

    /// Probe the bucket while connecting
    pub verify_connection: bool,
}

/// Immutable, fully resolved connection configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    credentials: CredentialsMode,
    location: Location,
    path_style: Option<bool>,
}

impl ConnectionConfig {
    /// Build a configuration from resolved inputs.
    ///
    /// `region` must already be resolved (explicit or from the provider chain).
    /// With an endpoint, a missing region falls back to
    /// [`DEFAULT_SIGNING_REGION`]; without one, a missing region is an error.
    pub fn new(
        credentials: CredentialsMode,
        region: Option<String>,
        endpoint: Option<&str>,
        path_style: Option<bool>,
    ) -> S3Result<Self> {
        let region = region.filter(|r| !r.trim().is_empty());
        let endpoint = endpoint.map(str::trim).filter(|e| !e.is_empty());

        let location = match endpoint {
            Some(endpoint) => {
                let signing_region = region.unwrap_or_else(|| DEFAULT_SIGNING_REGION.to_string());
                Url::parse(endpoint).map_err(|source| S3Error::Authentication {
                    message: describe_failure(Some(endpoint), Some(&signing_region)),
                    cause: ConnectCause::InvalidEndpoint {
                        endpoint: endpoint.to_string(),
                        source,
                    },
                })?;
                Location::Endpoint {
                    url: endpoint.to_string(),
                    signing_region,
                }
            }
            None => match region {
                Some(region) => Location::Region(region),
                None => {
                    return Err(S3Error::Authentication {
                        message: describe_failure(None, None),
                        cause: ConnectCause::MissingLocation,
                    })
                }
            },
        };

        if let CredentialsMode::Explicit {
            access_key,
            secret_key,
            ..
        } = &credentials
        {
            if access_key.is_empty() || secret_key.is_empty() {
                return Err(S3Error::Authentication {
                    message: location.failure_message(),
                    cause: ConnectCause::IncompleteCredentials,
                });
            }
        }

        Ok(Self {
            credentials,
            location,
            path_style,
        })
    }

    pub fn credentials(&self) -> &CredentialsMode {
        &self.credentials
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn path_style(&self) -> Option<bool> {
        self.path_style
    }

    /// Check if using custom endpoint (S3-compatible service)
    pub fn is_custom_endpoint(&self) -> bool {
        matches!(self.location, Location::Endpoint { .. })
    }
}

fn describe_failure(endpoint: Option<&str>, region: Option<&str>) -> String {
    let region = region.unwrap_or("<unresolved>");
    match endpoint {
        Some(endpoint) => format!(
            "Failed to connect to endpoint [{}] using region [{}]",
            endpoint, region
        ),
        None => format!("Failed to connect using region [{}]", region),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_only() {
        let config = ConnectionConfig::new(
            CredentialsMode::DefaultChain,
            Some("eu-west-1".to_string()),
            None,
            None,
        )
        .unwrap();

        assert_eq!(config.location(), &Location::Region("eu-west-1".to_string()));
        assert!(!config.is_custom_endpoint());
        assert_eq!(config.path_style(), None);
    }

    #[test]
    fn test_endpoint_wins_over_region() {
        let config = ConnectionConfig::new(
            CredentialsMode::DefaultChain,
            Some("eu-west-1".to_string()),
            Some("http://localhost:9000"),
            Some(true),
        )
        .unwrap();

        let location = config.location();
        assert_eq!(location.endpoint(), Some("http://localhost:9000"));
        assert_eq!(location.signing_region(), "eu-west-1");
        assert!(config.is_custom_endpoint());
        assert_eq!(config.path_style(), Some(true));
    }

    #[test]
    fn test_endpoint_without_region_uses_default_signing_region() {
        let config = ConnectionConfig::new(
            CredentialsMode::DefaultChain,
            None,
            Some("http://minio:9000"),
            None,
        )
        .unwrap();
        assert_eq!(config.location().signing_region(), DEFAULT_SIGNING_REGION);
    }

    #[test]
    fn test_missing_location_rejected() {
        let err = ConnectionConfig::new(CredentialsMode::DefaultChain, None, None, None)
            .unwrap_err();
        match err {
            S3Error::Authentication { message, cause } => {
                assert_eq!(message, "Failed to connect using region [<unresolved>]");
                assert!(matches!(cause, ConnectCause::MissingLocation));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_endpoint_names_endpoint_not_region() {
        let err = ConnectionConfig::new(
            CredentialsMode::DefaultChain,
            Some("eu-west-1".to_string()),
            Some("not a url"),
            None,
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("endpoint [not a url]"), "{message}");
        assert!(message.contains("using region [eu-west-1]"), "{message}");
    }

    #[test]
    fn test_incomplete_explicit_credentials_rejected() {
        let err = ConnectionConfig::new(
            CredentialsMode::explicit("AKIA", ""),
            Some("us-east-1".to_string()),
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            S3Error::Authentication {
                cause: ConnectCause::IncompleteCredentials,
                ..
            }
        ));
    }

    #[test]
    fn test_credential_precedence() {
        let auth = AuthenticationInfo::new("user", "pass");
        let resolved =
            CredentialsMode::resolve(Some(&auth), CredentialsMode::Profile("dev".to_string()));
        assert_eq!(resolved, CredentialsMode::explicit("user", "pass"));

        let resolved = CredentialsMode::resolve(None, CredentialsMode::Profile("dev".to_string()));
        assert_eq!(resolved, CredentialsMode::Profile("dev".to_string()));

        assert_eq!(
            CredentialsMode::resolve(None, CredentialsMode::default()),
            CredentialsMode::DefaultChain
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mode = CredentialsMode::explicit("AKIA", "super-secret");
        let rendered = format!("{:?}", mode);
        assert!(rendered.contains("AKIA"));
        assert!(!rendered.contains("super-secret"));

        let auth = AuthenticationInfo::new("user", "hunter2");
        assert!(!format!("{:?}", auth).contains("hunter2"));
    }
}
