//! S3 client implementation

use super::config::{ConnectOptions, ConnectionConfig, CredentialsMode};
use super::error::{ConnectCause, S3Error, S3Result};
use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileRegionProvider;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::Client as AwsS3Client;
use tracing::debug;

/// Connected session bound to one [`ConnectionConfig`]
#[derive(Clone)]
pub struct S3Client {
    /// AWS S3 client
    client: AwsS3Client,

    /// Resolved connection configuration
    config: ConnectionConfig,
}

impl S3Client {
    /// Resolve credentials, region/endpoint and addressing style, then connect.
    ///
    /// Credentials: `auth` if given, otherwise `options.credentials`. Location:
    /// the endpoint if given (region only signs), otherwise the explicit region
    /// or the provider chain's region.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use s3_download::protocol::s3::{ConnectOptions, S3Client};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = S3Client::connect(ConnectOptions {
    ///         region: Some("eu-west-1".to_string()),
    ///         ..Default::default()
    ///     })
    ///     .await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn connect(options: ConnectOptions) -> S3Result<Self> {
        let credentials = CredentialsMode::resolve(options.auth.as_ref(), options.credentials);
        let region = resolve_region(options.region.as_deref(), &credentials).await;
        let config = ConnectionConfig::new(
            credentials,
            region,
            options.endpoint.as_deref(),
            options.path_style,
        )?;

        let client = Self::from_config(config).await;

        if options.verify_connection {
            if let Some(bucket) = options.bucket.as_deref() {
                client.probe(bucket).await?;
            }
        }

        debug!(
            endpoint = client.config.location().endpoint().unwrap_or("<aws>"),
            region = client.config.location().signing_region(),
            credentials = %client.config.credentials().source_name(),
            "Connected to S3"
        );

        Ok(client)
    }

    /// Build a client from an already resolved configuration
    pub async fn from_config(config: ConnectionConfig) -> Self {
        let client = Self::build_aws_client(&config).await;
        Self { client, config }
    }

    /// Build the AWS SDK S3 client from configuration
    async fn build_aws_client(config: &ConnectionConfig) -> AwsS3Client {
        let location = config.location();

        let mut aws_config_loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(location.signing_region().to_string()));

        match config.credentials() {
            CredentialsMode::Explicit {
                access_key,
                secret_key,
                session_token,
            } => {
                let credentials = Credentials::new(
                    access_key,
                    secret_key,
                    session_token.clone(),
                    None,
                    "s3-download-explicit",
                );
                aws_config_loader = aws_config_loader.credentials_provider(credentials);
            }
            CredentialsMode::Profile(name) => {
                aws_config_loader = aws_config_loader.profile_name(name);
            }
            CredentialsMode::DefaultChain => {}
        }

        let aws_config = aws_config_loader.load().await;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&aws_config);

        if let Some(endpoint) = location.endpoint() {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        if let Some(path_style) = config.path_style() {
            s3_config_builder = s3_config_builder.force_path_style(path_style);
        }

        AwsS3Client::from_conf(s3_config_builder.build())
    }

    /// Check that the bucket is reachable with the resolved credentials
    async fn probe(&self, bucket: &str) -> S3Result<()> {
        self.client
            .head_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| S3Error::Authentication {
                message: self.config.location().failure_message(),
                cause: ConnectCause::Probe(S3Error::from(e).to_string()),
            })?;
        Ok(())
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Get a reference to the underlying AWS S3 client
    pub fn aws_client(&self) -> &AwsS3Client {
        &self.client
    }
}

/// Explicit region first, then the selected profile's region, then the
/// default provider chain (environment, shared config, instance metadata).
async fn resolve_region(explicit: Option<&str>, credentials: &CredentialsMode) -> Option<String> {
    if let Some(region) = explicit.filter(|r| !r.trim().is_empty()) {
        return Some(region.to_string());
    }

    let chain = match credentials {
        CredentialsMode::Profile(name) => RegionProviderChain::first_try(
            ProfileFileRegionProvider::builder()
                .profile_name(name)
                .build(),
        )
        .or_default_provider(),
        _ => RegionProviderChain::default_provider(),
    };

    chain.region().await.map(|r| r.to_string())
}
