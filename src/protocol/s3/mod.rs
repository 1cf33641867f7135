//! Native S3 protocol implementation
//!
//! This module provides AWS S3 support using the official AWS SDK for Rust.
//! It supports standard S3 as well as S3-compatible services like MinIO.
//!
//! # Features
//!
//! - Pure Rust implementation using `aws-sdk-s3`
//! - Credentials from explicit keys, a named profile, or the default chain
//! - Region or custom endpoint routing, optional path-style addressing
//! - Lazy, paginated key enumeration over one or more prefixes
//! - Streaming object bodies
//!
//! # Examples
//!
//! ## Enumerating a prefix
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use s3_download::protocol::s3::{enumerate_prefix, ConnectOptions, S3Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = S3Client::connect(ConnectOptions {
//!         region: Some("us-west-2".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//!     let keys: Vec<_> = enumerate_prefix(&client, "my-bucket", "logs/", None)
//!         .try_collect()
//!         .await?;
//!     println!("{} keys", keys.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Using MinIO or S3-Compatible Storage
//!
//! ```no_run
//! use s3_download::protocol::s3::{ConnectOptions, CredentialsMode, S3Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = S3Client::connect(ConnectOptions {
//!         endpoint: Some("http://localhost:9000".to_string()),
//!         region: Some("us-east-1".to_string()), // Only used for signing
//!         path_style: Some(true),
//!         credentials: CredentialsMode::explicit("minioadmin", "minioadmin"),
//!         ..Default::default()
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod enumerate;
mod error;
mod operations;
mod types;

pub mod mock;

#[cfg(test)]
mod tests;

// Re-export main types
pub use client::S3Client;
pub use config::{
    AuthenticationInfo, ConnectOptions, ConnectionConfig, CredentialsMode, Location,
    DEFAULT_SIGNING_REGION,
};
pub use enumerate::{enumerate_prefix, enumerate_prefixes, EnumeratedKey};
pub use error::{ConnectCause, S3Error, S3Result};
pub use types::{ListPage, ObjectBody, S3Object, DIRECTORY_CONTENT_TYPE, KEY_SEPARATOR};

// Re-export operations trait for extensibility
pub use operations::S3Operations;
