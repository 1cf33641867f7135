//! Integration tests for the S3 protocol against a live service
//!
//! These tests require a running S3-compatible service (AWS S3, MinIO, LocalStack, etc.)
//! with some objects under `S3_TEST_PREFIX`. Set the following environment variables:
//!
//! - `S3_TEST_BUCKET`: Bucket name for testing
//! - `S3_TEST_PREFIX`: Prefix holding at least one object (default: `s3-download-test/`)
//! - `S3_TEST_REGION`: AWS region (default: us-east-1)
//! - `S3_TEST_ENDPOINT`: Custom endpoint for MinIO/LocalStack (optional)
//! - `AWS_ACCESS_KEY_ID`: Access key (optional, uses credential chain if not set)
//! - `AWS_SECRET_ACCESS_KEY`: Secret key (optional, uses credential chain if not set)
//! - `S3_TESTS_ENABLED`: Set to "1" to enable integration tests

use super::*;
use crate::core::{DownloadRequest, Downloader, RecordingListener};
use futures::TryStreamExt;
use std::env;

/// Check if S3 integration tests should run
fn s3_tests_enabled() -> bool {
    env::var("S3_TESTS_ENABLED").unwrap_or_default() == "1"
}

fn test_bucket() -> String {
    env::var("S3_TEST_BUCKET").unwrap_or_else(|_| "s3-download-test-bucket".to_string())
}

fn test_prefix() -> String {
    env::var("S3_TEST_PREFIX").unwrap_or_else(|_| "s3-download-test/".to_string())
}

/// Get connection options from environment
fn get_test_options() -> ConnectOptions {
    let endpoint = env::var("S3_TEST_ENDPOINT").ok();

    let credentials = match (
        env::var("AWS_ACCESS_KEY_ID").ok(),
        env::var("AWS_SECRET_ACCESS_KEY").ok(),
    ) {
        (Some(access_key), Some(secret_key)) => CredentialsMode::explicit(access_key, secret_key),
        _ => CredentialsMode::DefaultChain,
    };

    ConnectOptions {
        region: Some(env::var("S3_TEST_REGION").unwrap_or_else(|_| "us-east-1".to_string())),
        // Use path-style for MinIO/LocalStack
        path_style: endpoint.as_ref().map(|_| true),
        endpoint,
        credentials,
        bucket: Some(test_bucket()),
        verify_connection: true,
        ..Default::default()
    }
}

#[tokio::test]
#[ignore]
async fn test_connection() {
    if !s3_tests_enabled() {
        println!("Skipping S3 integration test - set S3_TESTS_ENABLED=1 to run");
        return;
    }

    S3Client::connect(get_test_options())
        .await
        .expect("Failed to connect to S3");
}

#[tokio::test]
#[ignore]
async fn test_enumerate_live_prefix() {
    if !s3_tests_enabled() {
        return;
    }

    let client = S3Client::connect(get_test_options())
        .await
        .expect("Failed to connect to S3");
    let bucket = test_bucket();
    let prefix = test_prefix();

    let paged: Vec<EnumeratedKey> = enumerate_prefix(&client, &bucket, &prefix, Some(1))
        .try_collect()
        .await
        .expect("Failed to list prefix");
    let unpaged: Vec<EnumeratedKey> = enumerate_prefix(&client, &bucket, &prefix, None)
        .try_collect()
        .await
        .expect("Failed to list prefix");

    assert!(!paged.is_empty(), "prefix {} holds no objects", prefix);
    assert_eq!(paged, unpaged);
    assert!(paged.iter().all(|k| k.key.starts_with(&prefix)));
}

#[tokio::test]
#[ignore]
async fn test_download_live_prefix() {
    if !s3_tests_enabled() {
        return;
    }

    let client = S3Client::connect(get_test_options())
        .await
        .expect("Failed to connect to S3");
    let temp = tempfile::TempDir::new().unwrap();
    let root = temp.path().to_string_lossy().to_string();

    let request = DownloadRequest::new(test_bucket(), vec![test_prefix()], root, true).unwrap();
    let listener = RecordingListener::new();
    let report = Downloader::new(&client, &request)
        .with_listener(&listener)
        .run()
        .await;

    assert!(!report.has_failures(), "{:?}", report.failures);
    assert_eq!(listener.downloaded_keys().len(), report.succeeded);
}
