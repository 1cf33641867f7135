//! S3 operations trait and implementations

use super::client::S3Client;
use super::error::{S3Error, S3Result};
use super::types::{ListPage, S3Object};
use async_trait::async_trait;

/// The remote calls the download engine needs.
///
/// [`S3Client`] talks to a real service; [`super::mock::MockS3`] keeps
/// objects in memory for tests.
#[async_trait]
pub trait S3Operations: Send + Sync {
    /// Fetch one page of keys under `prefix`, continuing from `cursor`
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        cursor: Option<String>,
        max_keys: Option<i32>,
    ) -> S3Result<ListPage>;

    /// Fetch an object's metadata and an unread body stream
    async fn get_object(&self, bucket: &str, key: &str) -> S3Result<S3Object>;
}

#[async_trait]
impl S3Operations for S3Client {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        cursor: Option<String>,
        max_keys: Option<i32>,
    ) -> S3Result<ListPage> {
        let mut request = self
            .aws_client()
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix);

        if let Some(token) = cursor {
            request = request.continuation_token(token);
        }

        if let Some(max) = max_keys {
            request = request.max_keys(max);
        }

        let response = request.send().await.map_err(|e| S3Error::List {
            prefix: prefix.to_string(),
            message: S3Error::from(e).to_string(),
        })?;

        let keys = response
            .contents()
            .iter()
            .filter_map(|obj| obj.key().map(|k| k.to_string()))
            .collect();

        let next_cursor = if response.is_truncated().unwrap_or(false) {
            response.next_continuation_token().map(|s| s.to_string())
        } else {
            None
        };

        Ok(ListPage { keys, next_cursor })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> S3Result<S3Object> {
        let response = self
            .aws_client()
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.to_string().contains("404") || format!("{:?}", e).contains("NoSuchKey") {
                    S3Error::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                } else {
                    S3Error::from(e)
                }
            })?;

        Ok(S3Object {
            key: key.to_string(),
            content_type: response.content_type().map(|s| s.to_string()),
            content_length: response
                .content_length()
                .and_then(|len| u64::try_from(len).ok()),
            body: Box::new(Box::pin(response.body.into_async_read())),
        })
    }
}
