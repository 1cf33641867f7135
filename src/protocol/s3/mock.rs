//! In-memory S3 implementation for testing
//!
//! [`MockS3`] implements [`S3Operations`] over a sorted map, so listing
//! order, prefix filtering and pagination behave like `ListObjectsV2`.
//! Failures can be injected per prefix or per key.

use super::error::{S3Error, S3Result};
use super::operations::S3Operations;
use super::types::{ListPage, S3Object, DIRECTORY_CONTENT_TYPE};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// Page size used when the caller does not ask for one
pub const DEFAULT_MOCK_PAGE_SIZE: usize = 1000;

#[derive(Debug, Clone)]
struct MockObject {
    data: Vec<u8>,
    content_type: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    objects: BTreeMap<(String, String), MockObject>,
    failing_prefixes: HashSet<String>,
    failing_gets: HashSet<String>,
    failing_reads: HashSet<String>,
    list_calls: usize,
    get_calls: Vec<String>,
}

/// In-memory object store
///
/// # Example
///
/// ```rust
/// use s3_download::protocol::s3::mock::MockS3;
///
/// let store = MockS3::new();
/// store.put_object("bucket", "logs/a.txt", b"hello");
/// store.put_directory_marker("bucket", "logs/");
/// ```
#[derive(Debug, Clone)]
pub struct MockS3 {
    state: Arc<RwLock<MockState>>,
    page_size: usize,
}

impl MockS3 {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockState::default())),
            page_size: DEFAULT_MOCK_PAGE_SIZE,
        }
    }

    /// Limit how many keys a single listing page may return
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Store an object with a generic binary content type
    pub fn put_object(&self, bucket: &str, key: &str, data: &[u8]) {
        self.put_object_with_type(bucket, key, data, Some("application/octet-stream"));
    }

    /// Store an object with an explicit content type
    pub fn put_object_with_type(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        content_type: Option<&str>,
    ) {
        let object = MockObject {
            data: data.to_vec(),
            content_type: content_type.map(str::to_string),
        };
        self.write()
            .objects
            .insert((bucket.to_string(), key.to_string()), object);
    }

    /// Store a zero-byte folder placeholder
    pub fn put_directory_marker(&self, bucket: &str, key: &str) {
        self.put_object_with_type(bucket, key, &[], Some(DIRECTORY_CONTENT_TYPE));
    }

    /// Make every listing request for `prefix` fail
    pub fn fail_listing(&self, prefix: &str) {
        self.write().failing_prefixes.insert(prefix.to_string());
    }

    /// Make `GetObject` for `key` fail
    pub fn fail_get(&self, key: &str) {
        self.write().failing_gets.insert(key.to_string());
    }

    /// Make the body stream for `key` fail after the headers were returned
    pub fn fail_read(&self, key: &str) {
        self.write().failing_reads.insert(key.to_string());
    }

    /// Number of listing requests served so far
    pub fn list_calls(&self) -> usize {
        self.read().list_calls
    }

    /// Keys requested through `GetObject`, in request order
    pub fn get_calls(&self) -> Vec<String> {
        self.read().get_calls.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, MockState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, MockState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MockS3 {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl S3Operations for MockS3 {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        cursor: Option<String>,
        max_keys: Option<i32>,
    ) -> S3Result<ListPage> {
        let mut state = self.write();
        state.list_calls += 1;

        if state.failing_prefixes.contains(prefix) {
            return Err(S3Error::List {
                prefix: prefix.to_string(),
                message: "injected listing failure".to_string(),
            });
        }

        let limit = max_keys
            .and_then(|m| usize::try_from(m).ok())
            .filter(|m| *m > 0)
            .map_or(self.page_size, |m| m.min(self.page_size));

        // The cursor is the last key of the previous page
        let mut matching = state
            .objects
            .keys()
            .filter(|(b, k)| b == bucket && k.starts_with(prefix))
            .map(|(_, k)| k)
            .filter(|k| cursor.as_deref().map_or(true, |after| k.as_str() > after));

        let keys: Vec<String> = matching.by_ref().take(limit).cloned().collect();
        let has_more = matching.next().is_some();

        let next_cursor = if has_more { keys.last().cloned() } else { None };

        Ok(ListPage { keys, next_cursor })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> S3Result<S3Object> {
        let mut state = self.write();
        state.get_calls.push(key.to_string());

        if state.failing_gets.contains(key) {
            return Err(S3Error::Network(format!("injected failure fetching {}", key)));
        }

        let object = state
            .objects
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| S3Error::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })?;

        let body: super::types::ObjectBody = if state.failing_reads.contains(key) {
            Box::new(FailingReader)
        } else {
            Box::new(io::Cursor::new(object.data.clone()))
        };

        Ok(S3Object {
            key: key.to_string(),
            content_type: object.content_type,
            content_length: Some(object.data.len() as u64),
            body,
        })
    }
}

/// Body that fails on the first read
struct FailingReader;

impl AsyncRead for FailingReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "injected read failure",
        )))
    }
}
