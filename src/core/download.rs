/*!
 * Download orchestration - mode selection, destination paths and the
 * sequential per-key transfer loop
 */

use std::path::PathBuf;
use std::pin::pin;

use futures::StreamExt;
use tracing::{debug, info};

use super::progress::{DownloadListener, TracingListener};
use super::transfer::{transfer_object, DownloadTask};
use crate::error::{DownloadError, Result};
use crate::protocol::s3::{enumerate_prefixes, EnumeratedKey, S3Operations, KEY_SEPARATOR};
use crate::stats::DownloadReport;

static TRACING_LISTENER: TracingListener = TracingListener;

/// What to download and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    bucket: String,
    keys: Vec<String>,
    download_path: String,
    strip_prefix: bool,
    page_size: Option<i32>,
}

/// How the requested keys are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode<'a> {
    /// One object, written to the download path itself
    SingleObject(&'a str),

    /// Each key is a prefix to expand, in order
    Prefixes(&'a [String]),
}

impl DownloadRequest {
    /// Validate inputs. `keys` must be non-empty and keep their order.
    pub fn new(
        bucket: impl Into<String>,
        keys: Vec<String>,
        download_path: impl Into<String>,
        strip_prefix: bool,
    ) -> Result<Self> {
        let bucket = bucket.into();
        let download_path = download_path.into();

        if bucket.trim().is_empty() {
            return Err(DownloadError::Config("bucket must not be empty".to_string()));
        }
        if keys.is_empty() {
            return Err(DownloadError::Config(
                "at least one key or prefix is required".to_string(),
            ));
        }
        if download_path.is_empty() {
            return Err(DownloadError::Config(
                "download path must not be empty".to_string(),
            ));
        }

        Ok(Self {
            bucket,
            keys,
            download_path,
            strip_prefix,
            page_size: None,
        })
    }

    /// Ask the service for at most `page_size` keys per listing page
    pub fn with_page_size(mut self, page_size: Option<i32>) -> Self {
        self.page_size = page_size.filter(|size| *size > 0);
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn download_path(&self) -> &str {
        &self.download_path
    }

    pub fn strip_prefix(&self) -> bool {
        self.strip_prefix
    }

    /// Pick the download mode.
    ///
    /// A single key is expanded as a prefix when it ends with `/` or when the
    /// prefix is to be stripped; otherwise it is one literal object. Several
    /// keys are always expanded as prefixes.
    pub fn mode(&self) -> DownloadMode<'_> {
        match self.keys.as_slice() {
            [key] if !key.ends_with(KEY_SEPARATOR) && !self.strip_prefix => {
                DownloadMode::SingleObject(key)
            }
            keys => DownloadMode::Prefixes(keys),
        }
    }

    /// Local path for a key found under a prefix
    pub fn destination_for(&self, listed: &EnumeratedKey) -> PathBuf {
        let relative = if self.strip_prefix {
            listed.relative_key()
        } else {
            listed.key.as_str()
        };
        PathBuf::from(format!("{}/{}", self.download_path, relative))
    }
}

/// Drives one download run over a connected store
pub struct Downloader<'a, S: ?Sized> {
    store: &'a S,
    request: &'a DownloadRequest,
    listener: &'a dyn DownloadListener,
}

impl<'a, S> Downloader<'a, S>
where
    S: S3Operations + ?Sized,
{
    /// Downloader that logs through `tracing`
    pub fn new(store: &'a S, request: &'a DownloadRequest) -> Self {
        Self {
            store,
            request,
            listener: &TRACING_LISTENER,
        }
    }

    /// Report events to `listener` instead of the log
    pub fn with_listener(mut self, listener: &'a dyn DownloadListener) -> Self {
        self.listener = listener;
        self
    }

    /// Download everything the request selects, one object at a time.
    ///
    /// Per-object and per-prefix failures are reported and skipped over; the
    /// returned report is the only aggregate.
    pub async fn run(&self) -> DownloadReport {
        let mut report = DownloadReport::default();

        match self.request.mode() {
            DownloadMode::SingleObject(key) => {
                info!(bucket = %self.request.bucket, key, "Downloading object");
                let task = DownloadTask::new(key, &self.request.download_path);
                self.download(&task, &mut report).await;
            }
            DownloadMode::Prefixes(prefixes) => {
                info!(
                    bucket = %self.request.bucket,
                    prefixes = ?prefixes,
                    strip_prefix = self.request.strip_prefix,
                    "Downloading prefixes"
                );
                let mut keys = pin!(enumerate_prefixes(
                    self.store,
                    &self.request.bucket,
                    prefixes,
                    self.request.page_size,
                ));

                while let Some(item) = keys.next().await {
                    match item {
                        Ok(listed) => {
                            let task = DownloadTask::new(
                                listed.key.clone(),
                                self.request.destination_for(&listed),
                            );
                            self.download(&task, &mut report).await;
                        }
                        Err(e) => {
                            self.listener.on_listing_failed(&e);
                            report.record_listing_failure(&e);
                        }
                    }
                }
            }
        }

        self.listener.on_complete(&report);
        report
    }

    async fn download(&self, task: &DownloadTask, report: &mut DownloadReport) {
        debug!(key = %task.source_key, destination = %task.destination.display(), "Transferring");
        let outcome = transfer_object(self.store, &self.request.bucket, task).await;
        self.listener.on_transfer(task, &outcome);
        report.record(task, &outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(keys: &[&str], strip_prefix: bool) -> DownloadRequest {
        DownloadRequest::new(
            "bucket",
            keys.iter().map(|k| k.to_string()).collect(),
            "/out",
            strip_prefix,
        )
        .unwrap()
    }

    fn listed(prefix: &str, key: &str) -> EnumeratedKey {
        EnumeratedKey {
            prefix: prefix.to_string(),
            key: key.to_string(),
        }
    }

    #[test]
    fn test_mode_single_key_with_separator_expands() {
        let req = request(&["logs/"], false);
        assert_eq!(req.mode(), DownloadMode::Prefixes(&["logs/".to_string()]));
        let req = request(&["logs/"], true);
        assert!(matches!(req.mode(), DownloadMode::Prefixes(_)));
    }

    #[test]
    fn test_mode_single_key_with_strip_expands() {
        let req = request(&["logs"], true);
        assert_eq!(req.mode(), DownloadMode::Prefixes(&["logs".to_string()]));
    }

    #[test]
    fn test_mode_single_literal_object() {
        let req = request(&["readme.txt"], false);
        assert_eq!(req.mode(), DownloadMode::SingleObject("readme.txt"));
    }

    #[test]
    fn test_mode_multiple_keys_always_expand() {
        let req = request(&["a", "b/"], false);
        match req.mode() {
            DownloadMode::Prefixes(keys) => assert_eq!(keys, &["a".to_string(), "b/".to_string()]),
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn test_destination_keeps_full_key() {
        let req = request(&["logs/"], false);
        assert_eq!(
            req.destination_for(&listed("logs/", "logs/2020/a.txt")),
            PathBuf::from("/out/logs/2020/a.txt")
        );
    }

    #[test]
    fn test_destination_strips_prefix() {
        let req = request(&["logs/"], true);
        assert_eq!(
            req.destination_for(&listed("logs/", "logs/2020/a.txt")),
            PathBuf::from("/out/2020/a.txt")
        );

        let req = request(&["logs"], true);
        assert_eq!(
            req.destination_for(&listed("logs", "logs/2020/a.txt")),
            PathBuf::from("/out//2020/a.txt")
        );
    }

    #[test]
    fn test_request_validation() {
        assert!(DownloadRequest::new("bucket", vec![], "/out", false).is_err());
        assert!(DownloadRequest::new("", vec!["k".to_string()], "/out", false).is_err());
        assert!(DownloadRequest::new("bucket", vec!["k".to_string()], "", false).is_err());
    }

    #[test]
    fn test_page_size_ignores_non_positive() {
        let req = request(&["a/"], false).with_page_size(Some(0));
        assert_eq!(req.page_size, None);
        let req = request(&["a/"], false).with_page_size(Some(50));
        assert_eq!(req.page_size, Some(50));
    }
}
