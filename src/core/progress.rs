/*!
 * Download event sink
 *
 * The orchestrator reports every per-object outcome, every failed prefix
 * listing and the final summary to a [`DownloadListener`] it was handed.
 * [`TracingListener`] turns these into log records; [`RecordingListener`]
 * keeps them in memory.
 */

use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, error, info, warn};

use super::transfer::{DownloadTask, SkipReason, TransferOutcome};
use crate::protocol::s3::S3Error;
use crate::stats::DownloadReport;

/// Receives download events as they happen
pub trait DownloadListener: Send + Sync {
    /// One object was processed
    fn on_transfer(&self, task: &DownloadTask, outcome: &TransferOutcome);

    /// Listing a prefix failed; its remaining keys are not downloaded
    fn on_listing_failed(&self, error: &S3Error);

    /// The run finished
    fn on_complete(&self, _report: &DownloadReport) {}
}

/// Logs events through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingListener;

impl DownloadListener for TracingListener {
    fn on_transfer(&self, task: &DownloadTask, outcome: &TransferOutcome) {
        match outcome {
            TransferOutcome::Success { bytes } => debug!(
                key = %task.source_key,
                destination = %task.destination.display(),
                bytes = *bytes,
                "Downloaded object"
            ),
            TransferOutcome::Skipped(SkipReason::DirectoryMarker) => debug!(
                key = %task.source_key,
                "Skipped directory marker"
            ),
            TransferOutcome::Failed(err) => error!(
                key = %task.source_key,
                destination = %task.destination.display(),
                error = %err,
                "Could not download object"
            ),
        }
    }

    fn on_listing_failed(&self, error: &S3Error) {
        error!(error = %error, "Could not list prefix");
    }

    fn on_complete(&self, report: &DownloadReport) {
        if report.has_failures() {
            warn!(
                succeeded = report.succeeded,
                skipped = report.skipped,
                failed = report.failed,
                listing_failures = report.listing_failures.len(),
                "Download finished with failures: {}",
                report
            );
        } else {
            info!(
                succeeded = report.succeeded,
                skipped = report.skipped,
                "Download finished: {}",
                report
            );
        }
    }
}

/// Event captured by [`RecordingListener`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    Downloaded {
        key: String,
        destination: PathBuf,
        bytes: u64,
    },
    Skipped {
        key: String,
    },
    Failed {
        key: String,
        destination: PathBuf,
        error: String,
    },
    ListingFailed {
        error: String,
    },
    Completed {
        succeeded: usize,
        skipped: usize,
        failed: usize,
    },
}

/// Keeps events in memory, in the order they were reported
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<DownloadEvent>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far
    pub fn events(&self) -> Vec<DownloadEvent> {
        self.lock().clone()
    }

    /// Keys of objects written, in order
    pub fn downloaded_keys(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                DownloadEvent::Downloaded { key, .. } => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: DownloadEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DownloadEvent>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DownloadListener for RecordingListener {
    fn on_transfer(&self, task: &DownloadTask, outcome: &TransferOutcome) {
        let event = match outcome {
            TransferOutcome::Success { bytes } => DownloadEvent::Downloaded {
                key: task.source_key.clone(),
                destination: task.destination.clone(),
                bytes: *bytes,
            },
            TransferOutcome::Skipped(_) => DownloadEvent::Skipped {
                key: task.source_key.clone(),
            },
            TransferOutcome::Failed(err) => DownloadEvent::Failed {
                key: task.source_key.clone(),
                destination: task.destination.clone(),
                error: err.to_string(),
            },
        };
        self.push(event);
    }

    fn on_listing_failed(&self, error: &S3Error) {
        self.push(DownloadEvent::ListingFailed {
            error: error.to_string(),
        });
    }

    fn on_complete(&self, report: &DownloadReport) {
        self.push(DownloadEvent::Completed {
            succeeded: report.succeeded,
            skipped: report.skipped,
            failed: report.failed,
        });
    }
}
