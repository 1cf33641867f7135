/*!
 * Single object transfer - streams one remote object into a local file
 */

use std::path::{Path, PathBuf};

use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::protocol::s3::{S3Error, S3Operations, S3Result};

/// One object to fetch and where to put it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// Remote object key
    pub source_key: String,

    /// Local file path
    pub destination: PathBuf,
}

impl DownloadTask {
    pub fn new(source_key: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source_key: source_key.into(),
            destination: destination.into(),
        }
    }
}

/// Why an object was not written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Folder placeholder object
    DirectoryMarker,
}

/// Result of a single transfer
#[derive(Debug)]
pub enum TransferOutcome {
    /// Object written in full
    Success { bytes: u64 },

    /// Object intentionally not written
    Skipped(SkipReason),

    /// Fetch or local write failed; the run continues
    Failed(S3Error),
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TransferOutcome::Failed(_))
    }
}

/// Download one object.
///
/// Never returns an error: every failure becomes [`TransferOutcome::Failed`]
/// so that a bulk download can move on to the next key.
pub async fn transfer_object<S>(store: &S, bucket: &str, task: &DownloadTask) -> TransferOutcome
where
    S: S3Operations + ?Sized,
{
    match try_transfer(store, bucket, task).await {
        Ok(outcome) => outcome,
        Err(e) => TransferOutcome::Failed(e),
    }
}

async fn try_transfer<S>(store: &S, bucket: &str, task: &DownloadTask) -> S3Result<TransferOutcome>
where
    S: S3Operations + ?Sized,
{
    let object = store.get_object(bucket, &task.source_key).await?;

    if object.is_directory_marker() {
        return Ok(TransferOutcome::Skipped(SkipReason::DirectoryMarker));
    }

    ensure_parent_dir(&task.destination).await?;

    let mut body = object.body;
    let mut file = File::create(&task.destination).await?;

    let copied = async {
        let bytes = tokio::io::copy(&mut body, &mut file).await?;
        file.flush().await?;
        Ok::<u64, std::io::Error>(bytes)
    }
    .await;

    match copied {
        Ok(bytes) => Ok(TransferOutcome::Success { bytes }),
        Err(e) => {
            drop(file);
            // Drop the partial file
            let _ = fs::remove_file(&task.destination).await;
            Err(S3Error::Io(e))
        }
    }
}

/// Create the parent directory of `path` if it does not exist yet
async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}
