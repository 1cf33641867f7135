/*!
 * Core download operations
 *
 * - `download`: mode selection, destination paths, the per-key loop
 * - `transfer`: streaming a single object to a local file
 * - `progress`: the event sink the loop reports to
 */

pub mod download;
pub mod progress;
pub mod transfer;

pub use download::{DownloadMode, DownloadRequest, Downloader};
pub use progress::{DownloadEvent, DownloadListener, RecordingListener, TracingListener};
pub use transfer::{transfer_object, DownloadTask, SkipReason, TransferOutcome};
