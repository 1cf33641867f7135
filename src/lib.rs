/*!
 * s3-download - fetch S3 objects and prefixes to the local filesystem
 *
 * - Single-object or multi-prefix downloads with optional prefix stripping
 * - Lazy, paginated listing over any number of prefixes, in input order
 * - Directory marker objects are skipped, never written
 * - Per-object failures are reported and the run continues
 * - Region or custom-endpoint routing for S3-compatible services
 */

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod protocol;
pub mod stats;

// Re-export commonly used types
pub use config::{DownloadConfig, LogLevel};
pub use crate::core::{DownloadRequest, Downloader};
pub use error::{DownloadError, Result};
pub use stats::DownloadReport;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
