/*!
 * Per-run download statistics
 */

use std::fmt;
use std::path::PathBuf;

use crate::core::transfer::{DownloadTask, TransferOutcome};
use crate::error::{EXIT_PARTIAL, EXIT_SUCCESS};

/// A key that could not be downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTransfer {
    pub key: String,
    pub destination: PathBuf,
    pub error: String,
}

/// Summary of one download run
///
/// Built for reporting only; the orchestrator never looks at it to decide
/// what to do next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes_written: u64,
    pub failures: Vec<FailedTransfer>,
    pub listing_failures: Vec<String>,
}

impl DownloadReport {
    /// Account for one transfer outcome
    pub fn record(&mut self, task: &DownloadTask, outcome: &TransferOutcome) {
        match outcome {
            TransferOutcome::Success { bytes } => {
                self.succeeded += 1;
                self.bytes_written += bytes;
            }
            TransferOutcome::Skipped(_) => self.skipped += 1,
            TransferOutcome::Failed(error) => {
                self.failed += 1;
                self.failures.push(FailedTransfer {
                    key: task.source_key.clone(),
                    destination: task.destination.clone(),
                    error: error.to_string(),
                });
            }
        }
    }

    /// Account for a prefix whose listing failed
    pub fn record_listing_failure(&mut self, error: impl fmt::Display) {
        self.listing_failures.push(error.to_string());
    }

    /// Objects looked at, whatever their outcome
    pub fn total_objects(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }

    /// Whether any object or listing failed
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || !self.listing_failures.is_empty()
    }

    /// Process exit code for a run that got past connecting
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            EXIT_PARTIAL
        } else {
            EXIT_SUCCESS
        }
    }
}

impl fmt::Display for DownloadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} downloaded ({}), {} skipped, {} failed",
            self.succeeded,
            format_bytes(self.bytes_written),
            self.skipped,
            self.failed
        )?;
        if !self.listing_failures.is_empty() {
            write!(f, ", {} prefix listing(s) failed", self.listing_failures.len())?;
        }
        Ok(())
    }
}

/// Format bytes into human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let bytes_f = bytes as f64;
    let base = 1024.0_f64;
    let exp = (bytes_f.ln() / base.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);

    let value = bytes_f / base.powi(exp as i32);

    if exp == 0 {
        format!("{} {}", bytes, UNITS[exp])
    } else {
        format!("{:.2} {}", value, UNITS[exp])
    }
}
