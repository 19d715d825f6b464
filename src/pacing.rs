//! Download pacing between batches
//!
//! The remote service throttles aggressive clients, so the pipeline pauses
//! for a fixed duration after every fixed-size batch of successful
//! downloads. This is a plain blocking delay shared by the whole run — not
//! a token bucket, not adaptive.

use std::time::Duration;

/// Run-wide pacer counting successful downloads
///
/// Every download that makes the counter a multiple of `batch_size`
/// triggers one pause of `batch_pause`. Failed downloads never advance the
/// counter.
#[derive(Debug)]
pub struct DownloadPacer {
    batch_size: u64,
    batch_pause: Duration,
    completed: u64,
}

impl DownloadPacer {
    /// Create a pacer with the given batch size and pause duration
    ///
    /// A batch size of 0 disables pausing entirely.
    #[must_use]
    pub fn new(batch_size: u64, batch_pause: Duration) -> Self {
        Self {
            batch_size,
            batch_pause,
            completed: 0,
        }
    }

    /// Number of successful downloads recorded so far
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Record one successful download and report whether a pause is due
    ///
    /// Exactly one pause is due per multiple of the batch size: with a
    /// batch size of 8, the 8th, 16th, 24th... download each return a
    /// pause duration.
    pub fn record_download(&mut self) -> Option<Duration> {
        self.completed += 1;
        if self.batch_size > 0 && self.completed % self.batch_size == 0 {
            Some(self.batch_pause)
        } else {
            None
        }
    }

    /// Record one successful download and sleep if the batch is full
    pub async fn pace(&mut self) {
        if let Some(pause) = self.record_download() {
            tracing::info!(
                completed = self.completed,
                pause_secs = pause.as_secs(),
                "batch complete, pausing before the next downloads"
            );
            tokio::time::sleep(pause).await;
        }
    }
}
