//! Download result reporting

/// Receives the user-facing result of a download.
///
/// Exactly one method is called per download, except for cancelled
/// downloads, which report nothing.
pub trait DownloadObserver: Send + Sync + 'static {
    fn on_complete(&self, filename: &str, bytes: u64);

    fn on_error(&self, message: &str);
}

/// Observer that logs results.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl DownloadObserver for TracingObserver {
    fn on_complete(&self, filename: &str, bytes: u64) {
        tracing::info!(filename, bytes, "download complete");
    }

    fn on_error(&self, message: &str) {
        tracing::warn!(message, "download failed");
    }
}
