//! Download flow: fetch, persist, report

use std::sync::Arc;

use happyfetch_client::{Client, CopyError, Error, FetchRequest};
use tokio_util::sync::CancellationToken;

use crate::observer::DownloadObserver;
use crate::sink::DownloadSink;

/// How a download ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Completed { filename: String, bytes: u64 },
    /// Human-readable reason, as shown to the user
    Failed(String),
    Cancelled,
}

impl DownloadOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, DownloadOutcome::Completed { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] Error),
    #[error("failed to save download: {0}")]
    Sink(#[source] std::io::Error),
    #[error("no download sink configured")]
    NoSink,
}

impl DownloadError {
    pub fn is_canceled(&self) -> bool {
        matches!(self, DownloadError::Fetch(err) if err.is_canceled())
    }

    /// Message for the user, or `None` for cancellation.
    pub fn user_message(&self) -> Option<String> {
        match self {
            DownloadError::Fetch(err) => err.user_message(),
            other => Some(other.to_string()),
        }
    }
}

impl From<CopyError> for DownloadError {
    fn from(err: CopyError) -> Self {
        match err {
            CopyError::Fetch(err) => DownloadError::Fetch(err),
            CopyError::Write(err) => DownloadError::Sink(err),
        }
    }
}

/// Name for a new download: the current Unix time in milliseconds.
pub fn suggested_filename() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

pub(crate) async fn transfer(
    client: &Client,
    request: FetchRequest,
    sink: Arc<dyn DownloadSink>,
    cancel: CancellationToken,
) -> Result<(String, u64), DownloadError> {
    let url = request.url().clone();
    let response = client.fetch_cancellable(request, cancel).await?;
    tracing::debug!(%url, status = %response.status(), "download started");

    let filename = suggested_filename();
    let mut writer = sink
        .create(&filename)
        .await
        .map_err(DownloadError::Sink)?;

    match response.into_body().copy_to(&mut writer).await {
        Ok(bytes) => Ok((filename, bytes)),
        Err(err) => {
            drop(writer);
            sink.discard(&filename).await;
            Err(err.into())
        }
    }
}

pub(crate) fn report(
    result: Result<(String, u64), DownloadError>,
    observer: &dyn DownloadObserver,
) -> DownloadOutcome {
    match result {
        Ok((filename, bytes)) => {
            observer.on_complete(&filename, bytes);
            DownloadOutcome::Completed { filename, bytes }
        }
        Err(err) => match err.user_message() {
            Some(message) => {
                observer.on_error(&message);
                DownloadOutcome::Failed(message)
            }
            None => {
                tracing::debug!("download cancelled");
                DownloadOutcome::Cancelled
            }
        },
    }
}
