//! Handle to a running download

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::download::DownloadOutcome;

/// A download running on its own task.
///
/// Await it for the [`DownloadOutcome`]; dropping it leaves the download
/// running.
#[derive(Debug)]
pub struct DownloadHandle {
    task: JoinHandle<DownloadOutcome>,
    cancel: CancellationToken,
}

impl DownloadHandle {
    pub(crate) fn new(task: JoinHandle<DownloadOutcome>, cancel: CancellationToken) -> Self {
        Self { task, cancel }
    }

    /// Stop the download. The outcome becomes `Cancelled` unless it already
    /// finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Future for DownloadHandle {
    type Output = DownloadOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match ready!(Pin::new(&mut self.task).poll(cx)) {
            Ok(outcome) => Poll::Ready(outcome),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Poll::Ready(DownloadOutcome::Cancelled),
        }
    }
}
