//! Lazy response body
//!
//! [`BodyStream`] yields the response body chunk by chunk. It keeps observing
//! the fetch's overall deadline and cancellation token, and owns the
//! connection driver task: completing, failing or dropping the stream stops
//! the driver and closes the connection.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use http_body::Body as _;
use hyper::body::Incoming;
use pin_project_lite::pin_project;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Sleep};
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

use crate::client::state::{FetchState, StateTracker};
use crate::client::stats::ClientStats;
use crate::error::{self, Error, Result};

/// Aborts the HTTP connection task when dropped.
#[derive(Debug)]
pub(crate) struct DriverGuard(JoinHandle<()>);

impl DriverGuard {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self(handle)
    }
}

impl Drop for DriverGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Failure while copying a body into a writer.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error(transparent)]
    Fetch(#[from] Error),
    #[error("failed to write body: {0}")]
    Write(#[source] io::Error),
}

pin_project! {
    /// Response body as a stream of [`Bytes`] chunks.
    pub struct BodyStream {
        #[pin]
        body: Incoming,
        deadline: Pin<Box<Sleep>>,
        timeout: Duration,
        cancelled: Pin<Box<WaitForCancellationFutureOwned>>,
        tracker: Arc<StateTracker>,
        stats: Arc<ClientStats>,
        driver: Option<DriverGuard>,
        done: bool,
    }

    impl PinnedDrop for BodyStream {
        fn drop(this: Pin<&mut Self>) {
            let this = this.project();
            if !*this.done {
                tracing::debug!("response body dropped before completion");
                this.tracker.transition(FetchState::Cancelled);
            }
        }
    }
}

pub(crate) struct BodyParts {
    pub(crate) body: Incoming,
    pub(crate) deadline: Instant,
    pub(crate) timeout: Duration,
    pub(crate) cancel: CancellationToken,
    pub(crate) tracker: Arc<StateTracker>,
    pub(crate) stats: Arc<ClientStats>,
    pub(crate) driver: DriverGuard,
}

impl BodyStream {
    pub(crate) fn new(parts: BodyParts) -> Self {
        Self {
            body: parts.body,
            deadline: Box::pin(tokio::time::sleep_until(parts.deadline)),
            timeout: parts.timeout,
            cancelled: Box::pin(parts.cancel.cancelled_owned()),
            tracker: parts.tracker,
            stats: parts.stats,
            driver: Some(parts.driver),
            done: false,
        }
    }

    /// Drain the whole body into memory.
    ///
    /// # Errors
    ///
    /// Returns the first error the stream yields.
    pub async fn bytes(mut self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }

    /// Copy the whole body into `writer`, returning the number of bytes.
    ///
    /// The writer is flushed once the body ends.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::Fetch`] if the body fails and
    /// [`CopyError::Write`] if the writer does.
    pub async fn copy_to<W>(mut self, writer: &mut W) -> std::result::Result<u64, CopyError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        let mut written = 0u64;
        while let Some(chunk) = self.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk).await.map_err(CopyError::Write)?;
            written += chunk.len() as u64;
        }
        writer.flush().await.map_err(CopyError::Write)?;
        Ok(written)
    }
}

impl Stream for BodyStream {
    type Item = Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        if *this.done {
            return Poll::Ready(None);
        }

        let (state, err) = if this.cancelled.as_mut().poll(cx).is_ready() {
            (FetchState::Cancelled, error::canceled())
        } else if this.deadline.as_mut().poll(cx).is_ready() {
            (FetchState::TimedOut, error::timeout(*this.timeout))
        } else {
            loop {
                match ready!(this.body.as_mut().poll_frame(cx)) {
                    Some(Ok(frame)) => {
                        // Trailers carry no payload.
                        let Ok(data) = frame.into_data() else {
                            continue;
                        };
                        if data.is_empty() {
                            continue;
                        }
                        this.stats.record_bytes_received(data.len() as u64);
                        return Poll::Ready(Some(Ok(data)));
                    }
                    Some(Err(e)) => break (FetchState::Failed, error::transport(e)),
                    None => {
                        *this.done = true;
                        this.driver.take();
                        this.tracker.transition(FetchState::Completed);
                        tracing::debug!("response body complete");
                        return Poll::Ready(None);
                    }
                }
            }
        };

        *this.done = true;
        this.driver.take();
        this.tracker.transition(state);
        tracing::debug!(error = %err, "response body aborted");
        Poll::Ready(Some(Err(err)))
    }
}

impl std::fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyStream")
            .field("done", &self.done)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
