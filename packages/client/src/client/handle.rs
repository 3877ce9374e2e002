//! Handle to a spawned fetch

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::state::FetchState;
use crate::error::{self, Result};
use crate::http::FetchResponse;

/// A fetch running on its own task.
///
/// Await the handle for the response. [`cancel`](Self::cancel) stops the
/// fetch from any state, including while the body is being read.
#[derive(Debug)]
pub struct FetchHandle {
    task: JoinHandle<Result<FetchResponse>>,
    cancel: CancellationToken,
    state: watch::Receiver<FetchState>,
}

impl FetchHandle {
    pub(crate) fn new(
        task: JoinHandle<Result<FetchResponse>>,
        cancel: CancellationToken,
        state: watch::Receiver<FetchState>,
    ) -> Self {
        Self {
            task,
            cancel,
            state,
        }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token governing this fetch and its response body.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> FetchState {
        *self.state.borrow()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.clone()
    }
}

impl Future for FetchHandle {
    type Output = Result<FetchResponse>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match ready!(Pin::new(&mut self.task).poll(cx)) {
            Ok(result) => Poll::Ready(result),
            Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
            Err(_) => Poll::Ready(Err(error::canceled())),
        }
    }
}
