//! Successful fetch result

use std::net::SocketAddr;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use tokio::sync::watch;
use url::Url;

use super::body::BodyStream;
use crate::client::state::FetchState;
use crate::error::Result;

/// Status and headers of a 2xx response plus its lazy body.
#[derive(Debug)]
pub struct FetchResponse {
    pub(crate) url: Url,
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) remote_addr: SocketAddr,
    pub(crate) body: BodyStream,
    pub(crate) state: watch::Receiver<FetchState>,
}

impl FetchResponse {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Address of the connection that won the race.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// `Content-Length`, if the server sent a valid one.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(http::header::CONTENT_LENGTH)?
            .to_str()
            .ok()?
            .parse()
            .ok()
    }

    /// Current state of the fetch; `ReceivingBody` until the body ends.
    pub fn state(&self) -> FetchState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.clone()
    }

    pub fn into_body(self) -> BodyStream {
        self.body
    }

    /// Drain the body into memory.
    ///
    /// # Errors
    ///
    /// Returns the first error the body yields.
    pub async fn bytes(self) -> Result<Bytes> {
        self.body.bytes().await
    }
}
