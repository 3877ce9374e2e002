//! Fetch execution pipeline
//!
//! Resolution, the connection race, the optional TLS handshake and the
//! request all run inside one future bounded by the overall deadline and the
//! cancellation token. Losing that select drops the future, which aborts any
//! attempts still racing and closes whatever connection was made.

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http::header::{ACCEPT, HOST, USER_AGENT};
use http::{Method, Request, Response};
use http_body_util::Empty;
use hyper::body::Incoming;
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::core::ClientInner;
use super::state::{FetchState, StateTracker};
use crate::config::ConfigValidator;
use crate::connect::{self, Connect};
use crate::error::{self, Kind, Result};
use crate::http::body::{BodyParts, DriverGuard};
use crate::http::{BodyStream, FetchRequest, FetchResponse};
use crate::tls::MaybeTlsStream;

/// Marks the fetch cancelled if its future is dropped mid-flight.
struct AbandonGuard<'a> {
    tracker: &'a StateTracker,
    armed: bool,
}

impl AbandonGuard<'_> {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.tracker.transition(FetchState::Cancelled) {
            tracing::debug!("fetch abandoned");
        }
    }
}

struct Connected {
    response: Response<Incoming>,
    remote_addr: SocketAddr,
    driver: DriverGuard,
}

pub(crate) async fn execute<C>(
    inner: Arc<ClientInner<C>>,
    request: FetchRequest,
    cancel: CancellationToken,
    tracker: Arc<StateTracker>,
) -> Result<FetchResponse>
where
    C: Connect,
    C::Conn: AsyncRead + AsyncWrite + Unpin,
{
    inner.stats.record_fetch();
    let timeout = request.timeout(&inner.config);
    if let Err(err) = ConfigValidator::validate_timeout(timeout, "request timeout") {
        return Err(failed(&tracker, &request, error::builder(err)));
    }
    let deadline = Instant::now() + timeout;

    let mut guard = AbandonGuard {
        tracker: &tracker,
        armed: true,
    };

    let result = tokio::select! {
        biased;
        () = cancel.cancelled() => Err(error::canceled()),
        res = tokio::time::timeout_at(deadline, connect_and_send(&inner, &request, &tracker)) => {
            res.unwrap_or_else(|_| Err(error::timeout(timeout)))
        }
    };
    guard.disarm();
    drop(guard);

    match result {
        Ok(connected) => {
            tracker.transition(FetchState::ReceivingBody);
            let (parts, body) = connected.response.into_parts();
            tracing::debug!(
                url = %request.url(),
                status = parts.status.as_u16(),
                remote = %connected.remote_addr,
                "response headers received"
            );

            let body = BodyStream::new(BodyParts {
                body,
                deadline,
                timeout,
                cancel,
                tracker: Arc::clone(&tracker),
                stats: Arc::clone(&inner.stats),
                driver: connected.driver,
            });
            Ok(FetchResponse {
                url: request.url().clone(),
                status: parts.status,
                headers: parts.headers,
                remote_addr: connected.remote_addr,
                body,
                state: tracker.subscribe(),
            })
        }
        Err(err) => Err(failed(&tracker, &request, err)),
    }
}

/// Move the fetch into the terminal state matching `err` and attach the URL.
fn failed(tracker: &StateTracker, request: &FetchRequest, err: error::Error) -> error::Error {
    let state = match err.kind() {
        Kind::Canceled => FetchState::Cancelled,
        Kind::Timeout => FetchState::TimedOut,
        _ => FetchState::Failed,
    };
    tracker.transition(state);

    let err = if err.url().is_none() {
        err.with_url(request.url().clone())
    } else {
        err
    };
    tracing::debug!(error = %err, "fetch failed");
    err
}

async fn connect_and_send<C>(
    inner: &ClientInner<C>,
    request: &FetchRequest,
    tracker: &StateTracker,
) -> Result<Connected>
where
    C: Connect,
    C::Conn: AsyncRead + AsyncWrite + Unpin,
{
    let config = &inner.config;

    tracker.transition(FetchState::Resolving);
    let resolved = inner
        .resolver
        .resolve(request.host(), request.port(), request.ordering(config))
        .await
        .map_err(error::resolve)?;

    tracker.transition(FetchState::Racing);
    let race_enabled = request.race_enabled(config);
    let outcome = connect::establish(
        &inner.connector,
        resolved.addrs(),
        &config.race_config(),
        race_enabled,
    )
    .await
    .map_err(error::race)?;
    inner.stats.record_attempts(outcome.attempts.len());

    let remote_addr = outcome.winner;
    tracing::debug!(
        host = request.host(),
        %remote_addr,
        race_enabled,
        attempts = outcome.attempts.len(),
        "connection established"
    );
    let conn = outcome.into_conn();

    let stream = if request.is_https() {
        let tls = inner.tls().await?;
        let tls_stream = tls
            .handshake(request.host(), conn)
            .await
            .map_err(error::transport)?;
        MaybeTlsStream::Tls(Box::new(tls_stream))
    } else {
        MaybeTlsStream::Plain(conn)
    };

    tracker.transition(FetchState::Sending);
    let (mut sender, connection) =
        hyper::client::conn::http1::handshake::<_, Empty<Bytes>>(TokioIo::new(stream))
            .await
            .map_err(error::transport)?;
    let driver = DriverGuard::new(tokio::spawn(async move {
        if let Err(err) = connection.await {
            tracing::debug!(error = %err, "connection driver error");
        }
    }));

    let req = Request::builder()
        .method(Method::GET)
        .uri(request.path_and_query())
        .header(HOST, request.authority())
        .header(USER_AGENT, config.user_agent.as_str())
        .header(ACCEPT, "*/*")
        .body(Empty::<Bytes>::new())
        .map_err(error::builder)?;

    let response = sender.send_request(req).await.map_err(error::transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(error::status_code(request.url().clone(), status));
    }

    Ok(Connected {
        response,
        remote_addr,
        driver,
    })
}
