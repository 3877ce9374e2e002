//! Core client implementation

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::OnceCell;
use tokio_util::sync::CancellationToken;

use super::builder::ClientBuilder;
use super::fetch;
use super::handle::FetchHandle;
use super::state::StateTracker;
use super::stats::{ClientStats, ClientStatsSnapshot};
use crate::config::FetchConfig;
use crate::connect::{Connect, TcpConnector};
use crate::dns::AddressResolver;
use crate::error::{self, Result};
use crate::http::{FetchRequest, FetchResponse, IntoUrl};
use crate::tls::TlsConnector;

/// State shared by every fetch issued through one [`Client`].
pub(crate) struct ClientInner<C> {
    pub(crate) config: FetchConfig,
    pub(crate) resolver: AddressResolver,
    pub(crate) connector: Arc<C>,
    pub(crate) tls: OnceCell<TlsConnector>,
    pub(crate) stats: Arc<ClientStats>,
}

impl<C> ClientInner<C> {
    /// TLS connector, built on first `https` fetch.
    pub(crate) async fn tls(&self) -> Result<&TlsConnector> {
        self.tls
            .get_or_try_init(|| async { TlsConnector::new() })
            .await
            .map_err(error::transport)
    }
}

/// Happy Eyeballs capable HTTP/1.1 fetch client.
///
/// Cheap to clone; clones share configuration, resolver, connector and
/// statistics.
pub struct Client<C = TcpConnector> {
    pub(crate) inner: Arc<ClientInner<C>>,
}

impl Client {
    /// Client with the default configuration and the system resolver.
    pub fn new() -> Self {
        let config = FetchConfig::default();
        let connector = config.tcp_connector();
        Self::from_parts(config, AddressResolver::system(), connector, None)
    }

    /// Client with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a builder error if `config` fails validation.
    pub fn with_config(config: FetchConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Client<C> {
    pub(crate) fn from_parts(
        config: FetchConfig,
        resolver: AddressResolver,
        connector: C,
        tls: Option<TlsConnector>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                config,
                resolver,
                connector: Arc::new(connector),
                tls: OnceCell::new_with(tls),
                stats: Arc::new(ClientStats::new()),
            }),
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.inner.config
    }

    pub fn stats(&self) -> ClientStatsSnapshot {
        self.inner.stats.snapshot()
    }
}

impl<C> Client<C>
where
    C: Connect,
    C::Conn: AsyncRead + AsyncWrite + Unpin,
{
    /// Build a request for `url` with this client's defaults.
    ///
    /// # Errors
    ///
    /// Returns a builder error for malformed or non-HTTP URLs.
    pub fn request<U: IntoUrl>(&self, url: U) -> Result<FetchRequest> {
        FetchRequest::new(url)
    }

    /// Run `request` to the point where the response headers are in.
    ///
    /// Dropping the returned future cancels the fetch.
    ///
    /// # Errors
    ///
    /// Returns a resolve, race, timeout, status or transport error.
    pub async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        self.fetch_cancellable(request, CancellationToken::new()).await
    }

    /// Like [`fetch`](Self::fetch), also stopping when `cancel` fires.
    ///
    /// The token keeps governing the response body after this returns.
    ///
    /// # Errors
    ///
    /// Returns a cancellation error when `cancel` fires first, otherwise as
    /// [`fetch`](Self::fetch).
    pub async fn fetch_cancellable(
        &self,
        request: FetchRequest,
        cancel: CancellationToken,
    ) -> Result<FetchResponse> {
        let tracker = Arc::new(StateTracker::with_stats(Arc::clone(&self.inner.stats)));
        fetch::execute(Arc::clone(&self.inner), request, cancel, tracker).await
    }

    /// Run `request` on its own task.
    ///
    /// The handle exposes cancellation and the fetch state, and resolves to
    /// the response. Dropping the handle detaches the task.
    pub fn spawn(&self, request: FetchRequest) -> FetchHandle {
        let cancel = CancellationToken::new();
        let tracker = Arc::new(StateTracker::with_stats(Arc::clone(&self.inner.stats)));
        let state = tracker.subscribe();
        let task = tokio::spawn(fetch::execute(
            Arc::clone(&self.inner),
            request,
            cancel.clone(),
            tracker,
        ));
        FetchHandle::new(task, cancel, state)
    }
}

impl<C> Clone for Client<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> std::fmt::Debug for Client<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.inner.config)
            .field("resolver", &self.inner.resolver)
            .finish_non_exhaustive()
    }
}
