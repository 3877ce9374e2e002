//! `DownloadBuilder` and its configuration surface

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use happyfetch_client::{Client, FetchConfig, FetchRequest};
use tokio_util::sync::CancellationToken;

use crate::download::{self, DownloadError};
use crate::handle::DownloadHandle;
use crate::observer::{DownloadObserver, TracingObserver};
use crate::sink::DownloadSink;

/// Configures and starts one download.
///
/// Settings left unset fall back to the client's configuration. Setting a
/// whole [`FetchConfig`] or a stagger delay builds a dedicated client for the
/// download; otherwise the shared global client is used.
///
/// # Examples
/// ```no_run
/// use happyfetch::{DirectorySink, DownloadBuilder};
///
/// # async fn run() {
/// let outcome = DownloadBuilder::new("https://example.com/file.bin")
///     .happy_eyeballs(true)
///     .prefer_ipv4(true)
///     .sink(DirectorySink::new("downloads"))
///     .start()
///     .await;
/// println!("{outcome:?}");
/// # }
/// ```
pub struct DownloadBuilder {
    url: String,
    happy_eyeballs: Option<bool>,
    prefer_ipv4: Option<bool>,
    timeout: Option<Duration>,
    stagger_delay: Option<Duration>,
    config: Option<FetchConfig>,
    client: Option<Client>,
    sink: Option<Arc<dyn DownloadSink>>,
    observer: Arc<dyn DownloadObserver>,
}

impl DownloadBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            happy_eyeballs: None,
            prefer_ipv4: None,
            timeout: None,
            stagger_delay: None,
            config: None,
            client: None,
            sink: None,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replace the target URL.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Race connection attempts across the resolved addresses.
    #[must_use]
    pub fn happy_eyeballs(mut self, enabled: bool) -> Self {
        self.happy_eyeballs = Some(enabled);
        self
    }

    /// Try every IPv4 address before any IPv6 address.
    #[must_use]
    pub fn prefer_ipv4(mut self, prefer: bool) -> Self {
        self.prefer_ipv4 = Some(prefer);
        self
    }

    /// Overall deadline for the download, body included.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn stagger_delay(mut self, delay: Duration) -> Self {
        self.stagger_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn config(mut self, config: FetchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Run the download through `client`.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Destination for the downloaded bytes. Required.
    #[must_use]
    pub fn sink<S: DownloadSink>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Receives the completion or error report. Defaults to logging.
    #[must_use]
    pub fn observer<O: DownloadObserver>(mut self, observer: O) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Spawn the download and return its handle.
    ///
    /// Problems with the builder itself, such as a malformed URL or a missing
    /// sink, are reported through the observer like any other failure.
    pub fn start(self) -> DownloadHandle {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let observer = Arc::clone(&self.observer);

        let task = tokio::spawn(async move {
            let result = match self.prepare() {
                Ok((client, request, sink)) => {
                    download::transfer(&client, request, sink, token).await
                }
                Err(err) => Err(err),
            };
            download::report(result, observer.as_ref())
        });

        DownloadHandle::new(task, cancel)
    }

    fn prepare(self) -> Result<(Client, FetchRequest, Arc<dyn DownloadSink>), DownloadError> {
        let sink = self.sink.ok_or(DownloadError::NoSink)?;

        let client = if self.config.is_some() || self.stagger_delay.is_some() {
            let mut config = match (self.config, &self.client) {
                (Some(config), _) => config,
                (None, Some(client)) => client.config().clone(),
                (None, None) => FetchConfig::default(),
            };
            if let Some(delay) = self.stagger_delay {
                config = config.with_stagger_delay(delay);
            }
            Client::with_config(config)?
        } else {
            self.client.unwrap_or_else(happyfetch_client::global_client)
        };

        let mut request = client.request(self.url.as_str())?;
        if let Some(enabled) = self.happy_eyeballs {
            request = request.with_race(enabled);
        }
        if let Some(prefer) = self.prefer_ipv4 {
            request = request.with_prefer_ipv4(prefer);
        }
        if let Some(timeout) = self.timeout {
            request = request.with_timeout(timeout);
        }

        Ok((client, request, sink))
    }
}

impl fmt::Debug for DownloadBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadBuilder")
            .field("url", &self.url)
            .field("happy_eyeballs", &self.happy_eyeballs)
            .field("prefer_ipv4", &self.prefer_ipv4)
            .field("timeout", &self.timeout)
            .field("stagger_delay", &self.stagger_delay)
            .finish_non_exhaustive()
    }
}
