use std::error::Error as StdError;
use std::fmt;

use http::StatusCode;

use super::BoxError;

/// A Result alias where the Err case is `happyfetch_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur while fetching a resource.
///
/// Every failure of a fetch surfaces as exactly one `Error`. The [`Kind`]
/// tells resolution, racing, deadline, status, transport and cancellation
/// failures apart; the source chain carries the details.
pub struct Error {
    inner: Box<Inner>,
}

struct Inner {
    kind: Kind,
    source: Option<BoxError>,
    url: Option<url::Url>,
}

/// Failure category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Invalid URL, unsupported scheme or invalid configuration
    Builder,
    /// The hostname could not be resolved
    Resolve,
    /// Every connection attempt failed
    Race,
    /// The overall deadline elapsed
    Timeout,
    /// A response arrived with a non-success status
    Status(StatusCode),
    /// TLS, request transmission or body read failed after connecting
    Transport,
    /// The caller cancelled the operation
    Canceled,
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source: None,
                url: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<BoxError>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: url::Url) -> Self {
        self.inner.url = Some(url);
        self
    }

    /// Returns the failure category.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.inner.kind
    }

    /// Get the URL associated with this error, if any
    #[must_use]
    pub fn url(&self) -> Option<&url::Url> {
        self.inner.url.as_ref()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("happyfetch_client::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref url) = self.inner.url {
            f.field("url", &url.as_str());
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            Kind::Builder => f.write_str("builder error"),
            Kind::Resolve => f.write_str("error resolving host"),
            Kind::Race => f.write_str("error connecting to host"),
            Kind::Timeout => f.write_str("request timeout"),
            Kind::Transport => f.write_str("error transferring request or response"),
            Kind::Canceled => f.write_str("request canceled"),
            Kind::Status(code) => {
                let prefix = if code.is_client_error() {
                    "HTTP status client error"
                } else if code.is_server_error() {
                    "HTTP status server error"
                } else {
                    "HTTP status error"
                };
                write!(f, "{prefix} ({code})")
            }
        }?;

        if let Some(ref url) = self.inner.url {
            write!(f, " for url ({})", url.as_str())?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
