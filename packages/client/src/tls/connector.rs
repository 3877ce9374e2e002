//! rustls client configuration and handshake

use std::fmt;
use std::sync::Arc;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_rustls::client::TlsStream;

use super::errors::TlsError;

/// Performs client handshakes over already established connections.
#[derive(Clone)]
pub struct TlsConnector {
    inner: tokio_rustls::TlsConnector,
}

impl TlsConnector {
    /// Build a connector trusting the webpki root set.
    ///
    /// # Errors
    ///
    /// Returns [`TlsError::Config`] if the ring provider rejects the default
    /// protocol versions.
    pub fn new() -> Result<Self, TlsError> {
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let mut config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()?
            .with_root_certificates(roots)
            .with_no_client_auth();
        config.alpn_protocols = vec![b"http/1.1".to_vec()];

        Ok(Self::from_config(Arc::new(config)))
    }

    /// Wrap an existing rustls configuration.
    pub fn from_config(config: Arc<ClientConfig>) -> Self {
        Self {
            inner: tokio_rustls::TlsConnector::from(config),
        }
    }

    /// Run the client handshake for `host` over `io`.
    ///
    /// # Errors
    ///
    /// Returns [`TlsError::InvalidServerName`] if `host` is not a valid DNS
    /// name or IP address, and [`TlsError::Handshake`] if the handshake fails.
    pub async fn handshake<T>(&self, host: &str, io: T) -> Result<TlsStream<T>, TlsError>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        let server_name = ServerName::try_from(host.to_owned())
            .map_err(|_| TlsError::InvalidServerName(host.to_owned()))?;

        tracing::debug!(host, "starting TLS handshake");
        self.inner
            .connect(server_name, io)
            .await
            .map_err(TlsError::Handshake)
    }
}

impl fmt::Debug for TlsConnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsConnector").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_webpki_roots() {
        assert!(TlsConnector::new().is_ok());
    }

    #[tokio::test]
    async fn test_rejects_invalid_server_name() {
        let connector = TlsConnector::new().expect("default TLS config");
        let (client, _server) = tokio::io::duplex(64);
        let err = connector
            .handshake("not a hostname", client)
            .await
            .expect_err("spaces are not valid in server names");
        assert!(matches!(err, TlsError::InvalidServerName(ref name) if name == "not a hostname"));
    }
}
