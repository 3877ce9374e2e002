//! TLS-specific error types

/// Failures setting up or performing a TLS handshake.
#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("TLS configuration failed: {0}")]
    Config(#[from] rustls::Error),
    #[error("invalid server name '{0}'")]
    InvalidServerName(String),
    #[error("TLS handshake failed: {0}")]
    Handshake(#[source] std::io::Error),
}
