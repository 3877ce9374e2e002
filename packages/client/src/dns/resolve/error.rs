//! Name resolution errors

use std::io;

/// Reasons a hostname could not be turned into addresses.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid hostname {host:?}: {reason}")]
    InvalidHost { host: String, reason: &'static str },

    #[error("no addresses found for {0}")]
    NoAddresses(String),

    #[error("DNS resolution failed for {host}: {source}")]
    Lookup {
        host: String,
        #[source]
        source: io::Error,
    },
}

impl ResolveError {
    /// Hostname the failure refers to.
    #[must_use]
    pub fn host(&self) -> &str {
        match self {
            ResolveError::InvalidHost { host, .. } | ResolveError::Lookup { host, .. } => host,
            ResolveError::NoAddresses(host) => host,
        }
    }
}
