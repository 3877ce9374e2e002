//! System getaddrinfo-based DNS resolver
//!
//! Delegates to the operating system resolver through tokio's blocking pool,
//! so a slow lookup suspends the calling task instead of blocking a worker.

use std::net::IpAddr;

use super::error::ResolveError;
use super::traits::{Resolve, Resolving};
use super::types::Name;

/// Resolver backed by the system `getaddrinfo`.
///
/// Returns both address families in the order the system hands them out.
#[derive(Debug, Clone, Copy, Default)]
pub struct GaiResolver {
    _priv: (),
}

impl GaiResolver {
    pub fn new() -> Self {
        Self { _priv: () }
    }
}

impl Resolve for GaiResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let host = name.as_str();
            let addrs: Vec<IpAddr> = tokio::net::lookup_host((host, 0))
                .await
                .map_err(|source| ResolveError::Lookup {
                    host: host.to_string(),
                    source,
                })?
                .map(|addr| addr.ip())
                .collect();

            if addrs.is_empty() {
                return Err(ResolveError::NoAddresses(host.to_string()));
            }

            tracing::trace!(host, count = addrs.len(), "getaddrinfo returned");
            Ok(addrs)
        })
    }
}
