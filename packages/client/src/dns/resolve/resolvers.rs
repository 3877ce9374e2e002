//! Policy-aware address resolution
//!
//! Wraps a [`Resolve`] implementation with the IP literal fast path,
//! hostname validation, the ordering policy and port assignment.

use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use super::error::ResolveError;
use super::gai::GaiResolver;
use super::traits::Resolve;
use super::types::{AddressFamily, Name, OrderingPolicy, ResolvedHost};
use super::utilities::{apply_ordering, parse_ip_literal, validate_hostname};

/// Resolves hostnames into ordered socket addresses.
#[derive(Clone)]
pub struct AddressResolver {
    resolver: Arc<dyn Resolve>,
}

impl AddressResolver {
    pub fn new(resolver: Arc<dyn Resolve>) -> Self {
        Self { resolver }
    }

    /// Resolver backed by the system `getaddrinfo`.
    pub fn system() -> Self {
        Self::new(Arc::new(GaiResolver::new()))
    }

    /// Resolve `host` and order the result according to `policy`.
    ///
    /// IP literals are returned as-is without a lookup. Every resolved
    /// address is paired with `port`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the hostname is malformed, the lookup
    /// fails or the lookup yields no addresses.
    pub async fn resolve(
        &self,
        host: &str,
        port: u16,
        policy: OrderingPolicy,
    ) -> Result<ResolvedHost, ResolveError> {
        if let Some(ip) = parse_ip_literal(host) {
            return Ok(ResolvedHost::new(
                Name::from(host),
                vec![SocketAddr::new(ip, port)],
            ));
        }

        validate_hostname(host).map_err(|reason| ResolveError::InvalidHost {
            host: host.to_string(),
            reason,
        })?;

        let mut ips = self.resolver.resolve(Name::from(host)).await?;
        if ips.is_empty() {
            return Err(ResolveError::NoAddresses(host.to_string()));
        }

        apply_ordering(&mut ips, policy);

        let resolved = ResolvedHost::new(
            Name::from(host),
            ips.into_iter().map(|ip| SocketAddr::new(ip, port)).collect(),
        );
        tracing::debug!(
            host,
            ?policy,
            v4 = resolved.count(AddressFamily::V4),
            v6 = resolved.count(AddressFamily::V6),
            addrs = ?resolved.addrs(),
            "resolved"
        );
        Ok(resolved)
    }
}

impl Default for AddressResolver {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for AddressResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressResolver").finish_non_exhaustive()
    }
}
