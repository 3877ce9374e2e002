//! DNS resolution traits and type aliases
//!
//! Contains the core Resolve trait and related type definitions
//! for the DNS resolution system.

use std::future::Future;
use std::net::IpAddr;
use std::pin::Pin;

use super::error::ResolveError;
use super::types::Name;

/// Addresses returned by a resolver, in resolver order.
pub type Addrs = Vec<IpAddr>;

/// Future returned by [`Resolve::resolve`].
pub type Resolving = Pin<Box<dyn Future<Output = Result<Addrs, ResolveError>> + Send>>;

/// Trait for DNS resolution.
///
/// Implementations return every address they know for the name, of both
/// families, in their own order. Ordering policies are applied by
/// [`AddressResolver`](super::AddressResolver), not here.
pub trait Resolve: Send + Sync + 'static {
    /// Resolve a hostname to IP addresses.
    fn resolve(&self, name: Name) -> Resolving;
}
