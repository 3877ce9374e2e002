//! DNS resolver with hostname overrides
//!
//! Answers configured hostnames from a static table and forwards every other
//! name to the wrapped resolver. Used for tests and custom routing.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use super::gai::GaiResolver;
use super::traits::{Resolve, Resolving};
use super::types::Name;

/// Resolver with a static hostname table in front of another resolver.
#[derive(Clone)]
pub struct OverrideResolver {
    inner: Arc<dyn Resolve>,
    overrides: Arc<HashMap<String, Vec<IpAddr>>>,
}

impl OverrideResolver {
    /// Wrap `inner` with an empty override table.
    pub fn new(inner: Arc<dyn Resolve>) -> Self {
        Self {
            inner,
            overrides: Arc::new(HashMap::new()),
        }
    }

    /// Override table in front of the system resolver.
    pub fn system() -> Self {
        Self::new(Arc::new(GaiResolver::new()))
    }

    /// Answer `host` with `addrs`, in the given order.
    #[must_use]
    pub fn with_override(mut self, host: impl Into<String>, addrs: Vec<IpAddr>) -> Self {
        Arc::make_mut(&mut self.overrides).insert(host.into().to_ascii_lowercase(), addrs);
        self
    }
}

impl std::fmt::Debug for OverrideResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverrideResolver")
            .field("overrides", &self.overrides)
            .finish()
    }
}

impl Resolve for OverrideResolver {
    fn resolve(&self, name: Name) -> Resolving {
        if let Some(addrs) = self.overrides.get(&name.as_str().to_ascii_lowercase()) {
            let addrs = addrs.clone();
            tracing::trace!(host = %name, count = addrs.len(), "answered from override table");
            return Box::pin(async move { Ok(addrs) });
        }
        self.inner.resolve(name)
    }
}
