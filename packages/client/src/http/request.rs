//! A single fetch request
//!
//! Owns the target URL plus per-request overrides of the client
//! configuration. Created per user action and consumed by the executor.

use std::time::Duration;

use url::{Host, Position, Url};

use super::into_url::{IntoUrl, IntoUrlSealed};
use crate::config::FetchConfig;
use crate::dns::OrderingPolicy;
use crate::error::{self, Result};

#[derive(Debug, Clone)]
pub struct FetchRequest {
    url: Url,
    host: String,
    port: u16,
    use_race: Option<bool>,
    ordering: Option<OrderingPolicy>,
    timeout: Option<Duration>,
}

impl FetchRequest {
    /// Build a request for `url`.
    ///
    /// # Errors
    ///
    /// Returns a builder error if the URL is malformed, is not `http`/`https`,
    /// or has no host.
    pub fn new<U: IntoUrl>(url: U) -> Result<Self> {
        let url = url.into_url()?;

        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.to_owned(),
            Some(Host::Ipv4(ip)) => ip.to_string(),
            Some(Host::Ipv6(ip)) => ip.to_string(),
            None => return Err(error::builder(format!("URL has no host: {url}"))),
        };
        let port = url
            .port_or_known_default()
            .ok_or_else(|| error::url_bad_scheme(url.clone()))?;

        Ok(Self {
            url,
            host,
            port,
            use_race: None,
            ordering: None,
            timeout: None,
        })
    }

    /// Race addresses for this request regardless of the client default.
    #[must_use]
    pub fn with_race(mut self, enabled: bool) -> Self {
        self.use_race = Some(enabled);
        self
    }

    #[must_use]
    pub fn with_ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = Some(ordering);
        self
    }

    #[must_use]
    pub fn with_prefer_ipv4(self, prefer: bool) -> Self {
        self.with_ordering(OrderingPolicy::from_prefer_ipv4(prefer))
    }

    /// Overall deadline for this request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Hostname or IP literal, without IPv6 brackets.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_https(&self) -> bool {
        self.url.scheme() == "https"
    }

    /// `host[:port]` as written in the URL, for the `Host` header.
    pub fn authority(&self) -> &str {
        &self.url[Position::BeforeHost..Position::AfterPort]
    }

    /// Path plus query, never empty.
    pub fn path_and_query(&self) -> &str {
        let target = &self.url[Position::BeforePath..Position::AfterQuery];
        if target.is_empty() { "/" } else { target }
    }

    pub fn race_enabled(&self, config: &FetchConfig) -> bool {
        self.use_race.unwrap_or(config.race_enabled)
    }

    pub fn ordering(&self, config: &FetchConfig) -> OrderingPolicy {
        self.ordering.unwrap_or(config.ordering)
    }

    pub fn timeout(&self, config: &FetchConfig) -> Duration {
        self.timeout.unwrap_or(config.overall_timeout)
    }
}
