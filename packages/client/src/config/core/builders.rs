//! Builder methods for fetch configuration

use std::time::Duration;

use super::types::FetchConfig;
use crate::connect::{RaceConfig, TcpConnector};
use crate::dns::OrderingPolicy;

impl FetchConfig {
    /// Enable or disable Happy Eyeballs racing
    ///
    /// When disabled, resolved addresses are tried strictly in order.
    ///
    /// # Examples
    /// ```no_run
    /// use happyfetch_client::config::FetchConfig;
    ///
    /// let config = FetchConfig::default().with_race(true);
    /// assert!(config.race_enabled);
    /// ```
    #[must_use]
    pub fn with_race(mut self, enabled: bool) -> Self {
        self.race_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_ordering(mut self, ordering: OrderingPolicy) -> Self {
        self.ordering = ordering;
        self
    }

    /// Shorthand for `with_ordering(OrderingPolicy::from_prefer_ipv4(prefer))`
    #[must_use]
    pub fn with_prefer_ipv4(self, prefer: bool) -> Self {
        self.with_ordering(OrderingPolicy::from_prefer_ipv4(prefer))
    }

    #[must_use]
    pub fn with_overall_timeout(mut self, timeout: Duration) -> Self {
        self.overall_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_stagger_delay(mut self, delay: Duration) -> Self {
        self.stagger_delay = delay;
        self
    }

    #[must_use]
    pub fn with_attempt_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_interleave_families(mut self, interleave: bool) -> Self {
        self.interleave_families = interleave;
        self
    }

    #[must_use]
    pub fn with_tcp_nodelay(mut self, nodelay: bool) -> Self {
        self.tcp_nodelay = nodelay;
        self
    }

    #[must_use]
    pub fn with_tcp_keepalive(mut self, keepalive: Option<Duration>) -> Self {
        self.tcp_keepalive = keepalive;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Racer parameters derived from this configuration.
    pub fn race_config(&self) -> RaceConfig {
        RaceConfig {
            stagger_delay: self.stagger_delay,
            attempt_timeout: self.attempt_timeout,
            interleave_families: self.interleave_families,
        }
    }

    /// TCP connector carrying this configuration's socket options.
    pub fn tcp_connector(&self) -> TcpConnector {
        TcpConnector::new()
            .nodelay(self.tcp_nodelay)
            .keepalive(self.tcp_keepalive)
    }
}
