//! Client builder

use std::sync::Arc;

use super::core::Client;
use crate::config::{FetchConfig, Validator};
use crate::connect::{Connect, TcpConnector};
use crate::dns::{AddressResolver, Resolve};
use crate::error::{self, Result};
use crate::tls::TlsConnector;

enum ConnectorSlot<C> {
    /// Built from the final configuration's socket options
    FromConfig(fn(&FetchConfig) -> C),
    Custom(C),
}

/// Configures and builds a [`Client`].
pub struct ClientBuilder<C = TcpConnector> {
    config: FetchConfig,
    resolver: Option<AddressResolver>,
    connector: ConnectorSlot<C>,
    tls: Option<TlsConnector>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            config: FetchConfig::default(),
            resolver: None,
            connector: ConnectorSlot::FromConfig(FetchConfig::tcp_connector),
            tls: None,
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connect> ClientBuilder<C> {
    #[must_use]
    pub fn config(mut self, config: FetchConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve names with `resolver` instead of the system resolver.
    #[must_use]
    pub fn resolver<R: Resolve>(mut self, resolver: R) -> Self {
        self.resolver = Some(AddressResolver::new(Arc::new(resolver)));
        self
    }

    /// Open connections with `connector` instead of plain TCP.
    pub fn connector<D: Connect>(self, connector: D) -> ClientBuilder<D> {
        ClientBuilder {
            config: self.config,
            resolver: self.resolver,
            connector: ConnectorSlot::Custom(connector),
            tls: self.tls,
        }
    }

    /// Use `tls` for `https` fetches instead of the webpki default.
    #[must_use]
    pub fn tls(mut self, tls: TlsConnector) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// # Errors
    ///
    /// Returns a builder error if the configuration is invalid.
    pub fn build(self) -> Result<Client<C>> {
        self.config.validate().map_err(error::builder)?;

        let connector = match self.connector {
            ConnectorSlot::FromConfig(make) => make(&self.config),
            ConnectorSlot::Custom(connector) => connector,
        };
        let resolver = self.resolver.unwrap_or_default();

        tracing::debug!(
            race_enabled = self.config.race_enabled,
            ordering = ?self.config.ordering,
            overall_timeout_ms = self.config.overall_timeout.as_millis() as u64,
            "client built"
        );
        Ok(Client::from_parts(self.config, resolver, connector, self.tls))
    }
}
