//! Core DNS types for resolution
//!
//! Defines the name, address family, ordering policy and resolved host
//! types used throughout the resolution and racing code.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;

/// DNS name representation for hostname resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(String);

impl Name {
    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Name(s)
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name(s.to_string())
    }
}

/// Family tag of a resolved address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    #[inline]
    pub fn of(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        }
    }

    #[inline]
    pub fn of_socket(addr: &SocketAddr) -> Self {
        Self::of(&addr.ip())
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => f.write_str("IPv4"),
            AddressFamily::V6 => f.write_str("IPv6"),
        }
    }
}

/// How resolved addresses are ordered before racing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Keep the order the resolver returned
    #[default]
    SystemOrder,
    /// Stable partition with every IPv4 address ahead of every IPv6 address
    PreferIpv4,
}

impl OrderingPolicy {
    /// Policy matching a "prefer IPv4" toggle.
    #[must_use]
    pub fn from_prefer_ipv4(prefer_ipv4: bool) -> Self {
        if prefer_ipv4 {
            OrderingPolicy::PreferIpv4
        } else {
            OrderingPolicy::SystemOrder
        }
    }
}

/// A hostname together with the addresses it resolved to.
///
/// The address list is immutable once built and lives for a single fetch.
#[derive(Debug, Clone)]
pub struct ResolvedHost {
    name: Name,
    addrs: Vec<SocketAddr>,
}

impl ResolvedHost {
    pub(crate) fn new(name: Name, addrs: Vec<SocketAddr>) -> Self {
        Self { name, addrs }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    /// Candidate addresses in racing order.
    pub fn addrs(&self) -> &[SocketAddr] {
        &self.addrs
    }

    pub fn into_addrs(self) -> Vec<SocketAddr> {
        self.addrs
    }

    /// Number of addresses of the given family.
    pub fn count(&self, family: AddressFamily) -> usize {
        self.addrs
            .iter()
            .filter(|addr| AddressFamily::of_socket(addr) == family)
            .count()
    }
}
