//! # happyfetch client
//!
//! HTTP/1.1 fetches over connections chosen by Happy Eyeballs (RFC 8305).
//!
//! A fetch resolves the host, optionally reorders the addresses to put IPv4
//! first, races staggered connection attempts across the addresses, and sends
//! one `GET` over the winning connection. Everything, including reading the
//! body, runs under a single overall deadline and can be cancelled at any
//! point; losing attempts and abandoned connections are torn down.
//!
//! ## Usage
//!
//! ```no_run
//! use happyfetch_client::{Client, FetchConfig};
//!
//! # async fn run() -> happyfetch_client::Result<()> {
//! let client = Client::with_config(FetchConfig::default().with_race(true))?;
//! let request = client.request("https://example.com/")?.with_prefer_ipv4(true);
//! let response = client.fetch(request).await?;
//! println!("{} from {}", response.status(), response.remote_addr());
//! let body = response.bytes().await?;
//! println!("{} bytes", body.len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

use std::sync::OnceLock;

pub mod client;
pub mod config;
pub mod connect;
pub mod dns;
pub mod error;
pub mod http;
pub mod tls;

pub mod prelude;

pub use crate::prelude::*;

/// Process-wide client with the default configuration.
static GLOBAL_CLIENT: OnceLock<Client> = OnceLock::new();

/// Shared client used when callers do not bring their own.
pub fn global_client() -> Client {
    GLOBAL_CLIENT.get_or_init(Client::new).clone()
}

/// Statistics of the shared client.
#[must_use]
pub fn global_stats() -> ClientStatsSnapshot {
    global_client().stats()
}
