//! Connection establishment
//!
//! Turns an ordered address list into one established connection, either by
//! racing attempts (Happy Eyeballs) or by trying addresses one after another.

pub mod tcp;
pub mod types;

use std::net::SocketAddr;
use std::sync::Arc;

pub use tcp::{
    RaceConfig, TcpConnector, configure_tcp_socket, connect_to_address_list,
    connect_with_timeout, happy_eyeballs_connect,
};
pub use types::{
    AttemptError, AttemptRecord, AttemptState, Connect, Connecting, RaceError, RaceOutcome,
    WinnerGate,
};

/// Establish a connection to one of `addrs` using the selected strategy.
///
/// With `race_enabled` the addresses are raced with staggered starts;
/// otherwise they are tried strictly in order using the per-attempt timeout
/// from `config`.
///
/// # Errors
///
/// Returns [`RaceError`] with one failure per attempted address when no
/// connection could be made.
pub async fn establish<C: Connect>(
    connector: &Arc<C>,
    addrs: &[SocketAddr],
    config: &RaceConfig,
    race_enabled: bool,
) -> Result<RaceOutcome<C::Conn>, RaceError> {
    if race_enabled {
        happy_eyeballs_connect(Arc::clone(connector), addrs, config).await
    } else {
        connect_to_address_list(connector.as_ref(), addrs, config.attempt_timeout).await
    }
}
