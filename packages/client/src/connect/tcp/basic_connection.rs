//! Single-path connection establishment
//!
//! Tries addresses strictly in order, one at a time. Used when racing is
//! disabled, and provides the per-attempt timeout wrapper shared with the
//! racer.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::time::Instant;

use crate::connect::types::{
    AttemptError, AttemptRecord, AttemptState, Connect, RaceError, RaceOutcome,
};

/// Connect to one address, bounded by an optional per-attempt timeout.
///
/// # Errors
///
/// Returns [`AttemptError::TimedOut`] when the timeout elapses and
/// [`AttemptError::Io`] when the connector fails.
pub async fn connect_with_timeout<C: Connect + ?Sized>(
    connector: &C,
    addr: SocketAddr,
    attempt_timeout: Option<Duration>,
) -> Result<C::Conn, AttemptError> {
    let connecting = connector.connect(addr);
    let result = match attempt_timeout {
        Some(after) => match tokio::time::timeout(after, connecting).await {
            Ok(result) => result,
            Err(_) => return Err(AttemptError::TimedOut { addr, after }),
        },
        None => connecting.await,
    };
    result.map_err(|source| AttemptError::Io { addr, source })
}

/// Connect to the first address that accepts, trying them in order.
///
/// # Errors
///
/// Returns a [`RaceError`] holding one failure per address when none of them
/// accepts.
pub async fn connect_to_address_list<C: Connect + ?Sized>(
    connector: &C,
    addrs: &[SocketAddr],
    attempt_timeout: Option<Duration>,
) -> Result<RaceOutcome<C::Conn>, RaceError> {
    let started = Instant::now();
    let mut records = Vec::with_capacity(addrs.len());
    let mut failures = Vec::new();

    for &addr in addrs {
        let mut record = AttemptRecord::pending(addr, started.elapsed());
        tracing::debug!(%addr, "connecting");

        match connect_with_timeout(connector, addr, attempt_timeout).await {
            Ok(conn) => {
                record.finish(AttemptState::Succeeded, started.elapsed());
                records.push(record);
                tracing::debug!(%addr, "connected");
                return Ok(RaceOutcome {
                    conn,
                    winner: addr,
                    attempts: records,
                });
            }
            Err(err) => {
                tracing::debug!(%addr, error = %err, "connection attempt failed");
                record.finish(AttemptState::Failed, started.elapsed());
                records.push(record);
                failures.push(err);
            }
        }
    }

    Err(RaceError::new(failures))
}
