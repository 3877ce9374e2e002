//! Race attempt bookkeeping
//!
//! Every address the racer launches gets an [`AttemptRecord`]. Records move
//! from `Pending` to exactly one terminal state. The [`WinnerGate`] is the
//! only state attempts share.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Lifecycle of a single connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Pending,
    Succeeded,
    Failed,
    Cancelled,
}

impl AttemptState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        !matches!(self, AttemptState::Pending)
    }
}

/// What happened to one launched address.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub addr: SocketAddr,
    pub state: AttemptState,
    /// Offset from the start of the race at which the attempt launched
    pub started_at: Duration,
    /// Offset at which the attempt reached its terminal state
    pub finished_at: Option<Duration>,
}

impl AttemptRecord {
    pub(crate) fn pending(addr: SocketAddr, started_at: Duration) -> Self {
        Self {
            addr,
            state: AttemptState::Pending,
            started_at,
            finished_at: None,
        }
    }

    pub(crate) fn finish(&mut self, state: AttemptState, at: Duration) {
        if self.state.is_terminal() {
            return;
        }
        self.state = state;
        self.finished_at = Some(at);
    }
}

/// Why a single attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum AttemptError {
    #[error("connect to {addr} failed: {source}")]
    Io {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("connect to {addr} timed out after {} ms", .after.as_millis())]
    TimedOut { addr: SocketAddr, after: Duration },
}

impl AttemptError {
    /// Address the attempt targeted.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        match self {
            AttemptError::Io { addr, .. } | AttemptError::TimedOut { addr, .. } => *addr,
        }
    }

    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, AttemptError::TimedOut { .. })
    }
}

/// Every connection attempt failed.
///
/// Holds one failure per attempted address, in attempt order.
#[derive(Debug)]
pub struct RaceError {
    attempts: Vec<AttemptError>,
}

impl RaceError {
    pub(crate) fn new(attempts: Vec<AttemptError>) -> Self {
        Self { attempts }
    }

    pub fn attempts(&self) -> &[AttemptError] {
        &self.attempts
    }

    pub fn into_attempts(self) -> Vec<AttemptError> {
        self.attempts
    }
}

impl fmt::Display for RaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attempts.is_empty() {
            return f.write_str("no addresses to connect to");
        }
        write!(f, "all {} connection attempts failed", self.attempts.len())?;
        for (i, attempt) in self.attempts.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{attempt}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RaceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.attempts
            .last()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

/// Exactly-once "who won" flag shared by the attempts of one race.
#[derive(Debug, Default)]
pub struct WinnerGate {
    claimed: AtomicBool,
}

impl WinnerGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the win. Returns `true` for exactly one caller.
    #[inline]
    pub fn try_claim(&self) -> bool {
        self.claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    #[inline]
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }
}
