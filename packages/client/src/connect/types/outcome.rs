//! Successful race result

use std::net::SocketAddr;

use super::attempt::{AttemptRecord, AttemptState};

/// The winning connection plus what happened to every launched attempt.
///
/// Ownership of `conn` moves to whoever consumes the outcome.
#[derive(Debug)]
pub struct RaceOutcome<T> {
    pub conn: T,
    pub winner: SocketAddr,
    /// Launched attempts in launch order; addresses never launched are absent
    pub attempts: Vec<AttemptRecord>,
}

impl<T> RaceOutcome<T> {
    pub fn into_conn(self) -> T {
        self.conn
    }

    /// Number of attempts in the given state.
    pub fn count(&self, state: AttemptState) -> usize {
        self.attempts.iter().filter(|a| a.state == state).count()
    }

    /// Record for `addr`, if it was launched.
    pub fn attempt(&self, addr: SocketAddr) -> Option<&AttemptRecord> {
        self.attempts.iter().find(|a| a.addr == addr)
    }
}
