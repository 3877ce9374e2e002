//! Per-fetch state machine
//!
//! `Created → Resolving → Racing → Sending → ReceivingBody → terminal`.
//! `Cancelled` and `TimedOut` can be entered from any non-terminal state and
//! a terminal state never changes.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use super::stats::ClientStats;

/// Where a fetch currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchState {
    Created,
    Resolving,
    Racing,
    Sending,
    ReceivingBody,
    Completed,
    Failed,
    TimedOut,
    Cancelled,
}

impl FetchState {
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            FetchState::Completed | FetchState::Failed | FetchState::TimedOut | FetchState::Cancelled
        )
    }

    fn rank(self) -> u8 {
        match self {
            FetchState::Created => 0,
            FetchState::Resolving => 1,
            FetchState::Racing => 2,
            FetchState::Sending => 3,
            FetchState::ReceivingBody => 4,
            _ => u8::MAX,
        }
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: FetchState) -> bool {
        if self.is_terminal() {
            return false;
        }
        next.rank() > self.rank()
    }
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FetchState::Created => "created",
            FetchState::Resolving => "resolving",
            FetchState::Racing => "racing",
            FetchState::Sending => "sending",
            FetchState::ReceivingBody => "receiving body",
            FetchState::Completed => "completed",
            FetchState::Failed => "failed",
            FetchState::TimedOut => "timed out",
            FetchState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Publishes the state of one fetch to any number of observers.
#[derive(Debug)]
pub struct StateTracker {
    tx: watch::Sender<FetchState>,
    stats: Option<Arc<ClientStats>>,
}

impl StateTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(FetchState::Created);
        Self { tx, stats: None }
    }

    /// Tracker that also counts terminal outcomes in `stats`.
    pub fn with_stats(stats: Arc<ClientStats>) -> Self {
        Self {
            stats: Some(stats),
            ..Self::new()
        }
    }

    pub fn current(&self) -> FetchState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.tx.subscribe()
    }

    /// Move to `next` if the transition is legal. Returns whether it happened.
    pub fn transition(&self, next: FetchState) -> bool {
        let mut from = FetchState::Created;
        let moved = self.tx.send_if_modified(|state| {
            from = *state;
            if state.can_transition_to(next) {
                *state = next;
                true
            } else {
                false
            }
        });

        if moved {
            tracing::trace!(%from, to = %next, "fetch state transition");
            if let Some(stats) = &self.stats {
                match next {
                    FetchState::Completed => stats.record_completed(),
                    FetchState::Failed => stats.record_failed(),
                    FetchState::TimedOut => stats.record_timed_out(),
                    FetchState::Cancelled => stats.record_cancelled(),
                    _ => {}
                }
            }
        }
        moved
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}
