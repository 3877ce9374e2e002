//! Happy Eyeballs (RFC 8305) connection racing
//!
//! Attempts are launched one at a time in address order, each on its own
//! task. The next address is started once the stagger delay elapses without a
//! winner, or straight away when the most recently launched attempt fails.
//! The first attempt to connect claims the [`WinnerGate`]; everything else is
//! aborted and awaited before the race returns, so no attempt outlives it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;

use super::basic_connection::connect_with_timeout;
use crate::connect::types::{
    AttemptError, AttemptRecord, AttemptState, Connect, RaceError, RaceOutcome, WinnerGate,
};
use crate::dns::resolve::interleave_families;

/// Tuning knobs for a single race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceConfig {
    /// Delay between consecutive attempt launches
    pub stagger_delay: Duration,
    /// Bound on each individual attempt; `None` leaves attempts unbounded
    pub attempt_timeout: Option<Duration>,
    /// Reorder addresses to alternate families before racing
    pub interleave_families: bool,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            stagger_delay: Duration::from_millis(250),
            attempt_timeout: Some(Duration::from_secs(10)),
            interleave_families: false,
        }
    }
}

impl RaceConfig {
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
}

/// How one attempt task ended.
enum Attempted<T> {
    Won(T),
    /// Connected after another attempt had already won; the connection was
    /// closed inside the task.
    Lost,
    Failed(AttemptError),
}

/// Runs on every exit path of an attempt, including abort.
struct AttemptGuard {
    addr: SocketAddr,
    settled: bool,
}

impl Drop for AttemptGuard {
    fn drop(&mut self) {
        if !self.settled {
            tracing::trace!(addr = %self.addr, "connection attempt cancelled");
        }
    }
}

async fn run_attempt<C: Connect>(
    index: usize,
    addr: SocketAddr,
    connector: Arc<C>,
    gate: Arc<WinnerGate>,
    attempt_timeout: Option<Duration>,
) -> (usize, Attempted<C::Conn>) {
    let mut guard = AttemptGuard {
        addr,
        settled: false,
    };

    let attempted = match connect_with_timeout(&*connector, addr, attempt_timeout).await {
        Ok(conn) if gate.try_claim() => Attempted::Won(conn),
        Ok(conn) => {
            drop(conn);
            Attempted::Lost
        }
        Err(err) => Attempted::Failed(err),
    };

    guard.settled = true;
    (index, attempted)
}

enum Step<T> {
    Joined(Result<(usize, Attempted<T>), JoinError>),
    Stagger,
    Exhausted,
}

struct Race<C: Connect> {
    connector: Arc<C>,
    addrs: Vec<SocketAddr>,
    attempt_timeout: Option<Duration>,
    gate: Arc<WinnerGate>,
    tasks: JoinSet<(usize, Attempted<C::Conn>)>,
    records: Vec<AttemptRecord>,
    failures: Vec<Option<AttemptError>>,
    started: Instant,
}

impl<C: Connect> Race<C> {
    fn new(connector: Arc<C>, addrs: Vec<SocketAddr>, attempt_timeout: Option<Duration>) -> Self {
        let capacity = addrs.len();
        Self {
            connector,
            addrs,
            attempt_timeout,
            gate: Arc::new(WinnerGate::new()),
            tasks: JoinSet::new(),
            records: Vec::with_capacity(capacity),
            failures: Vec::with_capacity(capacity),
            started: Instant::now(),
        }
    }

    fn has_more(&self) -> bool {
        self.records.len() < self.addrs.len()
    }

    fn is_latest(&self, index: usize) -> bool {
        index + 1 == self.records.len()
    }

    fn launch_next(&mut self) {
        let index = self.records.len();
        let Some(&addr) = self.addrs.get(index) else {
            return;
        };

        tracing::debug!(%addr, attempt = index + 1, "launching connection attempt");
        self.records
            .push(AttemptRecord::pending(addr, self.started.elapsed()));
        self.failures.push(None);
        self.tasks.spawn(run_attempt(
            index,
            addr,
            Arc::clone(&self.connector),
            Arc::clone(&self.gate),
            self.attempt_timeout,
        ));
    }

    fn mark(&mut self, index: usize, state: AttemptState) {
        let at = self.started.elapsed();
        if let Some(record) = self.records.get_mut(index) {
            record.finish(state, at);
        }
    }

    fn fail(&mut self, index: usize, err: AttemptError) {
        tracing::debug!(addr = %err.addr(), error = %err, "connection attempt failed");
        self.mark(index, AttemptState::Failed);
        if let Some(slot) = self.failures.get_mut(index) {
            *slot = Some(err);
        }
    }

    /// Abort every outstanding attempt and wait for each to be torn down.
    async fn finish(&mut self) {
        self.tasks.abort_all();
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok((index, Attempted::Failed(err))) => self.fail(index, err),
                Ok((index, Attempted::Lost)) => self.mark(index, AttemptState::Cancelled),
                // Only one attempt can claim the gate and it has been consumed.
                Ok((index, Attempted::Won(conn))) => {
                    drop(conn);
                    self.mark(index, AttemptState::Cancelled);
                }
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                Err(_) => {}
            }
        }

        let at = self.started.elapsed();
        for record in &mut self.records {
            record.finish(AttemptState::Cancelled, at);
        }
    }

    fn into_error(self) -> RaceError {
        RaceError::new(self.failures.into_iter().flatten().collect())
    }
}

/// Race connection attempts across `addrs` and return the first to connect.
///
/// Addresses are attempted in the given order. When every attempt fails, the
/// returned [`RaceError`] carries one failure per address in the same order.
/// Dropping the returned future aborts every outstanding attempt.
///
/// # Errors
///
/// Returns [`RaceError`] when no address accepts a connection.
pub async fn happy_eyeballs_connect<C: Connect>(
    connector: Arc<C>,
    addrs: &[SocketAddr],
    config: &RaceConfig,
) -> Result<RaceOutcome<C::Conn>, RaceError> {
    let addrs = if config.interleave_families {
        interleave_families(addrs)
    } else {
        addrs.to_vec()
    };

    if addrs.is_empty() {
        return Err(RaceError::new(Vec::new()));
    }

    let mut race = Race::new(connector, addrs, config.attempt_timeout);
    let stagger = tokio::time::sleep(config.stagger_delay);
    tokio::pin!(stagger);

    race.launch_next();

    loop {
        let more = race.has_more();
        let step = tokio::select! {
            biased;
            Some(joined) = race.tasks.join_next() => Step::Joined(joined),
            () = &mut stagger, if more => Step::Stagger,
            else => Step::Exhausted,
        };

        match step {
            Step::Joined(Ok((index, Attempted::Won(conn)))) => {
                let winner = race.addrs[index];
                race.mark(index, AttemptState::Succeeded);
                race.finish().await;
                tracing::debug!(
                    %winner,
                    launched = race.records.len(),
                    "connection race won"
                );
                return Ok(RaceOutcome {
                    conn,
                    winner,
                    attempts: race.records,
                });
            }
            Step::Joined(Ok((index, Attempted::Lost))) => {
                race.mark(index, AttemptState::Cancelled);
            }
            Step::Joined(Ok((index, Attempted::Failed(err)))) => {
                let accelerate = race.is_latest(index) || race.tasks.is_empty();
                race.fail(index, err);
                if accelerate && race.has_more() {
                    race.launch_next();
                    stagger
                        .as_mut()
                        .reset(Instant::now() + config.stagger_delay);
                }
            }
            Step::Joined(Err(err)) => {
                if err.is_panic() {
                    race.finish().await;
                    std::panic::resume_unwind(err.into_panic());
                }
            }
            Step::Stagger => {
                race.launch_next();
                stagger
                    .as_mut()
                    .reset(Instant::now() + config.stagger_delay);
            }
            Step::Exhausted => break,
        }
    }

    race.finish().await;
    tracing::debug!(attempts = race.records.len(), "every connection attempt failed");
    Err(race.into_error())
}
