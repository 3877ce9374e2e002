//! Core fetch configuration structure

use std::time::Duration;

use crate::dns::OrderingPolicy;

/// Fetch configuration
///
/// Controls address ordering, the connection strategy and its timing, the
/// overall deadline and socket options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Race addresses with Happy Eyeballs instead of trying them in order
    pub race_enabled: bool,

    /// Address ordering applied after resolution
    pub ordering: OrderingPolicy,

    /// Deadline covering resolution, connecting, sending and the body
    pub overall_timeout: Duration,

    /// Delay between staggered connection attempts
    pub stagger_delay: Duration,

    /// Bound on each individual connection attempt
    pub attempt_timeout: Option<Duration>,

    /// Alternate address families before racing
    pub interleave_families: bool,

    /// Enable TCP_NODELAY
    pub tcp_nodelay: bool,

    /// TCP keep-alive idle time
    pub tcp_keepalive: Option<Duration>,

    /// User-Agent request header
    pub user_agent: String,
}
