//! Default values for `FetchConfig`

use std::time::Duration;

use super::types::FetchConfig;
use crate::dns::OrderingPolicy;

pub const DEFAULT_OVERALL_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_STAGGER_DELAY: Duration = Duration::from_millis(250);
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_USER_AGENT: &str = concat!("happyfetch/", env!("CARGO_PKG_VERSION"));

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            race_enabled: false,
            ordering: OrderingPolicy::SystemOrder,
            overall_timeout: DEFAULT_OVERALL_TIMEOUT,
            stagger_delay: DEFAULT_STAGGER_DELAY,
            attempt_timeout: Some(DEFAULT_ATTEMPT_TIMEOUT),
            interleave_families: false,
            tcp_nodelay: true,
            tcp_keepalive: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
