//! Fetch client
//!
//! [`Client`] owns configuration, the address resolver and the connector, and
//! runs each fetch through resolution, the connection race, the request and
//! the lazy body under one overall deadline.

pub mod builder;
pub mod core;
pub mod fetch;
pub mod handle;
pub mod state;
pub mod stats;

pub use self::core::Client;
pub use builder::ClientBuilder;
pub use handle::FetchHandle;
pub use state::{FetchState, StateTracker};
pub use stats::{ClientStats, ClientStatsSnapshot};
