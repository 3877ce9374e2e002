//! DNS resolution module for the fetch core
//!
//! Resolves hostnames through a pluggable [`Resolve`] implementation and
//! applies the configured [`OrderingPolicy`] to the result. The ordering is
//! advisory input for the connection racer, never a filter.

pub mod error;
pub mod gai;
pub mod overrides;
pub mod resolvers;
pub mod traits;
pub mod types;
pub mod utilities;

pub use error::ResolveError;
pub use gai::GaiResolver;
pub use overrides::OverrideResolver;
pub use resolvers::AddressResolver;
pub use traits::{Addrs, Resolve, Resolving};
pub use types::{AddressFamily, Name, OrderingPolicy, ResolvedHost};
pub use utilities::{
    apply_ordering, interleave_families, is_ip_address, parse_ip_literal, validate_hostname,
};
