//! DNS resolution

pub use resolve::{
    AddressFamily, AddressResolver, Addrs, GaiResolver, Name, OrderingPolicy, OverrideResolver,
    Resolve, ResolveError, ResolvedHost, Resolving,
};

pub mod resolve;
