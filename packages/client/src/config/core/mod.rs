//! Core fetch configuration types and default implementations
//!
//! - `types`: the `FetchConfig` struct
//! - `defaults`: default values
//! - `builders`: fluent `with_*` methods

pub mod builders;
pub mod defaults;
pub mod types;

pub use types::FetchConfig;
