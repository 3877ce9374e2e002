//! Fetch configuration
//!
//! [`FetchConfig`] carries every tunable of a fetch; [`FetchOptions`] is the
//! serialisable outer surface that converts into a validated `FetchConfig`.

pub mod core;
pub mod options;
pub mod validation;

pub use self::core::FetchConfig;
pub use options::FetchOptions;
pub use validation::{ConfigResult, ConfigValidator, ConfigurationError, Validator};
