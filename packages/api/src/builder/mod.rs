//! Fluent download builder

pub mod core;

pub use self::core::DownloadBuilder;
