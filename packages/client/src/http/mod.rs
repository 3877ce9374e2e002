//! HTTP request and response types for a single fetch

pub mod body;
pub mod into_url;
pub mod request;
pub mod response;

pub use body::{BodyStream, CopyError};
pub use into_url::IntoUrl;
pub use request::FetchRequest;
pub use response::FetchResponse;
