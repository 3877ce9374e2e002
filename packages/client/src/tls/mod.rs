//! TLS for `https` fetches
//!
//! The race runs over plain TCP; the handshake happens once on the winning
//! connection using rustls with the ring provider and the webpki root set.

pub mod connector;
pub mod errors;
pub mod stream;

pub use connector::TlsConnector;
pub use errors::TlsError;
pub use stream::MaybeTlsStream;
