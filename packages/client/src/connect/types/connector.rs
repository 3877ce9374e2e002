//! Connector seam used by the connection racer
//!
//! A connector turns one socket address into one established connection.
//! The racer owns the returned future for the lifetime of the attempt and
//! drops it to cancel.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;

/// Future returned by [`Connect::connect`].
pub type Connecting<T> = Pin<Box<dyn Future<Output = io::Result<T>> + Send>>;

/// Establishes a connection to a single address.
///
/// Dropping the returned future must release every resource it acquired;
/// this is how losing attempts are cancelled.
pub trait Connect: Send + Sync + 'static {
    /// Established connection handed to the winner.
    type Conn: Send + 'static;

    fn connect(&self, addr: SocketAddr) -> Connecting<Self::Conn>;
}

impl<C: Connect + ?Sized> Connect for std::sync::Arc<C> {
    type Conn = C::Conn;

    fn connect(&self, addr: SocketAddr) -> Connecting<Self::Conn> {
        (**self).connect(addr)
    }
}
