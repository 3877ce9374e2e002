//! TCP socket configuration utilities
//!
//! Applies nodelay and keepalive settings to freshly connected streams.

use std::io;
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};
use tokio::net::TcpStream;

/// Configure a connected TCP stream.
///
/// # Errors
///
/// Returns the underlying socket error if an option cannot be applied.
pub fn configure_tcp_socket(
    stream: &TcpStream,
    nodelay: bool,
    keepalive: Option<Duration>,
) -> io::Result<()> {
    if nodelay {
        stream.set_nodelay(true)?;
    }

    if let Some(time) = keepalive {
        let keepalive = TcpKeepalive::new().with_time(time);
        SockRef::from(stream).set_tcp_keepalive(&keepalive)?;
    }

    Ok(())
}
